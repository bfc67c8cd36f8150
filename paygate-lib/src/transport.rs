use async_trait::async_trait;

use crate::{KeyDescriptor, Result};

/// Trait describing how a key descriptor is supplied to the encoder.
///
/// The SDK never fetches or caches public keys on its own; the descriptor
/// arrives from an external authenticated session or client component. A
/// descriptor held directly resolves immediately; the gateway client
/// resolves one by calling the remote key endpoint.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait CardHashKeySource {
    /// Resolve the public-key descriptor used to encrypt card payloads.
    async fn card_hash_key(&self) -> Result<KeyDescriptor>;
}

/// A descriptor in hand is its own source.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl CardHashKeySource for KeyDescriptor {
    async fn card_hash_key(&self) -> Result<KeyDescriptor> {
        Ok(self.clone())
    }
}
