//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits for
//! quick setup. Import everything with:
//!
//! ```rust,ignore
//! use paygate_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Core types: `CardRecord`, `KeyDescriptor`, `CardHash`
//! - Error types: `PaygateError`, `PaygateErrorCode`, `Result`
//! - Key source trait: `CardHashKeySource`
//! - Gateway client: `GatewayClient`, `GatewayConfig`, `Auth`, `Transaction`

// Core types
pub use crate::{CardHash, CardRecord, KeyDescriptor};

// Error handling
pub use crate::errors::{PaygateError, PaygateErrorCode};
pub use crate::Result;

// Card hash encoding
pub use crate::card_hash::{encrypt_card_number, EncryptionError};
pub use crate::encrypt_card;

// Key source trait
pub use crate::transport::CardHashKeySource;

// Gateway client
pub use crate::client::{
    Auth, GatewayClient, GatewayConfig, Transaction, TransactionRequest, TransactionStatus,
};
