//! Configuration and credential types for the gateway client.

use serde::{Deserialize, Serialize};

/// Credential strategies accepted by the payment API.
///
/// Each strategy materializes as the query parameter the remote service
/// expects. Session credentials are obtained through
/// [`GatewayClient::create_session`](super::GatewayClient::create_session).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Auth {
    /// Full-access API key (`api_key`).
    ApiKey(String),
    /// Restricted key that can only fetch the card-hash key endpoint
    /// (`encryption_key`).
    EncryptionKey(String),
    /// Session id from an email/password login (`session_id`).
    Session(String),
}

impl Auth {
    /// The query parameter this credential authenticates with.
    #[cfg(any(feature = "http-client", test))]
    pub(crate) fn query_param(&self) -> (&'static str, &str) {
        match self {
            Self::ApiKey(key) => ("api_key", key),
            Self::EncryptionKey(key) => ("encryption_key", key),
            Self::Session(id) => ("session_id", id),
        }
    }

    /// The raw credential value.
    pub fn credential(&self) -> &str {
        match self {
            Self::ApiKey(value) | Self::EncryptionKey(value) | Self::Session(value) => value,
        }
    }
}

/// Configuration for the gateway REST client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// API base URL (e.g., `https://api.paygate.io/1`).
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl GatewayConfig {
    /// Create a new gateway configuration.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs: default_timeout(),
        }
    }

    /// Create config for the production environment.
    pub fn production() -> Self {
        Self::new("https://api.paygate.io/1")
    }

    /// Create config for the sandbox environment.
    pub fn sandbox() -> Self {
        Self::new("https://api.sandbox.paygate.io/1")
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_presets() {
        let production = GatewayConfig::production();
        assert!(production.api_url.contains("api.paygate.io"));
        assert_eq!(production.timeout_secs, 30);

        let sandbox = GatewayConfig::sandbox().with_timeout(60);
        assert!(sandbox.api_url.contains("sandbox"));
        assert_eq!(sandbox.timeout_secs, 60);
    }

    #[test]
    fn test_auth_query_params() {
        assert_eq!(
            Auth::ApiKey("ak_test_1".into()).query_param(),
            ("api_key", "ak_test_1")
        );
        assert_eq!(
            Auth::EncryptionKey("ek_test_2".into()).query_param(),
            ("encryption_key", "ek_test_2")
        );
        assert_eq!(
            Auth::Session("sess_3".into()).query_param(),
            ("session_id", "sess_3")
        );
    }
}
