//! Gateway REST client implementation.
//!
//! Connects to the payment API for key-descriptor retrieval, transaction
//! lookups and transaction creation.
//!
//! # Feature Flags
//!
//! This module requires the `http-client` feature flag to be enabled for
//! actual HTTP requests. Without it, all requests return an `Unimplemented`
//! error.
//!
//! ```toml
//! [dependencies]
//! paygate-lib = { version = "1.0", features = ["http-client"] }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "http-client")]
use std::time::Duration;

use super::config::{Auth, GatewayConfig};
use crate::transport::CardHashKeySource;
use crate::{CardHash, CardRecord, KeyDescriptor, PaygateError, Result};

/// Authenticated client for the payment API.
///
/// The client owns a credential and a base URL; every request carries the
/// credential as the query parameter the remote service expects. It
/// performs no retries and caches nothing, card-hash keys included.
pub struct GatewayClient {
    config: GatewayConfig,
    auth: Auth,
    #[cfg(feature = "http-client")]
    client: reqwest::Client,
}

impl GatewayClient {
    /// Create a new gateway client with the given configuration.
    #[cfg(feature = "http-client")]
    pub fn new(config: GatewayConfig, auth: Auth) -> Result<Self> {
        Self::validate(&config, &auth)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PaygateError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            auth,
            client,
        })
    }

    /// Create a new gateway client with the given configuration (stub when
    /// feature disabled).
    #[cfg(not(feature = "http-client"))]
    pub fn new(config: GatewayConfig, auth: Auth) -> Result<Self> {
        Self::validate(&config, &auth)?;
        Ok(Self { config, auth })
    }

    /// Create a client against the production environment.
    pub fn production(auth: Auth) -> Result<Self> {
        Self::new(GatewayConfig::production(), auth)
    }

    /// Create a client against the sandbox environment.
    pub fn sandbox(auth: Auth) -> Result<Self> {
        Self::new(GatewayConfig::sandbox(), auth)
    }

    fn validate(config: &GatewayConfig, auth: &Auth) -> Result<()> {
        if config.api_url.is_empty() {
            return Err(PaygateError::invalid_data(
                "api_url",
                "API URL cannot be empty",
            ));
        }
        if auth.credential().is_empty() {
            return Err(PaygateError::InvalidCredentials(
                "credential cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get the active credential.
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Replace the credential, e.g. after a session login.
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Build the full URL for an API endpoint.
    #[cfg(any(feature = "http-client", test))]
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Make an authenticated GET request to the API.
    #[cfg(feature = "http-client")]
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);

        let response = self
            .client
            .get(&url)
            .query(&[self.auth.query_param()])
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Make an authenticated GET request to the API (stub when feature
    /// disabled).
    #[cfg(not(feature = "http-client"))]
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        _path: &str,
        _query: &[(&str, String)],
    ) -> Result<T> {
        Err(PaygateError::Unimplemented(
            "gateway HTTP client not compiled - enable the 'http-client' feature",
        ))
    }

    /// Make an authenticated POST request with a JSON body.
    #[cfg(feature = "http-client")]
    async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .query(&[self.auth.query_param()])
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST request (stub when feature disabled).
    #[cfg(not(feature = "http-client"))]
    async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        _path: &str,
        _body: &B,
    ) -> Result<T> {
        Err(PaygateError::Unimplemented(
            "gateway HTTP client not compiled - enable the 'http-client' feature",
        ))
    }

    /// Make a POST request without attaching the credential.
    #[cfg(feature = "http-client")]
    async fn post_unauthenticated<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Make a POST request without attaching the credential (stub when
    /// feature disabled).
    #[cfg(not(feature = "http-client"))]
    async fn post_unauthenticated<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        _path: &str,
        _body: &B,
    ) -> Result<T> {
        Err(PaygateError::Unimplemented(
            "gateway HTTP client not compiled - enable the 'http-client' feature",
        ))
    }

    /// Handle an HTTP response, parsing JSON or returning an error.
    #[cfg(feature = "http-client")]
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.map_status_error(status.as_u16(), &error_text));
        }

        response.json::<T>().await.map_err(|e| {
            PaygateError::Serialization(format!("Failed to parse gateway response: {}", e))
        })
    }

    /// Map HTTP status codes to PaygateError.
    #[cfg(feature = "http-client")]
    fn map_status_error(&self, status: u16, error_text: &str) -> PaygateError {
        match status {
            400 => PaygateError::InvalidData {
                field: "request".to_string(),
                reason: error_text.to_string(),
            },
            401 | 403 => {
                // A rejected session credential means the login lapsed.
                if matches!(self.auth, Auth::Session(_)) {
                    PaygateError::SessionExpired
                } else {
                    PaygateError::Auth(error_text.to_string())
                }
            }
            404 => PaygateError::NotFound {
                resource_type: "gateway resource".to_string(),
                identifier: error_text.to_string(),
            },
            429 => PaygateError::RateLimited {
                retry_after_ms: 5000,
            },
            500..=599 => {
                PaygateError::Internal(format!("gateway server error ({}): {}", status, error_text))
            }
            _ => PaygateError::Transport(format!(
                "gateway request failed ({}): {}",
                status, error_text
            )),
        }
    }

    /// Map reqwest errors to PaygateError.
    #[cfg(feature = "http-client")]
    fn map_reqwest_error(&self, e: reqwest::Error) -> PaygateError {
        if e.is_timeout() {
            PaygateError::ConnectionTimeout {
                operation: "gateway request".to_string(),
                timeout_ms: self.config.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            PaygateError::ConnectionFailed {
                target: self.config.api_url.clone(),
                reason: e.to_string(),
            }
        } else {
            PaygateError::Transport(format!("gateway request failed: {}", e))
        }
    }

    // ========================================================================
    // Public API Methods
    // ========================================================================

    /// Fetch the public-key descriptor used to encrypt card payloads.
    ///
    /// Requires an encryption-key or api-key credential. The descriptor is
    /// issued per session; the client does not cache it.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn card_hash_key(&self) -> Result<KeyDescriptor> {
        self.get("transactions/card_hash_key", &[]).await
    }

    /// Encrypt a card record into a card hash using a freshly fetched key.
    ///
    /// Convenience wrapper over [`crate::encrypt_card`] with this client as
    /// the key source.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, card)))]
    pub async fn encrypt_card(&self, card: &CardRecord) -> Result<CardHash> {
        crate::encrypt_card(self, card).await
    }

    /// Fetch a transaction by id.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn find_transaction(&self, id: u64) -> Result<Transaction> {
        self.get(&format!("transactions/{}", id), &[]).await
    }

    /// List transactions, newest first.
    ///
    /// `count` and `page` map onto the API's pagination parameters; `None`
    /// leaves the server defaults in place.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn list_transactions(
        &self,
        count: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Transaction>> {
        let mut query = Vec::new();
        if let Some(count) = count {
            query.push(("count", count.to_string()));
        }
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        self.get("transactions", &query).await
    }

    /// Create a transaction from a card hash.
    ///
    /// The card hash stands in for raw card data; the remote service
    /// decrypts it with the private half of the issuing key.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, request)))]
    pub async fn create_transaction(&self, request: &TransactionRequest) -> Result<Transaction> {
        self.post("transactions", request).await
    }

    /// Log in with email and password, returning a session id.
    ///
    /// Wrap the result in [`Auth::Session`] and swap it in with
    /// [`GatewayClient::with_auth`] to authenticate follow-up requests.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, password)))]
    pub async fn create_session(&self, email: &str, password: &str) -> Result<String> {
        let request = SessionRequest { email, password };
        let response: SessionResponse = self.post_unauthenticated("sessions", &request).await?;
        Ok(response.session_id)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl CardHashKeySource for GatewayClient {
    async fn card_hash_key(&self) -> Result<KeyDescriptor> {
        GatewayClient::card_hash_key(self).await
    }
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Serialize)]
struct SessionRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    session_id: String,
}

/// Lifecycle status of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Accepted, acquirer processing in progress.
    Processing,
    /// Authorized but not yet captured.
    Authorized,
    /// Captured and settled.
    Paid,
    /// Refunded back to the cardholder.
    Refunded,
    /// Waiting for an out-of-band payment to land.
    WaitingPayment,
    /// Refund requested, not yet settled.
    PendingRefund,
    /// Refused by the acquirer or antifraud.
    Refused,
    /// Status this client version does not know about.
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// Get the status name as used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Authorized => "authorized",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
            Self::WaitingPayment => "waiting_payment",
            Self::PendingRefund => "pending_refund",
            Self::Refused => "refused",
            Self::Unknown => "unknown",
        }
    }
}

/// A transaction as returned by the payment API.
///
/// Card fields come back masked; the raw record never round-trips.
#[derive(Clone, Debug, Deserialize)]
pub struct Transaction {
    /// Transaction id.
    pub id: u64,
    /// Current lifecycle status.
    pub status: TransactionStatus,
    /// Amount in cents.
    #[serde(default)]
    pub amount: u64,
    /// Number of installments.
    #[serde(default)]
    pub installments: u32,
    /// Creation timestamp.
    pub date_created: Option<DateTime<Utc>>,
    /// Holder name echoed back by the service.
    pub card_holder_name: Option<String>,
    /// Last four digits of the card number.
    pub card_last_digits: Option<String>,
    /// Card brand detected by the service.
    pub card_brand: Option<String>,
    /// Refusal reason, when status is `refused`.
    pub refuse_reason: Option<String>,
}

/// Payload for creating a transaction.
#[derive(Clone, Debug, Serialize)]
pub struct TransactionRequest {
    /// Amount in cents.
    pub amount: u64,
    /// Encrypted card data standing in for the raw record.
    pub card_hash: CardHash,
    /// Number of installments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    /// Text shown on the cardholder's statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_descriptor: Option<String>,
}

impl TransactionRequest {
    /// Create a transaction request for the given amount and card hash.
    pub fn new(amount: u64, card_hash: CardHash) -> Self {
        Self {
            amount,
            card_hash,
            installments: None,
            soft_descriptor: None,
        }
    }

    /// Set the number of installments.
    pub fn with_installments(mut self, installments: u32) -> Self {
        self.installments = Some(installments);
        self
    }

    /// Set the statement descriptor.
    pub fn with_soft_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.soft_descriptor = Some(descriptor.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
