//! Authenticated REST client for the payment API.
//!
//! This module provides the gateway client that surrounds the card-hash
//! encoder: it fetches the per-session public-key descriptor and forwards
//! transaction calls to the remote service.
//!
//! ## Feature Flags
//!
//! The `http-client` feature flag must be enabled for actual HTTP requests:
//!
//! ```toml
//! [dependencies]
//! paygate-lib = { version = "1.0", features = ["http-client"] }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paygate_lib::client::{Auth, GatewayClient, TransactionRequest};
//! use paygate_lib::CardRecord;
//!
//! // Encryption keys may only fetch the card-hash key endpoint
//! let client = GatewayClient::sandbox(Auth::EncryptionKey("ek_test_...".into()))?;
//!
//! let card = CardRecord::new("4111 1111 1111 1111", "Pedro Paulo", "12/25", "543");
//! let card_hash = client.encrypt_card(&card).await?;
//!
//! // Full api keys can create and look up transactions
//! let client = client.with_auth(Auth::ApiKey("ak_test_...".into()));
//! let transaction = client
//!     .create_transaction(&TransactionRequest::new(31000, card_hash))
//!     .await?;
//! println!("status: {}", transaction.status.as_str());
//! ```
//!
//! ## Session Login
//!
//! ```rust,ignore
//! let session_id = client.create_session("me@example.com", "hunter2").await?;
//! let client = client.with_auth(Auth::Session(session_id));
//! ```

pub mod config;
mod gateway;

pub use config::{Auth, GatewayConfig};
pub use gateway::{GatewayClient, Transaction, TransactionRequest, TransactionStatus};
