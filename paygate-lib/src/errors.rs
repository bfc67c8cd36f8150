//! Error types for Paygate operations.
//!
//! This module provides structured error types for the Paygate library,
//! enabling precise error handling and recovery strategies.

use std::fmt;

use crate::card_hash::EncryptionError;

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PaygateErrorCode {
    /// Feature not implemented
    Unimplemented = 1000,
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// Authentication/authorization error
    Auth = 3000,
    /// Session expired
    SessionExpired = 3001,
    /// Invalid credentials
    InvalidCredentials = 3002,
    /// Resource not found
    NotFound = 4000,
    /// Invalid request/data
    InvalidData = 5000,
    /// Serialization error
    Serialization = 5002,
    /// Card encryption failed
    Encryption = 6000,
    /// Rate limited
    RateLimited = 8000,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Comprehensive error type for Paygate operations.
#[derive(Debug)]
pub enum PaygateError {
    /// Feature not implemented yet.
    Unimplemented(&'static str),

    /// Transport/network layer error.
    Transport(String),

    /// Connection failed.
    ConnectionFailed {
        /// Target endpoint or service
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Connection timeout.
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Authentication or authorization failed.
    Auth(String),

    /// Session expired, needs re-authentication.
    SessionExpired,

    /// Invalid credentials provided.
    InvalidCredentials(String),

    /// Resource not found (transaction, key, etc.).
    NotFound {
        /// Type of resource (e.g., "transaction", "card hash key")
        resource_type: String,
        /// Resource identifier
        identifier: String,
    },

    /// Invalid data provided.
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// Card hash encryption failed.
    ///
    /// Encryption is deterministic for identical inputs, so retrying
    /// without changing the key or payload cannot succeed.
    Encryption(EncryptionError),

    /// Rate limited, should retry after delay.
    RateLimited {
        /// Suggested retry delay in milliseconds
        retry_after_ms: u64,
    },

    /// Internal/unexpected error.
    Internal(String),
}

impl PaygateError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> PaygateErrorCode {
        match self {
            Self::Unimplemented(_) => PaygateErrorCode::Unimplemented,
            Self::Transport(_) => PaygateErrorCode::Transport,
            Self::ConnectionFailed { .. } => PaygateErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => PaygateErrorCode::ConnectionTimeout,
            Self::Auth(_) => PaygateErrorCode::Auth,
            Self::SessionExpired => PaygateErrorCode::SessionExpired,
            Self::InvalidCredentials(_) => PaygateErrorCode::InvalidCredentials,
            Self::NotFound { .. } => PaygateErrorCode::NotFound,
            Self::InvalidData { .. } => PaygateErrorCode::InvalidData,
            Self::Serialization(_) => PaygateErrorCode::Serialization,
            Self::Encryption(_) => PaygateErrorCode::Encryption,
            Self::RateLimited { .. } => PaygateErrorCode::RateLimited,
            Self::Internal(_) => PaygateErrorCode::Internal,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if this error is potentially recoverable by retrying.
    ///
    /// Encryption errors are never retryable: identical inputs produce the
    /// same failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::ConnectionFailed { .. }
                | Self::ConnectionTimeout { .. }
                | Self::RateLimited { .. }
        )
    }

    /// Returns a suggested retry delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            Self::ConnectionTimeout { .. } => Some(1000),
            Self::ConnectionFailed { .. } => Some(2000),
            Self::Transport(_) => Some(1000),
            _ => None,
        }
    }

    /// Create a transport error from any error type.
    pub fn transport<E: std::error::Error>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create a not found error.
    pub fn not_found(resource_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PaygateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unimplemented(label) => write!(f, "{} is not implemented yet", label),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::ConnectionFailed { target, reason } => {
                write!(f, "connection to {} failed: {}", target, reason)
            }
            Self::ConnectionTimeout {
                operation,
                timeout_ms,
            } => {
                write!(f, "{} timed out after {}ms", operation, timeout_ms)
            }
            Self::Auth(msg) => write!(f, "authentication error: {}", msg),
            Self::SessionExpired => write!(f, "session expired, please re-authenticate"),
            Self::InvalidCredentials(msg) => write!(f, "invalid credentials: {}", msg),
            Self::NotFound {
                resource_type,
                identifier,
            } => {
                write!(f, "{} not found: {}", resource_type, identifier)
            }
            Self::InvalidData { field, reason } => {
                write!(f, "invalid {}: {}", field, reason)
            }
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::Encryption(err) => write!(f, "encryption error: {}", err),
            Self::RateLimited { retry_after_ms } => {
                write!(f, "rate limited, retry after {}ms", retry_after_ms)
            }
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for PaygateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encryption(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PaygateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<EncryptionError> for PaygateError {
    fn from(err: EncryptionError) -> Self {
        Self::Encryption(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = PaygateError::RateLimited {
            retry_after_ms: 1000,
        };
        assert_eq!(err.code(), PaygateErrorCode::RateLimited);
        assert!(err.is_retryable());
        assert_eq!(err.retry_after_ms(), Some(1000));
    }

    #[test]
    fn test_encryption_errors_are_not_retryable() {
        let err = PaygateError::from(EncryptionError::InvalidKey("bad pem".to_string()));
        assert_eq!(err.code(), PaygateErrorCode::Encryption);
        assert!(!err.is_retryable());
        assert_eq!(err.retry_after_ms(), None);
        assert!(err.to_string().contains("bad pem"));
    }

    #[test]
    fn test_helper_constructors() {
        let err = PaygateError::not_found("transaction", "123");
        assert_eq!(err.code(), PaygateErrorCode::NotFound);

        let err = PaygateError::invalid_data("amount", "must be positive");
        assert_eq!(err.code(), PaygateErrorCode::InvalidData);
    }
}
