//! Card Hash Encoding for the Payment API
//!
//! This module turns a raw card record into the opaque `card_hash` string
//! the remote payment API accepts in place of raw card data. The remote
//! service decrypts it server-side with the private half of the key
//! descriptor it issued.
//!
//! # Pipeline
//!
//! 1. The numeric card fields are reduced to ASCII digits
//! 2. The record is serialized as a URL-query-encoded string with a fixed
//!    field order
//! 3. The payload bytes are RSA-encrypted under the descriptor's PEM public
//!    key with PKCS#1 v1.5 padding
//! 4. The ciphertext is base64-encoded and prefixed with the key id
//!
//! # Wire Format
//!
//! ```text
//! <key-id>_<base64(rsa_pkcs1v15(payload))>
//! ```
//!
//! A second, independent path ([`encrypt_card_number`]) encrypts standalone
//! numeric payloads under an OAEP/SHA-256 scheme. The two schemes match
//! different endpoints of the remote service and are not interchangeable.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPublicKey};
use sha2::Sha256;

use crate::{CardHash, CardRecord, KeyDescriptor};

/// Encryption error types.
#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("Invalid public key: {0}")]
    InvalidKey(String),
    #[error("Encryption failed: {0}")]
    EncryptFailed(String),
    #[error("Payload serialization failed: {0}")]
    Payload(String),
}

/// Result type for encryption operations.
pub type EncryptionResult<T> = Result<T, EncryptionError>;

/// Strip every character that is not an ASCII digit.
///
/// Pure and total: digit order is preserved, no digit is dropped, and a
/// fully non-numeric input yields an empty string rather than an error.
/// Callers that cannot accept an empty result (e.g. an empty card number)
/// validate upstream.
///
/// # Example
///
/// ```
/// use paygate_lib::card_hash::sanitize_digits;
///
/// assert_eq!(sanitize_digits("4111 1111 1111 1111"), "4111111111111111");
/// assert_eq!(sanitize_digits("12/25"), "1225");
/// assert_eq!(sanitize_digits("no digits"), "");
/// ```
pub fn sanitize_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Serialize a card record into the deterministic query-string payload.
///
/// Exactly four keys in fixed order (`card_number`, `card_holder_name`,
/// `card_expiration_date`, `card_cvv`); the numeric fields are sanitized,
/// the holder name is carried over byte-for-byte. Reserved characters are
/// percent-escaped and spaces encode as `+`, so the encryption input is an
/// ASCII-safe byte string. Identical records always produce identical
/// payloads.
pub fn build_payload(card: &CardRecord) -> EncryptionResult<String> {
    serde_urlencoded::to_string(card.sanitized())
        .map_err(|e| EncryptionError::Payload(e.to_string()))
}

/// Encrypt a serialized payload under the descriptor's public key.
///
/// Parses the PEM key (SPKI `BEGIN PUBLIC KEY`, with a PKCS#1
/// `BEGIN RSA PUBLIC KEY` fallback), encrypts the UTF-8 payload bytes with
/// RSA PKCS#1 v1.5 padding and returns the base64 ciphertext.
///
/// # Errors
///
/// Returns an error if the key is not parseable PEM or the payload exceeds
/// what the key modulus can carry.
pub fn encrypt_payload(key: &KeyDescriptor, payload: &str) -> EncryptionResult<String> {
    let public_key = parse_public_key(&key.public_key)?;
    let ciphertext = public_key
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, payload.as_bytes())
        .map_err(|e| EncryptionError::EncryptFailed(e.to_string()))?;
    Ok(STANDARD.encode(ciphertext))
}

/// Build the final card hash: `"<id>_<base64-ciphertext>"`.
///
/// The id is taken verbatim from the descriptor, never sanitized or
/// validated. Consumers split on the first underscore to recover it.
pub fn generate_card_hash(key: &KeyDescriptor, payload: &str) -> EncryptionResult<CardHash> {
    let encrypted = encrypt_payload(key, payload)?;
    Ok(CardHash(format!("{}_{}", key.id, encrypted)))
}

/// Encrypt a standalone numeric payload under an OAEP/SHA-256 scheme.
///
/// Independent of the card-hash path: the key must be a PKCS#8/SPKI public
/// key (no PKCS#1 fallback) and the padding is OAEP parameterized with
/// SHA-256. The remote service expects this scheme on the endpoints that
/// consume bare numeric payloads; do not feed its output where a card hash
/// is expected, or vice versa.
pub fn encrypt_card_number(public_key_pem: &str, value: &str) -> EncryptionResult<String> {
    let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
        .map_err(|e| EncryptionError::InvalidKey(e.to_string()))?;
    let ciphertext = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), value.as_bytes())
        .map_err(|e| EncryptionError::EncryptFailed(e.to_string()))?;
    Ok(STANDARD.encode(ciphertext))
}

fn parse_public_key(pem: &str) -> EncryptionResult<RsaPublicKey> {
    if let Ok(key) = RsaPublicKey::from_public_key_pem(pem) {
        return Ok(key);
    }
    RsaPublicKey::from_pkcs1_pem(pem).map_err(|e| EncryptionError::InvalidKey(e.to_string()))
}
