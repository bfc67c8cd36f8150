//! Paygate client library.
//!
//! This crate intentionally stays stateless and delegates authenticated access
//! to callers through trait-based dependency injection. Raw card data never
//! leaves the process: the encoder turns it into an opaque card hash that the
//! remote payment API decrypts server-side.
//!
//! # Features
//!
//! - **Card Hash Encoder**: Normalize, serialize and RSA-encrypt card records
//!   into opaque `card_hash` strings
//! - **Key Source Abstraction**: Trait-based design for supplying the
//!   per-session public-key descriptor
//! - **Gateway Client**: Authenticated REST client for transaction lookups
//!   (requires the `http-client` feature)
//!
//! # Example
//!
//! ```ignore
//! use paygate_lib::{encrypt_card, CardRecord};
//! use paygate_lib::client::{Auth, GatewayClient};
//!
//! let client = GatewayClient::sandbox(Auth::EncryptionKey("ek_test_...".into()))?;
//! let card = CardRecord::new("4111 1111 1111 1111", "Pedro Paulo", "12/25", "543");
//!
//! // Fetches the key descriptor, then encrypts the card locally.
//! let card_hash = encrypt_card(&client, &card).await?;
//! println!("card_hash: {}", card_hash);
//! ```

pub mod card_hash;
pub mod client;
pub mod errors;
pub mod prelude;
mod transport;

pub use card_hash::EncryptionError;
pub use errors::{PaygateError, PaygateErrorCode};
pub use transport::CardHashKeySource;

/// Common result alias for Paygate operations.
pub type Result<T> = std::result::Result<T, PaygateError>;

/// A raw card record as collected from the cardholder.
///
/// All fields are user-supplied. The numeric fields may contain formatting
/// characters (spaces, dashes, slashes); [`CardRecord::sanitized`] strips
/// them before the record is serialized for encryption. The holder name is
/// never normalized, not even trimmed.
///
/// # Example
///
/// ```
/// use paygate_lib::CardRecord;
///
/// let card = CardRecord::new("4111 1111 1111 1111", "Pedro Paulo", "12/25", "543");
/// assert_eq!(card.sanitized().card_number, "4111111111111111");
/// assert_eq!(card.sanitized().card_expiration_date, "1225");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CardRecord {
    /// The card's number. Example: `"4111111111111111"`.
    pub card_number: String,
    /// The card's holder name, passed through unmodified.
    pub card_holder_name: String,
    /// The card's expiration date. Example: `"1225"` or `"12/25"`.
    pub card_expiration_date: String,
    /// The card's verification value. Example: `"543"`.
    pub card_cvv: String,
}

impl CardRecord {
    /// Create a new card record.
    pub fn new(
        number: impl Into<String>,
        holder_name: impl Into<String>,
        expiration_date: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            card_number: number.into(),
            card_holder_name: holder_name.into(),
            card_expiration_date: expiration_date.into(),
            card_cvv: cvv.into(),
        }
    }

    /// Return a copy with the numeric fields reduced to ASCII digits.
    ///
    /// Digits keep their original order and none are dropped; the holder
    /// name is carried over untouched.
    pub fn sanitized(&self) -> CardRecord {
        CardRecord {
            card_number: card_hash::sanitize_digits(&self.card_number),
            card_holder_name: self.card_holder_name.clone(),
            card_expiration_date: card_hash::sanitize_digits(&self.card_expiration_date),
            card_cvv: card_hash::sanitize_digits(&self.card_cvv),
        }
    }
}

/// A public-key descriptor issued by the remote payment service.
///
/// Pairs a key identifier with the PEM-encoded RSA public key itself. The
/// SDK never fetches or caches descriptors on its own; they arrive through
/// a [`CardHashKeySource`] (typically the gateway client's key endpoint).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeyDescriptor {
    /// Key identifier issued by the remote service.
    pub id: String,
    /// PEM-encoded RSA public key.
    pub public_key: String,
}

impl KeyDescriptor {
    /// Create a new key descriptor.
    pub fn new(id: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            public_key: public_key.into(),
        }
    }
}

/// An opaque card hash of the form `"<key-id>_<base64-ciphertext>"`.
///
/// Produced per encryption call, never mutated, never cached. Consumers
/// split on the *first* underscore to recover the key id; that split is the
/// contract the remote service honors, so a hash stays well-formed even
/// when the id itself contains underscores.
///
/// # Example
///
/// ```
/// use paygate_lib::CardHash;
///
/// let hash = CardHash("key1_aGVsbG8=".into());
/// assert_eq!(hash.key_id(), Some("key1"));
/// assert_eq!(hash.ciphertext(), Some("aGVsbG8="));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CardHash(pub String);

impl CardHash {
    /// Get the card hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The segment before the first underscore.
    pub fn key_id(&self) -> Option<&str> {
        self.0.split_once('_').map(|(id, _)| id)
    }

    /// The base64 ciphertext segment after the first underscore.
    pub fn ciphertext(&self) -> Option<&str> {
        self.0.split_once('_').map(|(_, ciphertext)| ciphertext)
    }
}

impl From<String> for CardHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for CardHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encrypt a card record into a [`CardHash`] using a key supplied by `source`.
///
/// The serialized payload and the key descriptor have no data dependency on
/// each other; both must resolve before the encryption step runs, and a
/// failure of either surfaces as the operation's error with no partial hash
/// returned.
///
/// # Semantics
/// - The numeric card fields are reduced to digits; the holder name is
///   passed through unmodified.
/// - The payload is encrypted with RSA PKCS#1 v1.5 under the descriptor's
///   public key; see [`card_hash`] for the framing details.
/// - Encryption is deterministic-failure: a malformed key or oversized
///   payload cannot succeed on retry with identical inputs.
///
/// # Examples
/// ```
/// # use paygate_lib::{encrypt_card, CardRecord, KeyDescriptor};
/// # async fn demo(descriptor: KeyDescriptor) -> paygate_lib::Result<()> {
/// let card = CardRecord::new("4111 1111 1111 1111", "Pedro Paulo", "12/25", "543");
/// // A descriptor resolves immediately; a gateway client fetches one first.
/// let hash = encrypt_card(&descriptor, &card).await?;
/// assert!(hash.key_id().is_some());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(skip(source, card)))]
pub async fn encrypt_card<K>(source: &K, card: &CardRecord) -> Result<CardHash>
where
    K: CardHashKeySource,
{
    let payload = card_hash::build_payload(card)?;
    let key = source.card_hash_key().await?;
    Ok(card_hash::generate_card_hash(&key, &payload)?)
}
