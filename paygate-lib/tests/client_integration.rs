//! Integration tests for the gateway client.
//!
//! These tests verify the client against a mock HTTP server: credential
//! placement, key-descriptor retrieval, the end-to-end card encryption
//! flow and error mapping.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p paygate-lib --features http-client --test client_integration
//! ```

#![cfg(feature = "http-client")]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use paygate_lib::client::{Auth, GatewayClient, GatewayConfig, TransactionRequest, TransactionStatus};
use paygate_lib::{CardRecord, PaygateError};
use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_keypair() -> (RsaPrivateKey, String) {
    let private_key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
    let pem = RsaPublicKey::from(&private_key)
        .to_public_key_pem(LineEnding::LF)
        .unwrap();
    (private_key, pem)
}

fn test_card() -> CardRecord {
    CardRecord::new("4111 1111 1111 1111", "Pedro Paulo", "12/25", "543")
}

async fn mock_client(server: &MockServer, auth: Auth) -> GatewayClient {
    GatewayClient::new(GatewayConfig::new(server.uri()), auth).unwrap()
}

// ============================================================================
// Card Hash Key + Encryption Flow
// ============================================================================

#[tokio::test]
async fn test_card_hash_key_fetch() {
    let mock_server = MockServer::start().await;
    let (_, pem) = test_keypair();

    Mock::given(method("GET"))
        .and(path("/transactions/card_hash_key"))
        .and(query_param("encryption_key", "ek_test_secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "ek_test_key1",
            "public_key": pem
        })))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::EncryptionKey("ek_test_secret".into())).await;
    let descriptor = client.card_hash_key().await.unwrap();

    assert_eq!(descriptor.id, "ek_test_key1");
    assert!(descriptor.public_key.contains("BEGIN PUBLIC KEY"));
}

#[tokio::test]
async fn test_encrypt_card_end_to_end() {
    let mock_server = MockServer::start().await;
    let (private_key, pem) = test_keypair();

    Mock::given(method("GET"))
        .and(path("/transactions/card_hash_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "ek_test_abc",
            "public_key": pem
        })))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::EncryptionKey("ek_test_secret".into())).await;
    let card_hash = client.encrypt_card(&test_card()).await.unwrap();

    assert!(card_hash.as_str().starts_with("ek_test_abc_"));
    let ciphertext = card_hash.as_str().strip_prefix("ek_test_abc_").unwrap();
    assert!(ciphertext
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));

    let decrypted = private_key
        .decrypt(Pkcs1v15Encrypt, &STANDARD.decode(ciphertext).unwrap())
        .unwrap();
    assert_eq!(
        String::from_utf8(decrypted).unwrap(),
        "card_number=4111111111111111&card_holder_name=Pedro+Paulo\
         &card_expiration_date=1225&card_cvv=543"
    );
}

#[tokio::test]
async fn test_encrypt_card_rejects_malformed_key_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions/card_hash_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "ek_test_abc",
            "public_key": "definitely not pem"
        })))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::EncryptionKey("ek_test_secret".into())).await;
    let err = client.encrypt_card(&test_card()).await.unwrap_err();

    assert!(matches!(err, PaygateError::Encryption(_)));
    assert!(!err.is_retryable());
}

// ============================================================================
// Transaction Endpoints
// ============================================================================

#[tokio::test]
async fn test_find_transaction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions/123"))
        .and(query_param("api_key", "ak_test_secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 123,
            "status": "paid",
            "amount": 31000,
            "installments": 1,
            "date_created": "2026-08-05T12:00:00Z",
            "card_holder_name": "Pedro Paulo",
            "card_last_digits": "1111",
            "card_brand": "visa"
        })))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::ApiKey("ak_test_secret".into())).await;
    let transaction = client.find_transaction(123).await.unwrap();

    assert_eq!(transaction.id, 123);
    assert_eq!(transaction.status, TransactionStatus::Paid);
    assert_eq!(transaction.amount, 31000);
    assert_eq!(transaction.card_last_digits.as_deref(), Some("1111"));
}

#[tokio::test]
async fn test_list_transactions_passes_pagination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("count", "2"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 2, "status": "paid", "amount": 1000 },
            { "id": 1, "status": "refused", "amount": 500, "refuse_reason": "antifraud" }
        ])))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::ApiKey("ak_test_secret".into())).await;
    let transactions = client.list_transactions(Some(2), Some(1)).await.unwrap();

    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].id, 2);
    assert_eq!(transactions[1].status, TransactionStatus::Refused);
    assert_eq!(transactions[1].refuse_reason.as_deref(), Some("antifraud"));
}

#[tokio::test]
async fn test_create_transaction_sends_card_hash() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .and(query_param("api_key", "ak_test_secret"))
        .and(body_partial_json(serde_json::json!({
            "amount": 31000,
            "card_hash": "ek_test_abc_Y2lwaGVydGV4dA==",
            "installments": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 456,
            "status": "processing",
            "amount": 31000,
            "installments": 3
        })))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::ApiKey("ak_test_secret".into())).await;
    let request = TransactionRequest::new(31000, "ek_test_abc_Y2lwaGVydGV4dA==".to_string().into())
        .with_installments(3);
    let transaction = client.create_transaction(&request).await.unwrap();

    assert_eq!(transaction.id, 456);
    assert_eq!(transaction.status, TransactionStatus::Processing);
}

#[tokio::test]
async fn test_create_session_and_reauthenticate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sessions"))
        .and(body_partial_json(serde_json::json!({
            "email": "me@example.com",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "session_id": "sess_123"
        })))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::ApiKey("ak_test_secret".into())).await;
    let session_id = client
        .create_session("me@example.com", "hunter2")
        .await
        .unwrap();
    assert_eq!(session_id, "sess_123");

    let client = client.with_auth(Auth::Session(session_id));
    assert_eq!(client.auth().credential(), "sess_123");
}

// ============================================================================
// Error Mapping
// ============================================================================

#[tokio::test]
async fn test_auth_failure_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions/card_hash_key"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid encryption key"))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::EncryptionKey("ek_bad".into())).await;
    let err = client.card_hash_key().await.unwrap_err();

    assert!(matches!(err, PaygateError::Auth(_)));
    assert!(err.to_string().contains("invalid encryption key"));
}

#[tokio::test]
async fn test_rejected_session_maps_to_session_expired() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions/123"))
        .respond_with(ResponseTemplate::new(401).set_body_string("session lapsed"))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::Session("sess_old".into())).await;
    let err = client.find_transaction(123).await.unwrap_err();

    assert!(matches!(err, PaygateError::SessionExpired));
}

#[tokio::test]
async fn test_missing_transaction_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("transaction not found"))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::ApiKey("ak_test_secret".into())).await;
    let err = client.find_transaction(999).await.unwrap_err();

    assert!(matches!(err, PaygateError::NotFound { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_rate_limit_maps_to_retryable_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server, Auth::ApiKey("ak_test_secret".into())).await;
    let err = client.list_transactions(None, None).await.unwrap_err();

    assert!(matches!(
        err,
        PaygateError::RateLimited {
            retry_after_ms: 5000
        }
    ));
    assert!(err.is_retryable());
    assert_eq!(err.retry_after_ms(), Some(5000));
}
