#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use esimly_api::types::BulkUploadMetaDto;
use esimly_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "shop@example.com",
            "password": "hunter2!"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "user": {
                    "id": "u1",
                    "email": "shop@example.com",
                    "firstName": "Asha",
                    "lastName": "Naidoo",
                    "accountType": "BUSINESS",
                    "role": "BUSINESS"
                },
                "token": "tok-abc"
            }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2!".to_string().into();
    let session = client.login("shop@example.com", &secret).await.unwrap();

    assert_eq!(session.user.id, "u1");
    assert_eq!(session.user.role.as_deref(), Some("BUSINESS"));
    assert_eq!(session.token, "tok-abc");
    // Login never installs the token itself -- that's the session store's call.
    assert!(!client.has_token());
}

#[tokio::test]
async fn test_login_failure_uses_body_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("shop@example.com", &secret).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_verify_email_expired_classification() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/auth/verify-email"))
        .and(query_param("token", "t0"))
        .and(query_param("email", "a@b.c"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Verification link has expired" })),
        )
        .mount(&server)
        .await;

    let result = client.verify_email("t0", "a@b.c", 1_700_000_000).await;

    assert!(
        matches!(result, Err(ref e) if e.is_token_expired()),
        "expected TokenExpired, got: {result:?}"
    );
}

// ── Bearer injection ────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_attached_after_set() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/retailer/bundles"))
        .and(header("authorization", "Bearer tok-xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "bundles": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_token("tok-xyz".to_string().into());
    let bundles = client.retailer_bundles().await.unwrap();
    assert!(bundles.is_empty());
}

// ── Envelope-shape matrix ───────────────────────────────────────────

#[tokio::test]
async fn test_users_list_keyed_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": "u1", "email": "a@b.c", "role": "ADMIN" }]
        })))
        .mount(&server)
        .await;

    let users = client.admin_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role.as_deref(), Some("ADMIN"));
}

#[tokio::test]
async fn test_users_list_nested_data_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "users": [
                { "id": "u1", "email": "a@b.c" },
                { "id": "u2", "email": "d@e.f" }
            ]}
        })))
        .mount(&server)
        .await;

    let users = client.admin_users().await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_users_list_bare_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "u1", "email": "a@b.c" }
        ])))
        .mount(&server)
        .await;

    let users = client.admin_users().await.unwrap();
    assert_eq!(users.len(), 1);
}

// ── Retailer flow ───────────────────────────────────────────────────

#[tokio::test]
async fn test_purchase_posts_product_and_quantity() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/retailer/purchase"))
        .and(body_json(json!({ "productId": "b7", "quantity": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "order": { "orderId": "o-1", "totalPrice": 297.0 } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client.purchase("b7", 3).await.unwrap();
    assert_eq!(receipt.order_id.as_deref(), Some("o-1"));
}

#[tokio::test]
async fn test_purchase_failure_surfaces_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/retailer/purchase"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "message": "Insufficient stock for requested quantity" })),
        )
        .mount(&server)
        .await;

    let result = client.purchase("b7", 99).await;
    match result {
        Err(Error::Api { ref message, status }) => {
            assert_eq!(status, 409);
            assert!(message.contains("Insufficient stock"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_credit_status_object_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/retailer/credit-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "creditLimit": 5000.0,
                "availableCredit": 3500.0,
                "usedCredit": 1500.0,
                "usagePercentage": 30.0,
                "isBlocked": false,
                "needsWarning": false,
                "currentLevel": { "name": "SILVER", "nextLevelName": "GOLD" }
            }
        })))
        .mount(&server)
        .await;

    let status = client.credit_status().await.unwrap();
    assert!((status.available_credit - 3500.0).abs() < f64::EPSILON);
    assert_eq!(status.current_level.unwrap().name, "SILVER");
}

// ── Admin mutations ─────────────────────────────────────────────────

#[tokio::test]
async fn test_reject_esim_request_sends_reason() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/admin/esim-requests/r9/reject"))
        .and(body_json(json!({ "reason": "ID document unreadable" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Rejected" })))
        .expect(1)
        .mount(&server)
        .await;

    let msg = client
        .reject_esim_request("r9", "ID document unreadable")
        .await
        .unwrap();
    assert_eq!(msg.as_deref(), Some("Rejected"));
}

#[tokio::test]
async fn test_esim_requests_status_filter() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/esim-requests"))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requests": [{ "id": "r1", "status": "PENDING" }]
        })))
        .mount(&server)
        .await;

    let requests = client.esim_requests(Some("PENDING")).await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_bulk_upload_is_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/admin/stock/pins/bulk-upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "42 items imported" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let meta = BulkUploadMetaDto {
        pool_name: "MTN R10".into(),
        total_stock: 42,
        price: 10.0,
        notes: None,
    };
    let msg = client
        .bulk_upload(
            esimly_api::admin::StockKind::Pin,
            "pins.csv",
            b"pin,serial\n1234,SN1\n".to_vec(),
            &meta,
        )
        .await
        .unwrap();
    assert_eq!(msg.as_deref(), Some("42 items imported"));
}

#[tokio::test]
async fn test_set_credit_limit_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/admin/retailers/credit-limit"))
        .and(body_json(json!({ "userId": "u3", "creditLimit": 7500.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Updated" })))
        .expect(1)
        .mount(&server)
        .await;

    let msg = client.set_credit_limit("u3", 7500.0).await.unwrap();
    assert_eq!(msg.as_deref(), Some("Updated"));
}
