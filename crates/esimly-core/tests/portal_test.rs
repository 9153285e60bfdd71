#![allow(clippy::unwrap_used)]
// Portal refresh-policy tests: partial failure, offline probe, the
// purchase re-fetch rule, and the reject-requires-reason rule.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use esimly_api::ApiClient;
use esimly_core::model::EsimRequestStatus;
use esimly_core::session::{MemoryVault, SessionStore};
use esimly_core::{ConnectionStatus, CoreError, Portal};

fn portal_for(uri: &str) -> Portal {
    let base_url = Url::parse(uri).unwrap();
    let api = Arc::new(ApiClient::with_client(reqwest::Client::new(), base_url));
    let session = Arc::new(SessionStore::new(
        Arc::clone(&api),
        Box::new(MemoryVault::default()),
    ));
    Portal::new(api, session)
}

fn bundle_body() -> serde_json::Value {
    json!({ "bundles": [
        { "id": "b1", "name": "Data 1GB", "productType": "EPIN",
          "basePrice": 99.0, "stockQuantity": 5, "soldQuantity": 2, "status": "ACTIVE" },
        { "id": "b2", "name": "Tourist eSIM", "productType": "ESIM",
          "basePrice": 199.0, "stockQuantity": 9, "soldQuantity": 0, "status": "ACTIVE" }
    ]})
}

// ── Retailer refresh: partial failure ───────────────────────────────

#[tokio::test]
async fn retailer_refresh_degrades_failing_endpoints_independently() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/retailer/bundles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/retailer/credit-status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/retailer/credit-levels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "levels": [
            { "name": "BRONZE", "isCurrentLevel": true, "isAvailable": true },
            { "name": "GOLD", "isCurrentLevel": false, "isAvailable": false }
        ]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/retailer/inventory"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let portal = portal_for(&server.uri());
    portal.refresh_retailer().await;

    let store = portal.store();
    assert_eq!(store.bundles_snapshot().len(), 2);
    assert_eq!(store.credit_levels_snapshot().len(), 2);
    // Failing endpoints degraded to their empty defaults.
    assert!(store.credit_status_snapshot().is_none());
    assert!(store.inventory_snapshot().is_empty());
}

// ── Admin refresh: partial failure & probe ──────────────────────────

#[tokio::test]
async fn admin_refresh_renders_succeeding_sections_when_two_of_five_fail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/bundles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "users": [
                { "id": "u1", "email": "a@b.c", "role": "ADMIN" },
                { "id": "u2", "email": "d@e.f", "role": "BUSINESS" }
            ]}
        })))
        .mount(&server)
        .await;
    // Two of the five parallel fetches fail with 500s.
    Mock::given(method("GET"))
        .and(path("/admin/business-registrations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/enquiries"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/analytics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalOrders": 41 })))
        .mount(&server)
        .await;

    let portal = portal_for(&server.uri());
    portal.refresh_admin().await.unwrap();

    let store = portal.store();
    // Succeeding sections rendered.
    assert_eq!(store.users_snapshot().len(), 2);
    assert_eq!(store.bundles_snapshot().len(), 2);
    assert!(store.analytics_snapshot().is_some());
    // Failing sections show their documented empty state.
    assert!(store.registrations_snapshot().is_empty());
    assert!(store.enquiries_snapshot().is_empty());
    assert_eq!(store.connection_status(), ConnectionStatus::Online);
}

#[tokio::test]
async fn unreachable_backend_marks_offline_and_empties_lists() {
    // Nothing listens on this port: the probe's transport error must flip
    // the store offline instead of surfacing a misleading "no data" UI.
    let portal = portal_for("http://127.0.0.1:9");
    portal.refresh_admin().await.unwrap();

    let store = portal.store();
    assert_eq!(store.connection_status(), ConnectionStatus::Offline);
    assert!(store.users_snapshot().is_empty());
    assert!(store.bundles_snapshot().is_empty());
}

#[tokio::test]
async fn probe_401_means_server_up_not_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/bundles"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "token expired" })),
        )
        .mount(&server)
        .await;

    let portal = portal_for(&server.uri());
    let result = portal.refresh_admin().await;

    assert!(matches!(
        result,
        Err(CoreError::AuthenticationFailed { .. })
    ));
    assert_eq!(
        portal.store().connection_status(),
        ConnectionStatus::Online
    );
}

// ── Purchase flow ───────────────────────────────────────────────────

#[tokio::test]
async fn purchase_validates_quantity_against_cached_stock() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/retailer/bundles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle_body()))
        .mount(&server)
        .await;
    for endpoint in ["/retailer/credit-status", "/retailer/credit-levels", "/retailer/inventory"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
    }
    // The purchase endpoint must never be hit for out-of-bounds quantities.
    Mock::given(method("POST"))
        .and(path("/retailer/purchase"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let portal = portal_for(&server.uri());
    portal.refresh_retailer().await;

    // Stock for b1 is 5.
    let zero = portal.purchase("b1", 0).await;
    assert!(matches!(zero, Err(CoreError::Validation { .. })));
    let over = portal.purchase("b1", 6).await;
    assert!(matches!(over, Err(CoreError::Validation { .. })));
}

#[tokio::test]
async fn successful_purchase_refetches_the_dashboard() {
    let server = MockServer::start().await;

    // Expect two rounds of dashboard fetches: the initial load and the
    // post-purchase re-fetch (never a local patch).
    for (endpoint, body) in [
        ("/retailer/bundles", bundle_body()),
        ("/retailer/credit-status", json!({})),
        ("/retailer/credit-levels", json!({})),
        ("/retailer/inventory", json!({})),
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(2)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/retailer/purchase"))
        .and(body_json(json!({ "productId": "b1", "quantity": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "order": { "orderId": "o-9", "totalPrice": 495.0 } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let portal = portal_for(&server.uri());
    portal.refresh_retailer().await;

    // Exactly at stock (5) is allowed.
    let outcome = portal.purchase("b1", 5).await.unwrap();
    assert_eq!(outcome.order_id.as_deref(), Some("o-9"));
}

#[tokio::test]
async fn failed_purchase_surfaces_server_message_and_skips_refetch() {
    let server = MockServer::start().await;

    for (endpoint, body) in [
        ("/retailer/bundles", bundle_body()),
        ("/retailer/credit-status", json!({})),
        ("/retailer/credit-levels", json!({})),
        ("/retailer/inventory", json!({})),
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/retailer/purchase"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({ "message": "Credit limit exceeded" })),
        )
        .mount(&server)
        .await;

    let portal = portal_for(&server.uri());
    portal.refresh_retailer().await;

    let result = portal.purchase("b1", 2).await;
    match result {
        Err(CoreError::Rejected { ref message }) => {
            assert_eq!(message, "Credit limit exceeded");
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

// ── eSIM rejection ──────────────────────────────────────────────────

#[tokio::test]
async fn blank_rejection_reason_never_reaches_the_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/esim-requests/r1/reject"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let portal = portal_for(&server.uri());
    let result = portal
        .reject_esim_request("r1", "   ", Some(EsimRequestStatus::Pending))
        .await;

    match result {
        Err(CoreError::Validation { ref field, .. }) => assert_eq!(field, "reason"),
        other => panic!("expected reason validation error, got: {other:?}"),
    }
}

#[tokio::test]
async fn rejection_with_reason_refetches_active_filter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/esim-requests/r1/reject"))
        .and(body_json(json!({ "reason": "ID document unreadable" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Rejected" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/esim-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "requests": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let portal = portal_for(&server.uri());
    let message = portal
        .reject_esim_request("r1", "  ID document unreadable  ", Some(EsimRequestStatus::Pending))
        .await
        .unwrap();
    assert_eq!(message.as_deref(), Some("Rejected"));
}
