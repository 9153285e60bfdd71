#![allow(clippy::unwrap_used)]
// Session lifecycle tests: optimistic rehydration, background probe
// correction, and the validate-before-network rule.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use esimly_api::ApiClient;
use esimly_core::model::{AccountType, Role, User, UserStatus};
use esimly_core::session::{MemoryVault, PersistedSession, SessionStore, SessionVault};
use esimly_core::{CoreError, SessionState};

fn sample_user() -> User {
    User {
        id: "u1".into(),
        email: "shop@example.com".into(),
        first_name: "Asha".into(),
        last_name: "Naidoo".into(),
        account_type: AccountType::Business,
        role: Role::Business,
        status: UserStatus::Active,
        business_name: Some("Naidoo Telecoms".into()),
        phone_number: None,
        created_at: None,
    }
}

fn store_with_vault(server_uri: &str, vault: MemoryVault) -> SessionStore {
    let base_url = Url::parse(server_uri).unwrap();
    let api = Arc::new(ApiClient::with_client(reqwest::Client::new(), base_url));
    SessionStore::new(api, Box::new(vault))
}

// ── Rehydration ─────────────────────────────────────────────────────

#[tokio::test]
async fn hydrate_is_authenticated_before_any_network_response() {
    // No mock server routes at all: hydration must not touch the network.
    let server = MockServer::start().await;
    let vault = MemoryVault::default();
    vault
        .store(&PersistedSession {
            user: sample_user(),
            token: "tok-restored".into(),
        })
        .unwrap();

    let store = store_with_vault(&server.uri(), vault);
    assert!(store.state().is_loading());

    let restored = store.hydrate();
    assert!(restored);
    assert!(store.state().is_authenticated());
    assert_eq!(
        store.session().unwrap().user.email,
        "shop@example.com"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn hydrate_without_persisted_session_is_unauthenticated() {
    let server = MockServer::start().await;
    let store = store_with_vault(&server.uri(), MemoryVault::default());

    assert!(!store.hydrate());
    assert!(!store.state().is_authenticated());
    assert!(!store.state().is_loading());
}

#[tokio::test]
async fn rejected_probe_flips_session_to_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let vault = MemoryVault::default();
    vault
        .store(&PersistedSession {
            user: sample_user(),
            token: "tok-stale".into(),
        })
        .unwrap();

    let store = store_with_vault(&server.uri(), vault);
    store.hydrate();
    assert!(store.state().is_authenticated());

    store.verify_rehydrated().await;
    assert!(matches!(store.state(), SessionState::Unauthenticated));
}

#[tokio::test]
async fn successful_probe_keeps_session_and_refreshes_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": {
                "id": "u1",
                "email": "shop@example.com",
                "firstName": "Asha",
                "lastName": "Naidoo-Smith",
                "accountType": "BUSINESS",
                "role": "BUSINESS"
            }}
        })))
        .mount(&server)
        .await;

    let vault = MemoryVault::default();
    vault
        .store(&PersistedSession {
            user: sample_user(),
            token: "tok-good".into(),
        })
        .unwrap();

    let store = store_with_vault(&server.uri(), vault);
    store.hydrate();
    store.verify_rehydrated().await;

    let session = store.session().unwrap();
    assert_eq!(session.user.last_name, "Naidoo-Smith");
}

// ── Login validation (no network on invalid input) ──────────────────

#[tokio::test]
async fn invalid_email_blocks_login_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with_vault(&server.uri(), MemoryVault::default());
    let secret: secrecy::SecretString = "hunter2!".to_string().into();
    let result = store.login("not-an-email", &secret).await;

    match result {
        Err(CoreError::Validation { ref field, .. }) => assert_eq!(field, "email"),
        other => panic!("expected email validation error, got: {other:?}"),
    }
}

#[tokio::test]
async fn empty_password_blocks_login_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with_vault(&server.uri(), MemoryVault::default());
    let secret: secrecy::SecretString = String::new().into();
    let result = store.login("shop@example.com", &secret).await;

    match result {
        Err(CoreError::Validation { ref field, .. }) => assert_eq!(field, "password"),
        other => panic!("expected password validation error, got: {other:?}"),
    }
}

// ── Login / logout round trip ───────────────────────────────────────

#[tokio::test]
async fn login_persists_session_and_logout_clears_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "user": { "id": "u1", "email": "shop@example.com", "role": "BUSINESS" },
                "token": "tok-fresh"
            }
        })))
        .mount(&server)
        .await;

    let store = store_with_vault(&server.uri(), MemoryVault::default());
    let secret: secrecy::SecretString = "hunter2!".to_string().into();
    let session = store.login("shop@example.com", &secret).await.unwrap();

    assert_eq!(session.user.role, Role::Business);
    assert!(store.state().is_authenticated());

    store.logout();
    assert!(matches!(store.state(), SessionState::Unauthenticated));
    assert!(store.session().is_none());
}

#[tokio::test]
async fn login_failure_surfaces_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let store = store_with_vault(&server.uri(), MemoryVault::default());
    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = store.login("shop@example.com", &secret).await;

    match result {
        Err(CoreError::AuthenticationFailed { ref message }) => {
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected AuthenticationFailed, got: {other:?}"),
    }
    assert!(!store.state().is_authenticated());
}

// ── Email verification ──────────────────────────────────────────────

#[tokio::test]
async fn verify_email_trims_inputs_and_validates_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/verify-email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with_vault(&server.uri(), MemoryVault::default());

    // Blank token: blocked client-side.
    let result = store.verify_email("   ", "shop@example.com").await;
    assert!(matches!(result, Err(CoreError::Validation { .. })));

    // Invalid email: blocked client-side.
    let result = store.verify_email("tok", "nope").await;
    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[tokio::test]
async fn expired_verification_token_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/verify-email"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Token has expired" })),
        )
        .mount(&server)
        .await;

    let store = store_with_vault(&server.uri(), MemoryVault::default());
    let result = store.verify_email("tok-old", "shop@example.com").await;

    assert!(
        matches!(result, Err(CoreError::VerificationExpired { .. })),
        "expected VerificationExpired, got: {result:?}"
    );
}
