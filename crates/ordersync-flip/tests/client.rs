//! Integration tests for `FlipClient` using wiremock HTTP mocks.

use std::sync::atomic::{AtomicU32, Ordering};

use ordersync_core::FulfillmentState;
use ordersync_flip::{
    AuditStatus, FlipClient, FlipClientConfig, FlipError, OauthTokenProvider, TokenError,
    TokenProvider,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORDERS_PATH: &str = "/shop/admin/orders/v1";

/// Hands out `token-1`, `token-2`, ... so tests can observe that a retry
/// carries a freshly fetched token. Clones share the counter.
#[derive(Default, Clone)]
struct SeqTokenProvider {
    calls: std::sync::Arc<AtomicU32>,
}

impl SeqTokenProvider {
    fn fetches(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenProvider for SeqTokenProvider {
    async fn fetch(&self) -> Result<String, TokenError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("token-{n}"))
    }
}

struct FailingTokenProvider;

impl TokenProvider for FailingTokenProvider {
    async fn fetch(&self) -> Result<String, TokenError> {
        Err(TokenError::UnexpectedStatus { status: 503 })
    }
}

fn test_config(base_url: &str) -> FlipClientConfig {
    FlipClientConfig {
        base_url: base_url.to_owned(),
        orders_path: ORDERS_PATH.to_owned(),
        disable_skus_path: "/shop/admin/skus/disable/v1".to_owned(),
        cancel_order_path: "/shop/admin/orders/{order_id}/cancel/v1".to_owned(),
        tools_header: "ordersync".to_owned(),
        page_limit: 250,
        max_retries: 1,
        timeout_secs: 30,
        auth_retry_delay_ms: 0,
        transport_retry_delay_ms: 0,
    }
}

fn test_client(base_url: &str) -> FlipClient<SeqTokenProvider> {
    FlipClient::new(test_config(base_url), SeqTokenProvider::default())
        .expect("client construction should not fail")
}

fn orders_body(entries: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "data": entries })
}

#[tokio::test]
async fn lookup_returns_payload_on_200() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(query_param("page", "1"))
        .and(query_param("limit", "250"))
        .and(query_param("customerOrderId", "A1"))
        .and(header("x-flipinator-tools", "ordersync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(serde_json::json!([
            { "id": "flip-1", "state": "Created" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let lookup = client.lookup_order_status("A1").await;

    assert_eq!(lookup.status, Some(200));
    assert_eq!(
        lookup.resolve_state(),
        FulfillmentState::Known("Created".to_owned())
    );
}

#[tokio::test]
async fn lookup_retries_401_with_fresh_token() {
    let server = MockServer::start().await;

    // First attempt (token-1) is rejected; the retry must carry token-2.
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(header("authorization", "Bearer token-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(serde_json::json!([
            { "id": "flip-1", "state": "Created" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let provider = SeqTokenProvider::default();
    let client = FlipClient::new(test_config(&server.uri()), provider)
        .expect("client construction should not fail");
    let lookup = client.lookup_order_status("A1").await;

    assert_eq!(lookup.status, Some(200));
    assert!(lookup.response.is_some());
}

#[tokio::test]
async fn lookup_exhausts_retries_on_repeated_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let lookup = client.lookup_order_status("A1").await;

    assert!(lookup.response.is_none());
    assert_eq!(lookup.status, Some(401));
    assert_eq!(lookup.resolve_state(), FulfillmentState::ApiError(401));
}

#[tokio::test]
async fn lookup_does_not_retry_other_statuses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let lookup = client.lookup_order_status("A1").await;

    assert!(lookup.response.is_none());
    assert_eq!(lookup.status, Some(500));
}

#[tokio::test]
async fn lookup_does_not_retry_undecodable_200() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let lookup = client.lookup_order_status("A1").await;

    assert!(lookup.response.is_none());
    assert_eq!(lookup.status, Some(200));
}

#[tokio::test]
async fn lookup_token_failure_returns_nothing() {
    let server = MockServer::start().await;

    // No mock mounted: a request reaching the server would 404 and the
    // assertions below would see Some(404).
    let client = FlipClient::new(test_config(&server.uri()), FailingTokenProvider)
        .expect("client construction should not fail");
    let lookup = client.lookup_order_status("A1").await;

    assert!(lookup.response.is_none());
    assert!(lookup.status.is_none());
    assert_eq!(lookup.resolve_state(), FulfillmentState::Unresolved);
}

#[tokio::test]
async fn lookup_fetches_token_once_per_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let provider = SeqTokenProvider::default();
    let counter = provider.clone();
    let client = FlipClient::new(test_config(&server.uri()), provider)
        .expect("client construction should not fail");
    let _ = client.lookup_order_status("A1").await;

    // max_retries = 1 → two attempts, each with its own token fetch.
    assert_eq!(counter.fetches(), 2);
}

#[tokio::test]
async fn empty_data_resolves_to_flip_data_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(serde_json::json!([]))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let lookup = client.lookup_order_status("A1").await;

    assert_eq!(lookup.resolve_state(), FulfillmentState::Empty);
    assert_eq!(lookup.resolve_state().to_string(), "Flip Data Empty");
}

#[tokio::test]
async fn lookup_order_id_returns_first_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(query_param("limit", "10"))
        .and(query_param("customerOrderId", "A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(serde_json::json!([
            { "id": "flip-1", "state": "Created" },
            { "id": "flip-2", "state": "Created" }
        ]))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let id = client
        .lookup_order_id("token-x", "A1")
        .await
        .expect("lookup should succeed");
    assert_eq!(id.as_deref(), Some("flip-1"));
}

#[tokio::test]
async fn lookup_order_id_handles_no_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(serde_json::json!([]))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let id = client
        .lookup_order_id("token-x", "A1")
        .await
        .expect("lookup should succeed");
    assert!(id.is_none());
}

#[tokio::test]
async fn disable_sku_sends_expected_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/shop/admin/skus/disable/v1"))
        .and(header("x-flipinator-tools", "ordersync"))
        .and(body_json(serde_json::json!({
            "skus": ["SKU-1"],
            "auditStatus": "unsupportedBundle"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .disable_sku("token-x", "SKU-1", AuditStatus::UnsupportedBundle)
        .await
        .expect("disable should succeed");
}

#[tokio::test]
async fn disable_sku_surfaces_http_failure() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/shop/admin/skus/disable/v1"))
        .respond_with(ResponseTemplate::new(422).set_body_string("unknown sku"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .disable_sku("token-x", "SKU-1", AuditStatus::Connectivity)
        .await;
    assert!(
        matches!(result, Err(FlipError::UnexpectedStatus { status: 422, .. })),
        "expected UnexpectedStatus(422), got: {result:?}"
    );
}

#[tokio::test]
async fn cancel_order_substitutes_order_id_into_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shop/admin/orders/flip-9/cancel/v1"))
        .and(body_json(serde_json::json!({
            "itemsBackToCart": false,
            "reasonForCancellation": "integrationFailure",
            "shouldCancelAdditionalOrders": false
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": { "result": "success" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .cancel_order("token-x", "flip-9")
        .await
        .expect("cancel should succeed");
}

#[tokio::test]
async fn cancel_order_rejects_non_success_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shop/admin/orders/flip-9/cancel/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": { "result": "alreadyCancelled" } })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.cancel_order("token-x", "flip-9").await;
    assert!(
        matches!(result, Err(FlipError::CancelRejected { ref order_id, .. }) if order_id == "flip-9"),
        "expected CancelRejected, got: {result:?}"
    );
}

#[tokio::test]
async fn oauth_provider_posts_client_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(wiremock::matchers::body_string_contains(
            "grant_type=client_credentials",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "access_token": "fresh-token" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = OauthTokenProvider::new(
        &format!("{}/oauth/token", server.uri()),
        "client-id",
        "client-secret",
        30,
    )
    .expect("provider construction should not fail");

    let token = provider.fetch().await.expect("token fetch should succeed");
    assert_eq!(token, "fresh-token");
}

#[tokio::test]
async fn oauth_provider_surfaces_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let provider = OauthTokenProvider::new(
        &format!("{}/oauth/token", server.uri()),
        "client-id",
        "client-secret",
        30,
    )
    .expect("provider construction should not fail");

    let result = provider.fetch().await;
    assert!(
        matches!(result, Err(TokenError::UnexpectedStatus { status: 403 })),
        "expected UnexpectedStatus(403), got: {result:?}"
    );
}
