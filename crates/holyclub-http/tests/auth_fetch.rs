//! Token refresh behavior against a mock backend.
//!
//! These tests use wiremock to stand in for the HolyClub backend and check
//! what `AuthFetch` sends, what it stores, and what it hands back.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use holyclub_core::journal::ImagePart;
use holyclub_core::{ApiUrl, Credential, MemoryTokenStore, Navigator, TokenStore};
use holyclub_http::{ApiClient, ApiRequest, AuthFetch, ClientConfig, RefreshOutcome};
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct CountingNavigator {
    calls: AtomicUsize,
}

impl Navigator for CountingNavigator {
    fn logged_out(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn api_url(server: &MockServer) -> ApiUrl {
    ApiUrl::new(server.uri()).unwrap()
}

fn store_with(token: &str) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_credential(
        Credential::parse(token).unwrap(),
    ))
}

fn auth_fetch(server: &MockServer, store: Arc<MemoryTokenStore>) -> AuthFetch {
    let client = ApiClient::new(api_url(server)).unwrap();
    AuthFetch::new(client, store)
}

fn stored(store: &MemoryTokenStore) -> Option<String> {
    store.get().map(|c| c.as_str().to_string())
}

async fn refresh_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/token/refresh")
        .count()
}

// ============================================================================
// No refresh needed
// ============================================================================

#[tokio::test]
async fn test_no_token_sends_once_without_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let fetch = auth_fetch(&server, store.clone());
    let request = ApiRequest::get(&format!("{}/pober", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
    assert_eq!(refresh_calls(&server).await, 0);
}

#[tokio::test]
async fn test_non_401_is_returned_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/me"))
        .and(header("authorization", "Bearer good"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let fetch = auth_fetch(&server, store_with("good"));
    let request = ApiRequest::get(&format!("{}/user/me", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(response.text().await.unwrap(), "forbidden");
    assert_eq!(refresh_calls(&server).await, 0);
}

#[tokio::test]
async fn test_sequential_calls_with_valid_token_never_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober/1"))
        .and(header("authorization", "Bearer good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(2)
        .mount(&server)
        .await;

    let fetch = auth_fetch(&server, store_with("good"));
    let request = ApiRequest::get(&format!("{}/pober/1", server.uri())).unwrap();

    for _ in 0..2 {
        let response = fetch.fetch(&request).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }
    assert_eq!(refresh_calls(&server).await, 0);
}

// ============================================================================
// Successful refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_then_replay_with_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pober"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("newtoken123"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/pober"))
        .and(header("authorization", "Bearer newtoken123"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("old");
    let fetch = auth_fetch(&server, store.clone());
    let request = ApiRequest::post(&format!("{}/pober", server.uri()))
        .unwrap()
        .header(
            HeaderName::from_static("x-client"),
            HeaderValue::from_static("journal"),
        )
        .form([("memo", "감사"), ("prayer", "30")]);

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(stored(&store).as_deref(), Some("newtoken123"));

    let requests = server.received_requests().await.unwrap();
    let attempts: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/pober")
        .collect();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].body, attempts[1].body);
    assert_eq!(attempts[1].headers.get("x-client").unwrap(), "journal");
    assert_eq!(
        attempts[1].headers.get("content-type").unwrap(),
        "application/x-www-form-urlencoded"
    );

    let refresh = requests
        .iter()
        .find(|r| r.url.path() == "/token/refresh")
        .unwrap();
    assert!(refresh.body.is_empty());
}

#[tokio::test]
async fn test_refresh_sends_session_cookies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/me"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fresh"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nickname": "요셉"})))
        .mount(&server)
        .await;

    let fetch = auth_fetch(&server, store_with("old"));
    fetch.client().cookies().add("SESSION=s1");
    let request = ApiRequest::get(&format!("{}/user/me", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let requests = server.received_requests().await.unwrap();
    let refresh = requests
        .iter()
        .find(|r| r.url.path() == "/token/refresh")
        .unwrap();
    let cookie = refresh.headers.get("cookie").unwrap().to_str().unwrap();
    assert!(cookie.contains("SESSION=s1"));
}

#[tokio::test]
async fn test_soft_fail_retries_with_cookie_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober/7"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"doLogout": false})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pober/7"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("old");
    let fetch = auth_fetch(&server, store.clone());
    fetch.client().cookies().add("token=abc");
    let request = ApiRequest::get(&format!("{}/pober/7", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(stored(&store).as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_soft_fail_uses_token_cookie_set_by_refresh_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober/7"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(
            ResponseTemplate::new(422)
                .insert_header("set-cookie", "token=abc; Path=/")
                .set_body_json(json!({"doLogout": false})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pober/7"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("old");
    let fetch = auth_fetch(&server, store.clone());
    let request = ApiRequest::get(&format!("{}/pober/7", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(stored(&store).as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_multipart_upload_is_replayed_byte_for_byte() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pober"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fresh"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/pober"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("old");
    let fetch = auth_fetch(&server, store.clone());
    let image = ImagePart::new("walk.png", vec![0x89, b'P', b'N', b'G', 0x00, 0xff]).unwrap();
    let request = ApiRequest::post(&format!("{}/pober", server.uri()))
        .unwrap()
        .multipart([("memo", "산책"), ("prayer", "30")], [("images", &image)])
        .unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(stored(&store).as_deref(), Some("fresh"));

    let requests = server.received_requests().await.unwrap();
    let attempts: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/pober")
        .collect();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].body, attempts[1].body);
    assert_eq!(attempts[0].body, request.body().unwrap());
    assert_eq!(
        attempts[0].headers.get("content-type"),
        attempts[1].headers.get("content-type")
    );
    let content_type = attempts[1]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn test_retry_401_is_final() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("newtoken123"))
        .expect(1)
        .mount(&server)
        .await;

    let fetch = auth_fetch(&server, store_with("old"));
    let request = ApiRequest::get(&format!("{}/pober/7", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

// ============================================================================
// Failed refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_server_error_returns_original_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("old");
    let fetch = auth_fetch(&server, store.clone());
    let request = ApiRequest::get(&format!("{}/pober", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(response.text().await.unwrap(), "expired");
    assert_eq!(stored(&store).as_deref(), Some("old"));
}

#[tokio::test]
async fn test_refresh_transport_error_returns_original_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let store = store_with("old");
    let mut config = ClientConfig::new(api_url(&server));
    config.timeout = Some(Duration::from_millis(300));
    let fetch = AuthFetch::new(ApiClient::with_config(config).unwrap(), store.clone());
    let request = ApiRequest::get(&format!("{}/pober", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(stored(&store).as_deref(), Some("old"));
}

#[tokio::test]
async fn test_malformed_refresh_body_returns_original_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0xfd]))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("old");
    let fetch = auth_fetch(&server, store.clone());
    let request = ApiRequest::get(&format!("{}/pober", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(stored(&store).as_deref(), Some("old"));
}

#[tokio::test]
async fn test_soft_fail_without_cookie_returns_original_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("old");
    let fetch = auth_fetch(&server, store.clone());
    let request = ApiRequest::get(&format!("{}/pober", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(stored(&store).as_deref(), Some("old"));
}

// ============================================================================
// Forced logout
// ============================================================================

#[tokio::test]
async fn test_do_logout_clears_store_and_notifies_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pober"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"doLogout": true})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("old");
    let navigator = Arc::new(CountingNavigator::default());
    let fetch = auth_fetch(&server, store.clone()).with_navigator(navigator.clone());
    let request = ApiRequest::get(&format!("{}/pober", server.uri())).unwrap();

    let response = fetch.fetch(&request).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
    assert!(stored(&store).is_none());
    assert_eq!(navigator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_explicit_refresh_reports_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  spaced-token \n"))
        .mount(&server)
        .await;

    let store = store_with("old");
    let fetch = auth_fetch(&server, store.clone());

    let outcome = fetch.refresh().await;
    assert_eq!(
        outcome,
        RefreshOutcome::Renewed(Credential::parse("spaced-token").unwrap())
    );
    assert_eq!(stored(&store).as_deref(), Some("spaced-token"));
}
