#![allow(clippy::unwrap_used)]
// Integration tests for `ServerClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use swarmui_api::{Error, ServerClient};

// ── Helpers ─────────────────────────────────────────────────────────

const BASE: &str = "/_ah/api/swarming/v1";

async fn setup() -> (MockServer, ServerClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}{BASE}/", server.uri())).unwrap();
    let client = ServerClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn token() -> SecretString {
    SecretString::from("Bearer abc123".to_string())
}

// ── Server details ──────────────────────────────────────────────────

#[tokio::test]
async fn test_server_details_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/server/details")))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "server_version": "6789-abcdef1",
            "bot_version": "0123456789abcdef",
            "cas_viewer_server": "https://cas-viewer.appspot.com",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let details = client.server_details(&token()).await.unwrap();

    assert_eq!(details.server_version, "6789-abcdef1");
    assert_eq!(details.bot_version, "0123456789abcdef");
    assert_eq!(details.cas_viewer_server, "https://cas-viewer.appspot.com");
}

#[tokio::test]
async fn test_server_details_forbidden() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/server/details")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "anonymous is not allowed" }
        })))
        .mount(&server)
        .await;

    let result = client.server_details(&token()).await;

    match result {
        Err(Error::Forbidden { message }) => assert_eq!(message, "anonymous is not allowed"),
        other => panic!("expected Forbidden error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_details_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/server/details")))
        .respond_with(ResponseTemplate::new(500).set_body_string("datastore timeout"))
        .mount(&server)
        .await;

    let err = client.server_details(&token()).await.unwrap_err();

    assert!(!err.is_forbidden());
    assert!(
        matches!(err, Error::Http { status: 500, ref message } if message == "datastore timeout"),
        "expected Http error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_server_details_bad_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/server/details")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client.server_details(&token()).await.unwrap_err();

    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>login</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Server permissions ──────────────────────────────────────────────

#[tokio::test]
async fn test_server_permissions_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/server/permissions")))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cancel_task": true,
            "delete_bot": false,
        })))
        .mount(&server)
        .await;

    let perms = client.server_permissions(&token(), &[]).await.unwrap();

    assert!(perms.allows("cancel_task"));
    assert!(!perms.allows("delete_bot"));
}

#[tokio::test]
async fn test_server_permissions_with_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/server/permissions")))
        .and(query_param("bot_id", "build42-m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "terminate_bot": true })))
        .expect(1)
        .mount(&server)
        .await;

    let query = vec![("bot_id".to_string(), "build42-m1".to_string())];
    let perms = client.server_permissions(&token(), &query).await.unwrap();

    assert!(perms.allows("terminate_bot"));
}

#[tokio::test]
async fn test_server_permissions_forbidden() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/server/permissions")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client.server_permissions(&token(), &[]).await.unwrap_err();

    assert!(err.is_forbidden(), "expected 403, got: {err:?}");
}
