use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rag_api_tester::config::UpstreamConfig;
use rag_api_tester::handlers::build_router;
use rag_api_tester::services::UpstreamClient;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERNAME: &str = "tester@example.com";
const PASSWORD: &str = "secret";

fn expected_auth() -> String {
    format!("Basic {}", STANDARD.encode(format!("{USERNAME}:{PASSWORD}")))
}

/// Bind the proxy on an ephemeral port and return its base URL.
async fn spawn_proxy(upstream_url: String) -> String {
    let client = Arc::new(UpstreamClient::new(&UpstreamConfig {
        base_url: upstream_url,
        username: USERNAME.to_string(),
        password: PASSWORD.to_string(),
        timeout_seconds: 5,
    }));

    let app = build_router(client);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_query_passes_upstream_body_through_unchanged() {
    let upstream = MockServer::start().await;
    let upstream_body = r#"{"chunks":[{"id":3,"content":"Solar grew.","score":0.91,"source":"e.pdf","metadata":{"page":2}}]}"#;

    Mock::given(method("GET"))
        .and(path("/api/document/rag/"))
        .and(query_param("query", "solar power"))
        .and(header("authorization", expected_auth().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(upstream_body, "application/json"))
        .mount(&upstream)
        .await;

    let proxy = spawn_proxy(upstream.uri()).await;
    let response = reqwest::get(format!("{proxy}/api/query?query=solar%20power"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), upstream_body);
}

#[tokio::test]
async fn test_query_without_parameter_is_rejected() {
    let upstream = MockServer::start().await;
    let proxy = spawn_proxy(upstream.uri()).await;

    let response = reqwest::get(format!("{proxy}/api/query")).await.unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Query parameter is required"}));
}

#[tokio::test]
async fn test_query_blank_parameter_is_rejected() {
    let upstream = MockServer::start().await;
    let proxy = spawn_proxy(upstream.uri()).await;

    let response = reqwest::get(format!("{proxy}/api/query?query=%20%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_query_upstream_error_maps_to_generic_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/document/rag/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&upstream)
        .await;

    let proxy = spawn_proxy(upstream.uri()).await;
    let response = reqwest::get(format!("{proxy}/api/query?query=solar"))
        .await
        .unwrap();

    // Upstream detail stays in the log, not in the client body
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Failed to process query"}));
}

#[tokio::test]
async fn test_query_post_accepts_json_body() {
    let upstream = MockServer::start().await;
    let upstream_body = r#"{"chunks":[]}"#;

    Mock::given(method("GET"))
        .and(path("/api/document/rag/"))
        .and(query_param("query", "hydro"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(upstream_body, "application/json"))
        .mount(&upstream)
        .await;

    let proxy = spawn_proxy(upstream.uri()).await;
    let response = reqwest::Client::new()
        .post(format!("{proxy}/api/query"))
        .json(&json!({"query": "hydro"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), upstream_body);
}

#[tokio::test]
async fn test_query_post_without_query_is_rejected() {
    let upstream = MockServer::start().await;
    let proxy = spawn_proxy(upstream.uri()).await;

    let response = reqwest::Client::new()
        .post(format!("{proxy}/api/query"))
        .json(&json!({"prompt": "wrong key"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Query is required"}));
}

#[tokio::test]
async fn test_upload_forwards_document_field_with_auth() {
    let upstream = MockServer::start().await;
    let receipt = r#"{"success":true,"document_id":12,"message":"queued"}"#;

    Mock::given(method("POST"))
        .and(path("/api/document/upload/"))
        .and(header("authorization", expected_auth().as_str()))
        .and(body_string_contains("name=\"document\""))
        .and(body_string_contains("filename=\"report.txt\""))
        .and(body_string_contains("annual energy report"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(receipt, "application/json"))
        .expect(1)
        .mount(&upstream)
        .await;

    let proxy = spawn_proxy(upstream.uri()).await;

    let part = reqwest::multipart::Part::bytes(b"annual energy report".to_vec())
        .file_name("report.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("document", part);

    let response = reqwest::Client::new()
        .post(format!("{proxy}/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), receipt);
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let upstream = MockServer::start().await;
    let proxy = spawn_proxy(upstream.uri()).await;

    let form = reqwest::multipart::Form::new().text("note", "no file here");
    let response = reqwest::Client::new()
        .post(format!("{proxy}/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "No file provided"}));
}

#[tokio::test]
async fn test_upload_upstream_error_maps_to_generic_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/document/upload/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let proxy = spawn_proxy(upstream.uri()).await;

    let part = reqwest::multipart::Part::bytes(b"x".to_vec())
        .file_name("x.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("document", part);

    let response = reqwest::Client::new()
        .post(format!("{proxy}/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Failed to upload document"}));
}

#[tokio::test]
async fn test_documents_passes_list_through_unchanged() {
    let upstream = MockServer::start().await;
    let upstream_body = r#"[{"id":1,"name":"a.txt","created_at":"2024-01-01T00:00:00Z","chunking_status":"pending"}]"#;

    Mock::given(method("GET"))
        .and(path("/api/document/list/"))
        .and(header("authorization", expected_auth().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(upstream_body, "application/json"))
        .mount(&upstream)
        .await;

    let proxy = spawn_proxy(upstream.uri()).await;
    let response = reqwest::get(format!("{proxy}/api/documents")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), upstream_body);
}

#[tokio::test]
async fn test_documents_unreachable_upstream_maps_to_500() {
    // Nothing listens on this port
    let proxy = spawn_proxy("http://127.0.0.1:1".to_string()).await;

    let response = reqwest::get(format!("{proxy}/api/documents")).await.unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Failed to load documents"}));
}

#[tokio::test]
async fn test_health_reports_version() {
    let proxy = spawn_proxy("http://127.0.0.1:1".to_string()).await;

    let response = reqwest::get(format!("{proxy}/health")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_readiness_follows_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/document/list/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&upstream)
        .await;

    let proxy = spawn_proxy(upstream.uri()).await;
    let ready = reqwest::get(format!("{proxy}/health/ready")).await.unwrap();
    assert_eq!(ready.status(), 200);

    let dead_proxy = spawn_proxy("http://127.0.0.1:1".to_string()).await;
    let not_ready = reqwest::get(format!("{dead_proxy}/health/ready"))
        .await
        .unwrap();
    assert_eq!(not_ready.status(), 503);
}
