use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use tandoor_mcp::{
    api::{self, handlers::ApiState},
    config::TandoorConfig,
    tandoor::TandoorClient,
};
use tokio_util::sync::CancellationToken;

/// Client pointed at `base_url` with a fixed test token.
pub fn create_client(base_url: &str) -> TandoorClient {
    TandoorClient::new(&TandoorConfig {
        api_url: Some(base_url.to_string()),
        api_token: Some("test-token".to_string()),
    })
    .unwrap()
}

/// Build the full HTTP router (no listener, drive it with tower::oneshot).
pub fn build_test_app(base_url: &str) -> Router {
    api::build_router(ApiState {
        client: create_client(base_url),
        shutdown: CancellationToken::new(),
    })
}

/// A POST /mcp request carrying one JSON-RPC message.
pub fn mcp_request(message: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .header("accept", "application/json, text/event-stream")
        .body(Body::from(message.to_string()))
        .unwrap()
}

pub fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

pub async fn response_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Helper to extract JSON from a response body.
pub async fn response_json(response: Response<Body>) -> Value {
    let text = response_text(response).await;
    serde_json::from_str(&text).unwrap()
}

/// The JSON-RPC message in an MCP response body, which is either plain JSON
/// or an SSE stream whose `data:` lines carry the message.
pub fn jsonrpc_message(body: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value;
    }

    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<Value>(data.trim()).ok())
        .filter(|value| value.get("jsonrpc").is_some())
        .last()
        .expect("no JSON-RPC message in response body")
}

/// Parse the single text block of a `tools/call` result as JSON.
pub fn tool_result_json(message: &Value) -> Value {
    let content = message["result"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["type"], "text");
    serde_json::from_str(content[0]["text"].as_str().unwrap()).unwrap()
}
