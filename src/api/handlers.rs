use crate::api::mcp_service::{create_stateless_service, RequestScope};
use crate::error::McpHttpError;
use crate::tandoor::TandoorClient;
use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tracing::{debug, error};

/// Application state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    pub client: TandoorClient,
    /// Cancelled on shutdown; every per-request MCP pair uses a child token
    pub shutdown: CancellationToken,
}

pub(crate) async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(crate) async fn server_info() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "tools": crate::mcp::tools::tools()
            .iter()
            .map(|tool| tool.name.to_string())
            .collect::<Vec<_>>(),
    }))
}

// MCP-specific handlers

/// Stateless MCP over streamable HTTP: one fresh server/transport pair per request
pub(crate) async fn mcp_post(State(state): State<ApiState>, request: Request) -> Response {
    let scope = RequestScope::new(state.shutdown.child_token());
    let service = create_stateless_service(state.client.clone(), scope.token());
    debug!("Handling MCP request with a fresh server instance");

    let response = match service.oneshot(request).await {
        Ok(response) => response,
        Err(e) => {
            error!("Error handling MCP request: {}", e);
            return McpHttpError::Internal.into_response();
        }
    };

    if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Error handling MCP request: transport returned 500");
        return McpHttpError::Internal.into_response();
    }

    let (parts, body) = response.into_parts();
    Response::from_parts(parts, scope.attach(Body::new(body)))
}

/// GET (SSE stream) and DELETE (session termination) have no meaning
/// without sessions
pub(crate) async fn mcp_method_not_allowed(request: Request) -> Response {
    debug!("Received {} MCP request", request.method());
    McpHttpError::MethodNotAllowed.into_response()
}
