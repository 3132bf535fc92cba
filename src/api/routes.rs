use crate::api::handlers::ApiState;
use axum::{routing::get, Router};

pub fn health_routes() -> Router<ApiState> {
    Router::new()
        .route("/health", get(super::handlers::health_check))
        .route("/info", get(super::handlers::server_info))
}

pub fn mcp_routes() -> Router<ApiState> {
    Router::new().route(
        "/mcp",
        get(super::handlers::mcp_method_not_allowed)
            .delete(super::handlers::mcp_method_not_allowed)
            .post(super::handlers::mcp_post),
    )
}
