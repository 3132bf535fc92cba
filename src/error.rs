use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TandoorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status code {}", status.as_u16())]
    Status { status: StatusCode, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TandoorError>;

impl TandoorError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        TandoorError::Config(message.into())
    }
}

/// JSON-RPC error code for unsupported transport operations.
pub const JSONRPC_METHOD_NOT_ALLOWED: i64 = -32000;
/// JSON-RPC internal error code.
pub const JSONRPC_INTERNAL_ERROR: i64 = -32603;

/// Failures on the HTTP MCP route, rendered as JSON-RPC error envelopes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum McpHttpError {
    #[error("Method not allowed.")]
    MethodNotAllowed,

    #[error("Internal server error")]
    Internal,
}

impl McpHttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            McpHttpError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            McpHttpError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn jsonrpc_code(&self) -> i64 {
        match self {
            McpHttpError::MethodNotAllowed => JSONRPC_METHOD_NOT_ALLOWED,
            McpHttpError::Internal => JSONRPC_INTERNAL_ERROR,
        }
    }
}

impl axum::response::IntoResponse for McpHttpError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "error": {
                "code": self.jsonrpc_code(),
                "message": self.to_string(),
            },
            "id": null,
        });

        (self.status_code(), axum::Json(body)).into_response()
    }
}
