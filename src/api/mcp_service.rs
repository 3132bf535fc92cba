// Per-request MCP service for the stateless streamable HTTP route.
//
// Every POST gets its own server instance and transport. Nothing is shared
// between requests, so concurrent clients cannot observe each other's state
// or collide on JSON-RPC request ids.

use crate::mcp::TandoorMcp;
use crate::tandoor::TandoorClient;
use axum::body::Body;
use futures::StreamExt;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Create a stateless StreamableHttpService whose server instance and
/// transport live until `cancellation_token` is cancelled.
pub(crate) fn create_stateless_service(
    client: TandoorClient,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<TandoorMcp, LocalSessionManager> {
    let service_factory = move || Ok(TandoorMcp::new(client.clone()));

    StreamableHttpService::new(
        service_factory,
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: false,
            sse_keep_alive: None,
            cancellation_token,
            ..Default::default()
        },
    )
}

/// Owns the teardown of one request's server/transport pair.
///
/// Dropping the scope cancels the pair's token. That happens when the
/// response body is dropped (fully sent, failed, or client gone) or, if no
/// response was produced, when the handler future itself is dropped.
pub(crate) struct RequestScope {
    token: CancellationToken,
}

impl RequestScope {
    pub(crate) fn new(token: CancellationToken) -> Self {
        debug!("MCP request scope opened");
        Self { token }
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Tie the scope to `body` so teardown runs when the body is dropped
    pub(crate) fn attach(self, body: Body) -> Body {
        let stream = body.into_data_stream().map(move |chunk| {
            let _scope = &self;
            chunk
        });
        Body::from_stream(stream)
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        // cancel() is idempotent; a pair already shut down is left alone
        if !self.token.is_cancelled() {
            self.token.cancel();
        }
        debug!("MCP request closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scope_cancels_token_on_drop() {
        let token = CancellationToken::new();
        let scope = RequestScope::new(token.clone());
        assert!(!token.is_cancelled());

        drop(scope);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_attached_scope_lives_until_body_is_consumed() {
        let token = CancellationToken::new();
        let body = RequestScope::new(token.clone()).attach(Body::from("payload"));
        assert!(!token.is_cancelled());

        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"payload");
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_scope_tolerates_already_cancelled_token() {
        let token = CancellationToken::new();
        token.cancel();

        drop(RequestScope::new(token.clone()));
        assert!(token.is_cancelled());
    }
}
