pub mod handlers;
pub(crate) mod mcp_service;
pub mod routes;

use crate::config::HttpConfig;
use crate::tandoor::TandoorClient;
use anyhow::{Context, Result};
use axum::Router;
use handlers::ApiState;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Bind the HTTP listener and serve until `shutdown` is cancelled
pub async fn start_server(
    config: &HttpConfig,
    client: TandoorClient,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);

    let state = ApiState {
        client,
        shutdown: shutdown.clone(),
    };

    // Build the application
    let app = build_router(state);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;

    info!("MCP Stateless Streamable HTTP Server listening on {}", addr);
    info!("  → MCP endpoint: http://{}/mcp", addr);
    info!("  → Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::mcp_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM
pub async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down...");
        },
        _ = shutdown.cancelled() => {},
    }

    shutdown.cancel();
}
