use super::TandoorMcp;
use crate::tandoor::TandoorClient;
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve one MCP server instance over stdin/stdout until the peer
/// disconnects or `ct` is cancelled.
pub async fn serve_stdio(client: TandoorClient, ct: CancellationToken) -> Result<()> {
    info!("Connecting MCP server to stdio transport");

    let service = TandoorMcp::new(client)
        .serve_with_ct(rmcp::transport::stdio(), ct)
        .await
        .context("Failed to connect MCP server to stdio transport")?;

    let reason = service
        .waiting()
        .await
        .context("stdio MCP service terminated abnormally")?;

    info!("stdio MCP service stopped: {:?}", reason);
    Ok(())
}
