// MCP server instance exposing the Tandoor tools.
// One instance is bound to exactly one transport: the stdio channel owns a
// long-lived instance, the HTTP route builds a fresh one per request.

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use tracing::debug;

use super::tools;
use crate::tandoor::TandoorClient;

/// Name reported to clients during initialization
pub const SERVER_NAME: &str = "tandoor-server";

#[derive(Clone)]
pub struct TandoorMcp {
    client: TandoorClient,
}

impl TandoorMcp {
    pub fn new(client: TandoorClient) -> Self {
        Self { client }
    }
}

impl ServerHandler for TandoorMcp {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = SERVER_NAME.to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            instructions: Some(
                "Tools for browsing recipes and keywords in a Tandoor library and for adding \
                 items to its shopping list and meal plan."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _params: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        debug!("Listing tools");

        Ok(ListToolsResult {
            meta: None,
            tools: tools::tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        params: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tools::call_tool(&self.client, &params.name, params.arguments).await
    }
}
