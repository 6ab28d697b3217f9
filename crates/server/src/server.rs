//! MCP server handler backed by [`QueryTools`].

use denodo_query_tools::{QueryTools, QueryToolsError};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorCode, Implementation, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::Value;
use tracing::debug;

#[derive(Clone)]
pub struct QueryServer {
    tools: QueryTools,
}

impl QueryServer {
    pub fn new(tools: QueryTools) -> Self {
        Self { tools }
    }
}

fn to_mcp_error(e: QueryToolsError) -> McpError {
    let code = match e {
        QueryToolsError::UnknownTool(_) => ErrorCode::METHOD_NOT_FOUND,
        QueryToolsError::InvalidArguments { .. } => ErrorCode::INVALID_PARAMS,
        QueryToolsError::Config(_) => ErrorCode::INTERNAL_ERROR,
    };
    McpError::new(code, e.to_string(), None)
}

impl ServerHandler for QueryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "denodo_ai_sdk".to_string(),
                title: Some("Denodo AI SDK".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Ask natural-language questions over Denodo data and metadata, run similarity \
                 search over stored metadata, or load VDP database metadata into the vector store."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools.list_tools())))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tools
            .list_tools()
            .into_iter()
            .find(|t| t.name == name)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "tools/call");
        let arguments = request.arguments.map_or(Value::Null, Value::Object);
        self.tools
            .call_tool(&request.name, arguments)
            .await
            .map_err(to_mcp_error)
    }
}
