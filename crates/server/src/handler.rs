//! MCP `ServerHandler` implementation for `ModelScopeService`.
//!
//! Provides the core MCP surface:
//!
//! - `get_info()` - server capabilities and identity
//! - `list_tools()` - the tool catalog with JSON schemas
//! - `call_tool()` - dispatches tool calls to specific handlers
//!
//! `call_tool` applies the cross-cutting middleware in a fixed order: the
//! rate limiter runs inside the dispatch before any tool work, timing and
//! structured logging record every call, and error translation wraps the
//! whole dispatch so no downstream failure escapes unformatted.

use crate::app::ModelScopeService;
use crate::metadata;
use crate::tool_schemas;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, InitializeResult, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities,
};
use rmcp::ServerHandler;
use std::time::Instant;

impl ServerHandler for ModelScopeService {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "modelscope-mcp-server".into(),
                version: metadata::server_version().into(),
                ..Default::default()
            },
            instructions: Some(
                "This server provides tools for calling the ModelScope API.".into(),
            ),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, rmcp::ErrorData>> + Send + '_
    {
        std::future::ready(Ok(ListToolsResult {
            tools: tool_schemas::all_tools(),
            next_cursor: None,
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, rmcp::ErrorData>> + Send + '_
    {
        Box::pin(async move {
            let name = request.name.to_string();
            let args = request.arguments.unwrap_or_default();

            let started = Instant::now();
            let result = self.dispatch_tool(&name, args).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(_) => tracing::info!(
                    target: "modelscope::mcp",
                    tool = %name,
                    elapsed_ms,
                    "tool call completed"
                ),
                Err(e) => tracing::warn!(
                    target: "modelscope::mcp",
                    tool = %name,
                    elapsed_ms,
                    error = %e,
                    "tool call failed"
                ),
            }

            result.map_err(|e| self.translate_error(e))
        })
    }
}
