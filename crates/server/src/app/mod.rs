//! Implements the primary functionality for the ModelScope MCP server.
//!
//! This includes the service that backs the MCP handler, the tool dispatch
//! path with its cross-cutting middleware, and the `run` entry point that
//! wires up logging, configuration, and the command-line interface.

mod tools;

#[cfg(test)]
mod tests;

use crate::cli::{Cli, Commands};
use crate::commands::{handle_config_command, handle_list_tools_command, handle_serve_command};
use crate::middleware::{SlidingWindowRateLimiter, DEFAULT_MAX_REQUESTS_PER_SECOND};
use crate::settings::Settings;
use anyhow::{anyhow, Result};
use clap::Parser;
use rmcp::model::CallToolResult;
use serde_json::{Map as JsonMap, Value};
use std::sync::Arc;

/// Serves the ModelScope tools over the MCP protocol.
///
/// Holds the resolved settings (read-only once constructed) and the
/// rate-limiter window shared by all in-flight tool calls. Everything else
/// a tool needs is resolved per call.
pub struct ModelScopeService {
    pub(crate) settings: Arc<Settings>,
    pub(crate) limiter: SlidingWindowRateLimiter,
    pub(crate) include_error_details: bool,
}

impl ModelScopeService {
    pub fn new(settings: Settings) -> Self {
        Self::with_options(settings, DEFAULT_MAX_REQUESTS_PER_SECOND, false)
    }

    pub fn with_options(
        settings: Settings,
        max_requests_per_second: usize,
        include_error_details: bool,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            limiter: SlidingWindowRateLimiter::per_second(max_requests_per_second),
            include_error_details,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Dispatch a named tool call.
    ///
    /// The rate limiter runs before any tool work, so an over-limit call
    /// never reaches the network. Unknown names are errors for the
    /// handler's error-translation layer.
    pub(crate) async fn dispatch_tool(
        &self,
        name: &str,
        args: JsonMap<String, Value>,
    ) -> Result<CallToolResult> {
        if let Err(retry_after) = self.limiter.check_and_record() {
            return Err(anyhow!(
                "rate limit exceeded: more than {} requests per second; retry in {}ms",
                self.limiter.max_requests(),
                retry_after.as_millis()
            ));
        }

        match name {
            "get_current_user" => self.get_current_user_tool().await,
            "get_environment_info" => self.get_environment_info_tool(),
            "search_models" => self.search_models_tool(&args).await,
            "search_papers" => self.search_papers_tool(&args).await,
            "search_mcp_servers" => self.search_mcp_servers_tool(&args).await,
            "generate_image" => self.generate_image_tool(&args).await,
            other => Err(anyhow!("unknown tool {other}")),
        }
    }

    /// Format an error for the MCP error envelope.
    ///
    /// With error details enabled the full chain is included, which helps
    /// when diagnosing remote API trouble through an MCP client.
    pub(crate) fn translate_error(&self, err: anyhow::Error) -> rmcp::ErrorData {
        if self.include_error_details {
            rmcp::ErrorData::internal_error(format!("{err:#}"), None)
        } else {
            rmcp::ErrorData::internal_error(err.to_string(), None)
        }
    }
}

/// The main entry point for the `modelscope-mcp` application.
pub fn run() -> Result<()> {
    crate::config::apply_config_to_env();
    init_tracing();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve {
        rate_limit: DEFAULT_MAX_REQUESTS_PER_SECOND,
        include_error_details: false,
    }) {
        Commands::Serve {
            rate_limit,
            include_error_details,
        } => handle_serve_command(rate_limit, include_error_details),
        Commands::ListTools => handle_list_tools_command(),
        Commands::Config => handle_config_command(),
    }
}

fn init_tracing() {
    let level = std::env::var(crate::settings::ENV_LOG_LEVEL)
        .unwrap_or_else(|_| crate::settings::DEFAULT_LOG_LEVEL.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        // stdout belongs to the MCP stdio transport.
        .with_writer(std::io::stderr)
        .init();
}
