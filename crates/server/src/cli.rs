//! Command-line interface for the ModelScope MCP server.

use clap::{Parser, Subcommand};

/// Command-line interface for the `modelscope-mcp` application.
#[derive(Debug, Parser)]
#[command(
    name = "modelscope-mcp",
    about = "MCP server exposing ModelScope API tools"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available `modelscope-mcp` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Runs as an MCP server over stdio.
    Serve {
        /// Maximum tool calls per second before requests are rejected.
        #[arg(long, value_name = "N", default_value_t = crate::middleware::DEFAULT_MAX_REQUESTS_PER_SECOND)]
        rate_limit: usize,
        /// Includes full error chains in structured error responses.
        #[arg(long, env = "MODELSCOPE_INCLUDE_ERROR_DETAILS", default_value_t = false)]
        include_error_details: bool,
    },
    /// Lists the registered MCP tools as JSON (debug).
    ListTools,
    /// Shows the resolved configuration with the API token redacted.
    Config,
}
