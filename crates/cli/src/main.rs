//! Command-line interface for the `modelscope-mcp` application.
//!
//! This crate serves as the main entry point for the executable, delegating
//! its core functionality to the `modelscope-mcp-server` crate.

fn main() -> anyhow::Result<()> {
    modelscope_mcp_server::run()
}
