//! Version metadata reported by the `get_environment_info` tool.

use crate::types::EnvironmentInfo;

/// rmcp does not expose its crate version at runtime; keep these two in
/// sync with the workspace dependency declaration when upgrading.
pub const RMCP_VERSION: &str = "0.10";
pub const MCP_PROTOCOL_VERSION: &str = "2025-06-18";

pub fn server_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn rust_version() -> &'static str {
    env!("CARGO_PKG_RUST_VERSION")
}

/// Snapshot of the server, hosting framework, protocol, and toolchain
/// versions.
pub fn environment_info() -> EnvironmentInfo {
    EnvironmentInfo {
        server_version: server_version().to_string(),
        rmcp_version: RMCP_VERSION.to_string(),
        mcp_protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        rust_version: rust_version().to_string(),
    }
}
