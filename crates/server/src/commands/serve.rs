//! Handler for the `serve` command.

use crate::app::ModelScopeService;
use crate::settings::Settings;
use anyhow::{anyhow, Result};
use rmcp::service::serve_server;
use rmcp::transport;
use tokio::runtime::Runtime;

/// Handle the `serve` command: build the service from the environment and
/// serve it over stdio until the client disconnects.
pub(crate) fn handle_serve_command(rate_limit: usize, include_error_details: bool) -> Result<()> {
    let settings = Settings::from_env();
    tracing::debug!(
        target: "modelscope::serve",
        token_configured = settings.is_api_token_configured(),
        rate_limit,
        "starting MCP server over stdio"
    );
    let service = ModelScopeService::with_options(settings, rate_limit, include_error_details);

    let rt = Runtime::new()?;
    let running = rt.block_on(async {
        serve_server(service, transport::stdio())
            .await
            .map_err(|e| anyhow!("failed to start server: {e}"))
    })?;
    rt.block_on(async {
        running
            .waiting()
            .await
            .map_err(|e| anyhow!("server task ended: {e}"))
    })?;
    Ok(())
}
