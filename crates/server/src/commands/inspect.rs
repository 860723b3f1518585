//! Handlers for the `list-tools` and `config` debug commands.

use crate::settings::Settings;
use crate::tool_schemas;
use anyhow::Result;
use serde_json::json;

/// Print the registered tool catalog as JSON.
pub(crate) fn handle_list_tools_command() -> Result<()> {
    let tools: Vec<_> = tool_schemas::all_tools()
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "title": tool.title,
                "description": tool.description,
                "read_only": tool
                    .annotations
                    .as_ref()
                    .and_then(|a| a.read_only_hint)
                    .unwrap_or(false),
                "input_schema": &*tool.input_schema,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}

/// Print the resolved configuration with the token redacted.
pub(crate) fn handle_config_command() -> Result<()> {
    let settings = Settings::from_env();

    let token = if settings.is_api_token_configured() {
        "<configured>"
    } else {
        "<not set>"
    };
    println!("API token: {token}");
    println!("API base URL: {}", settings.api_base_url);
    println!("OpenAPI base URL: {}", settings.openapi_base_url);
    println!(
        "API inference base URL: {}",
        settings.api_inference_base_url
    );
    println!(
        "Default image generation model: {}",
        settings.default_image_generation_model
    );
    println!("Log level: {}", settings.log_level);
    println!("API timeout: {}s", settings.api_timeout.as_secs());
    println!(
        "Image generation timeout: {}s",
        settings.image_generation_timeout.as_secs()
    );
    Ok(())
}
