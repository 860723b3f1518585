//! Configuration file support for the ModelScope MCP server.
//!
//! Loads settings from `~/.modelscope-mcp/config.toml` with the following
//! precedence: CLI arguments > Environment variables > Config file
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.modelscope-mcp/config.toml
//!
//! [api]
//! # ModelScope session token
//! token = "your-secret-token"
//!
//! # Base URL overrides (rarely needed outside testing)
//! base_url = "https://modelscope.cn/api/v1"
//! openapi_base_url = "https://modelscope.cn/openapi/v1"
//! inference_base_url = "https://api-inference.modelscope.cn"
//!
//! # Default model for generate_image
//! default_image_generation_model = "MusePublic/489_ckpt_FLUX_1"
//!
//! # Log verbosity when RUST_LOG is unset
//! log_level = "debug"
//! ```

use crate::settings;
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// ModelScope API configuration.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Configuration for the ModelScope API connection.
#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    /// ModelScope session token.
    pub token: Option<String>,
    /// Base URL for the general API.
    pub base_url: Option<String>,
    /// Base URL for the OpenAPI-style API.
    pub openapi_base_url: Option<String>,
    /// Base URL for the inference API.
    pub inference_base_url: Option<String>,
    /// Default model for image generation.
    pub default_image_generation_model: Option<String>,
    /// Log verbosity when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

/// Returns the path to the config file (~/.modelscope-mcp/config.toml).
fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".modelscope-mcp").join("config.toml"))
}

/// Loads the configuration file if it exists.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Ok(Some(config))` if the file exists and parses successfully.
/// Returns `Err` if the file exists but fails to parse.
pub fn load_config() -> Result<Option<Config>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&content)?;

    tracing::debug!(
        target: "modelscope::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Applies configuration file settings to environment variables.
///
/// Only sets environment variables that are not already set, preserving
/// the precedence: CLI > ENV > config file.
///
/// This should be called early in the application startup, before
/// parsing CLI arguments.
pub fn apply_config_to_env() {
    if let Ok(Some(config)) = load_config() {
        apply_api_config_to_env(&config.api);
    }
}

/// Applies API configuration to environment variables.
fn apply_api_config_to_env(api: &ApiConfig) {
    // Helper to set env var only if not already set
    fn set_if_absent(key: &str, value: &str) {
        if std::env::var(key).is_err() {
            std::env::set_var(key, value);
            tracing::trace!(
                target: "modelscope::config",
                key,
                "Set environment variable from config file"
            );
        }
    }

    if let Some(ref token) = api.token {
        set_if_absent(settings::ENV_API_TOKEN, token);
    }

    if let Some(ref url) = api.base_url {
        set_if_absent(settings::ENV_API_BASE_URL, url);
    }

    if let Some(ref url) = api.openapi_base_url {
        set_if_absent(settings::ENV_OPENAPI_BASE_URL, url);
    }

    if let Some(ref url) = api.inference_base_url {
        set_if_absent(settings::ENV_API_INFERENCE_BASE_URL, url);
    }

    if let Some(ref model) = api.default_image_generation_model {
        set_if_absent(settings::ENV_DEFAULT_IMAGE_GENERATION_MODEL, model);
    }

    if let Some(ref level) = api.log_level {
        set_if_absent(settings::ENV_LOG_LEVEL, level);
    }
}
