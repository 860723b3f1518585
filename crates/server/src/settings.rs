//! Environment-derived settings for the ModelScope MCP server.
//!
//! All remote endpoint URLs are derived here from the configured base URLs;
//! no other module assembles ModelScope URLs. Values come from environment
//! variables with documented defaults, optionally seeded from the config
//! file (see [`crate::config`]), so the server is runnable with zero
//! configuration for the tools that do not need a credential.

use std::time::Duration;

pub const ENV_API_TOKEN: &str = "MODELSCOPE_API_TOKEN";
/// Older deployments exported the token under this name; still honored.
pub const ENV_API_TOKEN_FALLBACK: &str = "MODELSCOPE_API_KEY";
pub const ENV_API_BASE_URL: &str = "MODELSCOPE_API_BASE_URL";
pub const ENV_OPENAPI_BASE_URL: &str = "MODELSCOPE_OPENAPI_BASE_URL";
pub const ENV_API_INFERENCE_BASE_URL: &str = "MODELSCOPE_API_INFERENCE_BASE_URL";
pub const ENV_DEFAULT_IMAGE_GENERATION_MODEL: &str = "MODELSCOPE_DEFAULT_IMAGE_GENERATION_MODEL";
pub const ENV_LOG_LEVEL: &str = "MODELSCOPE_LOG_LEVEL";
pub const ENV_API_TIMEOUT_SECONDS: &str = "MODELSCOPE_API_TIMEOUT_SECONDS";
pub const ENV_IMAGE_GENERATION_TIMEOUT_SECONDS: &str =
    "MODELSCOPE_IMAGE_GENERATION_TIMEOUT_SECONDS";

pub const DEFAULT_API_BASE_URL: &str = "https://modelscope.cn/api/v1";
pub const DEFAULT_OPENAPI_BASE_URL: &str = "https://modelscope.cn/openapi/v1";
pub const DEFAULT_API_INFERENCE_BASE_URL: &str = "https://api-inference.modelscope.cn";
pub const DEFAULT_IMAGE_GENERATION_MODEL: &str = "MusePublic/489_ckpt_FLUX_1";
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Bound for user lookup and search calls.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);
/// Bound for image generation, which routinely takes minutes.
pub const DEFAULT_IMAGE_GENERATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Resolved configuration for the server and its remote API calls.
///
/// Constructed once (usually via [`Settings::from_env`]) and injected into
/// the service and every client call. Tests build a literal pointed at a
/// mock server instead of mutating process state.
#[derive(Debug, Clone)]
pub struct Settings {
    /// ModelScope session token; `None` means unauthenticated.
    pub api_token: Option<String>,
    /// Base URL of the general (account/search) API.
    pub api_base_url: String,
    /// Base URL of the OpenAPI-style API (papers, MCP servers).
    pub openapi_base_url: String,
    /// Base URL of the inference API (image generation).
    pub api_inference_base_url: String,
    /// Model used by `generate_image` when the caller names none.
    pub default_image_generation_model: String,
    /// Default log verbosity when `RUST_LOG` is unset.
    pub log_level: String,
    pub api_timeout: Duration,
    pub image_generation_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            openapi_base_url: DEFAULT_OPENAPI_BASE_URL.to_string(),
            api_inference_base_url: DEFAULT_API_INFERENCE_BASE_URL.to_string(),
            default_image_generation_model: DEFAULT_IMAGE_GENERATION_MODEL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_timeout: DEFAULT_API_TIMEOUT,
            image_generation_timeout: DEFAULT_IMAGE_GENERATION_TIMEOUT,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

fn env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

impl Settings {
    /// Read settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let api_token = std::env::var(ENV_API_TOKEN)
            .or_else(|_| std::env::var(ENV_API_TOKEN_FALLBACK))
            .ok()
            .filter(|t| !t.trim().is_empty());

        Self {
            api_token,
            api_base_url: env_or(ENV_API_BASE_URL, DEFAULT_API_BASE_URL),
            openapi_base_url: env_or(ENV_OPENAPI_BASE_URL, DEFAULT_OPENAPI_BASE_URL),
            api_inference_base_url: env_or(
                ENV_API_INFERENCE_BASE_URL,
                DEFAULT_API_INFERENCE_BASE_URL,
            ),
            default_image_generation_model: env_or(
                ENV_DEFAULT_IMAGE_GENERATION_MODEL,
                DEFAULT_IMAGE_GENERATION_MODEL,
            ),
            log_level: env_or(ENV_LOG_LEVEL, DEFAULT_LOG_LEVEL),
            api_timeout: env_duration_secs(ENV_API_TIMEOUT_SECONDS, DEFAULT_API_TIMEOUT),
            image_generation_timeout: env_duration_secs(
                ENV_IMAGE_GENERATION_TIMEOUT_SECONDS,
                DEFAULT_IMAGE_GENERATION_TIMEOUT,
            ),
        }
    }

    /// True iff a token is present and non-empty after trimming.
    pub fn is_api_token_configured(&self) -> bool {
        self.api_token().is_some()
    }

    /// The trimmed token, or `None` when unset or whitespace-only.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn users_login_endpoint(&self) -> String {
        format!("{}/users/login/info", base(&self.api_base_url))
    }

    pub fn models_search_endpoint(&self) -> String {
        format!("{}/dolphin/models", base(&self.api_base_url))
    }

    pub fn papers_search_endpoint(&self) -> String {
        format!("{}/papers", base(&self.openapi_base_url))
    }

    pub fn mcp_servers_search_endpoint(&self) -> String {
        format!("{}/mcp/servers", base(&self.openapi_base_url))
    }

    pub fn images_endpoint(&self) -> String {
        format!("{}/v1/images/generations", base(&self.api_inference_base_url))
    }
}

fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}
