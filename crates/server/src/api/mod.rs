//! HTTP client calls against the ModelScope APIs.
//!
//! One function per tool. Each performs exactly one outbound request,
//! resolves everything it needs from an injected [`Settings`], and maps
//! every HTTP status and transport failure class to a deterministic
//! outcome. The shared pieces live here so the mapping stays uniform
//! across tools instead of being re-derived per function.

mod aigc;
mod search;
mod user;

pub use aigc::generate_image;
pub use search::{search_mcp_servers, search_models, search_papers};
pub use user::fetch_current_user;

use crate::settings::Settings;
use anyhow::{bail, Result};
use reqwest::header::COOKIE;
use serde_json::Value;

pub(crate) const USER_AGENT_VALUE: &str =
    concat!("modelscope-mcp-server/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_SEARCH_LIMIT: u64 = 10;
pub(crate) const MAX_SEARCH_LIMIT: u64 = 100;

/// Clamp a caller-provided result limit into `[1, MAX_SEARCH_LIMIT]`.
pub(crate) fn clamp_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT)
}

/// Attach the session cookie when a token is configured.
///
/// The token travels in a header, never in the URL, so it cannot leak into
/// request logs.
pub(crate) fn apply_session_cookie(
    builder: reqwest::RequestBuilder,
    settings: &Settings,
) -> reqwest::RequestBuilder {
    match settings.api_token() {
        Some(token) => builder.header(COOKIE, format!("m_session_id={token}")),
        None => builder,
    }
}

/// Map a transport-level failure to a human-readable message.
///
/// Each failure class gets a distinct message so callers can tell a timeout,
/// a refused connection, and an unparseable body apart.
pub(crate) fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out: the ModelScope API did not respond within the configured deadline"
            .to_string()
    } else if err.is_connect() {
        format!("connection to the ModelScope API failed: {err}")
    } else if err.is_decode() {
        format!("invalid response body from the ModelScope API: {err}")
    } else {
        format!("request to the ModelScope API failed: {err}")
    }
}

/// Unwrap the PascalCase response envelope shared by the ModelScope APIs.
///
/// A false (or missing) `Success` discriminator is a hard failure carrying
/// the server-reported message, or the whole body when no message exists.
pub(crate) fn unwrap_envelope(body: Value) -> Result<Value> {
    let success = body
        .get("Success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !success {
        match body.get("Message").and_then(Value::as_str) {
            Some(message) => bail!("ModelScope API reported an error: {message}"),
            None => bail!("ModelScope API reported an error: {body}"),
        }
    }
    Ok(body.get("Data").cloned().unwrap_or(Value::Null))
}
