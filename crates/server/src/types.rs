//! Fixed-shape result records returned by the ModelScope tools.
//!
//! Every tool returns one of these records (or a pass-through list of JSON
//! mappings); the records never carry errors as exceptions. Optional fields
//! serialize as explicit `null` so callers always see the full shape.

use serde::{Deserialize, Serialize};

/// Outcome of a current-user lookup.
///
/// Exactly one of the two sides is populated: `reason` when not
/// authenticated, the profile fields when authenticated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub authenticated: bool,
    /// Why the user is not authenticated; `None` when authenticated.
    pub reason: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub description: Option<String>,
}

impl UserInfo {
    /// An unauthenticated result with a human-readable reason.
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            reason: Some(reason.into()),
            username: None,
            email: None,
            avatar_url: None,
            description: None,
        }
    }
}

/// Outcome of a text-to-image generation call.
///
/// `success == true` implies `model_used` and `image_url` are present and
/// `error` is absent; `success == false` implies the reverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationResult {
    pub success: bool,
    pub model_used: Option<String>,
    pub image_url: Option<String>,
    pub error: Option<String>,
}

impl ImageGenerationResult {
    /// A successful generation result.
    pub fn generated(model_used: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            success: true,
            model_used: Some(model_used.into()),
            image_url: Some(image_url.into()),
            error: None,
        }
    }

    /// A failed generation result with a human-readable error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            model_used: None,
            image_url: None,
            error: Some(error.into()),
        }
    }
}

/// Read-only snapshot of the server's version environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub server_version: String,
    pub rmcp_version: String,
    pub mcp_protocol_version: String,
    pub rust_version: String,
}
