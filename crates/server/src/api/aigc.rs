//! Text-to-image generation against the ModelScope inference API.

use crate::api::{describe_transport_error, USER_AGENT_VALUE};
use crate::settings::{Settings, ENV_API_TOKEN};
use crate::types::ImageGenerationResult;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Generate an image from a text prompt.
///
/// This function never fails: every validation failure, HTTP status, and
/// transport failure class maps to an [`ImageGenerationResult`] with a
/// distinct human-readable `error`. Validation runs prompt, then model,
/// then credential; the first failing check returns before any network
/// traffic. Generation is slow, so the request runs under the long
/// configured timeout rather than the short lookup bound.
pub async fn generate_image(
    settings: &Settings,
    prompt: &str,
    model: Option<&str>,
) -> ImageGenerationResult {
    // Resolve the model up front so an explicitly blank argument and a
    // blank configured default are reported the same way.
    let model = match model.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m.to_string(),
        None => settings.default_image_generation_model.trim().to_string(),
    };

    if prompt.trim().is_empty() {
        return ImageGenerationResult::failed("prompt must not be empty");
    }
    if model.is_empty() {
        return ImageGenerationResult::failed("model name must not be empty");
    }
    let Some(token) = settings.api_token() else {
        return ImageGenerationResult::failed(format!("{ENV_API_TOKEN} is not set"));
    };

    tracing::info!(
        target: "modelscope::aigc",
        %model,
        "sending image generation request"
    );

    let payload = json!({ "model": model, "prompt": prompt });
    let client = reqwest::Client::new();
    let response = match client
        .post(settings.images_endpoint())
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(USER_AGENT, USER_AGENT_VALUE)
        .json(&payload)
        .timeout(settings.image_generation_timeout)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return ImageGenerationResult::failed(describe_transport_error(&e)),
    };

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        return ImageGenerationResult::failed(format!("HTTP {} - {}", status.as_u16(), body));
    }

    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => return ImageGenerationResult::failed(describe_transport_error(&e)),
    };

    let first_url = body
        .get("images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .and_then(|image| image.get("url"))
        .and_then(Value::as_str);

    match first_url {
        Some(url) => {
            tracing::info!(target: "modelscope::aigc", image_url = %url, "image generated");
            ImageGenerationResult::generated(model, url)
        }
        // Keep the whole body: the only way to diagnose a 200 without images.
        None => ImageGenerationResult::failed(format!("no image URL in response - {body}")),
    }
}
