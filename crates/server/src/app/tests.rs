//! Tests for the app module.
//!
//! These tests exercise the service-level dispatch path that the MCP
//! handler routes through: argument extraction, middleware behavior, and
//! the structured results each tool produces.

use super::*;
use anyhow::anyhow;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn args(value: serde_json::Value) -> JsonMap<String, Value> {
    value.as_object().cloned().unwrap()
}

fn service_with(settings: Settings) -> ModelScopeService {
    ModelScopeService::new(settings)
}

#[tokio::test]
async fn unknown_tool_is_an_error() {
    let service = service_with(Settings::default());
    let err = service
        .dispatch_tool("no-such-tool", JsonMap::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unknown tool no-such-tool"));
}

#[tokio::test]
async fn rate_limit_rejects_excess_calls_before_any_work() {
    let server = MockServer::start().await;
    let settings = Settings {
        api_base_url: server.uri(),
        ..Default::default()
    };
    let service = ModelScopeService::with_options(settings, 2, false);

    // Two parameterless environment-info calls fit in the window.
    service
        .dispatch_tool("get_environment_info", JsonMap::new())
        .await
        .unwrap();
    service
        .dispatch_tool("get_environment_info", JsonMap::new())
        .await
        .unwrap();

    // The third is rejected, and a network-backed tool never reaches the
    // mock server.
    let err = service
        .dispatch_tool("get_current_user", JsonMap::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("rate limit exceeded"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn environment_info_tool_reports_versions() {
    let service = service_with(Settings::default());
    let result = service
        .dispatch_tool("get_environment_info", JsonMap::new())
        .await
        .unwrap();

    let structured = result.structured_content.unwrap();
    assert!(structured["server_version"].as_str().is_some_and(|v| !v.is_empty()));
    assert!(structured["rmcp_version"].as_str().is_some_and(|v| !v.is_empty()));
    assert!(structured["mcp_protocol_version"]
        .as_str()
        .is_some_and(|v| !v.is_empty()));
    assert!(structured["rust_version"].as_str().is_some_and(|v| !v.is_empty()));
    assert_eq!(result.is_error, Some(false));
}

#[tokio::test]
async fn current_user_tool_maps_an_authenticated_profile() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/login/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Success": true,
            "Data": { "Name": "tester", "Email": "tester@example.com" }
        })))
        .mount(&server)
        .await;

    let service = service_with(Settings {
        api_token: Some("valid-token".to_string()),
        api_base_url: server.uri(),
        ..Default::default()
    });

    let result = service
        .dispatch_tool("get_current_user", JsonMap::new())
        .await
        .unwrap();

    let structured = result.structured_content.unwrap();
    assert_eq!(structured["authenticated"], json!(true));
    assert_eq!(structured["username"], json!("tester"));
    assert!(structured["reason"].is_null());
}

#[tokio::test]
async fn current_user_tool_without_token_is_a_soft_result() {
    let service = service_with(Settings::default());

    let result = service
        .dispatch_tool("get_current_user", JsonMap::new())
        .await
        .unwrap();

    let structured = result.structured_content.unwrap();
    assert_eq!(structured["authenticated"], json!(false));
    assert!(structured["reason"]
        .as_str()
        .unwrap()
        .contains("MODELSCOPE_API_TOKEN is not set"));
}

#[tokio::test]
async fn current_user_tool_surfaces_infrastructure_failures_as_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/login/info"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let service = service_with(Settings {
        api_token: Some("valid-token".to_string()),
        api_base_url: server.uri(),
        ..Default::default()
    });

    let err = service
        .dispatch_tool("get_current_user", JsonMap::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn search_models_tool_requires_a_query() {
    let service = service_with(Settings::default());
    let err = service
        .dispatch_tool("search_models", JsonMap::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("query parameter is required"));
}

#[tokio::test]
async fn search_mcp_servers_tool_requires_a_search_keyword() {
    let service = service_with(Settings::default());
    let err = service
        .dispatch_tool("search_mcp_servers", JsonMap::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("search parameter is required"));
}

#[tokio::test]
async fn search_models_tool_returns_the_list_in_both_views() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dolphin/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Success": true,
            "Data": { "Model": { "Models": [{
                "Name": "FLUX.1-dev",
                "Path": "black-forest-labs",
                "ChineseName": "",
                "CreatedBy": "black-forest-labs",
                "Downloads": 1,
                "Stars": 2,
                "CreatedTime": 3,
                "LastUpdatedTime": 4
            }] } }
        })))
        .mount(&server)
        .await;

    let service = service_with(Settings {
        api_base_url: server.uri(),
        ..Default::default()
    });

    let result = service
        .dispatch_tool(
            "search_models",
            args(json!({"query": "flux", "task": "text-to-image", "limit": 2})),
        )
        .await
        .unwrap();

    let structured = result.structured_content.unwrap();
    assert_eq!(structured["count"], json!(1));
    assert_eq!(
        structured["models"][0]["id"],
        json!("black-forest-labs/FLUX.1-dev")
    );

    // The text content is the same records, rendered as JSON.
    let text = result.content[0].as_text().unwrap().text.clone();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[0]["name"], json!("FLUX.1-dev"));
}

#[tokio::test]
async fn generate_image_tool_with_empty_prompt_is_a_soft_failure() {
    let server = MockServer::start().await;
    let service = service_with(Settings {
        api_token: Some("tok".to_string()),
        api_inference_base_url: server.uri(),
        ..Default::default()
    });

    let result = service
        .dispatch_tool("generate_image", args(json!({"prompt": ""})))
        .await
        .unwrap();

    let structured = result.structured_content.unwrap();
    assert_eq!(structured["success"], json!(false));
    assert!(structured["error"].as_str().unwrap().contains("prompt"));
    assert!(structured["model_used"].is_null());
    assert!(structured["image_url"].is_null());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn generate_image_tool_with_missing_prompt_takes_the_same_soft_path() {
    let service = service_with(Settings {
        api_token: Some("tok".to_string()),
        ..Default::default()
    });

    let result = service
        .dispatch_tool("generate_image", JsonMap::new())
        .await
        .unwrap();

    let structured = result.structured_content.unwrap();
    assert_eq!(structured["success"], json!(false));
    assert!(structured["error"].as_str().unwrap().contains("prompt"));
}

#[tokio::test]
async fn generate_image_tool_resolves_the_default_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [{ "url": "https://img.example/out.png" }]
        })))
        .mount(&server)
        .await;

    let service = service_with(Settings {
        api_token: Some("tok".to_string()),
        api_inference_base_url: server.uri(),
        default_image_generation_model: "default-org/default-model".to_string(),
        ..Default::default()
    });

    let result = service
        .dispatch_tool("generate_image", args(json!({"prompt": "a lighthouse"})))
        .await
        .unwrap();

    let structured = result.structured_content.unwrap();
    assert_eq!(structured["success"], json!(true));
    assert_eq!(structured["model_used"], json!("default-org/default-model"));
    assert_eq!(structured["image_url"], json!("https://img.example/out.png"));
}

#[tokio::test]
async fn repeated_searches_have_structurally_identical_shapes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dolphin/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Success": true,
            "Data": { "Model": { "Models": [{
                "Name": "FLUX.1-dev",
                "Path": "black-forest-labs",
                "ChineseName": "",
                "CreatedBy": "black-forest-labs",
                "Downloads": 1,
                "Stars": 2,
                "CreatedTime": 3,
                "LastUpdatedTime": 4
            }] } }
        })))
        .mount(&server)
        .await;

    let service = service_with(Settings {
        api_base_url: server.uri(),
        ..Default::default()
    });

    let call = || async {
        service
            .dispatch_tool("search_models", args(json!({"query": "flux"})))
            .await
            .unwrap()
            .structured_content
            .unwrap()
    };

    let first = call().await;
    let second = call().await;

    let keys = |v: &Value| -> Vec<String> {
        v["models"][0]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect()
    };
    assert_eq!(keys(&first), keys(&second));
}

#[test]
fn translate_error_includes_the_chain_only_when_enabled() {
    let terse = ModelScopeService::with_options(Settings::default(), 10, false);
    let verbose = ModelScopeService::with_options(Settings::default(), 10, true);

    let build_err = || anyhow!("root cause").context("outer context");

    let terse_msg = terse.translate_error(build_err()).message;
    let verbose_msg = verbose.translate_error(build_err()).message;

    assert!(terse_msg.contains("outer context"));
    assert!(!terse_msg.contains("root cause"));
    assert!(verbose_msg.contains("outer context"));
    assert!(verbose_msg.contains("root cause"));
}

#[tokio::test]
async fn rate_limiter_window_recovers_over_time() {
    let service = ModelScopeService::with_options(Settings::default(), 1, false);
    // Shrink the wait by using the limiter directly once dispatch has
    // consumed the single slot.
    service
        .dispatch_tool("get_environment_info", JsonMap::new())
        .await
        .unwrap();
    assert!(service
        .dispatch_tool("get_environment_info", JsonMap::new())
        .await
        .is_err());

    tokio::time::sleep(Duration::from_millis(1_050)).await;
    assert!(service
        .dispatch_tool("get_environment_info", JsonMap::new())
        .await
        .is_ok());
}
