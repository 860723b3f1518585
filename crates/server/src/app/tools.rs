//! Tool handler implementations for `ModelScopeService`.
//!
//! Each handler extracts its arguments from the loose JSON map the hosting
//! framework hands over, delegates to the matching client call, and wraps
//! the outcome in a `CallToolResult` with both a text rendering and the
//! structured record.

use super::ModelScopeService;
use crate::api;
use crate::metadata;
use anyhow::{anyhow, Result};
use rmcp::model::{CallToolResult, Content};
use serde_json::{json, Map as JsonMap, Value};

fn required_str<'a>(args: &'a JsonMap<String, Value>, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("{key} parameter is required"))
}

fn ok_result(text: String, structured: Value) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: Some(structured),
        is_error: Some(false),
        meta: None,
    }
}

impl ModelScopeService {
    pub(crate) async fn get_current_user_tool(&self) -> Result<CallToolResult> {
        let user = api::fetch_current_user(&self.settings).await?;

        let text = if user.authenticated {
            format!(
                "authenticated as {}",
                user.username.as_deref().unwrap_or("<unknown>")
            )
        } else {
            format!(
                "not authenticated: {}",
                user.reason.as_deref().unwrap_or("unknown reason")
            )
        };

        Ok(ok_result(text, serde_json::to_value(&user)?))
    }

    pub(crate) fn get_environment_info_tool(&self) -> Result<CallToolResult> {
        let info = metadata::environment_info();
        Ok(ok_result(
            format!("modelscope-mcp-server v{}", info.server_version),
            serde_json::to_value(&info)?,
        ))
    }

    pub(crate) async fn search_models_tool(
        &self,
        args: &JsonMap<String, Value>,
    ) -> Result<CallToolResult> {
        let query = required_str(args, "query")?;
        let task = args.get("task").and_then(Value::as_str);
        let filters: Vec<String> = args
            .get("filters")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let support_inference = args.get("support_inference").and_then(Value::as_bool);
        let sort = args.get("sort").and_then(Value::as_str);
        let limit = args.get("limit").and_then(Value::as_u64);

        let models = api::search_models(
            &self.settings,
            query,
            task,
            &filters,
            support_inference,
            sort,
            limit,
        )
        .await?;

        let count = models.len();
        // The text payload is the verbatim result list, like the
        // structured side; both views carry the same records.
        let text = serde_json::to_string(&models)?;
        Ok(ok_result(
            text,
            json!({ "models": models, "count": count }),
        ))
    }

    pub(crate) async fn search_papers_tool(
        &self,
        args: &JsonMap<String, Value>,
    ) -> Result<CallToolResult> {
        let query = required_str(args, "query")?;
        let sort = args.get("sort").and_then(Value::as_str);
        let limit = args.get("limit").and_then(Value::as_u64);

        let papers = api::search_papers(&self.settings, query, sort, limit).await?;

        let count = papers.len();
        let text = serde_json::to_string(&papers)?;
        Ok(ok_result(
            text,
            json!({ "papers": papers, "count": count }),
        ))
    }

    pub(crate) async fn search_mcp_servers_tool(
        &self,
        args: &JsonMap<String, Value>,
    ) -> Result<CallToolResult> {
        let search = required_str(args, "search")?;
        let category = args.get("category").and_then(Value::as_str);
        let limit = args.get("limit").and_then(Value::as_u64);

        let servers = api::search_mcp_servers(&self.settings, search, category, limit).await?;

        let count = servers.len();
        let text = serde_json::to_string(&servers)?;
        Ok(ok_result(
            text,
            json!({ "servers": servers, "count": count }),
        ))
    }

    pub(crate) async fn generate_image_tool(
        &self,
        args: &JsonMap<String, Value>,
    ) -> Result<CallToolResult> {
        // A missing prompt takes the same soft path as an empty one.
        let prompt = args.get("prompt").and_then(Value::as_str).unwrap_or_default();
        let model = args.get("model").and_then(Value::as_str);

        let result = api::generate_image(&self.settings, prompt, model).await;

        let text = if result.success {
            result.image_url.clone().unwrap_or_default()
        } else {
            format!(
                "image generation failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            )
        };

        Ok(ok_result(text, serde_json::to_value(&result)?))
    }
}
