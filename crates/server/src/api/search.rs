//! Search calls: models, papers, and MCP servers.
//!
//! Pass-through by design: the remote service owns ranking and filtering
//! semantics, so parameters travel largely unmodified and result items come
//! back as loose JSON mappings. A non-200 status or a malformed body is a
//! hard failure, never an empty list, so callers can tell "zero matches"
//! from "search failed". Model items alone are normalized to stable
//! snake_case keys; paper and MCP-server items pass through verbatim.

use crate::api::{
    apply_session_cookie, clamp_limit, describe_transport_error, unwrap_envelope,
    USER_AGENT_VALUE,
};
use crate::settings::Settings;
use anyhow::{anyhow, bail, Result};
use reqwest::header::USER_AGENT;
use serde_json::{json, Map, Value};

/// Search ModelScope models by keyword.
pub async fn search_models(
    settings: &Settings,
    query: &str,
    task: Option<&str>,
    filters: &[String],
    support_inference: Option<bool>,
    sort: Option<&str>,
    limit: Option<u64>,
) -> Result<Vec<Map<String, Value>>> {
    let limit = clamp_limit(limit);

    let mut payload = json!({
        "Name": query,
        "PageNumber": 1,
        "PageSize": limit,
        "SortBy": sort.unwrap_or("Default"),
    });
    if let Some(task) = task {
        payload["Tasks"] = json!([task]);
    }
    if !filters.is_empty() {
        payload["Filters"] = json!(filters);
    }
    if let Some(support_inference) = support_inference {
        payload["SupportInference"] = json!(support_inference);
    }

    let client = reqwest::Client::new();
    let response = apply_session_cookie(
        client
            .post(settings.models_search_endpoint())
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(&payload)
            .timeout(settings.api_timeout),
        settings,
    )
    .send()
    .await
    .map_err(|e| anyhow!(describe_transport_error(&e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("model search failed: HTTP {status}: {body}");
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| anyhow!(describe_transport_error(&e)))?;
    let data = unwrap_envelope(body)?;

    let models = data
        .pointer("/Model/Models")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("unexpected model search response shape: {data}"))?;

    Ok(models.iter().map(normalize_model).collect())
}

/// Normalize a raw model item into the documented snake_case keys.
///
/// Values pass through verbatim; only the key names change, plus the
/// composite `id` assembled from the owner path and model name.
fn normalize_model(item: &Value) -> Map<String, Value> {
    let take = |key: &str| item.get(key).cloned().unwrap_or(Value::Null);

    let name = take("Name");
    let path = take("Path");
    let id = match (path.as_str(), name.as_str()) {
        (Some(path), Some(name)) => Value::String(format!("{path}/{name}")),
        _ => Value::Null,
    };

    let mut model = Map::new();
    model.insert("id".into(), id);
    model.insert("name".into(), name);
    model.insert("path".into(), path);
    model.insert("chinese_name".into(), take("ChineseName"));
    model.insert("created_by".into(), take("CreatedBy"));
    model.insert("downloads_count".into(), take("Downloads"));
    model.insert("stars_count".into(), take("Stars"));
    model.insert("created_at".into(), take("CreatedTime"));
    model.insert("updated_at".into(), take("LastUpdatedTime"));
    if let Some(support) = item.get("SupportInference") {
        model.insert("support_inference".into(), support.clone());
    }
    model
}

/// Search ModelScope papers by keyword.
pub async fn search_papers(
    settings: &Settings,
    query: &str,
    sort: Option<&str>,
    limit: Option<u64>,
) -> Result<Vec<Map<String, Value>>> {
    let limit = clamp_limit(limit);

    let client = reqwest::Client::new();
    let response = apply_session_cookie(
        client
            .get(settings.papers_search_endpoint())
            .query(&[
                ("Query", query),
                ("Sort", sort.unwrap_or("default")),
                ("PageNumber", "1"),
                ("PageSize", &limit.to_string()),
            ])
            .header(USER_AGENT, USER_AGENT_VALUE)
            .timeout(settings.api_timeout),
        settings,
    )
    .send()
    .await
    .map_err(|e| anyhow!(describe_transport_error(&e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("paper search failed: HTTP {status}: {body}");
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| anyhow!(describe_transport_error(&e)))?;
    let data = unwrap_envelope(body)?;

    collect_items(&data, "Papers", "paper search")
}

/// Search the MCP-server directory by keyword.
pub async fn search_mcp_servers(
    settings: &Settings,
    search: &str,
    category: Option<&str>,
    limit: Option<u64>,
) -> Result<Vec<Map<String, Value>>> {
    let limit = clamp_limit(limit);

    let mut payload = json!({
        "Search": search,
        "PageNumber": 1,
        "PageSize": limit,
    });
    if let Some(category) = category {
        payload["Category"] = json!(category);
    }

    let client = reqwest::Client::new();
    let response = apply_session_cookie(
        client
            .post(settings.mcp_servers_search_endpoint())
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(&payload)
            .timeout(settings.api_timeout),
        settings,
    )
    .send()
    .await
    .map_err(|e| anyhow!(describe_transport_error(&e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("MCP server search failed: HTTP {status}: {body}");
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| anyhow!(describe_transport_error(&e)))?;
    let data = unwrap_envelope(body)?;

    collect_items(&data, "McpServerList", "MCP server search")
}

/// Extract a list of mapping objects from the envelope data, verbatim.
fn collect_items(data: &Value, key: &str, context: &str) -> Result<Vec<Map<String, Value>>> {
    let items = data
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("unexpected {context} response shape: {data}"))?;

    items
        .iter()
        .map(|item| {
            item.as_object()
                .cloned()
                .ok_or_else(|| anyhow!("unexpected non-object item in {context} response"))
        })
        .collect()
}
