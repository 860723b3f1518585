//! MCP tool schema definitions for the ModelScope server.
//!
//! This module contains the JSON schema definitions for all MCP tools,
//! organized into logical groups:
//!
//! - Context tools: current user and environment information
//! - Search tools: models, papers, and MCP servers
//! - AIGC tools: image generation

use rmcp::model::{Tool, ToolAnnotations};
use serde_json::{json, Map as JsonMap};
use std::sync::Arc;

/// Returns an empty object schema for parameterless tools.
///
/// Some MCP clients reject an `input_schema` without an explicit JSON
/// Schema "type", so parameterless tools declare an empty object.
pub(crate) fn empty_schema() -> Arc<JsonMap<String, serde_json::Value>> {
    let mut schema = JsonMap::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), json!({}));
    schema.insert("additionalProperties".into(), json!(false));
    Arc::new(schema)
}

fn object_schema(
    properties: serde_json::Value,
    required: &[&str],
) -> Arc<JsonMap<String, serde_json::Value>> {
    let mut schema = JsonMap::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), properties);
    if !required.is_empty() {
        schema.insert("required".into(), json!(required));
    }
    schema.insert("additionalProperties".into(), json!(false));
    Arc::new(schema)
}

/// Annotations for tools that only read remote state.
fn read_only() -> ToolAnnotations {
    ToolAnnotations {
        read_only_hint: Some(true),
        open_world_hint: Some(true),
        ..Default::default()
    }
}

/// Annotations for tools with an external effect.
fn open_world() -> ToolAnnotations {
    ToolAnnotations {
        open_world_hint: Some(true),
        ..Default::default()
    }
}

/// Returns context-related tools.
///
/// Tools: get_current_user, get_environment_info
pub(crate) fn context_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "get_current_user".into(),
            title: Some("Get Current User".into()),
            description: Some(
                "Get current authenticated user information from ModelScope. Use this when a \
                 request is about the user's own profile, or when information is missing to \
                 build other tool calls."
                    .into(),
            ),
            input_schema: empty_schema(),
            output_schema: None,
            annotations: Some(read_only()),
            icons: None,
            meta: None,
        },
        Tool {
            name: "get_environment_info".into(),
            title: Some("Get Environment Info".into()),
            description: Some(
                "Get version information for the server, the MCP framework, the MCP protocol, \
                 and the Rust toolchain. Useful for debugging and compatibility checking."
                    .into(),
            ),
            input_schema: empty_schema(),
            output_schema: None,
            annotations: Some(read_only()),
            icons: None,
            meta: None,
        },
    ]
}

/// Returns search tools.
///
/// Tools: search_models, search_papers, search_mcp_servers
pub(crate) fn search_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "search_models".into(),
            title: Some("Search Models".into()),
            description: Some(
                "Search ModelScope models by keyword, with optional task, filter, sort, and \
                 inference-support constraints. Returns raw model records."
                    .into(),
            ),
            input_schema: object_schema(
                json!({
                    "query": {
                        "type": "string",
                        "description": "Keyword to search models by"
                    },
                    "task": {
                        "type": "string",
                        "description": "Task category filter, e.g. 'text-to-image' or 'text-generation'"
                    },
                    "filters": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Additional filter labels, passed through to the search backend"
                    },
                    "support_inference": {
                        "type": "boolean",
                        "description": "Only return models usable via the inference API"
                    },
                    "sort": {
                        "type": "string",
                        "description": "Sort key, e.g. 'Default', 'DownloadsCount', or 'StarsCount'",
                        "default": "Default"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results (1-100)",
                        "default": 10,
                        "maximum": 100
                    }
                }),
                &["query"],
            ),
            output_schema: None,
            annotations: Some(read_only()),
            icons: None,
            meta: None,
        },
        Tool {
            name: "search_papers".into(),
            title: Some("Search Papers".into()),
            description: Some(
                "Search ModelScope papers by keyword. Returns raw paper records.".into(),
            ),
            input_schema: object_schema(
                json!({
                    "query": {
                        "type": "string",
                        "description": "Keyword to search papers by"
                    },
                    "sort": {
                        "type": "string",
                        "description": "Sort key, e.g. 'default', 'hot', or 'recommend'",
                        "default": "default"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results (1-100)",
                        "default": 10,
                        "maximum": 100
                    }
                }),
                &["query"],
            ),
            output_schema: None,
            annotations: Some(read_only()),
            icons: None,
            meta: None,
        },
        Tool {
            name: "search_mcp_servers".into(),
            title: Some("Search MCP Servers".into()),
            description: Some(
                "Search the ModelScope MCP-server directory by keyword, optionally narrowed to \
                 a category. Returns raw server records."
                    .into(),
            ),
            input_schema: object_schema(
                json!({
                    "search": {
                        "type": "string",
                        "description": "Keyword to search MCP servers by"
                    },
                    "category": {
                        "type": "string",
                        "description": "Server category, e.g. 'developer-tools' or 'search'"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results (1-100)",
                        "default": 10,
                        "maximum": 100
                    }
                }),
                &["search"],
            ),
            output_schema: None,
            annotations: Some(read_only()),
            icons: None,
            meta: None,
        },
    ]
}

/// Returns AIGC tools.
///
/// Tools: generate_image
pub(crate) fn aigc_tools() -> Vec<Tool> {
    vec![Tool {
        name: "generate_image".into(),
        title: Some("Generate Image".into()),
        description: Some(
            "Generate an image from a text prompt using the ModelScope inference API and \
             return its URL."
                .into(),
        ),
        input_schema: object_schema(
            json!({
                "prompt": {
                    "type": "string",
                    "description": "Description of the image to be generated, containing the desired elements and visual features"
                },
                "model": {
                    "type": "string",
                    "description": "Model id to use for generation; defaults to the configured default model"
                }
            }),
            &["prompt"],
        ),
        output_schema: None,
        annotations: Some(open_world()),
        icons: None,
        meta: None,
    }]
}

/// Full tool catalog, in registration order.
pub fn all_tools() -> Vec<Tool> {
    let mut tools = context_tools();
    tools.extend(search_tools());
    tools.extend(aigc_tools());
    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_every_tool_once_in_registration_order() {
        let names: Vec<_> = all_tools().iter().map(|t| t.name.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "get_current_user",
                "get_environment_info",
                "search_models",
                "search_papers",
                "search_mcp_servers",
                "generate_image",
            ]
        );
    }

    #[test]
    fn read_only_tools_are_annotated_as_such() {
        for tool in all_tools() {
            let annotations = tool.annotations.expect("every tool carries annotations");
            if tool.name == "generate_image" {
                assert_ne!(
                    annotations.read_only_hint,
                    Some(true),
                    "generate_image has an external effect"
                );
            } else {
                assert_eq!(
                    annotations.read_only_hint,
                    Some(true),
                    "{} only reads remote state",
                    tool.name
                );
            }
            assert_eq!(annotations.open_world_hint, Some(true));
        }
    }

    #[test]
    fn every_schema_declares_an_object_type() {
        for tool in all_tools() {
            assert_eq!(
                tool.input_schema.get("type"),
                Some(&json!("object")),
                "schema for {} must be an object",
                tool.name
            );
            assert!(
                tool.input_schema.contains_key("properties"),
                "schema for {} must declare properties",
                tool.name
            );
        }
    }

    #[test]
    fn required_fields_match_the_tool_contracts() {
        let required_of = |name: &str| -> Vec<String> {
            all_tools()
                .into_iter()
                .find(|t| t.name == name)
                .unwrap()
                .input_schema
                .get("required")
                .and_then(|r| r.as_array().cloned())
                .unwrap_or_default()
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        };

        assert!(required_of("get_current_user").is_empty());
        assert!(required_of("get_environment_info").is_empty());
        assert_eq!(required_of("search_models"), vec!["query"]);
        assert_eq!(required_of("search_papers"), vec!["query"]);
        assert_eq!(required_of("search_mcp_servers"), vec!["search"]);
        assert_eq!(required_of("generate_image"), vec!["prompt"]);
    }

    #[test]
    fn schemas_reject_additional_properties() {
        for tool in all_tools() {
            assert_eq!(
                tool.input_schema.get("additionalProperties"),
                Some(&json!(false)),
                "schema for {} should close its property set",
                tool.name
            );
        }
    }

    #[test]
    fn every_property_carries_a_description() {
        for tool in all_tools() {
            let properties = tool
                .input_schema
                .get("properties")
                .and_then(|p| p.as_object())
                .unwrap();
            for (field, schema) in properties {
                assert!(
                    schema.get("description").is_some(),
                    "property {field} of {} lacks a description",
                    tool.name
                );
            }
        }
    }
}
