//! MCP tool descriptors for the five operations.

use crate::request::{Operation, Verb};
use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde_json::{Value, json};
use std::sync::Arc;

fn description(op: Operation) -> &'static str {
    match op {
        Operation::AnswerQuestion => {
            "Ask a natural language question to be answered using Denodo data."
        }
        Operation::AnswerDataQuestion => {
            "Ask a question specifically for querying data (forces data mode)."
        }
        Operation::AnswerMetadataQuestion => {
            "Ask a question specifically about metadata (forces metadata mode)."
        }
        Operation::SimilaritySearch => "Perform similarity search on previously stored metadata.",
        Operation::GetMetadata => {
            "Retrieve metadata from the specified VDP databases and optionally store it in the vector database."
        }
    }
}

fn credential_properties() -> [(&'static str, Value); 2] {
    [
        (
            "username",
            json!({
                "type": "string",
                "description": "Denodo username for authentication (optional)"
            }),
        ),
        (
            "password",
            json!({
                "type": "string",
                "description": "Denodo password for authentication (optional)"
            }),
        ),
    ]
}

fn question_property() -> Value {
    json!({
        "type": "string",
        "description": "The natural language question to be answered"
    })
}

fn plot_property() -> Value {
    json!({
        "type": "boolean",
        "default": false,
        "description": "Whether to generate a plot with the answer"
    })
}

fn use_views_property() -> Value {
    json!({
        "type": "string",
        "default": "",
        "description": "Specific views to use for the query, comma-separated (e.g. \"bank.loans, bank.customers\")"
    })
}

/// JSON Schema for an operation's arguments.
#[must_use]
pub fn input_schema(op: Operation) -> Value {
    let (mut properties, required): (serde_json::Map<String, Value>, &str) = match op {
        Operation::AnswerQuestion => (
            [
                ("question".to_string(), question_property()),
                ("plot".to_string(), plot_property()),
                (
                    "mode".to_string(),
                    json!({
                        "type": "string",
                        "enum": ["default", "data", "metadata"],
                        "default": "default",
                        "description": "Answering mode"
                    }),
                ),
                ("use_views".to_string(), use_views_property()),
                (
                    "custom_instructions".to_string(),
                    json!({
                        "type": "string",
                        "default": "",
                        "description": "Additional instructions for the LLM"
                    }),
                ),
            ]
            .into_iter()
            .collect(),
            "question",
        ),
        Operation::AnswerDataQuestion => (
            [
                ("question".to_string(), question_property()),
                ("plot".to_string(), plot_property()),
                ("use_views".to_string(), use_views_property()),
            ]
            .into_iter()
            .collect(),
            "question",
        ),
        Operation::AnswerMetadataQuestion => (
            [("question".to_string(), question_property())]
                .into_iter()
                .collect(),
            "question",
        ),
        Operation::SimilaritySearch => (
            [
                (
                    "query".to_string(),
                    json!({"type": "string", "description": "Search query"}),
                ),
                (
                    "n_results".to_string(),
                    json!({
                        "type": "integer",
                        "default": 5,
                        "description": "Number of results to return"
                    }),
                ),
            ]
            .into_iter()
            .collect(),
            "query",
        ),
        Operation::GetMetadata => (
            [
                (
                    "database_names".to_string(),
                    json!({
                        "type": "string",
                        "description": "Database name(s) to retrieve metadata for"
                    }),
                ),
                (
                    "insert".to_string(),
                    json!({
                        "type": "boolean",
                        "default": true,
                        "description": "Store metadata in the vector store"
                    }),
                ),
                (
                    "overwrite".to_string(),
                    json!({
                        "type": "boolean",
                        "default": true,
                        "description": "Overwrite existing vector store data"
                    }),
                ),
            ]
            .into_iter()
            .collect(),
            "database_names",
        ),
    };

    for (name, schema) in credential_properties() {
        properties.insert(name.to_string(), schema);
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": [required],
    })
}

/// Tool annotations derived from the operation's HTTP method.
///
/// `get_metadata` is a GET but writes to (and by default overwrites) the vector store.
#[must_use]
pub fn annotations(op: Operation) -> ToolAnnotations {
    let base = ToolAnnotations::new().open_world(true).destructive(false);
    if op == Operation::GetMetadata {
        return base.read_only(false).destructive(true).idempotent(true);
    }
    match op.spec().verb {
        Verb::Get => base.read_only(true).idempotent(true),
        Verb::Post => base.read_only(false).idempotent(false),
    }
}

#[must_use]
pub fn tool(op: Operation) -> Tool {
    let schema = input_schema(op)
        .as_object()
        .cloned()
        .unwrap_or_else(JsonObject::new);
    let mut tool = Tool::new(op.tool_name(), description(op), Arc::new(schema));
    tool.annotations = Some(annotations(op));
    tool
}

#[must_use]
pub fn list_tools() -> Vec<Tool> {
    Operation::ALL.into_iter().map(tool).collect()
}
