//! Response normalizers: [`BackendOutcome`] in, fixed-template text out.
//!
//! A missing or oddly-typed field never aborts rendering; it falls back to the placeholder
//! documented on each renderer.

use crate::transport::BackendOutcome;
use serde_json::Value;

pub const NO_RESPONSE: &str = "Failed to get a response";
pub const NO_ANSWER: &str = "No answer provided";
pub const NO_SQL_QUERY: &str = "No SQL query generated";
pub const NO_SEARCH_RESULTS: &str = "No results found or unable to perform similarity search.";

/// Success payload, or the final text for every non-success outcome.
fn payload(outcome: &BackendOutcome) -> Result<&Value, String> {
    match outcome {
        BackendOutcome::Success(v) => Ok(v),
        BackendOutcome::TransportFailure(msg) | BackendOutcome::BackendError(msg) => {
            Err(format!("Error: {msg}"))
        }
        BackendOutcome::EmptyResponse => Err(NO_RESPONSE.to_string()),
    }
}

/// Field as display text; `None` when absent or `null`.
fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `answer_question` / `answer_data_question`: Answer, SQL Query and Tables Used lines.
#[must_use]
pub fn render_answer(outcome: &BackendOutcome) -> String {
    let body = match payload(outcome) {
        Ok(v) => v,
        Err(text) => return text,
    };

    let answer = text_field(body, "answer").unwrap_or_else(|| NO_ANSWER.to_string());
    let sql_query = text_field(body, "sql_query")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_SQL_QUERY.to_string());
    let tables_used = match body.get("tables_used") {
        Some(Value::Array(tables)) if !tables.is_empty() => tables
            .iter()
            .map(display)
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(table)) if !table.is_empty() => table.clone(),
        _ => "None".to_string(),
    };

    format!("\nAnswer: {answer}\n\nSQL Query: {sql_query}\n\nTables Used: {tables_used}\n")
}

/// `answer_metadata_question`: a single `Answer:` line.
#[must_use]
pub fn render_metadata_answer(outcome: &BackendOutcome) -> String {
    match payload(outcome) {
        Ok(body) => format!(
            "Answer: {}",
            text_field(body, "answer").unwrap_or_else(|| NO_ANSWER.to_string())
        ),
        Err(text) => text,
    }
}

/// `similarity_search`: numbered list of matching tables with scores.
#[must_use]
pub fn render_similarity(outcome: &BackendOutcome) -> String {
    let body = match payload(outcome) {
        Ok(v) => v,
        Err(text) => return text,
    };

    let results: &[Value] = match body.get("results") {
        None | Some(Value::Null) => return NO_SEARCH_RESULTS.to_string(),
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => &[],
    };

    let entries: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let table_name = text_field(item, "table_name").unwrap_or_else(|| "Unknown".into());
            let score = item.get("score").and_then(Value::as_f64).unwrap_or(0.0);
            let description = text_field(item, "description")
                .unwrap_or_else(|| "No description available".into());
            format!(
                "{}. Table: {table_name}\n   Score: {score:.4}\n   Description: {description}",
                i + 1
            )
        })
        .collect();

    format!("Search Results:\n\n{}", entries.join("\n\n"))
}

/// `get_metadata`: one sentence with the table count and database names.
///
/// `requested` is the caller's `database_names` argument, reported when the backend does not
/// name any database itself.
#[must_use]
pub fn render_metadata(outcome: &BackendOutcome, requested: &str) -> String {
    let body = match payload(outcome) {
        Ok(v) => v,
        Err(text) => return text,
    };

    let mut tables_count = 0usize;
    let mut databases: Vec<String> = Vec::new();
    if let Some(entries) = body.get("db_schema_json").and_then(Value::as_array) {
        for db in entries {
            databases.push(text_field(db, "databaseName").unwrap_or_else(|| "Unknown".into()));
            tables_count += db
                .get("databaseTables")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
        }
    }

    let databases = if databases.is_empty() {
        requested.to_string()
    } else {
        databases.join(", ")
    };

    format!(
        "Successfully retrieved metadata for {tables_count} tables from database(s): {databases}."
    )
}
