//! Typed parameter sets for the five operations.
//!
//! Each struct deserializes from tool-call arguments (missing optional fields take the same
//! defaults the tool descriptors advertise) and serializes into the argument map consumed by
//! [`crate::request::build_request`]. `username` / `password` are never serialized; they are
//! resolved against the configured defaults instead.

use crate::request::Operation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Common surface the request builder needs from a parameter set.
pub trait OperationParams: Serialize {
    const OPERATION: Operation;

    fn username(&self) -> Option<&str>;

    fn password(&self) -> Option<&str>;

    /// Wire-facing arguments keyed by parameter name.
    fn arguments(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

macro_rules! impl_operation_params {
    ($ty:ty, $op:expr) => {
        impl OperationParams for $ty {
            const OPERATION: Operation = $op;

            fn username(&self) -> Option<&str> {
                self.username.as_deref()
            }

            fn password(&self) -> Option<&str> {
                self.password.as_deref()
            }
        }
    };
}

fn default_mode() -> String {
    "default".to_string()
}

fn default_n_results() -> i64 {
    5
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerQuestionParams {
    pub question: String,
    #[serde(default, skip_serializing)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub plot: bool,
    /// One of `default`, `data` or `metadata`; passed through unchecked.
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Comma-separated view names, e.g. `bank.loans, bank.customers`.
    #[serde(default)]
    pub use_views: String,
    #[serde(default)]
    pub custom_instructions: String,
}

impl AnswerQuestionParams {
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            username: None,
            password: None,
            plot: false,
            mode: default_mode(),
            use_views: String::new(),
            custom_instructions: String::new(),
        }
    }
}

impl_operation_params!(AnswerQuestionParams, Operation::AnswerQuestion);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerDataQuestionParams {
    pub question: String,
    #[serde(default, skip_serializing)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub plot: bool,
    #[serde(default)]
    pub use_views: String,
}

impl AnswerDataQuestionParams {
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            username: None,
            password: None,
            plot: false,
            use_views: String::new(),
        }
    }
}

impl_operation_params!(AnswerDataQuestionParams, Operation::AnswerDataQuestion);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerMetadataQuestionParams {
    pub question: String,
    #[serde(default, skip_serializing)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl AnswerMetadataQuestionParams {
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            username: None,
            password: None,
        }
    }
}

impl_operation_params!(
    AnswerMetadataQuestionParams,
    Operation::AnswerMetadataQuestion
);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimilaritySearchParams {
    pub query: String,
    #[serde(default = "default_n_results")]
    pub n_results: i64,
    #[serde(default, skip_serializing)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl SimilaritySearchParams {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            n_results: default_n_results(),
            username: None,
            password: None,
        }
    }
}

impl_operation_params!(SimilaritySearchParams, Operation::SimilaritySearch);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetMetadataParams {
    /// Database name(s) as given by the caller; also the fallback label in the summary.
    pub database_names: String,
    /// Store the retrieved metadata in the backend's vector store.
    #[serde(default = "default_true")]
    pub insert: bool,
    #[serde(default = "default_true")]
    pub overwrite: bool,
    #[serde(default, skip_serializing)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl GetMetadataParams {
    #[must_use]
    pub fn new(database_names: impl Into<String>) -> Self {
        Self {
            database_names: database_names.into(),
            insert: true,
            overwrite: true,
            username: None,
            password: None,
        }
    }
}

impl_operation_params!(GetMetadataParams, Operation::GetMetadata);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_optional_arguments_take_defaults() {
        let p: AnswerQuestionParams =
            serde_json::from_value(json!({"question": "q"})).expect("parse");
        assert_eq!(p, AnswerQuestionParams::new("q"));

        let p: SimilaritySearchParams =
            serde_json::from_value(json!({"query": "churn"})).expect("parse");
        assert_eq!(p.n_results, 5);

        let p: GetMetadataParams =
            serde_json::from_value(json!({"database_names": "bank"})).expect("parse");
        assert!(p.insert && p.overwrite);
    }

    #[test]
    fn missing_required_argument_is_rejected() {
        let err = serde_json::from_value::<AnswerMetadataQuestionParams>(json!({}));
        assert!(err.is_err());
    }

    #[test]
    fn credentials_never_reach_the_argument_map() {
        let p: AnswerMetadataQuestionParams = serde_json::from_value(json!({
            "question": "q",
            "username": "admin",
            "password": "secret",
        }))
        .expect("parse");
        assert_eq!(p.username(), Some("admin"));

        let args = p.arguments();
        assert!(!args.contains_key("username"));
        assert!(!args.contains_key("password"));
        assert_eq!(args.get("question"), Some(&json!("q")));
    }
}
