//! The operation facade.
//!
//! Each operation is `build request -> send -> normalize` and always returns text. Backend
//! failures come back as `Error: ...` strings, never as Rust errors.

use crate::catalog;
use crate::config::{AdapterConfig, DefaultCredentials};
use crate::error::{QueryToolsError, Result};
use crate::normalize;
use crate::params::{
    AnswerDataQuestionParams, AnswerMetadataQuestionParams, AnswerQuestionParams,
    GetMetadataParams, OperationParams, SimilaritySearchParams,
};
use crate::request::{Operation, build_request};
use crate::transport::{BackendOutcome, HttpTransport, Transport};
use rmcp::model::{CallToolResult, Content, Tool};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Entry point for the five Denodo AI SDK operations.
///
/// Cheap to clone and safe to share across tasks; the only state is read-only configuration.
#[derive(Clone)]
pub struct QueryTools {
    inner: Arc<QueryToolsInner>,
}

struct QueryToolsInner {
    transport: Arc<dyn Transport>,
    defaults: DefaultCredentials,
}

impl QueryTools {
    /// Build the facade with an HTTP transport from static config.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or timeout is invalid, or the HTTP client cannot be
    /// built.
    pub fn new(config: &AdapterConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.parsed_base_url()?, config.timeout()?)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config.default_credentials(),
        ))
    }

    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, defaults: DefaultCredentials) -> Self {
        Self {
            inner: Arc::new(QueryToolsInner {
                transport,
                defaults,
            }),
        }
    }

    async fn dispatch<P: OperationParams>(&self, params: &P) -> BackendOutcome {
        let credentials = self
            .inner
            .defaults
            .resolve(params.username(), params.password());
        let request = build_request(params, credentials);
        self.inner.transport.send(&request).await
    }

    pub async fn answer_question(&self, params: &AnswerQuestionParams) -> String {
        normalize::render_answer(&self.dispatch(params).await)
    }

    pub async fn answer_data_question(&self, params: &AnswerDataQuestionParams) -> String {
        normalize::render_answer(&self.dispatch(params).await)
    }

    pub async fn answer_metadata_question(&self, params: &AnswerMetadataQuestionParams) -> String {
        normalize::render_metadata_answer(&self.dispatch(params).await)
    }

    pub async fn similarity_search(&self, params: &SimilaritySearchParams) -> String {
        normalize::render_similarity(&self.dispatch(params).await)
    }

    pub async fn get_metadata(&self, params: &GetMetadataParams) -> String {
        normalize::render_metadata(&self.dispatch(params).await, &params.database_names)
    }

    /// List the MCP `Tool`s exposed by this facade.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        catalog::list_tools()
    }

    /// Run one operation by tool name with JSON arguments.
    ///
    /// Backend failures are successful tool results whose text starts with `Error: `.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool name is unknown or the arguments do not match the
    /// operation's parameters.
    pub async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<CallToolResult> {
        let text = self.call_tool_text(tool_name, arguments).await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Like [`QueryTools::call_tool`], returning the bare text.
    ///
    /// # Errors
    ///
    /// See [`QueryTools::call_tool`].
    pub async fn call_tool_text(&self, tool_name: &str, arguments: Value) -> Result<String> {
        let op = Operation::from_tool_name(tool_name)
            .ok_or_else(|| QueryToolsError::UnknownTool(tool_name.to_string()))?;
        let arguments = match arguments {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };

        let text = match op {
            Operation::AnswerQuestion => self.answer_question(&parse(op, arguments)?).await,
            Operation::AnswerDataQuestion => {
                self.answer_data_question(&parse(op, arguments)?).await
            }
            Operation::AnswerMetadataQuestion => {
                self.answer_metadata_question(&parse(op, arguments)?).await
            }
            Operation::SimilaritySearch => self.similarity_search(&parse(op, arguments)?).await,
            Operation::GetMetadata => self.get_metadata(&parse(op, arguments)?).await,
        };
        Ok(text)
    }
}

fn parse<P: DeserializeOwned>(op: Operation, arguments: Value) -> Result<P> {
    serde_json::from_value(arguments).map_err(|e| QueryToolsError::InvalidArguments {
        tool: op.tool_name().to_string(),
        message: e.to_string(),
    })
}
