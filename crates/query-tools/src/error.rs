//! Error types for the query tools.
//!
//! These cover construction and tool dispatch only. Backend failures never surface here; they
//! are rendered as text by the normalizers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryToolsError {
    /// Invalid base URL, timeout, or config file.
    #[error("config error: {0}")]
    Config(String),

    /// The tool host asked for a tool this crate does not expose.
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// Tool arguments did not match the operation's parameter set.
    #[error("invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },
}

pub type Result<T> = std::result::Result<T, QueryToolsError>;

impl From<reqwest::Error> for QueryToolsError {
    fn from(value: reqwest::Error) -> Self {
        Self::Config(format!("failed to build HTTP client: {value}"))
    }
}
