//! Denodo AI SDK query tools.
//!
//! Five operations (question answering in three modes, similarity search, metadata retrieval)
//! that turn typed parameters into one HTTP call against the AI SDK and render the JSON reply
//! as stable, human-readable text.
//!
//! This crate intentionally contains **no** protocol hosting; `denodo-query-mcp` wires
//! [`QueryTools`] into an MCP stdio server.

pub mod catalog;
pub mod config;
pub mod error;
pub mod normalize;
pub mod params;
pub mod request;
pub mod tools;
pub mod transport;

pub use config::{AdapterConfig, Credentials, DefaultCredentials};
pub use error::{QueryToolsError, Result};
pub use params::{
    AnswerDataQuestionParams, AnswerMetadataQuestionParams, AnswerQuestionParams,
    GetMetadataParams, SimilaritySearchParams,
};
pub use tools::QueryTools;
pub use transport::{BackendOutcome, HttpTransport, Transport};
