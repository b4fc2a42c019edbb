//! Engine-level error types.
//!
//! Evaluation itself never fails; these errors come from reading a workflow
//! document before a [`crate::GraphModel`] exists.

use thiserror::Error;

/// Errors produced while importing an interchange document.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The document is not valid JSON.
    #[error("invalid workflow JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The top level is not a JSON object.
    #[error("workflow document must be a JSON object")]
    NotAnObject,

    /// `nodes` or `edges` is present but not an array.
    #[error("'{key}' must be an array")]
    NotAnArray { key: &'static str },

    /// A node entry could not be read.
    #[error("node #{index} ('{node_id}') is invalid: {source}")]
    InvalidNode {
        index: usize,
        node_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// An edge entry could not be read.
    #[error("edge #{index} is invalid: {source}")]
    InvalidEdge {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}
