//! Registry-level error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned while fetching or loading an action catalog.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The registry could not produce a catalog right now.
    #[error("action registry unavailable: {0}")]
    Unavailable(String),

    /// The catalog document is not a JSON array of actions.
    #[error("invalid action catalog: {0}")]
    InvalidCatalog(#[from] serde_json::Error),

    /// The catalog file could not be read.
    #[error("cannot read action catalog '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
