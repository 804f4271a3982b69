//! Error types for wsops-linked.

use std::path::PathBuf;

use thiserror::Error;

use wsops_core::ApiError;

#[derive(Debug, Error)]
pub enum LinkedError {
    /// An error from the workspace API.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Two items share a display name and collisions are not allowed.
    #[error("display name '{name}' is used by both a {existing} and a {incoming}")]
    Collision {
        name: String,
        existing: String,
        incoming: String,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (output file).
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`LinkedError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LinkedError {
    LinkedError::Io {
        path: path.into(),
        source,
    }
}
