//! Error types for wsops-git.

use std::time::Duration;

use thiserror::Error;

use wsops_core::{ApiError, WorkspaceId};

/// All errors that can arise from git sync operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Transport, decode or unexpected-status failure from the API layer.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The update was accepted (202) but no poll location was returned.
    #[error("update for workspace {workspace} was accepted without a Location header")]
    MissingLocation { workspace: WorkspaceId },

    /// The operation did not reach a terminal state within the poll budget.
    #[error("operation at {url} still running after {attempts} polls ({elapsed:?})")]
    PollTimeout {
        url: String,
        attempts: u32,
        elapsed: Duration,
    },
}
