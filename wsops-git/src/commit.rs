//! Commit-To-Git.

use wsops_core::types::CommitToGitRequest;
use wsops_core::{ApiClient, WorkspaceId};

use crate::error::GitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The service answered 400: no item has changed since the last sync.
    NothingToCommit,
}

/// Commit every changed item in `workspace` to its connected branch.
pub fn commit(
    client: &ApiClient,
    workspace: &WorkspaceId,
    workspace_head: Option<&str>,
    message: &str,
) -> Result<CommitOutcome, GitError> {
    tracing::info!(%workspace, "committing all changed items");
    let url = client.workspace_url(workspace, "/git/commitToGit");
    let response = client.post_json(&url, &CommitToGitRequest::all(workspace_head, message))?;

    match response.status {
        200 => {
            tracing::info!("committed all items to git");
            Ok(CommitOutcome::Committed)
        }
        400 => {
            tracing::warn!(body = %response.body, "no changed items to commit");
            Ok(CommitOutcome::NothingToCommit)
        }
        status => {
            tracing::error!(status, "failed to commit items");
            Err(response.unexpected("commit to git").into())
        }
    }
}
