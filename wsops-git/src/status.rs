//! Git Status Reader.

use wsops_core::{ApiClient, GitStatus, WorkspaceId};

use crate::error::GitError;

/// `GET /workspaces/{id}/git/status`.
///
/// Any status other than 200 is [`wsops_core::ApiError::UnexpectedStatus`].
pub fn get_status(client: &ApiClient, workspace: &WorkspaceId) -> Result<GitStatus, GitError> {
    let url = client.workspace_url(workspace, "/git/status");
    let response = client.get(&url)?;
    if response.status != 200 {
        tracing::error!(status = response.status, "failed to retrieve git status");
        return Err(response.unexpected("git status").into());
    }
    Ok(response.json()?)
}

/// The workspace's last synchronized commit, if it has one.
pub fn workspace_head(
    client: &ApiClient,
    workspace: &WorkspaceId,
) -> Result<Option<String>, GitError> {
    tracing::info!("retrieving latest workspace commit id");
    let head = get_status(client, workspace)?.workspace_head;
    tracing::info!(workspace_head = head.as_deref().unwrap_or("<none>"), "latest workspace head");
    Ok(head)
}
