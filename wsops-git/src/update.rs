//! Update-From-Git Orchestrator.
//!
//! 1. Read the git status for the commit pair.
//! 2. POST `updateFromGit` with the configured conflict policy.
//! 3. 200 ⇒ done. 202 ⇒ wait `initial_delay`, then poll the `Location` URL.
//!    Anything else is an error.
//!
//! With the default `PreferRemote` policy uncommitted workspace changes are
//! overwritten by the branch.

use wsops_core::{ApiClient, ConflictPolicy, Settings, WorkspaceId};
use wsops_core::types::UpdateFromGitRequest;

use crate::error::GitError;
use crate::lro::{self, LroOutcome, PollSettings, Sleeper};
use crate::status::get_status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSettings {
    pub policy: ConflictPolicy,
    pub allow_override_items: bool,
    pub poll: PollSettings,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            policy: ConflictPolicy::PreferRemote,
            allow_override_items: true,
            poll: PollSettings::default(),
        }
    }
}

impl From<&Settings> for UpdateSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            policy: settings.conflict_policy,
            allow_override_items: settings.allow_override_items,
            poll: settings.poll.clone().into(),
        }
    }
}

/// How the service completed an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Finished within the update request (HTTP 200).
    Completed,
    /// Accepted (HTTP 202) and polled to a terminal state.
    Accepted { location: String, lro: LroOutcome },
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            UpdateOutcome::Completed => true,
            UpdateOutcome::Accepted { lro, .. } => lro.is_success(),
        }
    }
}

pub fn update_from_git(
    client: &ApiClient,
    workspace: &WorkspaceId,
    settings: &UpdateSettings,
    sleeper: &dyn Sleeper,
) -> Result<UpdateOutcome, GitError> {
    tracing::info!(%workspace, policy = %settings.policy, "starting update from git");

    let status = get_status(client, workspace)?;
    tracing::info!(
        remote_commit_hash = status.remote_commit_hash.as_deref().unwrap_or("<none>"),
        workspace_head = status.workspace_head.as_deref().unwrap_or("<none>"),
        conflict = status.has_conflict(),
        "git status"
    );

    let request = UpdateFromGitRequest::new(&status, settings.policy, settings.allow_override_items);
    let url = client.workspace_url(workspace, "/git/updateFromGit");
    let response = client.post_json(&url, &request)?;

    match response.status {
        200 => {
            tracing::info!(%workspace, "workspace synced from git");
            Ok(UpdateOutcome::Completed)
        }
        202 => {
            let Some(location) = response.location.clone() else {
                return Err(GitError::MissingLocation {
                    workspace: workspace.clone(),
                });
            };
            tracing::info!(%location, "update accepted, polling operation status");
            sleeper.sleep(settings.poll.initial_delay);
            let lro = lro::poll(client, &location, &settings.poll, sleeper)?;
            Ok(UpdateOutcome::Accepted { location, lro })
        }
        status => {
            tracing::error!(status, "failed to update the workspace");
            Err(response.unexpected("update from git").into())
        }
    }
}
