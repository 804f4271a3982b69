//! `wsops update`: pull the connected branch into a workspace.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use wsops_core::{ConflictPolicy, Settings, WorkspaceId};
use wsops_git::{update_from_git, LroOutcome, ThreadSleeper, UpdateOutcome, UpdateSettings};

use super::CredentialArgs;

/// Arguments for `wsops update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Workspace to update.
    #[arg(long, env = "WSOPS_WORKSPACE_ID")]
    pub workspace_id: String,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Which side wins on conflict (default from settings: prefer-remote).
    #[arg(long)]
    pub conflict_policy: Option<ConflictPolicy>,

    /// Seconds between operation status polls.
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Give up polling after this many seconds.
    #[arg(long)]
    pub poll_timeout: Option<u64>,

    /// Fail when the operation ends in a status other than success.
    #[arg(long)]
    pub strict: bool,
}

impl UpdateArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let workspace = WorkspaceId::from(self.workspace_id.as_str());
        let update = self.update_settings(settings);
        let client = self.credentials.connect(settings)?;

        let outcome = update_from_git(&client, &workspace, &update, &ThreadSleeper)
            .with_context(|| format!("update from git failed for workspace '{workspace}'"))?;

        match outcome {
            UpdateOutcome::Completed
            | UpdateOutcome::Accepted {
                lro: LroOutcome::Succeeded,
                ..
            } => {
                println!("{} workspace '{workspace}' synced from git", "✓".green());
            }
            UpdateOutcome::Accepted {
                location,
                lro: LroOutcome::Unrecognized {
                    status,
                    http_status,
                },
            } => {
                if self.strict {
                    bail!(
                        "update for workspace '{workspace}' ended with status '{status}' \
                         (HTTP {http_status}) at {location}"
                    );
                }
                println!(
                    "{} workspace '{workspace}' update finished with status '{status}' \
                     (HTTP {http_status}); verify the workspace state",
                    "!".yellow()
                );
            }
        }
        Ok(())
    }

    fn update_settings(&self, settings: &Settings) -> UpdateSettings {
        let mut update = UpdateSettings::from(settings);
        if let Some(policy) = self.conflict_policy {
            update.policy = policy;
        }
        if let Some(secs) = self.poll_interval {
            update.poll.interval = std::time::Duration::from_secs(secs);
        }
        if let Some(secs) = self.poll_timeout {
            update.poll.timeout = std::time::Duration::from_secs(secs);
        }
        update
    }
}
