//! `wsops commit`: push workspace changes to the connected branch.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use wsops_core::{Settings, WorkspaceId};
use wsops_git::{commit, workspace_head, CommitOutcome};

use super::CredentialArgs;

/// Arguments for `wsops commit`.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Workspace to commit from.
    #[arg(long, env = "WSOPS_WORKSPACE_ID")]
    pub workspace_id: String,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Commit message (default from settings).
    #[arg(long, short)]
    pub message: Option<String>,
}

impl CommitArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let workspace = WorkspaceId::from(self.workspace_id.as_str());
        let client = self.credentials.connect(settings)?;

        let head = workspace_head(&client, &workspace)
            .with_context(|| format!("could not read git status of workspace '{workspace}'"))?;
        let message = self.message.as_deref().unwrap_or(&settings.commit_message);
        let outcome = commit(&client, &workspace, head.as_deref(), message)
            .with_context(|| format!("commit failed for workspace '{workspace}'"))?;

        match outcome {
            CommitOutcome::Committed => {
                println!("{} committed all changed items of '{workspace}'", "✓".green())
            }
            CommitOutcome::NothingToCommit => {
                println!("{} '{workspace}' — nothing to commit", "✓".green())
            }
        }
        Ok(())
    }
}
