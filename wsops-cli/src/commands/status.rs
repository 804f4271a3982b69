//! `wsops status`: git sync state of a workspace.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use wsops_core::types::ItemChange;
use wsops_core::{GitStatus, Settings, WorkspaceId};
use wsops_git::get_status;

use super::CredentialArgs;

/// Arguments for `wsops status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Workspace to inspect.
    #[arg(long, env = "WSOPS_WORKSPACE_ID")]
    pub workspace_id: String,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let workspace = WorkspaceId::from(self.workspace_id.as_str());
        let client = self.credentials.connect(settings)?;
        let status = get_status(&client, &workspace)
            .with_context(|| format!("could not read git status of workspace '{workspace}'"))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&status).context("failed to serialize status JSON")?
            );
            return Ok(());
        }
        print_table(&workspace, &status);
        Ok(())
    }
}

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "item")]
    item: String,
    #[tabled(rename = "type")]
    item_type: String,
    #[tabled(rename = "workspace")]
    workspace_change: String,
    #[tabled(rename = "remote")]
    remote_change: String,
    #[tabled(rename = "conflict")]
    conflict: String,
}

fn metadata_field(change: &ItemChange, key: &str) -> String {
    change
        .item_metadata
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("-")
        .to_string()
}

fn print_table(workspace: &WorkspaceId, status: &GitStatus) {
    println!("workspace       {workspace}");
    println!(
        "workspace head  {}",
        status.workspace_head.as_deref().unwrap_or("(none)")
    );
    println!(
        "remote commit   {}",
        status.remote_commit_hash.as_deref().unwrap_or("(none)")
    );

    if status.changes.is_empty() {
        println!("{} in sync — no changed items", "✓".green());
        return;
    }

    let rows: Vec<ChangeRow> = status
        .changes
        .iter()
        .map(|change| ChangeRow {
            item: metadata_field(change, "displayName"),
            item_type: metadata_field(change, "itemType"),
            workspace_change: change.workspace_change.clone().unwrap_or_else(|| "-".into()),
            remote_change: change.remote_change.clone().unwrap_or_else(|| "-".into()),
            conflict: change.conflict_type.clone().unwrap_or_else(|| "None".into()),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if status.has_conflict() {
        println!(
            "{} conflicting items; `wsops update` resolves them per the conflict policy",
            "■".red().bold()
        );
    }
}
