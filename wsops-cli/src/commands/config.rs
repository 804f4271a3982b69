//! `wsops config`: generate the linked-service config file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use wsops_core::{Settings, WorkspaceId};
use wsops_linked::{generate, CollisionPolicy, GenerateOptions, WriteResult};

use super::CredentialArgs;

/// Arguments for `wsops config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Workspace holding the lakehouses.
    #[arg(long, env = "WSOPS_WORKSPACE_ID", alias = "workspace-id")]
    pub lakehouse_workspace_id: String,

    /// Workspace holding the warehouses.
    #[arg(long, env = "WSOPS_WAREHOUSE_WORKSPACE_ID")]
    pub warehouse_workspace_id: String,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Output file (default from settings: linkedservice-config.json).
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Fail instead of overwriting when a lakehouse and a warehouse share a name.
    #[arg(long)]
    pub strict_collisions: bool,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "artifact")]
    artifact_id: String,
}

impl ConfigArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let lakehouse_ws = WorkspaceId::from(self.lakehouse_workspace_id.as_str());
        let warehouse_ws = WorkspaceId::from(self.warehouse_workspace_id.as_str());
        let options = GenerateOptions {
            output: self
                .output
                .clone()
                .unwrap_or_else(|| settings.output_file.clone()),
            collisions: if self.strict_collisions {
                CollisionPolicy::Fail
            } else {
                CollisionPolicy::Overwrite
            },
        };
        let client = self.credentials.connect(settings)?;

        let artifact = generate(&client, &lakehouse_ws, &warehouse_ws, &options)
            .context("linked service config generation failed")?;

        let verb = match artifact.write {
            WriteResult::Created { .. } => "created",
            WriteResult::Replaced { .. } => "replaced",
        };
        println!(
            "{} {} {verb} ({} entries, sha256 {})",
            "✓".green(),
            artifact.write.path().display(),
            artifact.config.len(),
            &artifact.digest[..12],
        );

        if !artifact.config.is_empty() {
            let rows: Vec<EntryRow> = artifact
                .config
                .iter()
                .map(|(name, entry)| EntryRow {
                    name: name.clone(),
                    kind: entry.kind.to_string(),
                    artifact_id: entry.type_properties.artifact_id.clone(),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }
        Ok(())
    }
}
