//! Config Generator.
//!
//! Merge precedence is fixed: warehouse entries first, lakehouse entries
//! overlaid. On a display-name collision the later layer wins under
//! [`CollisionPolicy::Overwrite`] and the key keeps its original position.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use wsops_core::types::ItemPage;
use wsops_core::{ApiClient, ItemKind, WarehouseDetails, WorkspaceId, WorkspaceItem};

use crate::entry::LinkedServiceEntry;
use crate::error::LinkedError;
use crate::writer::{self, WriteResult};

/// What to do when two entries share a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Later layer replaces the earlier entry, with a warning.
    #[default]
    Overwrite,
    /// Abort with [`LinkedError::Collision`].
    Fail,
}

/// Merged mapping of display name → entry, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkedServiceConfig {
    entries: IndexMap<String, LinkedServiceEntry>,
}

impl LinkedServiceConfig {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&LinkedServiceEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LinkedServiceEntry)> {
        self.entries.iter()
    }

    fn insert(
        &mut self,
        entry: LinkedServiceEntry,
        policy: CollisionPolicy,
    ) -> Result<(), LinkedError> {
        if let Some(existing) = self.entries.get(&entry.key) {
            match policy {
                CollisionPolicy::Fail => {
                    return Err(LinkedError::Collision {
                        name: entry.key.clone(),
                        existing: existing.kind.to_string(),
                        incoming: entry.kind.to_string(),
                    })
                }
                CollisionPolicy::Overwrite => tracing::warn!(
                    name = %entry.key,
                    replaced = %existing.kind,
                    by = %entry.kind,
                    "display name collision; later entry wins"
                ),
            }
        }
        self.entries.insert(entry.key.clone(), entry);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub output: PathBuf,
    pub collisions: CollisionPolicy,
}

/// Summary of a generated config file.
#[derive(Debug, Clone)]
pub struct ConfigArtifact {
    pub write: WriteResult,
    pub config: LinkedServiceConfig,
    /// SHA-256 hex of the bytes written.
    pub digest: String,
}

/// All items of `kind` in `workspace`, following `continuationUri` pages.
pub fn list_items(
    client: &ApiClient,
    workspace: &WorkspaceId,
    kind: &ItemKind,
) -> Result<Vec<WorkspaceItem>, LinkedError> {
    let mut url = client.workspace_url(workspace, "/items");
    let mut items = Vec::new();
    loop {
        let response = client.get(&url)?;
        if response.status != 200 {
            return Err(response.unexpected("list workspace items").into());
        }
        let page: ItemPage = response.json()?;
        items.extend(page.value.into_iter().filter(|item| item.kind() == *kind));
        match page.continuation_uri {
            Some(next) if !next.is_empty() && next != url => url = next,
            _ => break,
        }
    }
    tracing::debug!(%workspace, %kind, count = items.len(), "listed items");
    Ok(items)
}

fn warehouse_details(
    client: &ApiClient,
    workspace: &WorkspaceId,
    item: &WorkspaceItem,
) -> Result<WarehouseDetails, LinkedError> {
    let url = client.workspace_url(workspace, &format!("/warehouses/{}", item.id));
    let response = client.get(&url)?;
    if response.status != 200 {
        return Err(response.unexpected("get warehouse").into());
    }
    Ok(response.json()?)
}

pub fn lakehouse_entries(
    client: &ApiClient,
    workspace: &WorkspaceId,
) -> Result<Vec<LinkedServiceEntry>, LinkedError> {
    Ok(list_items(client, workspace, &ItemKind::Lakehouse)?
        .iter()
        .map(|item| LinkedServiceEntry::lakehouse(item, workspace))
        .collect())
}

/// One extra GET per warehouse for its connection endpoint.
pub fn warehouse_entries(
    client: &ApiClient,
    workspace: &WorkspaceId,
) -> Result<Vec<LinkedServiceEntry>, LinkedError> {
    list_items(client, workspace, &ItemKind::Warehouse)?
        .iter()
        .map(|item| {
            let details = warehouse_details(client, workspace, item)?;
            Ok(LinkedServiceEntry::warehouse(item, &details, workspace))
        })
        .collect()
}

/// Merge layers in order; later layers overlay earlier ones.
pub fn merge<I>(layers: I, policy: CollisionPolicy) -> Result<LinkedServiceConfig, LinkedError>
where
    I: IntoIterator<Item = Vec<LinkedServiceEntry>>,
{
    let mut config = LinkedServiceConfig::default();
    for layer in layers {
        for entry in layer {
            config.insert(entry, policy)?;
        }
    }
    Ok(config)
}

/// Build the config from both workspaces and write it to `options.output`.
pub fn generate(
    client: &ApiClient,
    lakehouse_workspace: &WorkspaceId,
    warehouse_workspace: &WorkspaceId,
    options: &GenerateOptions,
) -> Result<ConfigArtifact, LinkedError> {
    let lakehouses = lakehouse_entries(client, lakehouse_workspace)?;
    let warehouses = warehouse_entries(client, warehouse_workspace)?;
    tracing::info!(
        lakehouses = lakehouses.len(),
        warehouses = warehouses.len(),
        "fetched linked service items"
    );

    let config = merge([warehouses, lakehouses], options.collisions)?;
    let bytes = writer::render(&config)?;
    let write = writer::write_config(&options.output, &bytes)?;
    Ok(ConfigArtifact {
        write,
        config,
        digest: writer::sha256_hex(&bytes),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
