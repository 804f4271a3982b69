//! Domain types for the workspace REST API.
//!
//! Field names follow the service's camelCase JSON on the wire; Rust fields
//! stay snake_case. Every type here is transient and request-scoped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identifier of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(pub String);

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for WorkspaceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkspaceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of an item inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque bearer token for the workspace API.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Git sync
// ---------------------------------------------------------------------------

/// One changed item reported by the git status endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemChange {
    pub item_metadata: serde_json::Value,
    pub workspace_change: Option<String>,
    pub remote_change: Option<String>,
    pub conflict_type: Option<String>,
}

impl ItemChange {
    pub fn is_conflict(&self) -> bool {
        self.conflict_type
            .as_deref()
            .is_some_and(|kind| !kind.eq_ignore_ascii_case("none"))
    }
}

/// Sync state of a workspace relative to its connected branch.
///
/// Both commit identifiers are `None` for a workspace that has never synced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStatus {
    #[serde(default)]
    pub remote_commit_hash: Option<String>,
    #[serde(default)]
    pub workspace_head: Option<String>,
    #[serde(default)]
    pub changes: Vec<ItemChange>,
}

impl GitStatus {
    /// True when any item was modified on both sides.
    pub fn has_conflict(&self) -> bool {
        self.changes.iter().any(ItemChange::is_conflict)
    }
}

/// Which side wins when workspace and remote branch have diverged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConflictPolicy {
    #[default]
    PreferRemote,
    PreferWorkspace,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPolicy::PreferRemote => write!(f, "PreferRemote"),
            ConflictPolicy::PreferWorkspace => write!(f, "PreferWorkspace"),
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "preferremote" | "remote" => Ok(Self::PreferRemote),
            "preferworkspace" | "workspace" => Ok(Self::PreferWorkspace),
            other => Err(format!(
                "unknown conflict policy '{other}'; expected: prefer-remote, prefer-workspace"
            )),
        }
    }
}

/// `conflictResolution` block of the update-from-git request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResolution {
    pub conflict_resolution_type: &'static str,
    pub conflict_resolution_policy: ConflictPolicy,
}

impl From<ConflictPolicy> for ConflictResolution {
    fn from(policy: ConflictPolicy) -> Self {
        Self {
            conflict_resolution_type: "Workspace",
            conflict_resolution_policy: policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    pub allow_override_items: bool,
}

/// Body of `POST /workspaces/{id}/git/updateFromGit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFromGitRequest {
    pub workspace_head: Option<String>,
    pub remote_commit_hash: Option<String>,
    pub conflict_resolution: ConflictResolution,
    pub options: UpdateOptions,
}

impl UpdateFromGitRequest {
    pub fn new(status: &GitStatus, policy: ConflictPolicy, allow_override_items: bool) -> Self {
        Self {
            workspace_head: status.workspace_head.clone(),
            remote_commit_hash: status.remote_commit_hash.clone(),
            conflict_resolution: policy.into(),
            options: UpdateOptions {
                allow_override_items,
            },
        }
    }
}

/// Body of `POST /workspaces/{id}/git/commitToGit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitToGitRequest {
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_head: Option<String>,
    pub commit_message: String,
}

impl CommitToGitRequest {
    /// Commit every changed item.
    pub fn all(workspace_head: Option<&str>, commit_message: &str) -> Self {
        Self {
            mode: "All",
            workspace_head: workspace_head.map(str::to_owned),
            commit_message: commit_message.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Workspace items
// ---------------------------------------------------------------------------

/// Kind of a workspace item, as reported in its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Lakehouse,
    Warehouse,
    Other(String),
}

impl From<&str> for ItemKind {
    fn from(s: &str) -> Self {
        match s {
            "Lakehouse" => ItemKind::Lakehouse,
            "Warehouse" => ItemKind::Warehouse,
            other => ItemKind::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Lakehouse => write!(f, "Lakehouse"),
            ItemKind::Warehouse => write!(f, "Warehouse"),
            ItemKind::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// Entry of `GET /workspaces/{id}/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceItem {
    pub id: ItemId,
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
}

impl WorkspaceItem {
    pub fn kind(&self) -> ItemKind {
        ItemKind::from(self.item_type.as_str())
    }
}

/// One page of the item listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    #[serde(default)]
    pub value: Vec<WorkspaceItem>,
    #[serde(default)]
    pub continuation_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseProperties {
    #[serde(default)]
    pub connection_string: String,
}

/// `GET /workspaces/{id}/warehouses/{warehouseId}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseDetails {
    pub id: ItemId,
    pub display_name: String,
    #[serde(default)]
    pub properties: WarehouseProperties,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
