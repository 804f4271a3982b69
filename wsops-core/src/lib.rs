//! wsops core library: domain types, settings, the shared HTTP client, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes and wire structs for the workspace REST API
//! - [`error`]: [`ApiError`] and [`SettingsError`]
//! - [`settings`]: YAML settings file with defaults
//! - [`client`]: blocking, bearer-authenticated [`ApiClient`]

pub mod client;
pub mod error;
pub mod settings;
pub mod types;

pub use client::{ApiClient, ApiResponse};
pub use error::{ApiError, SettingsError};
pub use settings::{PollConfig, Settings};
pub use types::{
    AccessToken, ConflictPolicy, GitStatus, ItemId, ItemKind, WarehouseDetails, WorkspaceId,
    WorkspaceItem,
};
