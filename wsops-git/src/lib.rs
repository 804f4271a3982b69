//! # wsops-git
//!
//! Source-control sync for a workspace connected to a git branch.
//!
//! - [`get_status`] / [`workspace_head`] read the sync state.
//! - [`update_from_git`] pulls the remote branch into the workspace and,
//!   when the service answers asynchronously, polls the operation with
//!   [`lro::poll`] until it reaches a terminal state.
//! - [`commit`] pushes every changed workspace item to the branch.

pub mod commit;
pub mod error;
pub mod lro;
pub mod status;
pub mod update;

pub use commit::{commit, CommitOutcome};
pub use error::GitError;
pub use lro::{LroOutcome, PollSettings, Sleeper, ThreadSleeper};
pub use status::{get_status, workspace_head};
pub use update::{update_from_git, UpdateOutcome, UpdateSettings};
