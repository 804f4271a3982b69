//! # wsops-linked
//!
//! Linked-service config generation.
//!
//! Call [`generate`] to list the lakehouses of one workspace and the
//! warehouses of another, merge them into a single mapping keyed by display
//! name, and write it as indented JSON for pipeline parameter substitution.

pub mod entry;
pub mod error;
pub mod generator;
pub mod writer;

pub use entry::{LinkedServiceEntry, TypeProperties};
pub use error::LinkedError;
pub use generator::{
    generate, lakehouse_entries, list_items, merge, warehouse_entries, CollisionPolicy,
    ConfigArtifact, GenerateOptions, LinkedServiceConfig,
};
pub use writer::WriteResult;
