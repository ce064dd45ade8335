//! Working-tree snapshots for Strata.
//!
//! Walks a directory recursively and captures it as an immutable graph of
//! hashed objects: every file becomes a blob, every subdirectory a tree
//! referencing its children by digest.
//!
//! # Key Types
//!
//! - [`TreeBuilder`] -- store-backed recursive snapshot builder
//! - [`SnapshotError`] -- typed failures from the walk and the store

pub mod error;
pub mod snapshot;

pub use error::{SnapshotError, SnapshotResult};
pub use snapshot::TreeBuilder;
