//! Content-addressed object storage for Strata.
//!
//! This crate implements a hash-keyed object store in the style of git's
//! `.git/objects/` directory. Every piece of data -- file contents, directory
//! listings -- is stored as an immutable object identified by the SHA-1
//! digest of its framed bytes (`"<kind> <len>\0<payload>"`), compressed with
//! zlib on disk.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw content (file contents, arbitrary data)
//! - [`Tree`] -- directory listing mapping names to object references
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- loose objects under `objects/<2 hex>/<38 hex>`
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. A write either fully completes or leaves nothing readable behind
//!    (temp-file + rename).
//! 3. Tree payloads preserve producer order; sorting is presentation-only.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod codec;
pub mod error;
pub mod fs;
pub mod layout;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use layout::{Layout, DEFAULT_DIR};
pub use memory::InMemoryObjectStore;
pub use object::{digest_of, Blob, EntryMode, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;
