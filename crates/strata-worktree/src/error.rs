use std::path::PathBuf;

use strata_store::StoreError;

/// Errors from snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The underlying object store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Filesystem operation failed during the walk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An entry name cannot be represented in the tree encoding.
    ///
    /// A lossy conversion would silently change the resulting digest, so
    /// non-Unicode names are rejected instead.
    #[error("unsupported entry name: {0}")]
    InvalidName(PathBuf),
}

/// Result alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
