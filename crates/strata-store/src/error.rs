use strata_types::ObjectId;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found at its derived path.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The compressed stream could not be decoded.
    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    /// The decompressed bytes do not frame a valid object.
    #[error("malformed object: {0}")]
    Malformed(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
