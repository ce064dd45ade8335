use strata_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectKind, StoredObject, Tree};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees this:
///   the same (kind, payload) always produces the same ID.
/// - Writes are idempotent: writing an already-present object is a no-op.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed ID.
    ///
    /// Fails with [`StoreError::NotFound`] if the object does not exist.
    fn read(&self, id: &ObjectId) -> StoreResult<StoredObject>;

    /// Write an object and return its content-addressed ID.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Store a payload under the given kind and return its ID.
    fn write_object(&self, kind: ObjectKind, payload: &[u8]) -> StoreResult<ObjectId> {
        self.write(&StoredObject::new(kind, payload.to_vec()))
    }

    /// Read and decode a tree object.
    ///
    /// Fails with [`StoreError::Malformed`] if the object is not a tree or
    /// its payload cannot be parsed.
    fn read_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        let obj = self.read(id)?;
        Tree::from_stored_object(&obj)
    }
}
