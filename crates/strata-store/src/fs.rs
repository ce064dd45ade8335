//! Loose-object filesystem backend.
//!
//! Objects live at `objects/<2 hex>/<38 hex>` beneath the repository
//! metadata directory, holding the zlib-compressed framed bytes. Writes go
//! through a temp file in the fan-out directory and rename into place, so a
//! failed write never leaves a path that could later be read as a valid
//! object.

use std::io::Write;

use strata_types::ObjectId;
use tracing::debug;

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::layout::Layout;
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// On-disk loose-object store.
///
/// Assumes the object root itself exists (bootstrap creates it); only the
/// two-level fan-out directories are created on demand.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    layout: Layout,
}

impl FsObjectStore {
    /// Open a store over an existing repository layout.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The layout this store reads and writes through.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        let path = self.layout.object_path(id);
        let compressed = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*id))
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        let framed = codec::decompress(&compressed)?;
        let object = StoredObject::from_frame(&framed)?;
        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "object read");
        Ok(object)
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        let path = self.layout.object_path(&id);
        if path.is_file() {
            // Identical content by construction; nothing to do.
            debug!(id = %id.short_hex(), "object already present");
            return Ok(id);
        }

        // object_path always ends in <fanout>/<file>.
        let parent = path.parent().expect("object path has a parent");
        std::fs::create_dir_all(parent)?;

        let compressed = codec::compress(&object.frame());
        // Temp file in the destination directory keeps the rename on one
        // filesystem.
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(&compressed)?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "object written");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.layout.object_path(id).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{digest_of, EntryMode, ObjectKind, Tree, TreeEntry};
    use strata_types::DIGEST_LEN;

    fn store_in(dir: &tempfile::TempDir) -> FsObjectStore {
        let layout = Layout::with_dir_name(dir.path(), ".test-store");
        layout.bootstrap().unwrap();
        FsObjectStore::new(layout)
    }

    // -----------------------------------------------------------------------
    // Round-trips
    // -----------------------------------------------------------------------

    #[test]
    fn write_and_read_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let id = store.write_object(ObjectKind::Blob, b"hello world\n").unwrap();
        assert_eq!(id.to_hex(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");

        let obj = store.read(&id).unwrap();
        assert_eq!(obj.kind, ObjectKind::Blob);
        assert_eq!(obj.data, b"hello world\n");
    }

    #[test]
    fn write_and_read_tree() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let child = store.write_object(ObjectKind::Blob, b"child").unwrap();
        let tree = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "child.txt", child)]);
        let id = store.write(&tree.to_stored_object()).unwrap();

        let decoded = store.read_tree(&id).unwrap();
        assert_eq!(decoded, tree);
    }

    #[test]
    fn roundtrip_large_payload() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let payload: Vec<u8> = (0..128 * 1024).map(|i| (i % 17) as u8).collect();
        let id = store.write_object(ObjectKind::Blob, &payload).unwrap();
        assert_eq!(store.read(&id).unwrap().data, payload);
    }

    // -----------------------------------------------------------------------
    // Layout on disk
    // -----------------------------------------------------------------------

    #[test]
    fn object_lands_at_fanout_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let id = store.write_object(ObjectKind::Blob, b"").unwrap();
        let expected = dir
            .path()
            .join(".test-store/objects/e6/9de29bb2d1d6434b8b29ae775ad8c2e48c5391");
        assert!(expected.is_file());
        assert!(store.exists(&id).unwrap());
    }

    #[test]
    fn stored_bytes_are_compressed_frame() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let id = store.write_object(ObjectKind::Blob, b"abc").unwrap();
        let on_disk = std::fs::read(store.layout().object_path(&id)).unwrap();
        assert_eq!(codec::decompress(&on_disk).unwrap(), b"blob 3\0abc");
    }

    // -----------------------------------------------------------------------
    // Idempotence
    // -----------------------------------------------------------------------

    #[test]
    fn write_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let id1 = store.write_object(ObjectKind::Blob, b"idempotent").unwrap();
        let bytes_first = std::fs::read(store.layout().object_path(&id1)).unwrap();
        let id2 = store.write_object(ObjectKind::Blob, b"idempotent").unwrap();
        let bytes_second = std::fs::read(store.layout().object_path(&id2)).unwrap();

        assert_eq!(id1, id2);
        assert_eq!(bytes_first, bytes_second);

        // Exactly one file under the fan-out directory.
        let fan_dir = store.layout().object_path(&id1);
        let entries: Vec<_> = std::fs::read_dir(fan_dir.parent().unwrap())
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    // -----------------------------------------------------------------------
    // Error kinds
    // -----------------------------------------------------------------------

    #[test]
    fn missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let id = ObjectId::from_digest([0x42; DIGEST_LEN]);
        assert!(matches!(store.read(&id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.read_tree(&id), Err(StoreError::NotFound(_))));
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn garbage_on_disk_is_corrupt_stream() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let id = ObjectId::from_digest([0x01; DIGEST_LEN]);
        let path = store.layout().object_path(&id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not compressed at all").unwrap();

        assert!(matches!(store.read(&id), Err(StoreError::CorruptStream(_))));
    }

    #[test]
    fn headerless_compressed_data_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let id = ObjectId::from_digest([0x02; DIGEST_LEN]);
        let path = store.layout().object_path(&id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        // Valid zlib, but no "<kind> <len>\0" header inside.
        std::fs::write(&path, codec::compress(b"no header here")).unwrap();

        assert!(matches!(store.read(&id), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn read_tree_on_blob_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let id = store.write_object(ObjectKind::Blob, b"plain blob").unwrap();
        assert!(matches!(store.read_tree(&id), Err(StoreError::Malformed(_))));
    }

    // -----------------------------------------------------------------------
    // Digest agreement
    // -----------------------------------------------------------------------

    #[test]
    fn write_returns_digest_of() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let payload = b"digest agreement";
        let id = store.write_object(ObjectKind::Blob, payload).unwrap();
        assert_eq!(id, digest_of(ObjectKind::Blob, payload));
    }
}
