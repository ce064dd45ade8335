//! Object model and wire framing.
//!
//! Every stored object is framed as `"<kind> <payload-len>\0<payload>"` with
//! an ASCII header; the SHA-1 digest of that framed buffer is the object's
//! identity and storage address. Tree payloads concatenate
//! `"<mode> <name>\0"` followed by the child's raw 20-byte digest, with no
//! separator between entries, in the order the producer emitted them.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use strata_types::{ObjectId, DIGEST_LEN};

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Raw content (file contents, arbitrary data).
    Blob,
    /// Directory listing: ordered entries mapping names to object references.
    Tree,
}

impl ObjectKind {
    /// The ASCII tag used in the object header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
        }
    }

    /// Parse the header tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored object: kind tag + payload bytes + cached size.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// payload; tree decoding is a separate step on top of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The payload bytes (excluding the kind/length header).
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from kind and payload.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// The framed bytes: `"<kind> <len>\0"` header followed by the payload.
    pub fn frame(&self) -> Vec<u8> {
        let header = format!("{} {}\0", self.kind, self.data.len());
        let mut framed = Vec::with_capacity(header.len() + self.data.len());
        framed.extend_from_slice(header.as_bytes());
        framed.extend_from_slice(&self.data);
        framed
    }

    /// Compute the content-addressed ID: SHA-1 over the framed bytes.
    ///
    /// Pure function of (kind, payload); no I/O.
    pub fn compute_id(&self) -> ObjectId {
        let mut hasher = Sha1::new();
        hasher.update(self.kind.as_str().as_bytes());
        hasher.update(b" ");
        hasher.update(self.data.len().to_string().as_bytes());
        hasher.update(b"\0");
        hasher.update(&self.data);
        ObjectId::from_digest(hasher.finalize().into())
    }

    /// Parse framed bytes back into kind and payload.
    ///
    /// Fails with [`StoreError::Malformed`] if the header cannot be parsed
    /// or the declared length disagrees with the payload actually present.
    pub fn from_frame(framed: &[u8]) -> StoreResult<Self> {
        let nul = framed
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| StoreError::Malformed("missing header terminator".into()))?;
        let header = std::str::from_utf8(&framed[..nul])
            .map_err(|_| StoreError::Malformed("header is not ASCII".into()))?;
        let (tag, len) = header
            .split_once(' ')
            .ok_or_else(|| StoreError::Malformed(format!("bad header {header:?}")))?;
        let kind = ObjectKind::from_tag(tag)
            .ok_or_else(|| StoreError::Malformed(format!("unknown object kind {tag:?}")))?;
        let declared: usize = len
            .parse()
            .map_err(|_| StoreError::Malformed(format!("bad length {len:?}")))?;
        let payload = &framed[nul + 1..];
        if payload.len() != declared {
            return Err(StoreError::Malformed(format!(
                "declared length {declared} but payload is {} bytes",
                payload.len()
            )));
        }
        Ok(Self::new(kind, payload.to_vec()))
    }
}

/// Compute the digest an object would be stored under, without storing it.
pub fn digest_of(kind: ObjectKind, payload: &[u8]) -> ObjectId {
    StoredObject::new(kind, payload.to_vec()).compute_id()
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Blob {
            return Err(StoreError::Malformed(format!(
                "expected blob, got {}",
                obj.kind
            )));
        }
        Ok(Self {
            data: obj.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// File mode for a tree entry, as stored in the wire encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file (`100644`).
    Regular,
    /// Executable file (`100755`).
    Executable,
    /// Symbolic link (`120000`).
    Symlink,
    /// Subtree / directory (stored `40000`, displayed `040000`).
    Directory,
}

impl EntryMode {
    /// The mode string used inside stored tree payloads.
    ///
    /// Directories are stored without the leading zero.
    pub fn wire_str(&self) -> &'static str {
        match self {
            Self::Regular => "100644",
            Self::Executable => "100755",
            Self::Symlink => "120000",
            Self::Directory => "40000",
        }
    }

    /// The canonical six-digit mode used for display only.
    pub fn display_str(&self) -> &'static str {
        match self {
            Self::Directory => "040000",
            other => other.wire_str(),
        }
    }

    /// Parse a mode string from a stored tree payload.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "100644" => Some(Self::Regular),
            "100755" => Some(Self::Executable),
            "120000" => Some(Self::Symlink),
            "40000" | "040000" => Some(Self::Directory),
            _ => None,
        }
    }

    /// The kind of object this mode points at.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Directory => ObjectKind::Tree,
            _ => ObjectKind::Blob,
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_str())
    }
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File mode (regular, executable, symlink, directory).
    pub mode: EntryMode,
    /// Entry name (filename within the parent, no path separators).
    pub name: String,
    /// Content-addressed ID of the referenced object.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }
}

/// Directory listing object.
///
/// Entries keep the order their producer emitted them; the stored encoding
/// carries no sorting invariant. Display-time ordering is a presentation
/// concern, applied by consumers over the decoded sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    /// Entries in producer order.
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a new tree with the given entries, order preserved.
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Encode the wire payload: `"<mode> <name>\0"` + raw digest, per entry.
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        for entry in &self.entries {
            payload.extend_from_slice(entry.mode.wire_str().as_bytes());
            payload.push(b' ');
            payload.extend_from_slice(entry.name.as_bytes());
            payload.push(0);
            payload.extend_from_slice(entry.object_id.as_bytes());
        }
        payload
    }

    /// Parse a tree payload.
    ///
    /// The cursor walks NUL-terminated `"mode name"` pairs each followed by
    /// a fixed 20-byte digest, stopping at end of payload. A trailing
    /// partial entry is [`StoreError::Malformed`].
    pub fn decode(payload: &[u8]) -> StoreResult<Self> {
        let mut entries = Vec::new();
        let mut cursor = 0;
        while cursor < payload.len() {
            let rest = &payload[cursor..];
            let nul = rest
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| StoreError::Malformed("unterminated tree entry".into()))?;
            let head = std::str::from_utf8(&rest[..nul])
                .map_err(|_| StoreError::Malformed("tree entry is not ASCII".into()))?;
            let (mode, name) = head
                .split_once(' ')
                .ok_or_else(|| StoreError::Malformed(format!("bad tree entry {head:?}")))?;
            let mode = EntryMode::from_wire(mode)
                .ok_or_else(|| StoreError::Malformed(format!("unknown mode {mode:?}")))?;
            let digest_start = nul + 1;
            let digest_end = digest_start + DIGEST_LEN;
            if rest.len() < digest_end {
                return Err(StoreError::Malformed(format!(
                    "partial entry: {} digest bytes after {name:?}",
                    rest.len() - digest_start
                )));
            }
            let object_id = ObjectId::from_raw(&rest[digest_start..digest_end])
                .map_err(|e| StoreError::Malformed(e.to_string()))?;
            entries.push(TreeEntry::new(mode, name, object_id));
            cursor += digest_end;
        }
        Ok(Self { entries })
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Tree, self.encode())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Tree {
            return Err(StoreError::Malformed(format!(
                "expected tree, got {}",
                obj.kind
            )));
        }
        Self::decode(&obj.data)
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(byte: u8) -> ObjectId {
        ObjectId::from_digest([byte; DIGEST_LEN])
    }

    // -----------------------------------------------------------------------
    // Framing and digests
    // -----------------------------------------------------------------------

    #[test]
    fn empty_blob_has_known_digest() {
        // The digest of "blob 0\0", as produced by every git-compatible tool.
        assert_eq!(
            digest_of(ObjectKind::Blob, b"").to_hex(),
            "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
        );
    }

    #[test]
    fn empty_tree_has_known_digest() {
        assert_eq!(
            digest_of(ObjectKind::Tree, b"").to_hex(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }

    #[test]
    fn hello_world_blob_digest() {
        assert_eq!(
            digest_of(ObjectKind::Blob, b"hello world\n").to_hex(),
            "3b18e512dba79e4c8300dd08aeb37f8e728b8dad"
        );
    }

    #[test]
    fn digest_is_deterministic() {
        let a = digest_of(ObjectKind::Blob, b"same bytes");
        let b = digest_of(ObjectKind::Blob, b"same bytes");
        assert_eq!(a, b);
    }

    #[test]
    fn kind_participates_in_digest() {
        let payload = b"identical payload";
        assert_ne!(
            digest_of(ObjectKind::Blob, payload),
            digest_of(ObjectKind::Tree, payload)
        );
    }

    #[test]
    fn frame_layout() {
        let obj = StoredObject::new(ObjectKind::Blob, b"abc".to_vec());
        assert_eq!(obj.frame(), b"blob 3\0abc");
    }

    #[test]
    fn frame_roundtrip() {
        let obj = StoredObject::new(ObjectKind::Tree, b"payload".to_vec());
        let parsed = StoredObject::from_frame(&obj.frame()).unwrap();
        assert_eq!(parsed, obj);
    }

    #[test]
    fn frame_digest_matches_compute_id() {
        let obj = StoredObject::new(ObjectKind::Blob, b"check".to_vec());
        let mut hasher = Sha1::new();
        hasher.update(obj.frame());
        let direct = ObjectId::from_digest(hasher.finalize().into());
        assert_eq!(obj.compute_id(), direct);
    }

    #[test]
    fn from_frame_rejects_missing_nul() {
        let err = StoredObject::from_frame(b"blob 3abc").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn from_frame_rejects_unknown_kind() {
        let err = StoredObject::from_frame(b"commit 3\0abc").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn from_frame_rejects_bad_length_field() {
        let err = StoredObject::from_frame(b"blob x\0abc").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn from_frame_rejects_length_mismatch() {
        let err = StoredObject::from_frame(b"blob 5\0abc").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn from_frame_rejects_missing_space() {
        let err = StoredObject::from_frame(b"blob3\0abc").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    proptest! {
        #[test]
        fn frame_roundtrip_arbitrary(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let obj = StoredObject::new(ObjectKind::Blob, data);
            let parsed = StoredObject::from_frame(&obj.frame()).unwrap();
            prop_assert_eq!(parsed, obj);
        }
    }

    // -----------------------------------------------------------------------
    // Entry modes
    // -----------------------------------------------------------------------

    #[test]
    fn mode_wire_strings() {
        assert_eq!(EntryMode::Regular.wire_str(), "100644");
        assert_eq!(EntryMode::Executable.wire_str(), "100755");
        assert_eq!(EntryMode::Symlink.wire_str(), "120000");
        assert_eq!(EntryMode::Directory.wire_str(), "40000");
    }

    #[test]
    fn directory_display_is_canonicalized() {
        assert_eq!(EntryMode::Directory.display_str(), "040000");
        assert_eq!(EntryMode::Regular.display_str(), "100644");
        assert_eq!(format!("{}", EntryMode::Directory), "040000");
    }

    #[test]
    fn mode_wire_roundtrip() {
        for mode in [
            EntryMode::Regular,
            EntryMode::Executable,
            EntryMode::Symlink,
            EntryMode::Directory,
        ] {
            assert_eq!(EntryMode::from_wire(mode.wire_str()), Some(mode));
        }
        assert_eq!(EntryMode::from_wire("040000"), Some(EntryMode::Directory));
        assert_eq!(EntryMode::from_wire("777"), None);
    }

    #[test]
    fn mode_object_kind() {
        assert_eq!(EntryMode::Directory.object_kind(), ObjectKind::Tree);
        assert_eq!(EntryMode::Regular.object_kind(), ObjectKind::Blob);
        assert_eq!(EntryMode::Symlink.object_kind(), ObjectKind::Blob);
    }

    // -----------------------------------------------------------------------
    // Tree wire format
    // -----------------------------------------------------------------------

    #[test]
    fn tree_encode_layout() {
        let tree = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "a.txt", id(0xaa))]);
        let mut expected = b"100644 a.txt\0".to_vec();
        expected.extend_from_slice(&[0xaa; DIGEST_LEN]);
        assert_eq!(tree.encode(), expected);
    }

    #[test]
    fn tree_roundtrip_preserves_producer_order() {
        // Deliberately unsorted: the encoding must not reorder.
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "zebra.txt", id(1)),
            TreeEntry::new(EntryMode::Directory, "alpha", id(2)),
            TreeEntry::new(EntryMode::Executable, "middle.sh", id(3)),
        ]);
        let decoded = Tree::decode(&tree.encode()).unwrap();
        assert_eq!(decoded, tree);
        assert_eq!(decoded.entries[0].name, "zebra.txt");
        assert_eq!(decoded.entries[2].name, "middle.sh");
    }

    #[test]
    fn empty_tree_roundtrip() {
        let tree = Tree::empty();
        assert!(tree.encode().is_empty());
        assert_eq!(Tree::decode(b"").unwrap(), tree);
    }

    #[test]
    fn decode_rejects_partial_digest() {
        let mut payload = b"100644 short.txt\0".to_vec();
        payload.extend_from_slice(&[0xbb; DIGEST_LEN - 1]);
        let err = Tree::decode(&payload).unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn decode_rejects_unterminated_entry() {
        let err = Tree::decode(b"100644 no-nul-here").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn decode_rejects_unknown_mode() {
        let mut payload = b"999999 weird\0".to_vec();
        payload.extend_from_slice(&[0xcc; DIGEST_LEN]);
        let err = Tree::decode(&payload).unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn from_stored_object_rejects_blob() {
        let obj = StoredObject::new(ObjectKind::Blob, b"not a tree".to_vec());
        let err = Tree::from_stored_object(&obj).unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn blob_from_stored_object_rejects_tree() {
        let obj = StoredObject::new(ObjectKind::Tree, Vec::new());
        assert!(Blob::from_stored_object(&obj).is_err());
    }

    #[test]
    fn tree_get_entry() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "a.txt", id(1)),
            TreeEntry::new(EntryMode::Regular, "b.txt", id(2)),
        ]);
        assert!(tree.get("a.txt").is_some());
        assert!(tree.get("missing").is_none());
        assert_eq!(tree.len(), 2);
        assert!(!tree.is_empty());
    }
}
