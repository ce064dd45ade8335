//! Recursive directory capture.
//!
//! Classification order matters: a symbolic link is checked before the
//! executable bit, so an executable symlink is still encoded with mode
//! `120000`. Entries are encoded in directory-listing order; the stored
//! payload carries no sorting invariant.

use std::path::Path;
use std::sync::Arc;

use strata_store::{EntryMode, ObjectKind, ObjectStore, Tree, TreeEntry, DEFAULT_DIR};
use strata_types::ObjectId;
use tracing::debug;

use crate::error::{SnapshotError, SnapshotResult};

/// Store-backed recursive snapshot builder.
///
/// Persists every file as a blob and every directory (children first) as a
/// tree, returning the root tree's digest. The store-metadata directory is
/// excluded from the walk by name, injected at construction so builds can
/// run against isolated roots.
pub struct TreeBuilder {
    store: Arc<dyn ObjectStore>,
    exclude: String,
}

impl TreeBuilder {
    /// Builder excluding the conventional metadata directory.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_exclude(store, DEFAULT_DIR)
    }

    /// Builder excluding an explicit metadata-directory name.
    pub fn with_exclude(store: Arc<dyn ObjectStore>, exclude: impl Into<String>) -> Self {
        Self {
            store,
            exclude: exclude.into(),
        }
    }

    /// Snapshot `dir` into the store and return the root tree digest.
    ///
    /// An empty directory yields a valid zero-entry tree (the digest of
    /// `"tree 0\0"`).
    pub fn snapshot(&self, dir: &Path) -> SnapshotResult<ObjectId> {
        let mut entries = Vec::new();
        for dirent in std::fs::read_dir(dir)? {
            let dirent = dirent?;
            let name = match dirent.file_name().into_string() {
                Ok(name) => name,
                Err(_) => return Err(SnapshotError::InvalidName(dirent.path())),
            };
            if name == self.exclude {
                continue;
            }

            let file_type = dirent.file_type()?;
            let path = dirent.path();
            let (mode, object_id) = if file_type.is_dir() {
                (EntryMode::Directory, self.snapshot(&path)?)
            } else if file_type.is_symlink() {
                // Symlink wins over the executable bit.
                let target = link_target_bytes(&path)?;
                (
                    EntryMode::Symlink,
                    self.store.write_object(ObjectKind::Blob, &target)?,
                )
            } else {
                let mode = if is_executable(&dirent)? {
                    EntryMode::Executable
                } else {
                    EntryMode::Regular
                };
                let content = std::fs::read(&path)?;
                (mode, self.store.write_object(ObjectKind::Blob, &content)?)
            };

            entries.push(TreeEntry::new(mode, name, object_id));
        }

        let tree = Tree::new(entries);
        let id = self.store.write(&tree.to_stored_object())?;
        debug!(dir = %dir.display(), entries = tree.len(), id = %id.short_hex(), "tree written");
        Ok(id)
    }
}

impl std::fmt::Debug for TreeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("exclude", &self.exclude)
            .finish()
    }
}

/// The blob payload for a symlink: its target path, byte for byte.
fn link_target_bytes(path: &Path) -> SnapshotResult<Vec<u8>> {
    let target = std::fs::read_link(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        Ok(target.as_os_str().as_bytes().to_vec())
    }
    #[cfg(not(unix))]
    {
        target
            .to_str()
            .map(|s| s.as_bytes().to_vec())
            .ok_or(SnapshotError::InvalidName(target))
    }
}

#[cfg(unix)]
fn is_executable(dirent: &std::fs::DirEntry) -> SnapshotResult<bool> {
    use std::os::unix::fs::PermissionsExt;
    Ok(dirent.metadata()?.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_dirent: &std::fs::DirEntry) -> SnapshotResult<bool> {
    Ok(false)
}
