//! On-disk repository layout.
//!
//! The metadata-directory name is a configuration value, not a hardcoded
//! literal, so stores and snapshots can run against isolated temporary
//! roots. Bootstrap creates the skeleton once; the store itself only ever
//! creates the two-level fan-out directories beneath `objects/`.

use std::path::{Path, PathBuf};

use strata_types::ObjectId;

use crate::error::StoreResult;

/// Conventional name of the repository metadata directory.
pub const DEFAULT_DIR: &str = ".strata";

/// Contents written to `HEAD` at bootstrap.
const HEAD_CONTENT: &str = "ref: refs/heads/master\n";

/// Paths of a repository on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// The working-tree root containing the metadata directory.
    root: PathBuf,
    /// Name of the metadata directory within `root`.
    dir_name: String,
}

impl Layout {
    /// Layout rooted at `root` with the conventional metadata directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_dir_name(root, DEFAULT_DIR)
    }

    /// Layout with an explicit metadata-directory name (isolated test roots).
    pub fn with_dir_name(root: impl Into<PathBuf>, dir_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            dir_name: dir_name.into(),
        }
    }

    /// The working-tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the metadata directory (for exclusion during snapshots).
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    /// The metadata directory itself.
    pub fn meta_dir(&self) -> PathBuf {
        self.root.join(&self.dir_name)
    }

    /// The loose-object root.
    pub fn objects_dir(&self) -> PathBuf {
        self.meta_dir().join("objects")
    }

    /// Storage path for an object: `objects/<2 hex>/<38 hex>`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let (dir, file) = id.fanout();
        self.objects_dir().join(dir).join(file)
    }

    /// Create the repository skeleton: metadata dir, `objects/`, `refs/`,
    /// and a `HEAD` pointing at the default branch.
    ///
    /// Idempotent: existing directories are left alone, `HEAD` is rewritten.
    pub fn bootstrap(&self) -> StoreResult<()> {
        std::fs::create_dir_all(self.objects_dir())?;
        std::fs::create_dir_all(self.meta_dir().join("refs"))?;
        std::fs::write(self.meta_dir().join("HEAD"), HEAD_CONTENT)?;
        Ok(())
    }
}
