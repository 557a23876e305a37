//! Snapshot cache for scanned trees
//!
//! A finished tree is serialized wholesale to
//! `<cache_dir>/<digest(root)>.json`, keyed by the identity digest of the
//! scanned root so multiple roots can share one cache directory without
//! cross-talk. There is no TTL or invalidation: a snapshot is stale the
//! moment the underlying filesystem changes, and deciding when to re-scan
//! is the caller's policy.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::ScanError;
use crate::hash;
use crate::models::FileNode;

/// File extension for snapshot files
pub const SNAPSHOT_EXTENSION: &str = "json";

/// Reads and writes tree snapshots under a static-assets directory
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    /// Create a cache over the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for a scan root
    pub fn snapshot_path(&self, root: &Path) -> PathBuf {
        self.dir
            .join(format!("{}.{}", hash::digest_path(root), SNAPSHOT_EXTENSION))
    }

    /// Persist a tree as the snapshot for a root.
    ///
    /// The snapshot is written to a temporary file in the cache directory
    /// and renamed into place, so racing writers cannot interleave and the
    /// last completed save wins. Write failures are surfaced, never
    /// swallowed.
    pub fn save(&self, root: &Path, files: &[FileNode]) -> Result<(), ScanError> {
        let target = self.snapshot_path(root);
        fs::create_dir_all(&self.dir).map_err(|e| {
            ScanError::cache(
                Some(self.dir.clone()),
                format!("failed to create cache directory: {e}"),
            )
        })?;

        let json = serde_json::to_vec(files)?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| {
            ScanError::cache(
                Some(target.clone()),
                format!("failed to create temporary snapshot: {e}"),
            )
        })?;
        tmp.write_all(&json).map_err(|e| {
            ScanError::cache(
                Some(target.clone()),
                format!("failed to write snapshot: {e}"),
            )
        })?;
        tmp.persist(&target).map_err(|e| {
            ScanError::cache(
                Some(target.clone()),
                format!("failed to persist snapshot: {e}"),
            )
        })?;

        log::debug!("saved snapshot {} ({} bytes)", target.display(), json.len());
        Ok(())
    }

    /// Load the snapshot for a root.
    ///
    /// Fails open: a missing, unreadable, or unparsable snapshot yields an
    /// empty sequence rather than an error.
    pub fn load(&self, root: &Path) -> Vec<FileNode> {
        let path = self.snapshot_path(root);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    log::debug!("no snapshot at {}", path.display());
                } else {
                    log::warn!("unreadable snapshot {}: {}", path.display(), err);
                }
                return Vec::new();
            }
        };

        match serde_json::from_slice(&data) {
            Ok(files) => files,
            Err(err) => {
                log::warn!("invalid snapshot {}: {}", path.display(), err);
                Vec::new()
            }
        }
    }
}
