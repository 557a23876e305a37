//! Error types for the media indexer

use std::path::PathBuf;
use thiserror::Error;

/// Error kinds that can occur while building or caching a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// Permission denied when accessing a file or directory
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// I/O error while enumerating a directory or reading metadata
    Io,
    /// Path could not be interpreted (e.g. not relative to the scan root)
    InvalidPath,
    /// Snapshot cache write failed
    Cache,
    /// Scan was cancelled before completion
    Cancelled,
}

/// Represents a fatal error raised during a scan or cache operation
#[derive(Debug, Error)]
#[error("{kind:?}: {message} (path: {path:?})")]
pub struct ScanError {
    /// The kind of error
    pub kind: ScanErrorKind,
    /// The path where the error occurred
    pub path: Option<PathBuf>,
    /// Human-readable error message
    pub message: String,
}

impl ScanError {
    /// Create a new scan error
    pub fn new(kind: ScanErrorKind, path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(path: PathBuf) -> Self {
        Self::new(
            ScanErrorKind::NotFound,
            Some(path.clone()),
            format!("not found: {}", path.display()),
        )
    }

    /// Directory enumeration failed (fatal to the scan)
    pub fn enumeration(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::new(
            kind_for_io(&err),
            Some(path.to_path_buf()),
            format!("failed to enumerate {}: {}", path.display(), err),
        )
    }

    /// Metadata lookup for an entry failed (fatal to the scan)
    pub fn metadata(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::new(
            kind_for_io(&err),
            Some(path.to_path_buf()),
            format!("failed to read metadata for {}: {}", path.display(), err),
        )
    }

    /// Create an invalid path error
    pub fn invalid_path(path: &std::path::Path, message: impl Into<String>) -> Self {
        Self::new(ScanErrorKind::InvalidPath, Some(path.to_path_buf()), message)
    }

    /// Create a cache write error
    pub fn cache(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(ScanErrorKind::Cache, path, message)
    }

    /// Create a cancellation error
    pub fn cancelled() -> Self {
        Self::new(ScanErrorKind::Cancelled, None, "scan cancelled")
    }
}

fn kind_for_io(err: &std::io::Error) -> ScanErrorKind {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => ScanErrorKind::PermissionDenied,
        std::io::ErrorKind::NotFound => ScanErrorKind::NotFound,
        _ => ScanErrorKind::Io,
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        Self::new(kind_for_io(&err), None, err.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        Self::cache(None, err.to_string())
    }
}
