//! Hierarchical media directory indexer
//!
//! Walks a filesystem subtree into a tree of directory and asset nodes,
//! computing stable path-identity hashes, extension-based media
//! classification, image dimensions and orientation, and bottom-up
//! aggregate directory sizes, then persists the tree as a keyed JSON
//! snapshot a presentation layer can serve without rescanning.

pub mod cache;
pub mod config;
pub mod error;
pub mod hash;
pub mod models;
pub mod probe;
pub mod progress;
pub mod scanner;

pub use cache::SnapshotCache;
pub use config::ScanConfig;
pub use error::{ScanError, ScanErrorKind};
pub use models::{
    AssetNode, Dimensions, DirectoryNode, FileNode, MediaKind, Orientation, ScanSummary,
};
pub use probe::ProbeError;
pub use progress::{ProgressReporter, ScanCounters};
pub use scanner::{
    aggregate_size, build, build_with_cancel, scan, scan_with_cancel, CancelFlag, ScanOutcome,
};
