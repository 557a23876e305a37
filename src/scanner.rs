//! Tree builder - recursive, parallel directory indexing
//!
//! Walks a root depth-first, producing an owned child sequence per
//! directory. Every directory fans its entries out across the worker pool
//! and joins them back before its own size is aggregated, so no subtree
//! shares mutable state with a sibling. Only dimension-probe failures are
//! recovered locally; any enumeration or metadata failure aborts the whole
//! scan.

use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Instant, UNIX_EPOCH};

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanErrorKind};
use crate::hash;
use crate::models::{AssetNode, Dimensions, DirectoryNode, FileNode, MediaKind, ScanSummary};
use crate::probe;
use crate::progress::{ProgressReporter, ScanCounters};

/// Cooperative cancellation signal for a running scan.
///
/// Once raised, the scan stops issuing new directory, metadata, and probe
/// operations; in-flight ones finish and their partial subtrees are
/// discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unraised flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether the flag has been raised
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A finished scan: the tree plus totals over it
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Top-level child sequence of the scanned root
    pub files: Vec<FileNode>,
    /// Totals computed over the finished tree
    pub summary: ScanSummary,
}

/// Shared, read-mostly state for one scan invocation
struct ScanContext<'a> {
    config: &'a ScanConfig,
    cancel: &'a CancelFlag,
    /// Resolved real paths of every directory entered so far. A revisit
    /// means a symlink cycle or a duplicate alias; either way the directory
    /// is indexed only once per scan.
    visited: Mutex<HashSet<PathBuf>>,
    counters: ScanCounters,
    reporter: ProgressReporter,
}

impl ScanContext<'_> {
    fn ensure_not_cancelled(&self) -> Result<(), ScanError> {
        if self.cancel.is_cancelled() {
            Err(ScanError::cancelled())
        } else {
            Ok(())
        }
    }

    /// Record a directory's real path; false if it was already entered
    fn mark_visited(&self, real: PathBuf) -> bool {
        self.visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(real)
    }

    /// Root-relative pathname with a leading slash and forward slashes
    fn pathname(&self, path: &Path) -> Result<String, ScanError> {
        let rel = path
            .strip_prefix(&self.config.root)
            .map_err(|_| ScanError::invalid_path(path, "entry is outside the scan root"))?;
        Ok(format!("/{}", rel.to_string_lossy().replace('\\', "/")))
    }
}

/// Build the node tree for the configured root.
///
/// Returns the root's top-level child sequence; the tree is constructed
/// fresh on every call and is immutable once returned.
pub fn build(config: &ScanConfig) -> Result<Vec<FileNode>, ScanError> {
    scan(config).map(|outcome| outcome.files)
}

/// Build the node tree, honoring a cancellation flag.
pub fn build_with_cancel(
    config: &ScanConfig,
    cancel: &CancelFlag,
) -> Result<Vec<FileNode>, ScanError> {
    scan_with_cancel(config, cancel).map(|outcome| outcome.files)
}

/// Build the node tree and compute totals over it.
pub fn scan(config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    scan_with_cancel(config, &CancelFlag::new())
}

/// Build the node tree and compute totals, honoring a cancellation flag.
pub fn scan_with_cancel(
    config: &ScanConfig,
    cancel: &CancelFlag,
) -> Result<ScanOutcome, ScanError> {
    let start = Instant::now();
    let root = config.root();

    if !root.exists() {
        return Err(ScanError::not_found(root.to_path_buf()));
    }
    let root_meta = fs::metadata(root).map_err(|e| ScanError::metadata(root, e))?;
    if !root_meta.is_dir() {
        return Err(ScanError::invalid_path(root, "scan root is not a directory"));
    }

    let ctx = ScanContext {
        config,
        cancel,
        visited: Mutex::new(HashSet::new()),
        counters: ScanCounters::new(),
        reporter: ProgressReporter::new(config.show_progress, config.progress_interval_ms),
    };

    // The root counts as visited up front so a descendant symlink pointing
    // back at it cannot recurse forever.
    let root_real = fs::canonicalize(root).map_err(|e| ScanError::metadata(root, e))?;
    ctx.mark_visited(root_real);

    ctx.reporter.report_start(config);
    log::info!("scanning {}", root.display());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.effective_threads())
        .build()
        .map_err(|e| ScanError::new(ScanErrorKind::Io, None, e.to_string()))?;

    match pool.install(|| scan_dir(&ctx, root)) {
        Ok(files) => {
            let summary = ScanSummary::from_nodes(&files, start.elapsed().as_millis() as u64);
            ctx.reporter.report_done(&summary);
            log::info!(
                "indexed {} files in {} directories ({} bytes) in {}ms",
                summary.total_files,
                summary.total_dirs,
                summary.total_bytes,
                summary.duration_ms
            );
            Ok(ScanOutcome { files, summary })
        }
        Err(err) => {
            ctx.reporter.report_error(&err);
            Err(err)
        }
    }
}

/// Sum the sizes of a directory's finished children.
///
/// Post-order join point: call only once every child subtree has fully
/// resolved.
pub fn aggregate_size(children: &[FileNode]) -> u64 {
    children.iter().map(FileNode::size).sum()
}

/// Enumerate one directory and scan its surviving entries in parallel.
///
/// `collect` joins the per-entry tasks back in enumeration order, so the
/// child sequence matches what the directory listing returned even when the
/// entries were processed out of order.
fn scan_dir(ctx: &ScanContext<'_>, dir: &Path) -> Result<Vec<FileNode>, ScanError> {
    ctx.ensure_not_cancelled()?;

    let mut entries: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ScanError::enumeration(dir, e))? {
        let entry = entry.map_err(|e| ScanError::enumeration(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if ctx.config.should_exclude(&name) {
            continue;
        }
        entries.push((name, entry.path()));
    }

    let children = entries
        .into_par_iter()
        .map(|(name, path)| scan_entry(ctx, name, &path))
        .collect::<Result<Vec<Option<FileNode>>, ScanError>>()?;

    Ok(children.into_iter().flatten().collect())
}

/// Scan a single surviving entry into a node.
///
/// Returns `Ok(None)` for directories skipped by the cycle guard.
fn scan_entry(
    ctx: &ScanContext<'_>,
    name: String,
    path: &Path,
) -> Result<Option<FileNode>, ScanError> {
    ctx.ensure_not_cancelled()?;

    // Follows symlinks: a linked entry is indexed as whatever it points at.
    let metadata = fs::metadata(path).map_err(|e| ScanError::metadata(path, e))?;
    let pathname = ctx.pathname(path)?;
    let hash = hash::digest_path(path);
    let timestamp = timestamp_millis(&metadata);

    if metadata.is_dir() {
        let real = fs::canonicalize(path).map_err(|e| ScanError::metadata(path, e))?;
        if !ctx.mark_visited(real) {
            log::warn!(
                "skipping {}: already indexed (symlink cycle or alias)",
                path.display()
            );
            return Ok(None);
        }

        ctx.counters.record_dir();
        ctx.reporter
            .report_progress(&ctx.counters, &path.to_string_lossy());

        let files = scan_dir(ctx, path)?;
        let size = aggregate_size(&files);
        Ok(Some(FileNode::Directory(DirectoryNode {
            name,
            pathname,
            hash,
            timestamp,
            size,
            files,
        })))
    } else {
        let media_kind = MediaKind::from_path(path);
        let dimensions = if media_kind == MediaKind::Image && ctx.config.probe_dimensions {
            // Probe failures are contained: the asset keeps its
            // extension-derived kind and sentinel dimensions.
            probe::probe(path).unwrap_or_else(|err| {
                log::warn!("{err}");
                Dimensions::unknown()
            })
        } else {
            Dimensions::unknown()
        };

        let url = ctx.config.asset_url(&pathname);
        ctx.counters.record_asset(media_kind);

        Ok(Some(FileNode::Asset(AssetNode {
            name,
            pathname,
            hash,
            timestamp,
            size: metadata.len(),
            url,
            media_kind,
            dimensions,
        })))
    }
}

/// Creation time in epoch milliseconds, falling back to mtime on
/// filesystems without birth times.
fn timestamp_millis(metadata: &fs::Metadata) -> i64 {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
