//! Configuration for the media indexer

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default URL prefix for asset URLs
pub const DEFAULT_URL_PREFIX: &str = "/static";

/// Default directory for snapshot cache files
pub const DEFAULT_CACHE_DIR: &str = "static";

/// Default minimum interval between progress messages (milliseconds)
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 500;

/// Entries whose name ends with this literal suffix are excluded from scans
pub const WILDCARD_EXCLUDE_SUFFIX: &str = ".*";

/// Configuration for a scan.
///
/// The root path is explicit configuration, never ambient process state, so
/// multiple roots can be scanned and cached concurrently without cross-talk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root directory to scan
    pub root: PathBuf,

    /// Extra literal entry names to exclude, on top of the dot-prefix and
    /// wildcard rules
    pub exclude_names: HashSet<String>,

    /// Prefix prepended to a pathname to form an asset URL
    pub url_prefix: String,

    /// Directory where snapshot cache files live
    pub cache_dir: PathBuf,

    /// Number of threads for parallel scanning
    /// 0 means auto-detect (CPU cores × 2)
    pub num_threads: usize,

    /// Whether to probe image files for their pixel dimensions
    pub probe_dimensions: bool,

    /// Whether to emit progress messages on stderr
    pub show_progress: bool,

    /// Minimum interval between progress messages (milliseconds)
    pub progress_interval_ms: u64,
}

impl ScanConfig {
    /// Create a config for the given root with defaults everywhere else
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_names: Self::default_exclude_names(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            num_threads: 0,
            probe_dimensions: true,
            show_progress: false,
            progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
        }
    }

    /// Create a config builder
    pub fn builder(root: impl Into<PathBuf>) -> ScanConfigBuilder {
        ScanConfigBuilder::new(root)
    }

    /// Get the default literal names to exclude
    pub fn default_exclude_names() -> HashSet<String> {
        [
            "$RECYCLE.BIN",
            "System Volume Information",
            "@eaDir",
            "node_modules",
            "__pycache__",
            "lost+found",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Check if an entry name is excluded from the tree.
    ///
    /// Dot-prefixed names, names ending in the wildcard suffix, and
    /// configured literal names never appear.
    pub fn should_exclude(&self, name: &str) -> bool {
        name.starts_with('.')
            || name.ends_with(WILDCARD_EXCLUDE_SUFFIX)
            || self.exclude_names.contains(name)
    }

    /// Build an asset URL from a root-relative pathname
    pub fn asset_url(&self, pathname: &str) -> String {
        format!("{}{}", self.url_prefix, pathname)
    }

    /// Get the effective number of scan threads
    pub fn effective_threads(&self) -> usize {
        if self.num_threads == 0 {
            // Auto-detect: CPU cores × 2, the walk is I/O bound
            std::thread::available_parallelism()
                .map(|p| p.get() * 2)
                .unwrap_or(4)
        } else {
            self.num_threads
        }
    }

    /// Root path as given by the caller
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Builder for ScanConfig
#[derive(Debug)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// Create a new builder for the given root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: ScanConfig::new(root),
        }
    }

    /// Replace the excluded literal names
    pub fn exclude_names(mut self, names: HashSet<String>) -> Self {
        self.config.exclude_names = names;
        self
    }

    /// Add a literal name to exclude
    pub fn add_exclude_name(mut self, name: impl Into<String>) -> Self {
        self.config.exclude_names.insert(name.into());
        self
    }

    /// Set the URL prefix for asset URLs
    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.url_prefix = prefix.into();
        self
    }

    /// Set the snapshot cache directory
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    /// Set the number of scan threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Enable or disable image dimension probing
    pub fn probe_dimensions(mut self, enabled: bool) -> Self {
        self.config.probe_dimensions = enabled;
        self
    }

    /// Enable or disable stderr progress messages
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.config.show_progress = enabled;
        self
    }

    /// Set the minimum interval between progress messages
    pub fn progress_interval_ms(mut self, interval: u64) -> Self {
        self.config.progress_interval_ms = interval;
        self
    }

    /// Build the config
    pub fn build(self) -> ScanConfig {
        self.config
    }
}
