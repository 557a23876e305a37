//! Progress reporting for scan operations
//!
//! Line-delimited JSON messages on stderr so an external caller (e.g. a
//! supervising server process) can follow a scan without consuming its
//! stdout result. Counters are atomic: scan workers on multiple threads
//! update them directly.

use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::models::{MediaKind, ScanSummary};

/// Running totals updated by scan workers
#[derive(Debug, Default)]
pub struct ScanCounters {
    /// Asset nodes produced so far
    pub files: AtomicU64,
    /// Directory nodes entered so far
    pub dirs: AtomicU64,
    /// Image assets seen
    pub images: AtomicU64,
    /// Video assets seen
    pub videos: AtomicU64,
    /// Other assets seen
    pub others: AtomicU64,
}

impl ScanCounters {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one asset of the given kind
    pub fn record_asset(&self, kind: MediaKind) {
        self.files.fetch_add(1, Ordering::Relaxed);
        match kind {
            MediaKind::Image => self.images.fetch_add(1, Ordering::Relaxed),
            MediaKind::Video => self.videos.fetch_add(1, Ordering::Relaxed),
            MediaKind::Other => self.others.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record one entered directory
    pub fn record_dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent-enough snapshot for reporting
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            files: self.files.load(Ordering::Relaxed),
            dirs: self.dirs.load(Ordering::Relaxed),
            images: self.images.load(Ordering::Relaxed),
            videos: self.videos.load(Ordering::Relaxed),
            others: self.others.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, Default)]
pub struct CountersSnapshot {
    pub files: u64,
    pub dirs: u64,
    pub images: u64,
    pub videos: u64,
    pub others: u64,
}

/// Start message sent when a scan begins
#[derive(Debug, Clone, Serialize)]
pub struct StartMessage {
    /// Message type identifier
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    /// Sequence number
    pub seq: u64,
    /// Milliseconds since reporter creation
    pub ts: u64,
    /// Scan root path
    pub root: String,
    /// Effective worker thread count
    pub threads: usize,
    /// Whether dimension probing is enabled
    pub probe: bool,
}

/// Progress message sent during a scan
#[derive(Debug, Clone, Serialize)]
pub struct ProgressMessage {
    /// Message type identifier ("p" for progress)
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    /// Sequence number
    pub seq: u64,
    /// Milliseconds since reporter creation
    pub ts: u64,
    /// Number of assets scanned
    #[serde(rename = "f")]
    pub files: u64,
    /// Number of directories entered
    #[serde(rename = "d")]
    pub dirs: u64,
    /// Image assets seen
    #[serde(rename = "i")]
    pub images: u64,
    /// Video assets seen
    #[serde(rename = "v")]
    pub videos: u64,
    /// Other assets seen
    #[serde(rename = "o")]
    pub others: u64,
    /// Directory currently being scanned
    pub dir: String,
}

/// Error message sent when a scan fails
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    /// Message type identifier ("err" for error)
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    /// Sequence number
    pub seq: u64,
    /// Milliseconds since reporter creation
    pub ts: u64,
    /// Error kind
    pub error_type: String,
    /// Error message description
    pub message: String,
    /// Path that caused the error (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Done message sent when a scan completes
#[derive(Debug, Clone, Serialize)]
pub struct DoneMessage {
    /// Message type identifier ("done" for completion)
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    /// Sequence number
    pub seq: u64,
    /// Milliseconds since reporter creation
    pub ts: u64,
    /// Total assets indexed
    #[serde(rename = "tf")]
    pub total_files: u64,
    /// Total directories indexed
    #[serde(rename = "td")]
    pub total_dirs: u64,
    /// Total bytes across all assets
    pub bytes: u64,
    /// Scan duration in milliseconds
    pub ms: u64,
}

/// Emits progress messages to stderr.
///
/// Rate-limited with an atomic claim on the last-report time so that any
/// number of scan workers can call it without a lock.
pub struct ProgressReporter {
    /// Whether progress reporting is enabled
    enabled: bool,
    /// Minimum interval between progress messages in milliseconds
    interval_ms: u64,
    /// Milliseconds-since-start of the last progress message
    last_report_ms: AtomicU64,
    /// Sequence number for messages
    seq: AtomicU64,
    /// Creation time of the reporter
    start_time: Instant,
}

impl ProgressReporter {
    /// Create a new ProgressReporter
    pub fn new(enabled: bool, interval_ms: u64) -> Self {
        Self {
            enabled,
            interval_ms,
            last_report_ms: AtomicU64::new(0),
            seq: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Check if the reporter is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the next sequence number (monotonically increasing)
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Milliseconds since reporter creation
    fn now_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Atomically claim the right to emit a progress message.
    ///
    /// Exactly one of the racing workers wins each interval window.
    fn try_claim_report(&self) -> bool {
        if !self.enabled {
            return false;
        }
        let now = self.now_ms();
        let last = self.last_report_ms.load(Ordering::Relaxed);
        now.saturating_sub(last) >= self.interval_ms
            && self
                .last_report_ms
                .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
    }

    /// Output a serializable message to stderr as JSON
    fn output_to_stderr<T: Serialize>(&self, msg: &T) {
        if let Ok(json) = serde_json::to_string(msg) {
            eprintln!("{}", json);
            std::io::stderr().flush().ok();
        }
    }

    /// Report scan start
    pub fn report_start(&self, config: &ScanConfig) {
        if !self.enabled {
            return;
        }

        let msg = StartMessage {
            msg_type: "start",
            seq: self.next_seq(),
            ts: self.now_ms(),
            root: config.root.to_string_lossy().into_owned(),
            threads: config.effective_threads(),
            probe: config.probe_dimensions,
        };
        self.output_to_stderr(&msg);
    }

    /// Report scan progress.
    ///
    /// Returns true if a message was actually sent (respects the interval).
    pub fn report_progress(&self, counters: &ScanCounters, current_dir: &str) -> bool {
        if !self.try_claim_report() {
            return false;
        }

        let snapshot = counters.snapshot();
        let msg = ProgressMessage {
            msg_type: "p",
            seq: self.next_seq(),
            ts: self.now_ms(),
            files: snapshot.files,
            dirs: snapshot.dirs,
            images: snapshot.images,
            videos: snapshot.videos,
            others: snapshot.others,
            dir: current_dir.to_string(),
        };
        self.output_to_stderr(&msg);
        true
    }

    /// Report a fatal scan error (ignores interval timing)
    pub fn report_error(&self, error: &ScanError) {
        if !self.enabled {
            return;
        }

        let msg = ErrorMessage {
            msg_type: "err",
            seq: self.next_seq(),
            ts: self.now_ms(),
            error_type: format!("{:?}", error.kind),
            message: error.message.clone(),
            path: error.path.as_ref().map(|p| p.to_string_lossy().into_owned()),
        };
        self.output_to_stderr(&msg);
    }

    /// Report scan completion
    pub fn report_done(&self, summary: &ScanSummary) {
        if !self.enabled {
            return;
        }

        let msg = DoneMessage {
            msg_type: "done",
            seq: self.next_seq(),
            ts: self.now_ms(),
            total_files: summary.total_files,
            total_dirs: summary.total_dirs,
            bytes: summary.total_bytes,
            ms: summary.duration_ms,
        };
        self.output_to_stderr(&msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_record() {
        let counters = ScanCounters::new();
        counters.record_dir();
        counters.record_asset(MediaKind::Image);
        counters.record_asset(MediaKind::Image);
        counters.record_asset(MediaKind::Video);
        counters.record_asset(MediaKind::Other);

        let snap = counters.snapshot();
        assert_eq!(snap.dirs, 1);
        assert_eq!(snap.files, 4);
        assert_eq!(snap.images, 2);
        assert_eq!(snap.videos, 1);
        assert_eq!(snap.others, 1);
    }

    #[test]
    fn test_start_message_serialization() {
        let msg = StartMessage {
            msg_type: "start",
            seq: 1,
            ts: 100,
            root: "/path/to/scan".to_string(),
            threads: 8,
            probe: true,
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();

        assert_eq!(parsed["_t"], "start");
        assert_eq!(parsed["seq"], 1);
        assert_eq!(parsed["root"], "/path/to/scan");
        assert_eq!(parsed["threads"], 8);
        assert_eq!(parsed["probe"], true);
    }

    #[test]
    fn test_progress_message_serialization() {
        let msg = ProgressMessage {
            msg_type: "p",
            seq: 2,
            ts: 200,
            files: 100,
            dirs: 10,
            images: 50,
            videos: 30,
            others: 20,
            dir: "/current/dir".to_string(),
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();

        assert_eq!(parsed["_t"], "p");
        assert_eq!(parsed["f"], 100);
        assert_eq!(parsed["d"], 10);
        assert_eq!(parsed["i"], 50);
        assert_eq!(parsed["v"], 30);
        assert_eq!(parsed["o"], 20);
        assert_eq!(parsed["dir"], "/current/dir");
    }

    #[test]
    fn test_error_message_without_path() {
        let msg = ErrorMessage {
            msg_type: "err",
            seq: 1,
            ts: 100,
            error_type: "Io".to_string(),
            message: "general IO error".to_string(),
            path: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("\"path\""));
    }

    #[test]
    fn test_done_message_serialization() {
        let msg = DoneMessage {
            msg_type: "done",
            seq: 10,
            ts: 5000,
            total_files: 1000,
            total_dirs: 100,
            bytes: 123_456,
            ms: 4500,
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();

        assert_eq!(parsed["_t"], "done");
        assert_eq!(parsed["tf"], 1000);
        assert_eq!(parsed["td"], 100);
        assert_eq!(parsed["bytes"], 123_456);
        assert_eq!(parsed["ms"], 4500);
    }

    #[test]
    fn test_reporter_disabled_never_reports() {
        let reporter = ProgressReporter::new(false, 0);
        let counters = ScanCounters::new();
        assert!(!reporter.is_enabled());
        assert!(!reporter.report_progress(&counters, "/dir"));
    }

    #[test]
    fn test_reporter_respects_interval() {
        let counters = ScanCounters::new();

        // Huge interval: nothing may be emitted inside the first window
        let reporter = ProgressReporter::new(true, 60_000);
        assert!(!reporter.report_progress(&counters, "/a"));
        assert!(!reporter.report_progress(&counters, "/b"));

        // Zero interval: every call reports
        let reporter = ProgressReporter::new(true, 0);
        assert!(reporter.report_progress(&counters, "/a"));
        assert!(reporter.report_progress(&counters, "/b"));
    }

    #[test]
    fn test_reporter_sequence_numbers() {
        let reporter = ProgressReporter::new(true, 0);
        assert_eq!(reporter.next_seq(), 0);
        assert_eq!(reporter.next_seq(), 1);
        assert_eq!(reporter.next_seq(), 2);
    }
}
