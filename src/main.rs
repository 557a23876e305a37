//! Media index CLI
//!
//! Indexes a media directory tree and persists the result as a JSON
//! snapshot keyed by the root path.

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use media_index::{ScanConfig, ScanSummary, SnapshotCache};

/// Index a media directory tree into a cached JSON snapshot
#[derive(Parser)]
#[command(name = "media_index")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory tree and persist a snapshot
    Scan {
        /// Root directory to scan
        #[arg(short, long)]
        root: PathBuf,

        /// Directory for snapshot cache files
        #[arg(short = 'c', long, default_value = "static")]
        cache_dir: PathBuf,

        /// Worker threads (0 = auto-detect)
        #[arg(short, long, default_value = "0")]
        threads: usize,

        /// URL prefix for asset URLs
        #[arg(long, default_value = "/static")]
        url_prefix: String,

        /// Skip image dimension probing
        #[arg(long)]
        no_probe: bool,

        /// Do not persist a snapshot
        #[arg(long)]
        no_cache: bool,

        /// Emit JSON progress messages on stderr
        #[arg(long)]
        progress: bool,

        /// Print the full tree as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print a previously persisted snapshot
    Show {
        /// Root directory the snapshot was scanned from
        #[arg(short, long)]
        root: PathBuf,

        /// Directory for snapshot cache files
        #[arg(short = 'c', long, default_value = "static")]
        cache_dir: PathBuf,

        /// Print the full tree as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            root,
            cache_dir,
            threads,
            url_prefix,
            no_probe,
            no_cache,
            progress,
            json,
        } => {
            let config = ScanConfig::builder(root)
                .cache_dir(&cache_dir)
                .num_threads(threads)
                .url_prefix(url_prefix)
                .probe_dimensions(!no_probe)
                .show_progress(progress)
                .build();

            let outcome = match media_index::scan(&config) {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!("scan failed: {err}");
                    return ExitCode::FAILURE;
                }
            };

            if !no_cache {
                let cache = SnapshotCache::new(&config.cache_dir);
                if let Err(err) = cache.save(config.root(), &outcome.files) {
                    error!("failed to persist snapshot: {err}");
                    return ExitCode::FAILURE;
                }
                info!(
                    "snapshot written to {}",
                    cache.snapshot_path(config.root()).display()
                );
            }

            if json {
                print_tree(&outcome.files)
            } else {
                print_summary(&outcome.summary);
                ExitCode::SUCCESS
            }
        }
        Commands::Show {
            root,
            cache_dir,
            json,
        } => {
            let cache = SnapshotCache::new(&cache_dir);
            let files = cache.load(&root);

            if json {
                return print_tree(&files);
            }
            if files.is_empty() {
                println!("No snapshot for {}", root.display());
            } else {
                print_summary(&ScanSummary::from_nodes(&files, 0));
            }
            ExitCode::SUCCESS
        }
    }
}

fn print_tree(files: &[media_index::FileNode]) -> ExitCode {
    match serde_json::to_string_pretty(files) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("failed to serialize tree: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(summary: &ScanSummary) {
    println!("Scan completed:");
    println!("  Files:       {}", summary.total_files);
    println!("  Directories: {}", summary.total_dirs);
    println!("  Images:      {}", summary.image_count);
    println!("  Videos:      {}", summary.video_count);
    println!("  Other:       {}", summary.other_count);
    println!("  Total bytes: {}", summary.total_bytes);
    println!("  Duration:    {}ms", summary.duration_ms);
}
