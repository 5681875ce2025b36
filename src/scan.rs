//! Batch extraction over files and directories with Rayon
//!
//! Collects image files from the given inputs, extracts metadata from
//! each in parallel and reports one [`ScanRecord`] per file.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::metadata::{self, ExtractOptions, GeoTimestamp};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Level, debug, info, span, warn};
use walkdir::WalkDir;

/// Outcome of scanning a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// Both GPS and capture time were found
    Complete,
    /// At least one field fell back to its default
    Partial,
    /// The file could not be read
    Failed,
}

/// Result of scanning a single file
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub source: PathBuf,
    pub status: ScanStatus,
    /// Populated unless the file itself was unreadable
    pub metadata: Option<GeoTimestamp>,
    /// Absorbed extraction conditions, or the read error
    pub issues: Vec<String>,
}

/// Scan statistics
#[derive(Debug, Default)]
pub struct ScanStats {
    pub total_files: AtomicUsize,
    pub with_location: AtomicUsize,
    pub with_timestamp: AtomicUsize,
    pub failed: AtomicUsize,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, With location: {}, With capture time: {}, Failed: {}",
            self.total_files.load(Ordering::Relaxed),
            self.with_location.load(Ordering::Relaxed),
            self.with_timestamp.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed)
        )
    }
}

/// Batch metadata scanner
pub struct Scanner {
    config: Config,
    stats: ScanStats,
}

impl Scanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: Config) -> Self {
        if config.threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .build_global()
                .ok(); // Ignore if already initialized
        }

        Self {
            config,
            stats: ScanStats::new(),
        }
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Scan all inputs, returning records in path order
    pub fn run(&self, inputs: &[PathBuf]) -> Result<Vec<ScanRecord>> {
        let _span = span!(Level::INFO, "scanner_run").entered();

        let files = self.collect_files(inputs)?;
        info!(count = files.len(), "Found image files");
        self.stats.total_files.store(files.len(), Ordering::Relaxed);

        let options = ExtractOptions {
            hemisphere: self.config.hemisphere,
        };
        let today = metadata::timestamp::today();

        let records: Vec<ScanRecord> = files
            .par_iter()
            .map(|path| {
                let _file_span = span!(Level::DEBUG, "scan_file", ?path).entered();
                scan_single_file(path, &options, today, &self.stats)
            })
            .collect();

        info!("{}", self.stats.summary());
        Ok(records)
    }

    /// Expand inputs into a sorted, de-duplicated list of image files.
    /// Explicit file arguments are kept regardless of their extension.
    pub fn collect_files(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in inputs {
            if input.is_file() {
                files.push(input.clone());
                continue;
            }
            if !input.exists() {
                warn!(?input, "Input does not exist, skipping");
                continue;
            }

            for entry in WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_entry(|e| !self.is_excluded_dir(e.path()))
            {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(error = %Error::from(e), "Skipping unreadable entry");
                        continue;
                    }
                };
                let path = entry.path();
                if path.is_file()
                    && let Some(ext) = path.extension().and_then(|e| e.to_str())
                    && self.config.is_image(ext)
                {
                    files.push(path.to_path_buf());
                }
            }
        }

        files.sort();
        files.dedup();
        debug!(count = files.len(), "Collected files");
        Ok(files)
    }

    /// Check if a path should be excluded based on exclude_dirs configuration
    fn is_excluded_dir(&self, path: &Path) -> bool {
        self.config.exclude_dirs.iter().any(|exclude| {
            if exclude.is_absolute() {
                path.starts_with(exclude)
            } else {
                exclude.file_name().is_some_and(|name| {
                    path.components().any(|component| {
                        matches!(component, std::path::Component::Normal(c) if c == name)
                    })
                })
            }
        })
    }
}

fn scan_single_file(
    path: &Path,
    options: &ExtractOptions,
    today: NaiveDate,
    stats: &ScanStats,
) -> ScanRecord {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let error = Error::ImageRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            };
            warn!(error = %error, "Failed to read file");
            stats.failed.fetch_add(1, Ordering::Relaxed);
            return ScanRecord {
                source: path.to_path_buf(),
                status: ScanStatus::Failed,
                metadata: None,
                issues: vec![error.to_string()],
            };
        }
    };

    let extraction = metadata::extract_with(&bytes, options);
    let has_location = extraction.location.is_some();
    let has_timestamp = extraction.captured_at.is_some();

    if has_location {
        stats.with_location.fetch_add(1, Ordering::Relaxed);
    }
    if has_timestamp {
        stats.with_timestamp.fetch_add(1, Ordering::Relaxed);
    }

    let status = if has_location && has_timestamp {
        ScanStatus::Complete
    } else {
        ScanStatus::Partial
    };
    let issues = extraction.issues.iter().map(ToString::to_string).collect();
    debug!(?status, "Scanned file");

    ScanRecord {
        source: path.to_path_buf(),
        status,
        metadata: Some(extraction.into_geo_timestamp(today)),
        issues,
    }
}
