//! Recorder activity log.
//!
//! Tracks how much the recorder has captured and written so the user can see
//! at any time what has been collected. Counters accumulate across sessions
//! when persistence is enabled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Activity counters for the recorder.
#[derive(Debug)]
pub struct RecorderLog {
    /// Number of keystrokes recorded
    keystrokes: AtomicU64,
    /// Number of those keystrokes that were deletions
    deletions: AtomicU64,
    /// Number of batches written to the daily logs
    batches_flushed: AtomicU64,
    /// Number of statistics reports generated
    reports_generated: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl RecorderLog {
    /// Create a new recorder log.
    pub fn new() -> Self {
        Self {
            keystrokes: AtomicU64::new(0),
            deletions: AtomicU64::new(0),
            batches_flushed: AtomicU64::new(0),
            reports_generated: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a recorder log that continues from the counters saved at `path`.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        if let Err(e) = log.load() {
            tracing::warn!("Could not load previous recorder stats: {e}");
        }

        log
    }

    /// Record a keystroke.
    pub fn record_keystroke(&self, is_deletion: bool) {
        self.keystrokes.fetch_add(1, Ordering::Relaxed);
        if is_deletion {
            self.deletions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a batch written to disk.
    pub fn record_batch_flushed(&self) {
        self.batches_flushed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a generated report.
    pub fn record_report_generated(&self) {
        self.reports_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> RecorderStats {
        RecorderStats {
            keystrokes: self.keystrokes.load(Ordering::Relaxed),
            deletions: self.deletions.load(Ordering::Relaxed),
            batches_flushed: self.batches_flushed.load(Ordering::Relaxed),
            reports_generated: self.reports_generated.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Recorder Statistics:\n\
             - Keystrokes recorded: {}\n\
             - Deletions recorded: {}\n\
             - Batches flushed: {}\n\
             - Reports generated: {}\n\
             - Session duration: {} seconds\n\
             \n\
             Recorded per keystroke:\n\
             - Key name and timestamp\n\
             - Milliseconds since the previous key\n\
             - Whether the key was a backspace",
            stats.keystrokes,
            stats.deletions,
            stats.batches_flushed,
            stats.reports_generated,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                keystrokes: stats.keystrokes,
                deletions: stats.deletions,
                batches_flushed: stats.batches_flushed,
                reports_generated: stats.reports_generated,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let persisted = read_persisted(path)?;

                self.keystrokes
                    .store(persisted.keystrokes, Ordering::Relaxed);
                self.deletions.store(persisted.deletions, Ordering::Relaxed);
                self.batches_flushed
                    .store(persisted.batches_flushed, Ordering::Relaxed);
                self.reports_generated
                    .store(persisted.reports_generated, Ordering::Relaxed);
            }
        }
        Ok(())
    }
}

impl Default for RecorderLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of recorder statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderStats {
    pub keystrokes: u64,
    pub deletions: u64,
    pub batches_flushed: u64,
    pub reports_generated: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedStats {
    pub keystrokes: u64,
    pub deletions: u64,
    pub batches_flushed: u64,
    pub reports_generated: u64,
    pub last_updated: DateTime<Utc>,
}

/// Read persisted recorder statistics without starting a session.
pub fn read_persisted(path: &std::path::Path) -> Result<PersistedStats, std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(std::io::Error::other)
}

/// Thread-safe shared recorder log.
pub type SharedRecorderLog = Arc<RecorderLog>;

/// Create a new shared recorder log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedRecorderLog {
    Arc::new(RecorderLog::with_persistence(path))
}
