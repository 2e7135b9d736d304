//! Buffered, append-only writer for the daily keystroke logs.

use crate::collector::types::KeystrokeEvent;
use crate::storage::row::{encode_row, CSV_HEADER};
use crate::storage::{log_file_name, LogError};
use chrono::{Local, NaiveDate};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default number of buffered keystrokes that triggers a flush.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default time between periodic flushes.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(60);

/// Appends keystrokes to `keystrokes_YYYY-MM-DD.csv` in batches.
///
/// Events are buffered in memory and written when the buffer reaches the
/// batch size or when the flush interval has passed. The target file follows
/// the local calendar date at flush time.
pub struct DailyLogWriter {
    dir: PathBuf,
    batch_size: usize,
    flush_interval: Duration,
    buffer: Vec<KeystrokeEvent>,
    current_date: Option<NaiveDate>,
    last_flush: Instant,
}

impl DailyLogWriter {
    /// Create a writer for the given raw log directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            buffer: Vec::new(),
            current_date: None,
            last_flush: Instant::now(),
        }
    }

    /// Set the batch size (at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the periodic flush interval.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Buffer an event, flushing if the batch is full.
    ///
    /// Returns the number of events written by this call.
    pub fn push(&mut self, event: KeystrokeEvent) -> Result<usize, LogError> {
        self.buffer.push(event);
        if self.buffer.len() >= self.batch_size {
            self.flush()
        } else {
            Ok(0)
        }
    }

    /// Whether the periodic flush is due.
    pub fn should_flush(&self) -> bool {
        !self.buffer.is_empty() && self.last_flush.elapsed() >= self.flush_interval
    }

    /// Number of events waiting to be written.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Write all buffered events to today's log file.
    ///
    /// On failure the buffer is kept so the next flush retries.
    pub fn flush(&mut self) -> Result<usize, LogError> {
        self.last_flush = Instant::now();
        let today = Local::now().date_naive();
        self.flush_to(today)
    }

    /// Write all buffered events to the log file of `date`.
    pub fn flush_to(&mut self, date: NaiveDate) -> Result<usize, LogError> {
        if self.buffer.is_empty() {
            return Ok(0);
        }
        if self.current_date != Some(date) {
            if self.current_date.is_some() {
                tracing::info!(%date, "rolling over to a new daily log");
            }
            self.current_date = Some(date);
        }

        let path = self.path_for(date);
        append_rows(&path, &self.buffer)?;

        let written = self.buffer.len();
        self.buffer.clear();
        tracing::debug!(written, path = %path.display(), "flushed keystrokes");
        Ok(written)
    }

    /// Path of the log file currently being written, if any flush happened.
    pub fn current_path(&self) -> Option<PathBuf> {
        self.current_date.map(|date| self.path_for(date))
    }

    fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(log_file_name(date))
    }
}

fn append_rows(path: &Path, events: &[KeystrokeEvent]) -> Result<(), LogError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| LogError::io(path, e))?;
    }

    let is_new = !path.exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LogError::io(path, e))?;

    let mut out = String::new();
    if is_new {
        tracing::info!(path = %path.display(), "creating keystroke log");
        out.push_str(CSV_HEADER);
        out.push('\n');
    }
    for event in events {
        out.push_str(&encode_row(event));
        out.push('\n');
    }

    file.write_all(out.as_bytes())
        .map_err(|e| LogError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::read_log_file;
    use chrono::Utc;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "typing-rhythm-writer-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn key(k: &str) -> KeystrokeEvent {
        KeystrokeEvent::new(Utc::now(), k, 42.0)
    }

    #[test]
    fn test_batches_flush_at_batch_size() {
        let dir = test_dir("batch");
        let mut writer = DailyLogWriter::new(&dir).with_batch_size(3);

        assert_eq!(writer.push(key("a")).unwrap(), 0);
        assert_eq!(writer.push(key("b")).unwrap(), 0);
        assert!(writer.current_path().is_none());
        assert_eq!(writer.push(key("c")).unwrap(), 3);
        assert_eq!(writer.pending(), 0);

        let path = writer.current_path().unwrap();
        let events = read_log_file(&path).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].key, "c");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_appends_with_single_header() {
        let dir = test_dir("append");
        let mut writer = DailyLogWriter::new(&dir);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        writer.push(key("a")).unwrap();
        writer.flush_to(date).unwrap();
        writer.push(key("backspace")).unwrap();
        writer.flush_to(date).unwrap();

        let path = dir.join("keystrokes_2024-03-01.csv");
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches(CSV_HEADER).count(), 1);
        assert_eq!(content.lines().count(), 3);

        let events = read_log_file(&path).unwrap();
        assert!(events[1].is_deletion);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_key_with_line_break_does_not_corrupt_file() {
        let dir = test_dir("linebreak");
        let mut writer = DailyLogWriter::new(&dir);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        for k in ["a", "x\ny", "b"] {
            writer.push(key(k)).unwrap();
        }
        assert_eq!(writer.flush_to(date).unwrap(), 3);

        let events = read_log_file(&dir.join("keystrokes_2024-03-01.csv")).unwrap();
        let keys: Vec<_> = events.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "key_x\\ny", "b"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rollover_to_new_date() {
        let dir = test_dir("rollover");
        let mut writer = DailyLogWriter::new(&dir);
        let day_one = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let day_two = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        writer.push(key("a")).unwrap();
        writer.flush_to(day_one).unwrap();
        writer.push(key("b")).unwrap();
        writer.flush_to(day_two).unwrap();

        assert_eq!(
            writer.current_path().unwrap(),
            dir.join("keystrokes_2024-03-02.csv")
        );
        assert!(dir.join("keystrokes_2024-03-01.csv").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_periodic_flush_due() {
        let dir = test_dir("periodic");
        let mut writer = DailyLogWriter::new(&dir).with_flush_interval(Duration::ZERO);

        assert!(!writer.should_flush());
        writer.push(key("a")).unwrap();
        assert!(writer.should_flush());
        writer.flush().unwrap();
        assert!(!writer.should_flush());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
