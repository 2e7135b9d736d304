//! Daily keystroke log storage.
//!
//! Keystrokes are appended to one CSV file per local calendar day,
//! `keystrokes_YYYY-MM-DD.csv`, and read back in date order when a report is
//! generated.

pub mod reader;
pub mod row;
pub mod writer;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use reader::{list_log_files, load_all_keystrokes, read_log_file};
pub use row::CSV_HEADER;
pub use writer::{DailyLogWriter, DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_INTERVAL};

/// File name prefix of the daily logs.
pub const LOG_FILE_PREFIX: &str = "keystrokes_";

/// File name extension of the daily logs.
pub const LOG_FILE_EXTENSION: &str = ".csv";

/// File name of the log for `date`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{LOG_FILE_PREFIX}{}{LOG_FILE_EXTENSION}", date.format("%Y-%m-%d"))
}

/// Keystroke log errors.
#[derive(Debug)]
pub enum LogError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl LogError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        LogError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::Io { path, source } => write!(f, "IO error on {}: {source}", path.display()),
            LogError::Parse {
                path,
                line,
                message,
            } => write!(f, "Parse error in {} line {line}: {message}", path.display()),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogError::Io { source, .. } => Some(source),
            LogError::Parse { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(log_file_name(date), "keystrokes_2024-01-09.csv");
    }
}
