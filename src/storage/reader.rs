//! Loading keystroke history back from the daily logs.

use crate::collector::types::KeystrokeEvent;
use crate::storage::row::{decode_row, CSV_HEADER};
use crate::storage::{LogError, LOG_FILE_EXTENSION, LOG_FILE_PREFIX};
use std::path::{Path, PathBuf};

/// List the keystroke log files in `dir`, sorted by name (and so by date).
///
/// A missing directory has no logs.
pub fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>, LogError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(LogError::io(dir, e)),
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_log_file(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Read every event from one log file, in file order.
pub fn read_log_file(path: &Path) -> Result<Vec<KeystrokeEvent>, LogError> {
    let content = std::fs::read_to_string(path).map_err(|e| LogError::io(path, e))?;

    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || (index == 0 && line == CSV_HEADER) {
            continue;
        }
        let event = decode_row(line).map_err(|message| LogError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            message,
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Load the whole keystroke history from `dir`.
///
/// Files are read in name order. A file that cannot be read or parsed is
/// skipped with a warning and the rest still load.
pub fn load_all_keystrokes(dir: &Path) -> Result<Vec<KeystrokeEvent>, LogError> {
    let mut events = Vec::new();
    for path in list_log_files(dir)? {
        match read_log_file(&path) {
            Ok(mut file_events) => {
                tracing::debug!(path = %path.display(), count = file_events.len(), "loaded log");
                events.append(&mut file_events);
            }
            Err(e) => tracing::warn!("Skipping unreadable keystroke log: {e}"),
        }
    }
    Ok(events)
}

fn is_log_file(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.starts_with(LOG_FILE_PREFIX) && name.ends_with(LOG_FILE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "typing-rhythm-reader-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_log(dir: &Path, name: &str, rows: &[&str]) {
        let mut content = format!("{CSV_HEADER}\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = std::env::temp_dir().join("typing-rhythm-reader-does-not-exist");
        assert!(load_all_keystrokes(&dir).unwrap().is_empty());
    }

    #[test]
    fn test_loads_files_in_date_order() {
        let dir = test_dir("order");
        write_log(
            &dir,
            "keystrokes_2024-03-02.csv",
            &["2024-03-02T10:00:00+00:00,c,0.00,0"],
        );
        write_log(
            &dir,
            "keystrokes_2024-03-01.csv",
            &[
                "2024-03-01T10:00:00+00:00,a,0.00,0",
                "2024-03-01T10:00:00.150+00:00,backspace,150.00,1",
            ],
        );
        std::fs::write(dir.join("notes.txt"), "not a log").unwrap();

        let events = load_all_keystrokes(&dir).unwrap();
        let keys: Vec<_> = events.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "backspace", "c"]);
        assert!(events[1].is_deletion);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bad_file_is_skipped() {
        let dir = test_dir("skip");
        write_log(
            &dir,
            "keystrokes_2024-03-01.csv",
            &["2024-03-01T10:00:00+00:00,a,0.00,0", "garbage"],
        );
        write_log(
            &dir,
            "keystrokes_2024-03-02.csv",
            &["2024-03-02T10:00:00+00:00,b,0.00,0"],
        );

        let err = read_log_file(&dir.join("keystrokes_2024-03-01.csv")).unwrap_err();
        assert!(matches!(err, LogError::Parse { line: 3, .. }));

        let events = load_all_keystrokes(&dir).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, "b");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
