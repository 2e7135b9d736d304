//! Configuration for the typing rhythm recorder.

use crate::core::windowing::DEFAULT_RATE_WINDOW_SECS;
use crate::core::{DEFAULT_BURST_HISTORY, DEFAULT_BURST_THRESHOLD_MS, DEFAULT_WPM_HISTORY};
use crate::storage::{DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_INTERVAL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the recorder and report generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory for keystroke logs and recorder state
    pub data_path: PathBuf,

    /// Where the statistics report is written
    pub report_path: PathBuf,

    /// Buffered keystrokes that trigger a flush
    pub batch_size: usize,

    /// Time between periodic flushes
    #[serde(with = "duration_serde")]
    pub flush_interval: Duration,

    /// Length of each typing speed window
    #[serde(with = "duration_serde")]
    pub rate_window: Duration,

    /// Gap below which keystrokes belong to one burst (milliseconds)
    pub burst_threshold_ms: f64,

    /// Most recent speed points kept in the report
    pub wpm_history_limit: usize,

    /// Most recent bursts kept in the report
    pub burst_history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typing-rhythm");

        Self {
            report_path: data_dir.join("typing_stats.json"),
            data_path: data_dir,
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            rate_window: Duration::from_secs(DEFAULT_RATE_WINDOW_SECS as u64),
            burst_threshold_ms: DEFAULT_BURST_THRESHOLD_MS,
            wpm_history_limit: DEFAULT_WPM_HISTORY,
            burst_history_limit: DEFAULT_BURST_HISTORY,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from JSON; missing fields take their defaults.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typing-rhythm")
            .join("config.json")
    }

    /// Directory holding the daily keystroke logs.
    pub fn raw_dir(&self) -> PathBuf {
        self.data_path.join("raw")
    }

    /// Directory for derived data.
    pub fn processed_dir(&self) -> PathBuf {
        self.data_path.join("processed")
    }

    /// File holding cumulative recorder statistics.
    pub fn recorder_stats_path(&self) -> PathBuf {
        self.data_path.join("recorder_stats.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(self.raw_dir())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        std::fs::create_dir_all(self.processed_dir())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
