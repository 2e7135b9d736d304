//! Typing Rhythm - keystroke timing recorder and typing statistics.
//!
//! This library records keyboard timing metadata to append-only daily logs
//! and derives typing statistics from them: speed over time, the distribution
//! of inter-keystroke intervals, and typing bursts.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Typing Rhythm                           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌──────────────────┐        │
//! │  │  Collector  │──▶│   Stamper   │──▶│  DailyLogWriter  │        │
//! │  │ (key names) │   │ (elapsed ms)│   │ (batched CSV)    │        │
//! │  └─────────────┘   └─────────────┘   └──────────────────┘        │
//! │                                               │                  │
//! │                                               ▼                  │
//! │  ┌─────────────┐   ┌─────────────────────────────────────┐       │
//! │  │   Report    │◀──│ speed windows │ timing dist │ bursts │       │
//! │  │   (JSON)    │   └─────────────────────────────────────┘       │
//! │  └─────────────┘                                                 │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use typing_rhythm::{config::Config, core::ReportBuilder, storage};
//!
//! let config = Config::load().unwrap_or_default();
//! let events = storage::load_all_keystrokes(&config.raw_dir()).unwrap();
//!
//! let report = ReportBuilder::new().build(&events, chrono::Utc::now());
//! println!("{} bursts", report.summary.total_bursts);
//! ```

pub mod collector;
pub mod config;
pub mod core;
pub mod storage;
pub mod transparency;

// Re-export key types at crate root for convenience
pub use collector::{KeyPress, KeystrokeEvent, LineCollector, Stamper};
pub use config::{Config, ConfigError};
pub use self::core::{
    detect_bursts, timing_distribution, words_per_minute_over_time, Burst, ReportBuilder,
    StatsReport, TimingDistribution, WpmPoint,
};
pub use storage::{load_all_keystrokes, DailyLogWriter, LogError};
pub use transparency::{RecorderLog, RecorderStats, SharedRecorderLog};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Data declaration that can be displayed to users.
pub const DATA_DECLARATION: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║             TYPING RHYTHM - DATA DECLARATION                     ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  This recorder captures keystroke timing for typing statistics.  ║
║                                                                  ║
║  ✓ WHAT WE RECORD, PER KEY PRESS:                                ║
║    • When the key was pressed                                    ║
║    • Which key it was (lowercased, or a name like "enter")       ║
║    • Milliseconds since the previous key press                   ║
║    • Whether it was a backspace                                  ║
║                                                                  ║
║  ✗ WHAT WE NEVER RECORD:                                         ║
║    • Which application had focus                                 ║
║    • Key releases, modifiers held, or clipboard contents         ║
║    • Any screen content                                          ║
║                                                                  ║
║  Logs stay on this machine, one CSV file per day. Reports only   ║
║  contain aggregate statistics, never key names.                  ║
║                                                                  ║
║  You can view collection statistics anytime with:                ║
║    typing-rhythm status                                          ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_declaration_contents() {
        assert!(DATA_DECLARATION.contains("DATA DECLARATION"));
        assert!(DATA_DECLARATION.contains("NEVER RECORD"));
        assert!(DATA_DECLARATION.contains("backspace"));
    }
}
