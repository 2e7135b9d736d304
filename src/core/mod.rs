//! Typing statistics core.
//!
//! This module contains:
//! - Typing speed over fixed time windows
//! - The inter-keystroke timing distribution
//! - Burst detection
//! - The report combining all three
//!
//! Everything here is a pure function of an in-memory, ordered keystroke
//! slice. Nothing reads the clock or touches the file system.

pub mod bursts;
pub mod report;
pub mod timing;
pub mod windowing;

// Re-export commonly used types
pub use bursts::{detect_bursts, Burst, DEFAULT_BURST_THRESHOLD_MS, MIN_BURST_KEYSTROKES};
pub use report::{
    ReportBuilder, ReportSummary, StatsReport, DEFAULT_BURST_HISTORY, DEFAULT_WPM_HISTORY,
};
pub use timing::{timing_distribution, TimingDistribution, TimingPercentiles};
pub use windowing::{words_per_minute_over_time, RateWindow, WpmPoint, CHARS_PER_WORD};
