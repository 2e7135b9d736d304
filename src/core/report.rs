//! Typing statistics report.
//!
//! Combines typing speed, timing distribution and bursts into one JSON
//! document meant for display elsewhere (e.g. a website widget).

use crate::collector::types::KeystrokeEvent;
use crate::core::bursts::{detect_bursts, Burst, DEFAULT_BURST_THRESHOLD_MS};
use crate::core::timing::{timing_distribution, TimingDistribution};
use crate::core::windowing::{
    round_to, words_per_minute_over_time, WpmPoint, DEFAULT_RATE_WINDOW_SECS,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default number of most recent speed points kept in a report.
pub const DEFAULT_WPM_HISTORY: usize = 100;

/// Default number of most recent bursts kept in a report.
pub const DEFAULT_BURST_HISTORY: usize = 50;

/// Aggregates over the whole keystroke history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Mean of all window speeds, rounded to one decimal
    pub avg_wpm: f64,
    /// Number of bursts detected, including those not kept in the report
    pub total_bursts: usize,
    /// Mean keystrokes per burst, rounded to one decimal
    pub avg_burst_length: f64,
}

/// Persisted typing statistics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    /// When this report was generated
    pub last_updated: DateTime<Utc>,
    /// Number of keystrokes the report was computed from
    pub total_keystrokes: usize,
    /// Most recent typing speed windows
    pub wpm_over_time: Vec<WpmPoint>,
    /// Inter-keystroke timing distribution
    pub keystroke_timing: TimingDistribution,
    /// Most recent bursts
    pub burst_patterns: Vec<Burst>,
    pub summary: ReportSummary,
}

/// Builder for [`StatsReport`]s.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    rate_window: Duration,
    burst_threshold_ms: f64,
    wpm_history: usize,
    burst_history: usize,
}

impl ReportBuilder {
    /// Create a builder with the default window, threshold and history sizes.
    pub fn new() -> Self {
        Self {
            rate_window: Duration::seconds(DEFAULT_RATE_WINDOW_SECS),
            burst_threshold_ms: DEFAULT_BURST_THRESHOLD_MS,
            wpm_history: DEFAULT_WPM_HISTORY,
            burst_history: DEFAULT_BURST_HISTORY,
        }
    }

    /// Set the typing speed window length.
    pub fn with_rate_window(mut self, window: Duration) -> Self {
        self.rate_window = window;
        self
    }

    /// Set the burst gap threshold.
    pub fn with_burst_threshold_ms(mut self, threshold_ms: f64) -> Self {
        self.burst_threshold_ms = threshold_ms;
        self
    }

    /// Set how many of the most recent speed points and bursts are kept.
    pub fn with_history(mut self, wpm_points: usize, bursts: usize) -> Self {
        self.wpm_history = wpm_points;
        self.burst_history = bursts;
        self
    }

    /// Build a report from an ordered keystroke history.
    pub fn build(&self, events: &[KeystrokeEvent], generated_at: DateTime<Utc>) -> StatsReport {
        let wpm_over_time = words_per_minute_over_time(events, self.rate_window);
        let keystroke_timing = timing_distribution(events);
        let bursts = detect_bursts(events, self.burst_threshold_ms);

        let avg_wpm = mean(wpm_over_time.iter().map(|p| p.wpm));
        let avg_burst_length = mean(bursts.iter().map(|b| b.keystrokes as f64));

        let summary = ReportSummary {
            avg_wpm: round_to(avg_wpm, 1),
            total_bursts: bursts.len(),
            avg_burst_length: round_to(avg_burst_length, 1),
        };

        StatsReport {
            last_updated: generated_at,
            total_keystrokes: events.len(),
            wpm_over_time: tail(wpm_over_time, self.wpm_history),
            keystroke_timing,
            burst_patterns: tail(bursts, self.burst_history),
            summary,
        }
    }

    /// Build a report and serialize it to pretty JSON.
    pub fn build_json(
        &self,
        events: &[KeystrokeEvent],
        generated_at: DateTime<Utc>,
    ) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.build(events, generated_at))
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Keep only the last `n` items.
fn tail<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    let skip = items.len().saturating_sub(n);
    items.drain(..skip);
    items
}
