//! Typing speed over time.
//!
//! Keystrokes are collected into fixed-duration windows (default 5 minutes)
//! and each window is turned into a words-per-minute figure. Windows are
//! aligned to the first keystroke they contain, so a long pause never yields
//! a run of empty windows.

use crate::collector::types::KeystrokeEvent;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Characters counted as one word.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Default rate window used by the report pipeline.
pub const DEFAULT_RATE_WINDOW_SECS: i64 = 300;

/// Typing speed for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WpmPoint {
    /// Start time of the window
    pub timestamp: DateTime<Utc>,
    /// Words per minute, rounded to one decimal
    pub wpm: f64,
}

/// A time window of keystrokes being counted.
#[derive(Debug, Clone)]
pub struct RateWindow {
    /// Start time of the window
    pub start: DateTime<Utc>,
    /// Configured length of the window
    pub duration: Duration,
    /// Keystrokes in this window, deletions included
    pub event_count: usize,
    /// Keystrokes that produced a character
    pub char_count: usize,
}

impl RateWindow {
    /// Create a new empty window starting at the given time.
    pub fn new(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            duration,
            event_count: 0,
            char_count: 0,
        }
    }

    /// End of the window (exclusive), or `None` when it lies beyond the
    /// representable range and the window never closes.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.start.checked_add_signed(self.duration)
    }

    /// Whether a keystroke at `timestamp` lies past the end of this window.
    pub fn is_past(&self, timestamp: DateTime<Utc>) -> bool {
        self.end().is_some_and(|end| timestamp >= end)
    }

    /// Count a keystroke into this window.
    pub fn add_event(&mut self, event: &KeystrokeEvent) {
        self.event_count += 1;
        if !event.is_deletion {
            self.char_count += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }

    /// Get the duration of this window in minutes.
    pub fn duration_minutes(&self) -> f64 {
        self.duration.num_milliseconds() as f64 / 60_000.0
    }

    /// Words per minute over the configured window length.
    pub fn words_per_minute(&self) -> f64 {
        let minutes = self.duration_minutes();
        if minutes <= 0.0 {
            return 0.0;
        }
        (self.char_count as f64 / CHARS_PER_WORD) / minutes
    }

    fn to_point(&self) -> WpmPoint {
        WpmPoint {
            timestamp: self.start,
            wpm: round_to(self.words_per_minute(), 1),
        }
    }
}

/// Compute typing speed per window over an ordered keystroke sequence.
///
/// A keystroke at or past the current window's end closes it and opens the
/// next window at that keystroke's timestamp. The last window is emitted even
/// when partial. Rates always use the configured window length.
pub fn words_per_minute_over_time(events: &[KeystrokeEvent], window: Duration) -> Vec<WpmPoint> {
    let mut points = Vec::new();
    let mut current: Option<RateWindow> = None;

    for event in events {
        if let Some(open) = current.as_mut() {
            if !open.is_past(event.timestamp) {
                open.add_event(event);
                continue;
            }
            points.push(open.to_point());
        }

        let mut next = RateWindow::new(event.timestamp, window);
        next.add_event(event);
        current = Some(next);
    }

    if let Some(last) = current.filter(|w| !w.is_empty()) {
        points.push(last.to_point());
    }

    tracing::debug!(windows = points.len(), "computed typing speed windows");
    points
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
