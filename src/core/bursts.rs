//! Typing burst detection.
//!
//! A burst is a run of keystrokes that each follow the previous one by less
//! than a threshold. The keystroke just before the first fast one is kept as
//! the burst's anchor, so the burst starts where the fast run was launched.

use crate::collector::types::KeystrokeEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default gap below which consecutive keystrokes belong to one burst.
pub const DEFAULT_BURST_THRESHOLD_MS: f64 = 500.0;

/// Fewest keystrokes, anchor included, that make a burst.
pub const MIN_BURST_KEYSTROKES: usize = 3;

/// A detected typing burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Burst {
    /// Timestamp of the first keystroke (the anchor when one exists)
    pub start: DateTime<Utc>,
    /// Timestamp of the last keystroke
    pub end: DateTime<Utc>,
    /// Sum of the elapsed times of every keystroke after the first
    pub duration_ms: f64,
    /// Number of keystrokes in the burst
    pub keystrokes: usize,
}

/// Detect bursts in an ordered keystroke sequence.
///
/// A keystroke with `elapsed_ms < threshold_ms` extends the open candidate;
/// when it opens a candidate, the keystroke right before it (by position) is
/// taken in first. A keystroke at or above the threshold closes the candidate,
/// which is kept only if it reached [`MIN_BURST_KEYSTROKES`].
pub fn detect_bursts(events: &[KeystrokeEvent], threshold_ms: f64) -> Vec<Burst> {
    let mut bursts = Vec::new();
    let mut candidate: Vec<&KeystrokeEvent> = Vec::new();

    for (index, event) in events.iter().enumerate() {
        if event.elapsed_ms < threshold_ms {
            if candidate.is_empty() && index > 0 {
                candidate.push(&events[index - 1]);
            }
            candidate.push(event);
        } else {
            bursts.extend(close_candidate(&candidate));
            candidate.clear();
        }
    }
    bursts.extend(close_candidate(&candidate));

    tracing::debug!(bursts = bursts.len(), threshold_ms, "detected typing bursts");
    bursts
}

fn close_candidate(members: &[&KeystrokeEvent]) -> Option<Burst> {
    if members.len() < MIN_BURST_KEYSTROKES {
        return None;
    }

    let first = members.first()?;
    let last = members.last()?;
    Some(Burst {
        start: first.timestamp,
        end: last.timestamp,
        duration_ms: members[1..].iter().map(|e| e.elapsed_ms).sum(),
        keystrokes: members.len(),
    })
}
