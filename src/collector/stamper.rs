//! Attaches inter-key timing to raw key presses.

use crate::collector::types::{KeyPress, KeystrokeEvent};
use std::time::Instant;

/// Turns [`KeyPress`]es into [`KeystrokeEvent`]s.
///
/// The elapsed time is measured on the monotonic clock so wall-clock jumps
/// never produce negative intervals. The first press of a session carries 0.
#[derive(Debug, Default)]
pub struct Stamper {
    last_press: Option<Instant>,
}

impl Stamper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a key press with the time since the previous one.
    pub fn stamp(&mut self, press: &KeyPress) -> KeystrokeEvent {
        let elapsed_ms = match self.last_press {
            Some(last) => {
                let ms = press.at.saturating_duration_since(last).as_secs_f64() * 1000.0;
                (ms * 100.0).round() / 100.0
            }
            None => 0.0,
        };
        self.last_press = Some(press.at);

        KeystrokeEvent::new(press.wall_time, &press.key, elapsed_ms)
    }

    /// Forget the previous press, so the next event starts a new session.
    pub fn reset(&mut self) {
        self.last_press = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    fn press_at(key: &str, at: Instant) -> KeyPress {
        KeyPress {
            key: key.to_string(),
            at,
            wall_time: Utc::now(),
        }
    }

    #[test]
    fn test_first_press_has_zero_elapsed() {
        let mut stamper = Stamper::new();
        let event = stamper.stamp(&press_at("a", Instant::now()));
        assert_eq!(event.elapsed_ms, 0.0);
        assert_eq!(event.key, "a");
    }

    #[test]
    fn test_elapsed_between_presses() {
        let mut stamper = Stamper::new();
        let start = Instant::now();
        stamper.stamp(&press_at("a", start));
        let event = stamper.stamp(&press_at("B", start + Duration::from_micros(123_456)));

        assert!((event.elapsed_ms - 123.46).abs() < 1e-9);
        assert_eq!(event.key, "b");
    }

    #[test]
    fn test_reset_starts_new_session() {
        let mut stamper = Stamper::new();
        let start = Instant::now();
        stamper.stamp(&press_at("a", start));
        stamper.reset();
        let event = stamper.stamp(&press_at("backspace", start + Duration::from_millis(80)));

        assert_eq!(event.elapsed_ms, 0.0);
        assert!(event.is_deletion);
    }
}
