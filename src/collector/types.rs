//! Keystroke event types recorded by the agent.
//!
//! Each event keeps the key identity alongside its timing so that deletions
//! can be told apart from characters when computing typing speed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Keys that are recorded by symbolic name rather than by character.
const SPECIAL_KEYS: &[&str] = &[
    "space",
    "enter",
    "backspace",
    "tab",
    "shift",
    "ctrl",
    "cmd",
    "alt",
    "esc",
    "delete",
];

/// Key name that marks a deletion.
pub const DELETION_KEY: &str = "backspace";

/// A single recorded key press.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeystrokeEvent {
    /// Wall-clock time of the key press
    pub timestamp: DateTime<Utc>,
    /// Normalized key name (see [`normalize_key`])
    pub key: String,
    /// Milliseconds since the previous key press, 0 when unknown
    pub elapsed_ms: f64,
    /// Whether this key press deletes text
    pub is_deletion: bool,
}

impl KeystrokeEvent {
    /// Build an event from a raw key name, normalizing it on the way in.
    pub fn new(timestamp: DateTime<Utc>, raw_key: &str, elapsed_ms: f64) -> Self {
        let key = normalize_key(raw_key);
        let is_deletion = key == DELETION_KEY;
        Self {
            timestamp,
            key,
            elapsed_ms,
            is_deletion,
        }
    }
}

/// A raw key press as delivered by a collector, before timing is attached.
#[derive(Debug, Clone)]
pub struct KeyPress {
    /// Key name as reported by the source
    pub key: String,
    /// Monotonic instant the press was observed
    pub at: Instant,
    /// Wall-clock time the press was observed
    pub wall_time: DateTime<Utc>,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            at: Instant::now(),
            wall_time: Utc::now(),
        }
    }
}

/// Normalize a raw key name.
///
/// Single printable characters are lowercased, a literal tab or line break
/// maps to `tab` or `enter`, known special keys map to their symbolic name
/// (accepting a `Key.` prefix and any case), and anything else is recorded as
/// `key_<raw>` with control characters escaped.
pub fn normalize_key(raw: &str) -> String {
    let mut chars = raw.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        match c {
            ' ' => return "space".to_string(),
            '\t' => return "tab".to_string(),
            '\n' | '\r' => return "enter".to_string(),
            _ => {}
        }
        if !c.is_control() {
            return c.to_lowercase().collect();
        }
    }

    let trimmed = raw.trim();
    let name = trimmed.strip_prefix("Key.").unwrap_or(trimmed).to_lowercase();
    if let Some(special) = SPECIAL_KEYS.iter().find(|&&k| k == name) {
        return (*special).to_string();
    }

    match name.as_str() {
        "return" => "enter".to_string(),
        "escape" => "esc".to_string(),
        "control" => "ctrl".to_string(),
        "command" | "super" | "meta" => "cmd".to_string(),
        "option" => "alt".to_string(),
        _ => format!("key_{}", escape_control(trimmed)),
    }
}

/// Replace control characters with their escaped form so a key name always
/// fits on one log line.
fn escape_control(name: &str) -> String {
    name.chars()
        .fold(String::with_capacity(name.len()), |mut out, c| {
            if c.is_control() {
                out.extend(c.escape_default());
            } else {
                out.push(c);
            }
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_keys_are_lowercased() {
        assert_eq!(normalize_key("A"), "a");
        assert_eq!(normalize_key("z"), "z");
        assert_eq!(normalize_key(","), ",");
        assert_eq!(normalize_key("Ä"), "ä");
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(normalize_key("Backspace"), "backspace");
        assert_eq!(normalize_key("Key.space"), "space");
        assert_eq!(normalize_key(" "), "space");
        assert_eq!(normalize_key("Return"), "enter");
        assert_eq!(normalize_key("ESC"), "esc");
    }

    #[test]
    fn test_unknown_keys_are_prefixed() {
        assert_eq!(normalize_key("F13"), "key_F13");
        assert_eq!(normalize_key("Key.media_play"), "key_Key.media_play");
    }

    #[test]
    fn test_literal_whitespace_controls() {
        assert_eq!(normalize_key("\t"), "tab");
        assert_eq!(normalize_key("\n"), "enter");
        assert_eq!(normalize_key("\r"), "enter");
    }

    #[test]
    fn test_control_characters_escaped_in_unknown_keys() {
        assert_eq!(normalize_key("x\ny"), "key_x\\ny");
        assert_eq!(normalize_key("a\rb\u{1}"), "key_a\\rb\\u{1}");
        assert!(!normalize_key("x\ny").chars().any(char::is_control));
    }

    #[test]
    fn test_deletion_flag() {
        let now = Utc::now();
        assert!(KeystrokeEvent::new(now, "BackSpace", 12.0).is_deletion);
        assert!(!KeystrokeEvent::new(now, "delete", 12.0).is_deletion);
        assert!(!KeystrokeEvent::new(now, "x", 12.0).is_deletion);
    }
}
