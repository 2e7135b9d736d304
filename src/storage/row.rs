//! CSV row encoding for the daily keystroke logs.
//!
//! Columns: `timestamp,key,time_since_previous_ms,is_backspace`. Only the key
//! column can contain a comma or quote, so it is the only one ever quoted.

use crate::collector::types::{KeystrokeEvent, DELETION_KEY};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Header line written at the top of every log file.
pub const CSV_HEADER: &str = "timestamp,key,time_since_previous_ms,is_backspace";

/// Encode an event as one CSV line, without the trailing newline.
pub fn encode_row(event: &KeystrokeEvent) -> String {
    format!(
        "{},{},{:.2},{}",
        event.timestamp.to_rfc3339_opts(SecondsFormat::Micros, false),
        quote_field(&event.key),
        event.elapsed_ms,
        u8::from(event.is_deletion)
    )
}

/// Decode one CSV line into an event.
pub fn decode_row(line: &str) -> Result<KeystrokeEvent, String> {
    let fields = split_fields(line)?;
    if fields.len() != 4 {
        return Err(format!("expected 4 fields, found {}", fields.len()));
    }

    let timestamp = parse_timestamp(&fields[0])?;
    let key = fields[1].clone();
    let elapsed_ms: f64 = fields[2]
        .trim()
        .parse()
        .map_err(|e| format!("invalid time_since_previous_ms {:?}: {e}", fields[2]))?;
    if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
        return Err(format!("time_since_previous_ms out of range: {elapsed_ms}"));
    }
    let is_deletion = match fields[3].trim() {
        "1" | "true" | "True" => true,
        "0" | "false" | "False" => false,
        other => return Err(format!("invalid is_backspace {other:?}")),
    };

    Ok(KeystrokeEvent {
        timestamp,
        is_deletion: is_deletion || key == DELETION_KEY,
        key,
        elapsed_ms,
    })
}

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one in local time.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| format!("timestamp {raw:?} does not exist in the local time zone"))
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            (c, _) => field.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields)
}
