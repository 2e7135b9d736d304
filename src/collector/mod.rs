//! Key press collection for the typing rhythm recorder.
//!
//! Key presses arrive as key names from a line-oriented source, get their
//! inter-key timing attached by the [`Stamper`], and leave as
//! [`KeystrokeEvent`]s ready for the daily log.

pub mod lines;
pub mod stamper;
pub mod types;

// Re-export commonly used types
pub use lines::{CollectorError, LineCollector};
pub use stamper::Stamper;
pub use types::{normalize_key, KeyPress, KeystrokeEvent, DELETION_KEY};
