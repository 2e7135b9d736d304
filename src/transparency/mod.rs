//! Transparency module for the typing rhythm recorder.
//!
//! Keeps running counts of what the recorder captured and wrote, so
//! collection can be audited at any time.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_log_with_persistence, read_persisted, PersistedStats, RecorderLog,
    RecorderStats, SharedRecorderLog,
};
