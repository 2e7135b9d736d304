//! Line-oriented key press collector.
//!
//! Reads one key name per line from any reader (stdin, a FIFO fed by a
//! platform keyboard hook, a replay file) on a background thread and delivers
//! [`KeyPress`]es over a bounded channel.

use crate::collector::types::KeyPress;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::io::{BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Capacity of the key press channel.
const CHANNEL_CAPACITY: usize = 10_000;

/// Errors that can occur during key press collection.
#[derive(Debug)]
pub enum CollectorError {
    AlreadyRunning,
    SpawnFailed(String),
}

impl std::fmt::Display for CollectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectorError::AlreadyRunning => write!(f, "Collector is already running"),
            CollectorError::SpawnFailed(e) => write!(f, "Failed to spawn reader thread: {e}"),
        }
    }
}

impl std::error::Error for CollectorError {}

/// Collects key presses from a line-oriented reader.
pub struct LineCollector<R> {
    source: Option<R>,
    sender: Option<Sender<KeyPress>>,
    receiver: Receiver<KeyPress>,
    running: Arc<AtomicBool>,
}

impl<R: Read + Send + 'static> LineCollector<R> {
    /// Create a new collector over `source`.
    pub fn new(source: R) -> Self {
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        Self {
            source: Some(source),
            sender: Some(sender),
            receiver,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the reader thread.
    ///
    /// The channel disconnects once the source reaches end of input.
    pub fn start(&mut self) -> Result<(), CollectorError> {
        // The thread owns the only sender, so the channel closes at end of input.
        let (source, sender) = match (self.source.take(), self.sender.take()) {
            (Some(source), Some(sender)) => (source, sender),
            _ => return Err(CollectorError::AlreadyRunning),
        };

        let running = self.running.clone();
        running.store(true, Ordering::SeqCst);

        // Detached: a blocked read on stdin cannot be joined.
        thread::Builder::new()
            .name("key-reader".to_string())
            .spawn(move || read_lines(source, sender, running))
            .map_err(|e| CollectorError::SpawnFailed(e.to_string()))?;

        Ok(())
    }

    /// Ask the reader thread to stop after its current line.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the reader thread is still delivering key presses.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for key presses.
    pub fn receiver(&self) -> &Receiver<KeyPress> {
        &self.receiver
    }

    /// Try to receive a key press without blocking.
    pub fn try_recv(&self) -> Option<KeyPress> {
        self.receiver.try_recv().ok()
    }
}

fn read_lines<R: Read>(source: R, sender: Sender<KeyPress>, running: Arc<AtomicBool>) {
    let reader = BufReader::new(source);
    for line in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Stopping key reader: {e}");
                break;
            }
        };
        // A lone space is the space key; anything else is trimmed.
        let key = if line == " " { line.as_str() } else { line.trim() };
        if key.is_empty() {
            continue;
        }
        if sender.send(KeyPress::new(key)).is_err() {
            break;
        }
    }
    running.store(false, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_collects_all_lines_until_eof() {
        let input = Cursor::new("a\nB\n\n  backspace \n \n");
        let mut collector = LineCollector::new(input);
        collector.start().unwrap();

        let keys: Vec<String> = collector.receiver().iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["a", "B", "backspace", " "]);
        assert!(!collector.is_running());
    }

    #[test]
    fn test_start_twice_fails() {
        let mut collector = LineCollector::new(Cursor::new(""));
        collector.start().unwrap();
        assert!(matches!(
            collector.start(),
            Err(CollectorError::AlreadyRunning)
        ));
    }
}
