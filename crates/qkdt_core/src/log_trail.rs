//! Per-run log trail
//!
//! Gantree: L0_Foundation → LogTrail
//!
//! Append-only, timestamped record of one analysis run. Entries are also
//! forwarded to the `log` facade so host applications see them.

use crate::types::{LogEntry, LogLevel};
use chrono::Local;

/// Ordered log entries of a single analysis run
/// Gantree: LogTrail // 실행 로그
#[derive(Debug, Clone, Default)]
pub struct LogTrail {
    entries: Vec<LogEntry>,
}

impl LogTrail {
    /// Create an empty trail
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all entries (start of a new run)
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Append an entry stamped with the local wall-clock time
    pub fn push(&mut self, message: impl Into<String>, level: LogLevel) {
        let message = message.into();
        log::log!(level.as_log_level(), "TESTBED: {}", message);

        self.entries.push(LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            message,
            level,
        });
    }

    /// Append an info entry
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, LogLevel::Info);
    }

    /// Append a success entry
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, LogLevel::Success);
    }

    /// Append a warning entry
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, LogLevel::Warning);
    }

    /// Append an error entry
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, LogLevel::Error);
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries at the given level
    pub fn count_level(&self, level: LogLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    /// Take the entries, leaving the trail empty
    pub fn take(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_order() {
        let mut trail = LogTrail::new();
        trail.info("first");
        trail.warning("second");
        trail.success("third");

        let messages: Vec<_> = trail.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(trail.entries()[1].level, LogLevel::Warning);
    }

    #[test]
    fn test_timestamp_format() {
        let mut trail = LogTrail::new();
        trail.info("tick");

        let ts = &trail.entries()[0].timestamp;
        assert_eq!(ts.len(), 8);
        assert_eq!(ts.as_bytes()[2], b':');
        assert_eq!(ts.as_bytes()[5], b':');
    }

    #[test]
    fn test_reset_and_take() {
        let mut trail = LogTrail::new();
        trail.error("boom");
        assert_eq!(trail.count_level(LogLevel::Error), 1);

        trail.reset();
        assert!(trail.is_empty());

        trail.info("again");
        let taken = trail.take();
        assert_eq!(taken.len(), 1);
        assert!(trail.is_empty());
    }
}
