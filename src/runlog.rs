//! Append-only log of user-facing progress messages.

use log::{debug, error, info, warn};

/// Severity of a [`RunLog`] line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// A single recorded line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub level: Level,
    pub message: String,
}

/// Explicit log sink handed to every stage of a run.
///
/// Lines can only be appended. Each line is mirrored to the `log` facade so
/// it also shows up in the process log output.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<Entry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.push(Level::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.push(Level::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.push(Level::Error, message);
    }

    /// Records an error line for an error the caller returns and reports
    /// itself. Only mirrored at debug level.
    pub fn failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("{}", message);
        self.push(Level::Error, message);
    }

    fn push(&mut self, level: Level, message: String) {
        self.entries.push(Entry { level, message });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Message text of every line, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.message.as_str())
    }

    /// True if any line contains `needle`. Mostly useful in tests.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().any(|line| line.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
