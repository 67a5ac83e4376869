//! Diagnostic sink used by every stage of the pipeline.
//!
//! The lexer, parser and builder never abort on bad input. They report what
//! went wrong through a [`SourceLogger`] and keep going, so the caller decides
//! whether to trust the result by looking at the accumulated counts.
//!
//! # Examples
//!
//! ```
//! use datalisp::logger::{Level, MemoryLogger, SourceLogger};
//!
//! let logger = MemoryLogger::new();
//! logger.log_at(3, 7, Level::Error, "Invalid character '#'");
//! logger.log(Level::Warning, "Implicit conversion from 'Integer' to 'Float'");
//!
//! assert_eq!(logger.error_count(), 1);
//! assert_eq!(logger.warning_count(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;

/// Importance of a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    /// Generated content may not be usable.
    Error,
    /// Processing can not recover, but the program is not aborted.
    Fatal,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Fatal => "Fatal",
        };
        f.write_str(name)
    }
}

/// Receiver of leveled messages, optionally tagged with a 1-based source position.
///
/// Logging is fire-and-forget: nothing the implementation does with a message
/// changes how the core continues.
pub trait SourceLogger {
    /// Logs a message that is not tied to a source position.
    fn log(&self, level: Level, message: &str);

    /// Logs a message referring to `line` and `column` of the source text.
    fn log_at(&self, line: usize, column: usize, level: Level, message: &str);
}

/// Warning and error counters shared by the bundled loggers.
#[derive(Debug, Default)]
struct Counts {
    warnings: Cell<usize>,
    errors: Cell<usize>,
}

impl Counts {
    fn record(&self, level: Level) {
        match level {
            Level::Warning => self.warnings.set(self.warnings.get() + 1),
            Level::Error | Level::Fatal => self.errors.set(self.errors.get() + 1),
            Level::Debug | Level::Info => {}
        }
    }
}

/// Forwards messages to `tracing` and counts warnings and errors.
#[derive(Debug, Default)]
pub struct TracingLogger {
    counts: Counts,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of warnings logged so far.
    pub fn warning_count(&self) -> usize {
        self.counts.warnings.get()
    }

    /// Number of errors and fatal errors logged so far.
    pub fn error_count(&self) -> usize {
        self.counts.errors.get()
    }
}

impl SourceLogger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        self.counts.record(level);
        match level {
            Level::Debug => tracing::debug!("{message}"),
            Level::Info => tracing::info!("{message}"),
            Level::Warning => tracing::warn!("{message}"),
            Level::Error => tracing::error!("{message}"),
            Level::Fatal => tracing::error!(fatal = true, "{message}"),
        }
    }

    fn log_at(&self, line: usize, column: usize, level: Level, message: &str) {
        self.counts.record(level);
        match level {
            Level::Debug => tracing::debug!(line = line, column = column, "{message}"),
            Level::Info => tracing::info!(line = line, column = column, "{message}"),
            Level::Warning => tracing::warn!(line = line, column = column, "{message}"),
            Level::Error => tracing::error!(line = line, column = column, "{message}"),
            Level::Fatal => tracing::error!(line = line, column = column, fatal = true, "{message}"),
        }
    }
}

/// A message captured by [`MemoryLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    /// `(line, column)` when the message refers to a source position.
    pub position: Option<(usize, usize)>,
    pub message: String,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((line, column)) => write!(f, "{}: [{}]({}) {}", self.level, line, column, self.message),
            None => write!(f, "{}: {}", self.level, self.message),
        }
    }
}

/// Keeps every message in memory. Useful for tests and editor tooling.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: RefCell<Vec<LogRecord>>,
    counts: Counts,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning_count(&self) -> usize {
        self.counts.warnings.get()
    }

    pub fn error_count(&self) -> usize {
        self.counts.errors.get()
    }

    /// Snapshot of all messages in the order they were logged.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.borrow().clone()
    }

    /// Messages logged at exactly `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }

    fn push(&self, level: Level, position: Option<(usize, usize)>, message: &str) {
        self.counts.record(level);
        self.records.borrow_mut().push(LogRecord {
            level,
            position,
            message: message.to_string(),
        });
    }
}

impl SourceLogger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        self.push(level, None, message);
    }

    fn log_at(&self, line: usize, column: usize, level: Level, message: &str) {
        self.push(level, Some((line, column)), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_level() {
        let logger = MemoryLogger::new();
        logger.log(Level::Debug, "a");
        logger.log(Level::Info, "b");
        logger.log(Level::Warning, "c");
        logger.log(Level::Error, "d");
        logger.log_at(1, 2, Level::Fatal, "e");

        assert_eq!(logger.warning_count(), 1);
        assert_eq!(logger.error_count(), 2);
        assert_eq!(logger.records().len(), 5);
        assert_eq!(logger.records()[4].position, Some((1, 2)));
    }

    #[test]
    fn test_record_display() {
        let logger = MemoryLogger::new();
        logger.log_at(4, 9, Level::Error, "Invalid character '#'");
        logger.log(Level::Info, "hello");

        let records = logger.records();
        assert_eq!(records[0].to_string(), "Error: [4](9) Invalid character '#'");
        assert_eq!(records[1].to_string(), "Info: hello");
    }

    #[test]
    fn test_tracing_logger_counts_without_subscriber() {
        let logger = TracingLogger::new();
        logger.log(Level::Warning, "w");
        logger.log_at(1, 1, Level::Error, "e");
        assert_eq!(logger.warning_count(), 1);
        assert_eq!(logger.error_count(), 1);
    }
}
