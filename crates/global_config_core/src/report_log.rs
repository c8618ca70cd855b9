//! Severity-tagged report of a single generation run.
//!
//! A [`ReportLog`] is the explicit log sink handed to every step of one run.
//! Each record is forwarded to `tracing`; everything above `debug` is also
//! retained and rendered into the text report returned to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "report_log_tests.rs"]
mod tests;

/// Severity of a report entry, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Lowercase level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

    /// Uppercase label used in the rendered report.
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One retained report entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "msg")]
    pub message: String,
    pub level: LogLevel,
}

/// Append-only, ordered report for one run.
#[derive(Debug, Clone, Default)]
pub struct ReportLog {
    entries: Vec<LogEntry>,
}

impl ReportLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards `message` to tracing and retains it unless it is debug output.
    pub fn record(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warning => tracing::warn!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
            LogLevel::Critical => tracing::error!(critical = true, "{}", message),
        }

        if level != LogLevel::Debug {
            self.entries.push(LogEntry { message, level });
        }
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Error, message);
    }

    pub fn critical(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Critical, message);
    }

    /// Retained entries in insertion order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of retained entries at exactly `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    /// Most severe retained level, if any entry was retained.
    pub fn highest_level(&self) -> Option<LogLevel> {
        self.entries.iter().map(|e| e.level).max()
    }

    /// Renders one `LEVEL: message` line per retained entry.
    pub fn render(&self) -> String {
        let mut output = String::new();
        for entry in &self.entries {
            output.push_str(entry.level.label());
            output.push_str(": ");
            output.push_str(&entry.message);
            output.push('\n');
        }
        output
    }
}
