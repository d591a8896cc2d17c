//! Log record types consumed by the shipper

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Type alias for structured record fields
pub type FieldMap = Map<String, Value>;

/// Log severity levels, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace: very fine-grained diagnostic messages
    Trace = 1,
    /// Debug: debug-level messages
    Debug = 2,
    /// Info: informational messages
    Info = 3,
    /// Notice: normal but significant condition
    Notice = 4,
    /// Warning: warning conditions
    Warning = 5,
    /// Error: error conditions
    Error = 6,
    /// Critical: critical conditions
    Critical = 7,
}

impl LogLevel {
    /// Uppercase level name as it appears in shipped documents
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Notice => "NOTICE",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Numeric ordinal of the level
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record message: plain text, or a structured mapping whose entries are
/// promoted into the shipped document's context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// Plain text message
    Text(String),
    /// Structured message; shipped with an empty `message` field and its
    /// entries merged into `context`
    Structured(FieldMap),
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<FieldMap> for Message {
    fn from(fields: FieldMap) -> Self {
        Message::Structured(fields)
    }
}

/// Exception details attached to a record: the kind/description pair plus
/// captured backtrace frames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionInfo {
    /// Error kind or type name
    pub kind: String,
    /// Human-readable error description
    pub description: String,
    /// Backtrace frames, one per line, innermost last
    pub backtrace: Vec<String>,
}

impl ExceptionInfo {
    /// Create exception info without backtrace frames
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            backtrace: Vec::new(),
        }
    }

    /// Render the exception as formatted trace lines: the `kind: description`
    /// header followed by the captured frames
    pub fn trace_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.backtrace.len() + 1);
        lines.push(format!("{}: {}", self.kind, self.description));
        lines.extend(self.backtrace.iter().cloned());
        lines
    }
}

/// A structured log record as handed over by the host logging framework.
///
/// Records are read-only to the shipper and are not retained past the
/// `emit` call that consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Log severity level
    pub level: LogLevel,

    /// Logger / channel name that produced the record
    pub channel: String,

    /// Primary log message, possibly structured
    pub message: Message,

    /// Timestamp when the record was created
    pub time: DateTime<Utc>,

    /// Additional structured fields
    pub fields: FieldMap,

    /// Optional exception details
    pub exception: Option<ExceptionInfo>,
}

impl LogRecord {
    /// Create a new log record with the current time and no extra fields
    pub fn new(level: LogLevel, channel: impl Into<String>, message: impl Into<Message>) -> Self {
        Self {
            level,
            channel: channel.into(),
            message: message.into(),
            time: Utc::now(),
            fields: FieldMap::new(),
            exception: None,
        }
    }

    /// Attach a structured field to the record
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach exception details to the record
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Error < LogLevel::Critical);
        assert_eq!(LogLevel::Info.ordinal(), 3);
    }

    #[test]
    fn level_names_match_wire_format() {
        assert_eq!(LogLevel::Warning.name(), "WARNING");
        assert_eq!(LogLevel::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn record_builder_attaches_fields() {
        let record = LogRecord::new(LogLevel::Info, "auth", "login ok")
            .with_field("user_id", json!(42));

        assert_eq!(record.channel, "auth");
        assert_eq!(record.fields.get("user_id"), Some(&json!(42)));
        assert!(record.exception.is_none());
    }

    #[test]
    fn trace_lines_start_with_kind_and_description() {
        let mut exc = ExceptionInfo::new("ValueError", "bad input");
        exc.backtrace = vec!["frame one".to_string(), "frame two".to_string()];

        let lines = exc.trace_lines();
        assert_eq!(lines[0], "ValueError: bad input");
        assert_eq!(lines.len(), 3);
    }
}
