//! Canonical Logstash document formatting

use crate::config::ShipperConfig;
use crate::types::{FieldMap, LogRecord, Message};
use serde::Serialize;
use serde_json::Value;

/// Keys that are already consumed by the canonical document and must not
/// leak into `context` when a caller stuffs them into record fields.
const BOOKKEEPING_KEYS: [&str; 6] = ["level", "level_name", "msg", "message", "channel", "time"];

/// Snapshot of handler state included under `@handler` when diagnostics
/// mode is enabled. Carries plain data only, never live I/O resources.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerSnapshot {
    /// Configured Logstash host
    pub host: String,
    /// Configured Logstash port
    pub port: u16,
    /// Entries currently buffered
    pub queue_len: usize,
    /// Queue capacity
    pub queue_max_len: usize,
    /// Entries dropped because the queue was full
    pub dropped: u64,
    /// Connection state name
    pub connection: &'static str,
    /// Seconds between flush cycles
    pub flush_interval_secs: u64,
    /// Whether periodic buffering is still active
    pub buffering: bool,
}

/// Formats log records into canonical Logstash JSON documents.
///
/// Formatting is a pure, total function: every record produces a document,
/// whatever its field values. Static configuration is resolved once at
/// construction; per-record fields override static `@fields` defaults on
/// key collision.
#[derive(Debug, Clone)]
pub struct LogstashFormatter {
    defaults: FieldMap,
    context_defaults: FieldMap,
    source_host: String,
    release: Option<String>,
}

impl LogstashFormatter {
    /// Build a formatter from shipper configuration.
    ///
    /// The `@fields` sub-mapping of `extra_fields` seeds `context`; the
    /// remaining static keys become top-level document keys. The source
    /// host is the configured override or the machine hostname, resolved
    /// here and reused for every record.
    pub fn new(config: &ShipperConfig) -> Self {
        let mut defaults = config.extra_fields.clone();
        let context_defaults = match defaults.remove("@fields") {
            Some(Value::Object(map)) => map,
            _ => FieldMap::new(),
        };

        let source_host = match &config.source_host {
            Some(host) => host.clone(),
            None => gethostname::gethostname().to_string_lossy().into_owned(),
        };

        Self {
            defaults,
            context_defaults,
            source_host,
            release: config.release.clone(),
        }
    }

    /// Format a record into one JSON document
    pub fn format(&self, record: &LogRecord) -> String {
        self.format_with_handler(record, None)
    }

    /// Format a record, optionally embedding a handler snapshot under `@handler`
    pub fn format_with_handler(
        &self,
        record: &LogRecord,
        handler: Option<&HandlerSnapshot>,
    ) -> String {
        let mut fields = record.fields.clone();

        // A structured message ships as an empty message with its entries
        // promoted into the working fields.
        let message = match &record.message {
            Message::Text(text) => text.clone(),
            Message::Structured(map) => {
                for (key, value) in map {
                    fields.insert(key.clone(), value.clone());
                }
                String::new()
            }
        };

        let timestamp = record.time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();

        for key in BOOKKEEPING_KEYS {
            fields.remove(key);
        }

        if let Some(exception) = &record.exception {
            fields.insert("exception".to_string(), Value::from(exception.trace_lines()));
        }

        if let Some(text) = fields.get("exc_text") {
            if text.is_null() || text.as_str().is_some_and(str::is_empty) {
                fields.remove("exc_text");
            }
        }

        let mut document = self.defaults.clone();
        document.insert("message".to_string(), Value::String(message));
        document.insert(
            "level".to_string(),
            Value::String(record.level.name().to_string()),
        );
        document.insert("logger".to_string(), Value::String(record.channel.clone()));
        document.insert("@timestamp".to_string(), Value::String(timestamp));
        document.insert(
            "source_host".to_string(),
            Value::String(self.source_host.clone()),
        );
        document.insert("context".to_string(), Value::Object(self.build_context(fields)));

        if let Some(release) = &self.release {
            document.insert("release".to_string(), Value::String(release.clone()));
        }

        if let Some(snapshot) = handler {
            if let Ok(value) = serde_json::to_value(snapshot) {
                document.insert("@handler".to_string(), value);
            }
        }

        // A Value tree always serializes; the fallback keeps the contract
        // total rather than panicking.
        serde_json::to_string(&Value::Object(document)).unwrap_or_else(|_| "{}".to_string())
    }

    /// Source host reported in every document
    pub fn source_host(&self) -> &str {
        &self.source_host
    }

    fn build_context(&self, fields: FieldMap) -> FieldMap {
        let mut context = self.context_defaults.clone();
        for (key, value) in fields {
            context.insert(key, value);
        }
        context
    }
}
