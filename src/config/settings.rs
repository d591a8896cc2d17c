//! Configuration structures for LogShip

use crate::types::{FieldMap, LogLevel};
use crate::{Result, ShipperError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shipper configuration
///
/// The static `extra_fields` mapping is merged into every shipped document.
/// Its top-level keys become top-level document keys; a nested `@fields`
/// sub-mapping is merged under the document's `context`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipperConfig {
    /// Logstash host to connect to
    pub host: String,
    /// Logstash TCP port
    pub port: u16,
    /// Maximum number of buffered entries before new ones are dropped
    pub queue_max_len: usize,
    /// Seconds between background flush cycles
    pub flush_interval_secs: u64,
    /// Timeout in seconds applied to connect and send attempts
    pub connect_timeout_secs: u64,
    /// Minimum log level to ship
    pub min_level: LogLevel,
    /// Optional release tag echoed in every document
    pub release: Option<String>,
    /// Include a snapshot of handler state in every document
    pub enable_handler_diagnostics: bool,
    /// Override the reported source host instead of resolving the hostname
    pub source_host: Option<String>,
    /// Static fields merged into every document
    pub extra_fields: FieldMap,
}

impl Default for ShipperConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5044,
            queue_max_len: 1000,
            flush_interval_secs: 5,
            connect_timeout_secs: 5,
            min_level: LogLevel::Info,
            release: None,
            enable_handler_diagnostics: false,
            source_host: None,
            extra_fields: FieldMap::new(),
        }
    }
}

impl ShipperConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ShipperError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ShipperConfig = toml::from_str(&content)
            .map_err(|e| ShipperError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ShipperError::Config("Host cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ShipperError::Config("Port cannot be zero".to_string()));
        }
        if self.queue_max_len == 0 {
            return Err(ShipperError::Config(
                "Queue capacity must be at least 1".to_string(),
            ));
        }
        if self.flush_interval_secs == 0 {
            return Err(ShipperError::Config(
                "Flush interval must be at least 1 second".to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ShipperError::Config(
                "Connect timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}
