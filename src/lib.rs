//! # LogShip - Buffered Log Shipping for Logstash
//!
//! LogShip ships structured log records to a Logstash-style TCP endpoint
//! without ever blocking the application's logging call sites.
//!
//! ## Features
//!
//! - **Non-Blocking Emit**: producers format and enqueue, never touch the network
//! - **Bounded Buffering**: fixed-capacity queue that rejects new entries when full
//! - **Background Delivery**: async flush task drains the queue on a fixed cadence
//! - **Transparent Reconnect**: broken connections are re-established without losing
//!   buffered records
//! - **Canonical Documents**: one newline-terminated JSON document per record
//!
//! ## Quick Start
//!
//! ```no_run
//! use logship::shipper::LogstashHandler;
//! use logship::types::{LogLevel, LogRecord};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handler = LogstashHandler::connect("127.0.0.1", 5044).await?;
//!
//!     let record = LogRecord::new(LogLevel::Info, "my-app", "service started");
//!     handler.emit(&record);
//!
//!     handler.shutdown().await?;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod format;
pub mod shipper;
pub mod types;

/// Common error types used throughout LogShip
pub mod error {
    use std::fmt;

    /// LogShip error types
    #[derive(Debug)]
    pub enum ShipperError {
        /// I/O operation failed
        Io(std::io::Error),
        /// Serialization/deserialization failed
        Serde(serde_json::Error),
        /// Configuration error
        Config(String),
        /// Connection error
        Connection(String),
        /// Background worker error
        Worker(String),
    }

    impl fmt::Display for ShipperError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ShipperError::Io(e) => write!(f, "I/O error: {}", e),
                ShipperError::Serde(e) => write!(f, "Serialization error: {}", e),
                ShipperError::Config(e) => write!(f, "Configuration error: {}", e),
                ShipperError::Connection(e) => write!(f, "Connection error: {}", e),
                ShipperError::Worker(e) => write!(f, "Worker error: {}", e),
            }
        }
    }

    impl std::error::Error for ShipperError {}

    impl From<std::io::Error> for ShipperError {
        fn from(err: std::io::Error) -> Self {
            ShipperError::Io(err)
        }
    }

    impl From<serde_json::Error> for ShipperError {
        fn from(err: serde_json::Error) -> Self {
            ShipperError::Serde(err)
        }
    }

    /// Result type alias for LogShip operations
    pub type Result<T> = std::result::Result<T, ShipperError>;
}

pub use error::{Result, ShipperError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ShipperConfig;
    pub use crate::format::LogstashFormatter;
    pub use crate::shipper::{LogstashHandler, Sink};
    pub use crate::types::{ExceptionInfo, LogLevel, LogRecord, Message};
    pub use crate::{Result, ShipperError};
}
