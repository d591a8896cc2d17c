//! Record model consumed by the shipper

pub mod log_record;

pub use log_record::{ExceptionInfo, FieldMap, LogLevel, LogRecord, Message};
