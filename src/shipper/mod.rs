//! Buffered delivery of formatted entries over TCP

pub mod connection;
pub mod handler;
pub mod queue;

pub use connection::ConnectionState;
pub use handler::{LogstashHandler, Sink};
