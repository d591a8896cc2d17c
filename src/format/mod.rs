//! Record-to-wire formatting

pub mod logstash;

pub use logstash::{HandlerSnapshot, LogstashFormatter};
