//! LogShip Usage Example
//!
//! Ships a handful of structured records to a Logstash endpoint on
//! 127.0.0.1:5044. Run `nc -lk 5044` first to watch the documents arrive.

use logship::config::ShipperConfig;
use logship::shipper::LogstashHandler;
use logship::types::{ExceptionInfo, FieldMap, LogLevel, LogRecord};
use serde_json::json;
use tokio::time::{sleep, Duration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("logship=debug,info")
        .init();

    let mut extra_fields = FieldMap::new();
    extra_fields.insert("team".to_string(), json!("platform"));
    extra_fields.insert("@fields".to_string(), json!({"environment": "demo"}));

    let config = ShipperConfig {
        host: "127.0.0.1".to_string(),
        port: 5044,
        flush_interval_secs: 1,
        release: Some(env!("CARGO_PKG_VERSION").to_string()),
        extra_fields,
        ..Default::default()
    };

    let handler = LogstashHandler::with_config(config).await?;
    println!("Shipping to 127.0.0.1:5044 (queued entries flush every second)");

    // Simple message
    handler.emit(&LogRecord::new(LogLevel::Info, "demo", "application started"));

    // Message with structured fields
    handler.emit(
        &LogRecord::new(LogLevel::Info, "demo.auth", "user login successful")
            .with_field("user_id", json!(12345))
            .with_field("method", json!("oauth")),
    );

    // Structured message: ships with an empty message and its entries in context
    let mut payload = FieldMap::new();
    payload.insert("event".to_string(), json!("checkout"));
    payload.insert("amount_cents".to_string(), json!(4250));
    handler.emit(&LogRecord::new(LogLevel::Notice, "demo.billing", payload));

    // Record carrying exception details
    let mut exc = ExceptionInfo::new("TimeoutError", "upstream did not answer in 30s");
    exc.backtrace = vec!["at fetch_invoice()".to_string(), "at handle_request()".to_string()];
    handler.emit(
        &LogRecord::new(LogLevel::Error, "demo.billing", "invoice fetch failed")
            .with_exception(exc),
    );

    // Simulate some activity
    for i in 1..=5 {
        handler.emit(&LogRecord::new(
            LogLevel::Info,
            "demo",
            format!("processing iteration {}", i),
        ));
        sleep(Duration::from_millis(500)).await;
    }

    // Let the last flush cycle drain the queue before stopping.
    while handler.queue_len() > 0 {
        sleep(Duration::from_millis(100)).await;
    }

    handler.shutdown().await?;
    println!("Handler stopped");

    Ok(())
}
