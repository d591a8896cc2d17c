//! Unbuffered Shipping Example
//!
//! Demonstrates `disable_buffering`: after the toggle, every emit wakes the
//! flush task so entries hit the wire immediately instead of waiting for
//! the periodic cycle. Also enables the `@handler` diagnostics block.

use logship::config::ShipperConfig;
use logship::shipper::LogstashHandler;
use logship::types::{LogLevel, LogRecord};
use tokio::time::{sleep, Duration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("logship=debug,info")
        .init();

    let config = ShipperConfig {
        host: "127.0.0.1".to_string(),
        port: 5044,
        // Deliberately long: with buffering disabled it never matters.
        flush_interval_secs: 3600,
        enable_handler_diagnostics: true,
        ..Default::default()
    };

    let handler = LogstashHandler::with_config(config).await?;
    handler.disable_buffering();

    for i in 1..=10 {
        handler.emit(&LogRecord::new(
            LogLevel::Info,
            "demo.unbuffered",
            format!("event {} ships right away", i),
        ));
        sleep(Duration::from_millis(300)).await;
    }

    println!(
        "queued: {}, dropped: {}, connected: {}",
        handler.queue_len(),
        handler.dropped(),
        handler.is_connected()
    );

    handler.shutdown().await?;
    Ok(())
}
