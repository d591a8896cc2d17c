//! Buffered delivery handler for Logstash

use crate::config::ShipperConfig;
use crate::format::{HandlerSnapshot, LogstashFormatter};
use crate::shipper::connection::{Connection, ConnectionState, StateCell};
use crate::shipper::queue::BoundedQueue;
use crate::types::LogRecord;
use crate::{Result, ShipperError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The single capability a host logging framework drives.
///
/// Implementations consume one record per call and must neither block nor
/// surface failures to the caller.
pub trait Sink: Send + Sync {
    /// Consume one log record
    fn handle_record(&self, record: &LogRecord);
}

/// State shared between producers and the flush task
struct Shared {
    queue: BoundedQueue,
    dropped: AtomicU64,
    buffering: AtomicBool,
    wake: Notify,
}

/// A handler that ships log records to a Logstash instance through TCP.
///
/// `emit` formats the record and appends it to a bounded queue, then
/// returns; a background task drains the queue on the configured cadence,
/// writing one newline-terminated JSON document per entry and transparently
/// re-establishing the connection when a send fails. Once the queue is
/// full, new entries are dropped in preference to evicting buffered ones.
///
/// Example setup:
///
/// ```no_run
/// # async fn run() -> logship::Result<()> {
/// use logship::shipper::LogstashHandler;
///
/// let handler = LogstashHandler::connect("127.0.0.1", 5044).await?;
/// # Ok(())
/// # }
/// ```
pub struct LogstashHandler {
    config: ShipperConfig,
    formatter: LogstashFormatter,
    shared: Arc<Shared>,
    status: StateCell,
    shutdown_tx: broadcast::Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl LogstashHandler {
    /// Create a handler for `host:port` with default configuration
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let config = ShipperConfig {
            host: host.to_string(),
            port,
            ..Default::default()
        };
        Self::with_config(config).await
    }

    /// Create a handler with custom configuration.
    ///
    /// The initial connection attempt happens here; failure is reported
    /// through the diagnostic sink and leaves the handler disconnected
    /// until the first flush cycle retries. Only an invalid configuration
    /// is an error.
    pub async fn with_config(config: ShipperConfig) -> Result<Self> {
        config.validate()?;

        let formatter = LogstashFormatter::new(&config);
        let shared = Arc::new(Shared {
            queue: BoundedQueue::new(config.queue_max_len),
            dropped: AtomicU64::new(0),
            buffering: AtomicBool::new(true),
            wake: Notify::new(),
        });

        let status: StateCell = Arc::new(Mutex::new(ConnectionState::Disconnected));
        let mut connection = Connection::new(
            &config.host,
            config.port,
            Duration::from_secs(config.connect_timeout_secs),
            Arc::clone(&status),
        );

        info!(host = %config.host, port = config.port, "logstash handler starting");
        if let Err(e) = connection.establish().await {
            warn!(error = %e, "initial connection failed, retrying on next flush");
        }

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let worker = tokio::spawn(flush_task(
            connection,
            Arc::clone(&shared),
            Duration::from_secs(config.flush_interval_secs),
            shutdown_rx,
        ));

        Ok(Self {
            config,
            formatter,
            shared,
            status,
            shutdown_tx,
            worker: Some(worker),
        })
    }

    /// Format a record and buffer it for delivery.
    ///
    /// Never blocks, never performs network I/O, never fails: records
    /// below the configured minimum level are ignored, and once the queue
    /// is full the new entry is dropped and counted.
    pub fn emit(&self, record: &LogRecord) {
        if record.level < self.config.min_level {
            return;
        }

        let entry = if self.config.enable_handler_diagnostics {
            let snapshot = self.snapshot();
            self.formatter.format_with_handler(record, Some(&snapshot))
        } else {
            self.formatter.format(record)
        };

        if self.shared.queue.try_push(entry) {
            if !self.shared.buffering.load(Ordering::Relaxed) {
                self.shared.wake.notify_one();
            }
        } else {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Switch from periodic buffering to immediate flushing.
    ///
    /// Every subsequent `emit` wakes the flush task so buffered entries
    /// are sent at once; `emit` itself stays non-blocking and the sends
    /// still happen on the background task.
    pub fn disable_buffering(&self) {
        self.shared.buffering.store(false, Ordering::Relaxed);
        self.shared.wake.notify_one();
    }

    /// Number of entries currently buffered
    pub fn queue_len(&self) -> usize {
        self.shared.queue.len()
    }

    /// Number of entries dropped because the queue was full
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// True while the flush task holds an established connection
    pub fn is_connected(&self) -> bool {
        *self.status.lock() == ConnectionState::Connected
    }

    /// Stop the flush task and wait for it to finish.
    ///
    /// The task completes the drain cycle it is in but starts no new one;
    /// entries still buffered afterwards are abandoned. Callers that need
    /// a final flush should wait for `queue_len` to reach zero first.
    pub async fn shutdown(mut self) -> Result<()> {
        let _ = self.shutdown_tx.send(());

        if let Some(worker) = self.worker.take() {
            worker
                .await
                .map_err(|e| ShipperError::Worker(format!("Flush task failed: {}", e)))?;
        }
        Ok(())
    }

    fn snapshot(&self) -> HandlerSnapshot {
        HandlerSnapshot {
            host: self.config.host.clone(),
            port: self.config.port,
            queue_len: self.shared.queue.len(),
            queue_max_len: self.shared.queue.capacity(),
            dropped: self.shared.dropped.load(Ordering::Relaxed),
            connection: self.status.lock().as_str(),
            flush_interval_secs: self.config.flush_interval_secs,
            buffering: self.shared.buffering.load(Ordering::Relaxed),
        }
    }
}

impl Sink for LogstashHandler {
    fn handle_record(&self, record: &LogRecord) {
        self.emit(record);
    }
}

/// Background flush loop: drain the queue, then wait for the next tick,
/// a wake signal, or shutdown. Runs until the stop signal arrives and
/// never starts a new drain cycle afterwards.
async fn flush_task(
    mut connection: Connection,
    shared: Arc<Shared>,
    flush_interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        drain_queue(&mut connection, &shared).await;

        tokio::select! {
            // The stop signal must win over a pending tick or wake permit
            // so no new drain cycle starts after shutdown.
            biased;
            _ = shutdown_rx.recv() => break,
            _ = tokio::time::sleep(flush_interval), if shared.buffering.load(Ordering::Relaxed) => {}
            _ = shared.wake.notified() => {}
        }
    }
}

/// Send every buffered entry in FIFO order. A failed send triggers one
/// reconnect and one retry of the same entry; if that also fails the entry
/// returns to the front of the queue and the cycle aborts until the next
/// tick.
async fn drain_queue(connection: &mut Connection, shared: &Shared) {
    while let Some(entry) = shared.queue.pop_front() {
        match connection.send(&entry).await {
            Ok(()) => {}
            Err(first) => {
                warn!(error = %first, "send failed, re-establishing connection");

                let retried = match connection.establish().await {
                    Ok(()) => connection.send(&entry).await,
                    Err(e) => Err(e),
                };

                if let Err(e) = retried {
                    error!(error = %e, "reconnect failed, entry requeued for next flush");
                    shared.queue.push_front(entry);
                    break;
                }
            }
        }
    }
}
