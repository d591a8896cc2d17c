//! TCP connection management for the flush task

use crate::{Result, ShipperError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::info;

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No usable stream; the next flush cycle will attempt to connect
    Disconnected,
    /// A connect attempt is in flight, bounded by the configured timeout
    Connecting,
    /// The stream is established and writable
    Connected,
}

impl ConnectionState {
    /// State name as reported in handler diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

/// Shared, observable connection state slot. Written only by the flush
/// task that owns the connection; read for diagnostics.
pub type StateCell = Arc<Mutex<ConnectionState>>;

/// A single outbound TCP stream to the log endpoint.
///
/// Owned exclusively by the flush task. Exactly one connect attempt is in
/// flight at any time, and both connect and send are bounded by the
/// configured timeout.
pub struct Connection {
    addr: String,
    timeout: Duration,
    stream: Option<TcpStream>,
    state: StateCell,
}

impl Connection {
    /// Create an unconnected handle to `host:port`
    pub fn new(host: &str, port: u16, timeout: Duration, state: StateCell) -> Self {
        Self {
            addr: format!("{}:{}", host, port),
            timeout,
            stream: None,
            state,
        }
    }

    /// Establish a fresh stream, replacing any broken one
    pub async fn establish(&mut self) -> Result<()> {
        self.stream = None;
        self.set_state(ConnectionState::Connecting);

        match timeout(self.timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(stream)) => {
                self.stream = Some(stream);
                self.set_state(ConnectionState::Connected);
                info!(addr = %self.addr, "connected to log endpoint");
                Ok(())
            }
            Ok(Err(e)) => {
                self.set_state(ConnectionState::Disconnected);
                Err(ShipperError::Connection(format!(
                    "Failed to connect to {}: {}",
                    self.addr, e
                )))
            }
            Err(_) => {
                self.set_state(ConnectionState::Disconnected);
                Err(ShipperError::Connection(format!(
                    "Connection to {} timed out",
                    self.addr
                )))
            }
        }
    }

    /// Write one entry, newline-terminated, to the stream
    pub async fn send(&mut self, entry: &str) -> Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ShipperError::Connection("Not connected".to_string()))?;

        let write = async {
            stream.write_all(entry.as_bytes()).await?;
            stream.write_all(b"\n").await?;
            stream.flush().await?;
            Ok::<(), std::io::Error>(())
        };

        match timeout(self.timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.disconnect();
                Err(ShipperError::Io(e))
            }
            Err(_) => {
                self.disconnect();
                Err(ShipperError::Connection(format!(
                    "Send to {} timed out",
                    self.addr
                )))
            }
        }
    }

    /// Drop the stream and mark the connection as down
    pub fn disconnect(&mut self) {
        self.stream = None;
        self.set_state(ConnectionState::Disconnected);
    }

    /// True when a stream is currently established
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn set_state(&self, next: ConnectionState) {
        *self.state.lock() = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    fn state_cell() -> StateCell {
        Arc::new(Mutex::new(ConnectionState::Disconnected))
    }

    #[tokio::test]
    async fn establish_and_send_delivers_newline_terminated_entry() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = state_cell();
        let mut conn = Connection::new(
            "127.0.0.1",
            addr.port(),
            Duration::from_secs(5),
            Arc::clone(&state),
        );

        conn.establish().await.unwrap();
        assert!(conn.is_connected());
        assert_eq!(*state.lock(), ConnectionState::Connected);

        let (stream, _) = listener.accept().await.unwrap();
        conn.send("{\"message\":\"hi\"}").await.unwrap();

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "{\"message\":\"hi\"}\n");
    }

    #[tokio::test]
    async fn establish_fails_against_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let state = state_cell();
        let mut conn = Connection::new(
            "127.0.0.1",
            addr.port(),
            Duration::from_secs(1),
            Arc::clone(&state),
        );

        assert!(conn.establish().await.is_err());
        assert!(!conn.is_connected());
        assert_eq!(*state.lock(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn send_without_stream_reports_not_connected() {
        let mut conn = Connection::new("127.0.0.1", 1, Duration::from_secs(1), state_cell());

        match conn.send("entry").await {
            Err(ShipperError::Connection(msg)) => assert!(msg.contains("Not connected")),
            other => panic!("expected connection error, got {:?}", other),
        }
    }
}
