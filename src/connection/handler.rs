//! Per-connection read/execute/reply loop.
//!
//! A connection is a byte stream carrying newline-terminated command lines.
//! Bytes accumulate in a `BytesMut` until at least one `\n` is present; each
//! complete line is split off, executed, and answered before the next one is
//! looked at, so replies come back in the order the lines were sent.
//!
//! ```text
//!   socket bytes                 buffer                      replies
//!  ─────────────>  "SET a 1\nINCRBYF"  ──split──> "SET a 1"  ──> "OK\n"
//!  ─────────────>  "INCRBYF" + "LOAT a 2\n" ───> "INCRBYFLOAT a 2" ──> "3\n"
//! ```
//!
//! A trailing `\r` is dropped, so `\r\n` clients work unchanged. A line that
//! grows past [`MAX_LINE_LENGTH`] without a terminator ends the connection;
//! failing commands do not.

use crate::commands::CommandHandler;
use crate::protocol::Reply;
use bytes::{Bytes, BytesMut};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, error, info, trace, warn};

/// Longest command line accepted, terminator excluded (64 KB)
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

const INITIAL_BUFFER_SIZE: usize = 4096;

/// Transport counters shared by every connection.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    pub connections_accepted: AtomicU64,
    pub active_connections: AtomicU64,
    pub commands_processed: AtomicU64,
    pub bytes_read: AtomicU64,
    pub bytes_written: AtomicU64,
}

/// Point-in-time copy of [`ConnectionStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    pub connections_accepted: u64,
    pub active_connections: u64,
    pub commands_processed: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_written(&self, count: usize) {
        self.bytes_written.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            connections_accepted: self.connections_accepted.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            commands_processed: self.commands_processed.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

/// Serves one client over any byte stream.
///
/// Generic over the stream so tests can drive it with in-memory mocks.
pub struct ConnectionHandler<S> {
    stream: BufWriter<S>,
    /// Peer address, used only for log fields
    addr: SocketAddr,
    /// Unframed input
    inbound: BytesMut,
    /// Encoded reply being sent
    outbound: BytesMut,
    commands: CommandHandler,
    stats: Arc<ConnectionStats>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps `stream` and counts it as an open connection.
    pub fn new(
        stream: S,
        addr: SocketAddr,
        commands: CommandHandler,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            addr,
            inbound: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            outbound: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            commands,
            stats,
        }
    }

    /// Serves lines until the peer goes away or the stream fails.
    ///
    /// A clean close between lines is reported as
    /// [`ConnectionError::ClientDisconnected`].
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, "Client connected");

        let outcome = self.serve().await;
        match &outcome {
            Err(e) if e.is_quiet_close() => debug!(client = %self.addr, reason = %e, "Client gone"),
            Err(e) => warn!(client = %self.addr, error = %e, "Connection error"),
            Ok(()) => {}
        }
        info!(client = %self.addr, "Client disconnected");

        self.stats.connection_closed();
        outcome
    }

    async fn serve(&mut self) -> Result<(), ConnectionError> {
        loop {
            while let Some(line) = self.take_line() {
                let reply = self.commands.execute(line);
                self.stats.command_processed();
                self.write_reply(&reply).await?;
            }
            self.fill().await?;
        }
    }

    /// Splits the next complete line off the input, without its terminator.
    fn take_line(&mut self) -> Option<Bytes> {
        let end = self.inbound.iter().position(|&b| b == b'\n')?;

        let mut line = self.inbound.split_to(end + 1);
        line.truncate(end);
        if line.ends_with(b"\r") {
            line.truncate(end - 1);
        }

        trace!(client = %self.addr, length = line.len(), pending = self.inbound.len(), "Framed line");
        Some(line.freeze())
    }

    /// Reads at least one more byte into the input buffer.
    async fn fill(&mut self) -> Result<(), ConnectionError> {
        // Only called when no terminator is buffered
        if self.inbound.len() >= MAX_LINE_LENGTH {
            error!(client = %self.addr, pending = self.inbound.len(), "Command line too long");
            return Err(ConnectionError::LineTooLong);
        }

        if self.inbound.capacity() - self.inbound.len() < 1024 {
            self.inbound.reserve(INITIAL_BUFFER_SIZE);
        }

        let n = self.stream.get_mut().read_buf(&mut self.inbound).await?;
        if n == 0 {
            return Err(if self.inbound.is_empty() {
                ConnectionError::ClientDisconnected
            } else {
                ConnectionError::UnexpectedEof
            });
        }

        self.stats.record_read(n);
        trace!(client = %self.addr, bytes = n, "Read");
        Ok(())
    }

    async fn write_reply(&mut self, reply: &Reply) -> Result<(), ConnectionError> {
        self.outbound.clear();
        reply.encode(&mut self.outbound);

        self.stream.write_all(&self.outbound).await?;
        self.stream.flush().await?;

        self.stats.record_written(self.outbound.len());
        Ok(())
    }
}

/// Why a connection stopped.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Peer closed the stream between lines
    #[error("Client disconnected")]
    ClientDisconnected,

    /// Peer closed the stream in the middle of a line
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    #[error("Line length limit exceeded")]
    LineTooLong,
}

impl ConnectionError {
    /// True for the ordinary ways a client leaves.
    pub fn is_quiet_close(&self) -> bool {
        match self {
            ConnectionError::ClientDisconnected => true,
            ConnectionError::IoError(e) => {
                matches!(e.kind(), ErrorKind::ConnectionReset | ErrorKind::BrokenPipe)
            }
            _ => false,
        }
    }
}

/// Serves an accepted TCP connection to completion.
///
/// Errors are logged by [`ConnectionHandler::run`]; nothing is returned
/// so the result can be handed straight to `tokio::spawn`.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    commands: CommandHandler,
    stats: Arc<ConnectionStats>,
) {
    let _ = ConnectionHandler::new(stream, addr, commands, stats).run().await;
}
