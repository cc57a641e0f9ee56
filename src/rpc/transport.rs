//! TCP transport with newline delimited framing.
//!
//! Owns a single blocking-style connection: the caller awaits `send_all`
//! and then `read_frame` until a full line arrives or the peer closes.
//! Reads are buffered and split on the delimiter, which preserves the
//! framing semantics of a byte-at-a-time loop (no data loss, no delimiter
//! leakage) while amortizing system calls.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time;
use tracing::{debug, info};

use super::common::RpcError;

/// One framed read from the peer.
///
/// End-of-stream with zero bytes read is surfaced as a distinct condition
/// so callers can tell a half-closed peer apart from a real empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A full line, excluding the `\n` delimiter.
    Line(String),
    /// The peer closed the connection before any byte arrived.
    Eof,
}

/// A single TCP connection to the RPC server.
#[derive(Debug)]
pub struct Transport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    deadline: Option<Duration>,
    peer: String,
}

impl Transport {
    /// Establish a TCP connection.
    ///
    /// `deadline` bounds the connect and every subsequent read/write;
    /// `None` matches the protocol default of no timeout.
    pub async fn open(host: &str, port: u16, deadline: Option<Duration>) -> Result<Self, RpcError> {
        let addr = format!("{}:{}", host, port);
        let stream = with_deadline(deadline, TcpStream::connect(&addr))
            .await
            .map_err(|source| RpcError::Connection {
                addr: addr.clone(),
                source,
            })?;

        info!("connected to rpc server: {}", addr);

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            deadline,
            peer: addr,
        })
    }

    /// Write the full buffer and flush it.
    pub async fn send_all(&mut self, bytes: &[u8]) -> Result<(), RpcError> {
        with_deadline(self.deadline, self.writer.write_all(bytes)).await?;
        with_deadline(self.deadline, self.writer.flush()).await?;
        Ok(())
    }

    /// Read bytes until a `\n` delimiter or end-of-stream.
    ///
    /// The returned line excludes the delimiter. A stream that ends mid
    /// line yields the bytes accumulated so far; a stream that ends before
    /// any byte yields [`Frame::Eof`].
    pub async fn read_frame(&mut self) -> Result<Frame, RpcError> {
        let mut line = Vec::new();
        let read = with_deadline(self.deadline, self.reader.read_until(b'\n', &mut line)).await?;
        if read == 0 {
            debug!("peer closed connection: {}", self.peer);
            return Ok(Frame::Eof);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        let text = String::from_utf8(line)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Frame::Line(text))
    }

    /// Release the socket. Safe to call more than once.
    pub async fn close(&mut self) -> Result<(), RpcError> {
        match self.writer.shutdown().await {
            Ok(()) => {
                info!("closed connection to rpc server: {}", self.peer);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(RpcError::Io(e)),
        }
    }
}

/// Apply the optional I/O deadline to a future.
async fn with_deadline<T, F>(deadline: Option<Duration>, fut: F) -> io::Result<T>
where
    F: std::future::Future<Output = io::Result<T>>,
{
    match deadline {
        Some(limit) => match time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "i/o deadline exceeded",
            )),
        },
        None => fut.await,
    }
}
