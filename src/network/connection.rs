//! Connection Handler
//!
//! Owns one open transport to the fetch service.

use std::io::{self, ErrorKind, Read, Write};

use super::Transport;

/// An open connection to the fetch service
pub struct Connection<S: Transport> {
    /// The underlying stream (exclusively owned)
    stream: S,

    /// Reusable read buffer, sized to the max chunk
    chunk: Vec<u8>,

    /// Peer address for logging
    peer_addr: String,
}

impl<S: Transport> Connection<S> {
    /// Wrap an open stream
    pub fn new(stream: S, max_chunk_size: usize) -> Self {
        let peer_addr = stream.peer_label();

        Self {
            stream,
            chunk: vec![0u8; max_chunk_size.max(1)],
            peer_addr,
        }
    }

    /// Write one whole command
    pub fn send(&mut self, command: &[u8]) -> io::Result<()> {
        self.stream.write_all(command)?;
        self.stream.flush()
    }

    /// Read at most `limit` bytes (capped at the chunk size).
    ///
    /// An empty slice means the peer closed the stream.
    pub fn read_chunk(&mut self, limit: usize) -> io::Result<&[u8]> {
        let want = limit.min(self.chunk.len());

        loop {
            match self.stream.read(&mut self.chunk[..want]) {
                Ok(n) => return Ok(&self.chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Shut the stream down, consuming the connection
    pub fn close(mut self) -> io::Result<()> {
        tracing::debug!("Closing connection to {}", self.peer_addr);
        self.stream.shutdown()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
