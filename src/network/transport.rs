//! Transport abstraction
//!
//! The client needs a duplex stream it can write whole commands to and read
//! bounded chunks from. TCP is the only production transport.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use crate::config::Address;

/// A duplex byte stream
pub trait Transport: Read + Write {
    /// Tear the stream down. Called once, on close.
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Label for log lines
    fn peer_label(&self) -> String {
        "unknown".to_string()
    }
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            // Peer already hung up
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    fn peer_label(&self) -> String {
        self.peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

/// Opens transports
pub trait Connector {
    type Stream: Transport;

    fn connect(&self, address: &Address) -> io::Result<Self::Stream>;
}

/// Plain TCP connector
#[derive(Debug, Clone, Copy)]
pub struct TcpConnector {
    nodelay: bool,
}

impl TcpConnector {
    pub fn new(nodelay: bool) -> Self {
        Self { nodelay }
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self, address: &Address) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(address)?;

        // Commands are single small writes; don't let Nagle sit on them
        stream.set_nodelay(self.nodelay)?;

        Ok(stream)
    }
}
