//! Configuration for urlfetch
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::error::FetchError;

/// Default host of the fetch service
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default TCP port of the fetch service
pub const DEFAULT_PORT: u16 = 10190;

/// Default upper bound for a single socket read (bytes)
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1024;

/// Endpoint of the remote fetch service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub host: String,
    pub port: u16,
}

impl Address {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Address {
    type Err = FetchError;

    /// Parse `host:port`. The last colon separates the port.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| FetchError::Config(format!("Missing port in address '{}'", s)))?;

        if host.is_empty() {
            return Err(FetchError::Config(format!("Missing host in address '{}'", s)));
        }

        let port = port
            .parse::<u16>()
            .map_err(|e| FetchError::Config(format!("Invalid port in address '{}': {}", s, e)))?;

        Ok(Self::new(host, port))
    }
}

impl ToSocketAddrs for Address {
    type Iter = std::vec::IntoIter<SocketAddr>;

    fn to_socket_addrs(&self) -> io::Result<Self::Iter> {
        (self.host.as_str(), self.port).to_socket_addrs()
    }
}

/// Main configuration for a fetch client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Remote fetch service endpoint
    pub address: Address,

    /// Disable Nagle's algorithm on the TCP socket
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Max bytes requested per socket read while framing a result
    pub max_chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: Address::default(),
            nodelay: true,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the remote service address
    pub fn address(mut self, address: Address) -> Self {
        self.config.address = address;
        self
    }

    /// Toggle TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the per-read chunk size (zero is raised to one)
    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.config.max_chunk_size = size.max(1);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
