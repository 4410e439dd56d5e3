//! Fetch client
//!
//! Drives one connection to the fetch service through the request/reply
//! cycle of each command.

use crate::config::{Address, ClientConfig};
use crate::error::{FetchError, Result};
use crate::network::{Connection, Connector, TcpConnector, Transport};
use crate::protocol::{
    encode_fetch_async, encode_get_result, is_error_reply, FetchCallId, FetchRequest,
    FetchResult, Progress, ResponseFramer, FETCH_CALL_ID_LEN,
};

/// Connection lifetime: opened on first use, closed explicitly
enum ConnectionState<C: Connector> {
    Closed,
    Open(Connection<C::Stream>),
}

/// Client for the URL fetch service
///
/// ## Concurrency
///
/// Every call blocks until its reply is fully read. One client owns one
/// connection, so operations take `&mut self`; share it between threads
/// with [`SharedFetchClient`](super::SharedFetchClient) or use one client
/// per thread.
///
/// No timeouts are applied. A call blocks until the service answers or
/// the stream closes.
pub struct FetchClient<C: Connector = TcpConnector> {
    /// Client configuration
    config: ClientConfig,

    /// Opens the transport on first use
    connector: C,

    state: ConnectionState<C>,
}

impl FetchClient<TcpConnector> {
    /// Create a TCP client for the given service address
    pub fn new(address: Address) -> Self {
        Self::with_config(ClientConfig::builder().address(address).build())
    }

    /// Create a TCP client from a full config
    pub fn with_config(config: ClientConfig) -> Self {
        let connector = TcpConnector::new(config.nodelay);
        Self::with_connector(config, connector)
    }
}

impl Default for FetchClient<TcpConnector> {
    fn default() -> Self {
        Self::with_config(ClientConfig::default())
    }
}

impl<C: Connector> FetchClient<C> {
    /// Create a client over a custom transport
    pub fn with_connector(config: ClientConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            state: ConnectionState::Closed,
        }
    }

    /// Service address this client connects to
    pub fn address(&self) -> &Address {
        &self.config.address
    }

    /// True while a connection is held
    pub fn is_open(&self) -> bool {
        matches!(self.state, ConnectionState::Open(_))
    }

    /// Start an asynchronous fetch and return its call id.
    ///
    /// Fails with `Download` when the service answers `ERROR`.
    pub fn start_fetch(&mut self, request: &FetchRequest) -> Result<FetchCallId> {
        let command = encode_fetch_async(request)?;
        tracing::trace!(
            method = %request.method,
            url = %request.url,
            bytes = command.len(),
            "Sending FETCH_ASYNC"
        );

        let reply = {
            let conn = self.connection()?;
            conn.send(&command)?;
            read_call_id_reply(conn)?
        };

        if is_error_reply(&reply) {
            // Padding may still be in flight; don't let the next call read it
            if reply.len() < FETCH_CALL_ID_LEN {
                if let Err(e) = self.close() {
                    tracing::debug!("Failed to close after ERROR reply: {}", e);
                }
            }
            return Err(FetchError::Download(format!(
                "Service rejected fetch of {}",
                request.url
            )));
        }

        FetchCallId::try_from(reply.as_slice()).map_err(|_| FetchError::StreamTruncated {
            received: reply.len(),
        })
    }

    /// Retrieve the result of a fetch.
    ///
    /// With `nowait` the service answers immediately; an unfinished fetch
    /// then surfaces as a `Download` error just like an unknown id.
    pub fn get_result(&mut self, fid: &FetchCallId, nowait: bool) -> Result<FetchResult> {
        let command = encode_get_result(fid, nowait)?;
        tracing::trace!(fid = %fid, nowait, bytes = command.len(), "Sending GET_RESULT");

        let conn = self.connection()?;
        conn.send(&command)?;

        let mut framer = ResponseFramer::new();
        loop {
            let chunk = conn.read_chunk(usize::MAX)?;
            if chunk.is_empty() {
                return Err(framer.end_of_stream());
            }

            if let Progress::Complete(result) = framer.feed(chunk)? {
                return Ok(result);
            }
        }
    }

    /// Start a fetch and block until its result is available
    pub fn fetch(&mut self, request: &FetchRequest) -> Result<FetchResult> {
        let fid = self.start_fetch(request)?;
        self.get_result(&fid, false)
    }

    /// Close the connection. Closing a closed client does nothing.
    pub fn close(&mut self) -> Result<()> {
        let previous = std::mem::replace(&mut self.state, ConnectionState::Closed);
        if let ConnectionState::Open(conn) = previous {
            conn.close()?;
        }
        Ok(())
    }

    /// Open the connection if needed and hand it out
    fn connection(&mut self) -> Result<&mut Connection<C::Stream>> {
        if let ConnectionState::Closed = self.state {
            let stream = self.connector.connect(&self.config.address)?;
            let conn = Connection::new(stream, self.config.max_chunk_size);
            tracing::debug!("Connected to {} ({})", self.config.address, conn.peer_addr());
            self.state = ConnectionState::Open(conn);
        }

        match &mut self.state {
            ConnectionState::Open(conn) => Ok(conn),
            ConnectionState::Closed => Err(FetchError::Protocol(
                "Connection missing after open".to_string(),
            )),
        }
    }
}

/// Read the 32-byte `FETCH_ASYNC` reply.
///
/// Stops early at EOF, or as soon as what arrived so far is a bare or
/// padded `ERROR`, since the service may send just the five bytes.
fn read_call_id_reply<S: Transport>(conn: &mut Connection<S>) -> Result<Vec<u8>> {
    let mut reply = Vec::with_capacity(FETCH_CALL_ID_LEN);

    while reply.len() < FETCH_CALL_ID_LEN {
        let chunk = conn.read_chunk(FETCH_CALL_ID_LEN - reply.len())?;
        if chunk.is_empty() {
            break;
        }
        reply.extend_from_slice(chunk);

        if is_error_reply(&reply) {
            break;
        }
    }

    Ok(reply)
}
