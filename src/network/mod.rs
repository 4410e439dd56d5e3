//! Network Module
//!
//! Transport seam between the client and the byte stream it talks over.
//!
//! ## Architecture
//! - `Transport`: any duplex byte stream (TCP in production)
//! - `Connector`: opens a transport for an address
//! - `Connection`: owns one transport, writes commands, reads chunks

mod transport;
mod connection;

pub use transport::{Connector, TcpConnector, Transport};
pub use connection::Connection;
