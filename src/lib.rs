//! # urlfetch
//!
//! Client for a remote URL fetch service:
//! - Submit an HTTP/S fetch and get back an opaque fetch call id
//! - Collect the result (status, headers, body) later by that id
//! - Length-prefixed command framing over plain TCP
//! - Incremental, terminator-delimited result parsing
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       FetchClient                            │
//! │         (start_fetch / get_result / fetch / close)           │
//! └──────────────┬──────────────────────────────▲───────────────┘
//!                │                              │
//!                ▼                              │
//!   ┌─────────────────────────┐    ┌────────────┴────────────┐
//!   │     Command Encoder     │    │     Response Framer     │
//!   │ (packer + header codec) │    │ (status, \n\n, \tEOF\n$)│
//!   └────────────┬────────────┘    └────────────▲────────────┘
//!                │                              │
//!                ▼                              │
//! ┌─────────────────────────────────────────────┴───────────────┐
//! │                  Connection (TCP stream)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use urlfetch::{Address, FetchClient, FetchRequest};
//!
//! let mut client = FetchClient::new(Address::new("127.0.0.1", 10190));
//! let fid = client.start_fetch(&FetchRequest::new("http://www.rust-lang.org"))?;
//! let result = client.get_result(&fid, false)?;
//! println!("{} ({} bytes)", result.status_code, result.body.len());
//! client.close()?;
//! # Ok::<(), urlfetch::FetchError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FetchError, Result};
pub use config::{Address, ClientConfig};
pub use client::{FetchClient, SharedFetchClient};
pub use protocol::{FetchCallId, FetchRequest, FetchResult, HeaderMap};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of urlfetch
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
