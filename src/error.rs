//! Error types for urlfetch
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using FetchError
pub type Result<T> = std::result::Result<T, FetchError>;

/// Unified error type for urlfetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Encoding Errors (raised before any bytes hit the wire)
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Decoding Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Stream truncated after {received} bytes, terminator never observed")]
    StreamTruncated { received: usize },

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Remote Service Errors
    // -------------------------------------------------------------------------
    #[error("Download failed: {0}")]
    Download(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// True when the remote service explicitly reported failure.
    ///
    /// These are recoverable: under `nowait` a download error usually means
    /// the result is simply not ready yet.
    pub fn is_download(&self) -> bool {
        matches!(self, FetchError::Download(_))
    }

    /// True when the connection should be treated as unusable.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(self, FetchError::Io(_) | FetchError::StreamTruncated { .. })
    }
}
