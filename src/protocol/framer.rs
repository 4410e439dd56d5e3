//! Response framer
//!
//! Rebuilds a [`FetchResult`] from a `GET_RESULT` reply read in arbitrary
//! chunks.
//!
//! ## Stream Layout
//! ```text
//! ┌────────────┬──────────────┬──────┬──────────┬──────────────┐
//! │ Status (4) │ Header block │ \n\n │   Body   │ \tEOF\n$     │
//! └────────────┴──────────────┴──────┴──────────┴──────────────┘
//! ```
//!
//! Or, when the service has no (ready) result: the bytes `NOT_FOUND`.
//!
//! The terminator is not escaped by the service. A body that happens to
//! end a chunk with the terminator bytes is cut short there.

use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::error::{FetchError, Result};
use super::headers::decode_header_bytes;
use super::response::{FetchResult, NOT_FOUND, TERMINATOR};

/// Size of the big-endian status code prefix
pub const STATUS_SIZE: usize = 4;

/// Separator between header block and body
const BLANK_LINE: &[u8] = b"\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramerState {
    /// Fewer than 4 bytes seen, or a possible `NOT_FOUND` still arriving
    AwaitingHeader,

    /// Status known, collecting header block and body
    AccumulatingBody { status_code: u32 },

    Complete,

    Failed,
}

/// Outcome of feeding one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Terminator not seen yet
    Pending,

    /// Terminator seen; the framer is finished
    Complete(FetchResult),
}

/// Incremental parser for result streams
#[derive(Debug)]
pub struct ResponseFramer {
    state: FramerState,

    /// Bytes before the status code is known, then header block + body
    buffer: BytesMut,

    /// Total bytes fed, for error reporting
    received: usize,
}

impl ResponseFramer {
    pub fn new() -> Self {
        Self {
            state: FramerState::AwaitingHeader,
            buffer: BytesMut::new(),
            received: 0,
        }
    }

    /// Status code, once the first 4 bytes have been consumed
    pub fn status_code(&self) -> Option<u32> {
        match self.state {
            FramerState::AccumulatingBody { status_code } => Some(status_code),
            _ => None,
        }
    }

    /// True once the framer completed or failed
    pub fn is_finished(&self) -> bool {
        matches!(self.state, FramerState::Complete | FramerState::Failed)
    }

    /// Total bytes fed so far
    pub fn received(&self) -> usize {
        self.received
    }

    /// Feed the next chunk read off the stream.
    ///
    /// An empty chunk means the peer sent nothing more and is treated as
    /// end of stream.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Progress> {
        if self.is_finished() {
            return Err(FetchError::Protocol(
                "Response framer fed after it finished".to_string(),
            ));
        }

        if chunk.is_empty() {
            return Err(self.end_of_stream());
        }

        self.received += chunk.len();

        let outcome = match self.state {
            FramerState::AwaitingHeader => self.feed_header(chunk),
            FramerState::AccumulatingBody { status_code } => self.feed_body(status_code, chunk),
            FramerState::Complete | FramerState::Failed => {
                return Err(FetchError::Protocol("Response framer is finished".to_string()))
            }
        };

        match outcome {
            Ok(Progress::Complete(result)) => {
                self.state = FramerState::Complete;
                Ok(Progress::Complete(result))
            }
            Ok(Progress::Pending) => Ok(Progress::Pending),
            Err(e) => {
                self.fail();
                Err(e)
            }
        }
    }

    /// Signal that the stream closed. Always an error: a finished framer
    /// never needs this call.
    pub fn end_of_stream(&mut self) -> FetchError {
        if self.state == FramerState::Complete {
            return FetchError::Protocol("End of stream after response completed".to_string());
        }

        tracing::trace!(received = self.received, "Result stream ended before terminator");
        self.fail();
        FetchError::StreamTruncated {
            received: self.received,
        }
    }

    fn feed_header(&mut self, chunk: &[u8]) -> Result<Progress> {
        self.buffer.extend_from_slice(chunk);

        if self.buffer.starts_with(NOT_FOUND) {
            return Err(not_found());
        }

        // "NOT_" parses as a status too; hold off until it can't be NOT_FOUND
        let maybe_not_found =
            self.buffer.len() < NOT_FOUND.len() && NOT_FOUND.starts_with(&self.buffer);
        if self.buffer.len() < STATUS_SIZE || maybe_not_found {
            return Ok(Progress::Pending);
        }

        let status_code = self.buffer.get_u32();
        tracing::trace!(status_code, "Result status received");
        self.state = FramerState::AccumulatingBody { status_code };

        self.check_complete(status_code)
    }

    fn feed_body(&mut self, status_code: u32, chunk: &[u8]) -> Result<Progress> {
        if chunk == NOT_FOUND {
            return Err(not_found());
        }

        self.buffer.extend_from_slice(chunk);
        self.check_complete(status_code)
    }

    fn check_complete(&mut self, status_code: u32) -> Result<Progress> {
        if !self.buffer.ends_with(TERMINATOR) {
            return Ok(Progress::Pending);
        }

        self.buffer.truncate(self.buffer.len() - TERMINATOR.len());
        let envelope = self.buffer.split().freeze();

        let (header_block, body) = match find(&envelope, BLANK_LINE) {
            Some(at) => (&envelope[..at], &envelope[at + BLANK_LINE.len()..]),
            None => (&envelope[..], &[][..]),
        };

        let headers = decode_header_bytes(header_block)?;
        tracing::trace!(
            status_code,
            headers = headers.len(),
            body_len = body.len(),
            "Result framed"
        );

        Ok(Progress::Complete(FetchResult::new(
            status_code,
            headers,
            body.to_vec(),
        )))
    }

    fn fail(&mut self) {
        self.state = FramerState::Failed;
        self.buffer.clear();
    }
}

impl Default for ResponseFramer {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found() -> FetchError {
    FetchError::Download("Fetch call not found or result not ready".to_string())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete result from a stream
///
/// Blocks until the terminator is seen, the service reports `NOT_FOUND`,
/// or the stream ends.
pub fn read_result<R: Read>(reader: &mut R, chunk_size: usize) -> Result<FetchResult> {
    let mut framer = ResponseFramer::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if n == 0 {
            return Err(framer.end_of_stream());
        }

        if let Progress::Complete(result) = framer.feed(&chunk[..n])? {
            return Ok(result);
        }
    }
}
