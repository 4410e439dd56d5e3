//! Protocol Module
//!
//! Defines the wire protocol spoken with the fetch service.
//!
//! ## Request Format
//! ```text
//! ┌─────────┬──────────┬─────────┬──────────┬─────┬─────────────────┐
//! │ Len (1) │ Field 0  │ Len (1) │ Field 1  │ ... │ Last field (raw)│
//! └─────────┴──────────┴─────────┴──────────┴─────┴─────────────────┘
//! ```
//! A command with a single field is that field alone, unframed.
//!
//! ### Commands
//! - `FETCH_ASYNC method url payload headers` -> 32-byte fetch call id, or `ERROR`
//! - `GET_RESULT fid`                         -> result stream, or `NOT_FOUND`
//! - `GET_RESULT_NOWAIT fid`                  -> result stream, or `NOT_FOUND` if not ready
//!
//! ### Result Stream
//! ```text
//! ┌────────────┬──────────────┬──────┬──────────┬────────────┐
//! │ Status (4) │ Header block │ \n\n │   Body   │ \tEOF\n$   │
//! └────────────┴──────────────┴──────┴──────────┴────────────┘
//! ```

mod packer;
mod command;
mod headers;
mod request;
mod response;
mod framer;

pub use packer::{pack, pack_into, Field, MAX_PREFIXED_LEN};
pub use command::{command, encode_fetch_async, encode_get_result, CommandName};
pub use headers::{decode_header_bytes, decode_headers, encode_headers, HeaderMap, HEADER_SEPARATOR};
pub use request::{FetchRequest, DEFAULT_METHOD};
pub use response::{
    is_error_reply, FetchCallId, FetchResult, ERROR, FETCH_CALL_ID_LEN, NOT_FOUND, TERMINATOR,
};
pub use framer::{read_result, Progress, ResponseFramer, STATUS_SIZE};
