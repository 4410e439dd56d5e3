//! Response definitions
//!
//! Values produced by the fetch service: call ids and fetch results.

use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;
use super::headers::HeaderMap;

/// Length of a fetch-call id on the wire
pub const FETCH_CALL_ID_LEN: usize = 32;

/// Reply to `FETCH_ASYNC` when the service rejects the request
pub const ERROR: &[u8] = b"ERROR";

/// Reply to `GET_RESULT[_NOWAIT]` when no (ready) result exists
pub const NOT_FOUND: &[u8] = b"NOT_FOUND";

/// Marks the end of a result stream
pub const TERMINATOR: &[u8] = b"\tEOF\n$";

/// Opaque token correlating a `FETCH_ASYNC` with its `GET_RESULT`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchCallId([u8; FETCH_CALL_ID_LEN]);

impl FetchCallId {
    pub fn new(bytes: [u8; FETCH_CALL_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for FetchCallId {
    type Error = FetchError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; FETCH_CALL_ID_LEN] = bytes.try_into().map_err(|_| {
            FetchError::Parse(format!(
                "Fetch call id must be {} bytes, got {}",
                FETCH_CALL_ID_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }
}

impl FromStr for FetchCallId {
    type Err = FetchError;

    /// Parse the escaped text form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(unescape(s)?.as_slice())
    }
}

impl AsRef<[u8]> for FetchCallId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Printable ASCII as-is, everything else as `\t`, `\n`, `\xNN`, ...
impl fmt::Display for FetchCallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{}", std::ascii::escape_default(byte))?;
        }
        Ok(())
    }
}

impl fmt::Debug for FetchCallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FetchCallId(\"{}\")", self)
    }
}

/// Inverse of `std::ascii::escape_default`
fn unescape(s: &str) -> Result<Vec<u8>, FetchError> {
    let invalid = || FetchError::Parse(format!("Invalid escape in fetch call id {:?}", s));

    let mut out = Vec::with_capacity(s.len());
    let mut bytes = s.bytes();

    while let Some(byte) = bytes.next() {
        if byte != b'\\' {
            out.push(byte);
            continue;
        }

        let unescaped = match bytes.next() {
            Some(b'\\') => b'\\',
            Some(b'\'') => b'\'',
            Some(b'"') => b'"',
            Some(b't') => b'\t',
            Some(b'n') => b'\n',
            Some(b'r') => b'\r',
            Some(b'x') => {
                let hi = bytes.next().and_then(hex_digit).ok_or_else(invalid)?;
                let lo = bytes.next().and_then(hex_digit).ok_or_else(invalid)?;
                hi << 4 | lo
            }
            _ => return Err(invalid()),
        };
        out.push(unescaped);
    }

    Ok(out)
}

fn hex_digit(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// True for an `ERROR` reply, bare or padded with NUL or space
pub fn is_error_reply(reply: &[u8]) -> bool {
    reply.starts_with(ERROR) && reply[ERROR.len()..].iter().all(|b| matches!(b, 0 | b' '))
}

/// A complete fetch result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// HTTP status code reported by the service
    pub status_code: u32,

    /// Response headers
    pub headers: HeaderMap,

    /// Response body (may be empty)
    pub body: Vec<u8>,
}

impl FetchResult {
    pub fn new(status_code: u32, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// Look up a header by exact name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
