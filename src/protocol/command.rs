//! Command definitions
//!
//! Builds wire commands from ordered fields. Every field but the last is
//! length-prefixed; the last one runs to the end of the write, so the
//! remote reader can take the remainder verbatim.

use std::fmt;

use crate::error::{FetchError, Result};
use super::headers::encode_headers;
use super::packer::{pack_into, Field, MAX_PREFIXED_LEN};
use super::request::FetchRequest;
use super::response::FetchCallId;

/// Commands understood by the fetch service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    FetchAsync,
    GetResult,
    GetResultNowait,
}

impl CommandName {
    /// Name as written on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::FetchAsync => "FETCH_ASYNC",
            CommandName::GetResult => "GET_RESULT",
            CommandName::GetResultNowait => "GET_RESULT_NOWAIT",
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a sequence of fields into one command.
///
/// A single field is returned unchanged, with no framing at all.
pub fn command<F: AsRef<[u8]>>(fields: &[F]) -> Result<Vec<u8>> {
    let (last, framed) = fields
        .split_last()
        .ok_or_else(|| FetchError::Encoding("Command needs at least one field".to_string()))?;

    if framed.is_empty() {
        return Ok(last.as_ref().to_vec());
    }

    if let Some((index, field)) = framed
        .iter()
        .enumerate()
        .find(|(_, f)| f.as_ref().len() > MAX_PREFIXED_LEN)
    {
        return Err(FetchError::Encoding(format!(
            "Field {} is {} bytes, length prefix allows at most {}",
            index,
            field.as_ref().len(),
            MAX_PREFIXED_LEN
        )));
    }

    let capacity = framed.iter().map(|f| 1 + f.as_ref().len()).sum::<usize>() + last.as_ref().len();
    let mut out = Vec::with_capacity(capacity);

    for field in framed {
        let bytes = field.as_ref();
        pack_into(&mut out, &[Field::Length(bytes.len()), Field::Bytes(bytes)])?;
    }
    out.extend_from_slice(last.as_ref());

    Ok(out)
}

/// Encode `FETCH_ASYNC method url payload headers`.
///
/// The method is lower-cased and the headers serialized before framing.
/// The encoded header block is the trailing, unprefixed field.
pub fn encode_fetch_async(request: &FetchRequest) -> Result<Vec<u8>> {
    let method = request.method.to_lowercase();
    let headers = encode_headers(&request.headers);

    command(&[
        CommandName::FetchAsync.as_bytes(),
        method.as_bytes(),
        request.url.as_bytes(),
        request.payload.as_slice(),
        headers.as_bytes(),
    ])
}

/// Encode `GET_RESULT fid` or `GET_RESULT_NOWAIT fid`.
pub fn encode_get_result(fid: &FetchCallId, nowait: bool) -> Result<Vec<u8>> {
    let name = if nowait {
        CommandName::GetResultNowait
    } else {
        CommandName::GetResult
    };

    command(&[name.as_bytes(), fid.as_bytes()])
}
