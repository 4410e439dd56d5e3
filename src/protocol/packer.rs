//! Binary packer
//!
//! Concatenates length bytes and raw byte strings into one buffer.
//! There is no unpacking side: the client only produces framed fields.

use bytes::BufMut;

use crate::error::{FetchError, Result};

/// Largest length that fits the single-byte prefix
pub const MAX_PREFIXED_LEN: usize = u8::MAX as usize;

/// One input to [`pack`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    /// Unsigned length, written as a single byte
    Length(usize),

    /// Raw bytes, written verbatim
    Bytes(&'a [u8]),
}

impl<'a> From<&'a [u8]> for Field<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Field::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Field<'a> {
    fn from(s: &'a str) -> Self {
        Field::Bytes(s.as_bytes())
    }
}

impl From<usize> for Field<'_> {
    fn from(len: usize) -> Self {
        Field::Length(len)
    }
}

/// Pack fields in order with no delimiter.
///
/// Lengths are not checked against the bytes they precede; pairing them is
/// the caller's job. A length above 255 fails instead of being truncated.
pub fn pack(fields: &[Field<'_>]) -> Result<Vec<u8>> {
    let capacity = fields
        .iter()
        .map(|f| match f {
            Field::Length(_) => 1,
            Field::Bytes(b) => b.len(),
        })
        .sum();

    let mut out = Vec::with_capacity(capacity);
    pack_into(&mut out, fields)?;
    Ok(out)
}

/// Append packed fields to an existing buffer.
///
/// On error nothing is appended.
pub fn pack_into<B: BufMut>(out: &mut B, fields: &[Field<'_>]) -> Result<()> {
    if let Some(len) = fields.iter().find_map(|f| match f {
        Field::Length(len) if *len > MAX_PREFIXED_LEN => Some(*len),
        _ => None,
    }) {
        return Err(FetchError::Encoding(format!(
            "Length {} does not fit a single-byte prefix (max {})",
            len, MAX_PREFIXED_LEN
        )));
    }

    for field in fields {
        match field {
            Field::Length(len) => out.put_u8(*len as u8),
            Field::Bytes(bytes) => out.put_slice(bytes),
        }
    }

    Ok(())
}
