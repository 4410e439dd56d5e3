//! Header codec
//!
//! Header blocks are `key: value` lines joined by `\n`, sorted by key,
//! with no trailing newline. Nothing is escaped, so keys must not contain
//! `": "` and neither keys nor values may contain `\n`.

use std::collections::BTreeMap;

use crate::error::{FetchError, Result};

/// Header name to header value. Iteration order is the wire order.
pub type HeaderMap = BTreeMap<String, String>;

/// Separator between a header name and its value
pub const HEADER_SEPARATOR: &str = ": ";

/// Serialize headers into a block. An empty map yields an empty string.
pub fn encode_headers(headers: &HeaderMap) -> String {
    let mut block = String::with_capacity(
        headers
            .iter()
            .map(|(k, v)| k.len() + HEADER_SEPARATOR.len() + v.len() + 1)
            .sum(),
    );

    for (i, (key, value)) in headers.iter().enumerate() {
        if i > 0 {
            block.push('\n');
        }
        block.push_str(key);
        block.push_str(HEADER_SEPARATOR);
        block.push_str(value);
    }

    block
}

/// Parse a header block.
///
/// Empty lines are skipped. A line without `": "` aborts the whole decode.
/// Later duplicates of a key replace earlier ones.
pub fn decode_headers(block: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (line_no, line) in block.split('\n').enumerate() {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(HEADER_SEPARATOR).ok_or_else(|| {
            FetchError::Parse(format!(
                "Malformed header line {}: missing '{}' in {:?}",
                line_no + 1,
                HEADER_SEPARATOR,
                line
            ))
        })?;

        headers.insert(key.to_string(), value.to_string());
    }

    Ok(headers)
}

/// Parse a header block received as raw bytes.
pub fn decode_header_bytes(block: &[u8]) -> Result<HeaderMap> {
    let text = std::str::from_utf8(block)
        .map_err(|e| FetchError::Parse(format!("Header block is not valid UTF-8: {}", e)))?;
    decode_headers(text)
}
