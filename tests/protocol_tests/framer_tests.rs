//! Tests for the response framer
//!
//! These tests verify:
//! - Status code extraction (including split across chunks)
//! - Terminator detection at arbitrary chunk boundaries
//! - Header block / body split on the first blank line
//! - NOT_FOUND and truncated-stream failures
//! - Terminal states reject further input

use std::io::{self, Cursor, Read};

use urlfetch::protocol::{
    read_result, FetchResult, HeaderMap, Progress, ResponseFramer, NOT_FOUND, TERMINATOR,
};
use urlfetch::FetchError;

// =============================================================================
// Helper Functions
// =============================================================================

fn stream(status: u32, header_block: &str, body: &[u8]) -> Vec<u8> {
    let mut bytes = status.to_be_bytes().to_vec();
    bytes.extend_from_slice(header_block.as_bytes());
    bytes.extend_from_slice(b"\n\n");
    bytes.extend_from_slice(body);
    bytes.extend_from_slice(TERMINATOR);
    bytes
}

/// Feed in fixed-size chunks, returning the first non-pending outcome
fn feed_chunked(bytes: &[u8], size: usize) -> urlfetch::Result<FetchResult> {
    let mut framer = ResponseFramer::new();
    for chunk in bytes.chunks(size) {
        if let Progress::Complete(result) = framer.feed(chunk)? {
            return Ok(result);
        }
    }
    Err(framer.end_of_stream())
}

/// Reader that hands out one scripted chunk per read call
struct ChunkedReader {
    chunks: Vec<Vec<u8>>,
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.chunks.is_empty() {
            return Ok(0);
        }
        let chunk = self.chunks.remove(0);
        assert!(chunk.len() <= buf.len(), "scripted chunk larger than read buffer");
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

// =============================================================================
// Successful Framing
// =============================================================================

#[test]
fn test_empty_headers_with_body() {
    let result = feed_chunked(&stream(200, "", b"hello"), 1024).unwrap();

    assert_eq!(result.status_code, 200);
    assert!(result.headers.is_empty());
    assert_eq!(result.body, b"hello");
}

#[test]
fn test_headers_without_body() {
    let result = feed_chunked(&stream(404, "Content-Type: text/plain", b""), 1024).unwrap();

    let mut expected = HeaderMap::new();
    expected.insert("Content-Type".to_string(), "text/plain".to_string());

    assert_eq!(result.status_code, 404);
    assert_eq!(result.headers, expected);
    assert!(result.body.is_empty());
}

#[test]
fn test_every_chunk_size() {
    let bytes = stream(301, "Location: http://x/\nServer: test", b"moved\npermanently");

    for size in 1..=bytes.len() {
        let result = feed_chunked(&bytes, size).unwrap();
        assert_eq!(result.status_code, 301, "chunk size {}", size);
        assert_eq!(result.header("Location"), Some("http://x/"));
        assert_eq!(result.header("Server"), Some("test"));
        assert_eq!(result.body, b"moved\npermanently");
    }
}

#[test]
fn test_body_keeps_later_blank_lines() {
    let result = feed_chunked(&stream(200, "A: 1", b"para one\n\npara two"), 7).unwrap();
    assert_eq!(result.body, b"para one\n\npara two");
}

#[test]
fn test_binary_body() {
    let body: Vec<u8> = (0..=255).collect();
    let result = feed_chunked(&stream(200, "", &body), 64).unwrap();
    assert_eq!(result.body, body);
}

#[test]
fn test_no_blank_line_means_all_headers() {
    let mut bytes = 500u32.to_be_bytes().to_vec();
    bytes.extend_from_slice(b"X-Error: upstream");
    bytes.extend_from_slice(TERMINATOR);

    let result = feed_chunked(&bytes, 1024).unwrap();
    assert_eq!(result.status_code, 500);
    assert_eq!(result.header("X-Error"), Some("upstream"));
    assert!(result.body.is_empty());
}

#[test]
fn test_bare_status_and_terminator() {
    let mut bytes = 204u32.to_be_bytes().to_vec();
    bytes.extend_from_slice(TERMINATOR);

    let result = feed_chunked(&bytes, 1024).unwrap();
    assert_eq!(result.status_code, 204);
    assert!(result.headers.is_empty());
    assert!(result.body.is_empty());
}

#[test]
fn test_status_known_before_terminator() {
    let mut framer = ResponseFramer::new();
    assert_eq!(framer.status_code(), None);

    assert_eq!(framer.feed(&[0, 0]).unwrap(), Progress::Pending);
    assert_eq!(framer.status_code(), None);

    assert_eq!(framer.feed(&[0, 200, b'A']).unwrap(), Progress::Pending);
    assert_eq!(framer.status_code(), Some(200));
    assert_eq!(framer.received(), 5);
}

#[test]
fn test_terminator_only_counts_at_end() {
    // Terminator bytes followed by more data in the same chunk don't finish
    let mut framer = ResponseFramer::new();
    let mut first = 200u32.to_be_bytes().to_vec();
    first.extend_from_slice(b"\n\nabc\tEOF\n$more");

    assert_eq!(framer.feed(&first).unwrap(), Progress::Pending);

    match framer.feed(TERMINATOR).unwrap() {
        Progress::Complete(result) => assert_eq!(result.body, b"abc\tEOF\n$more"),
        Progress::Pending => panic!("Expected completion"),
    }
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_not_found() {
    let result = feed_chunked(NOT_FOUND, 1024);
    assert!(matches!(result, Err(FetchError::Download(_))));
}

#[test]
fn test_not_found_split_across_chunks() {
    let result = feed_chunked(NOT_FOUND, 2);
    assert!(matches!(result, Err(FetchError::Download(_))));
}

#[test]
fn test_not_found_chunk_after_status() {
    let mut framer = ResponseFramer::new();
    assert_eq!(framer.feed(&200u32.to_be_bytes()).unwrap(), Progress::Pending);

    assert!(matches!(framer.feed(NOT_FOUND), Err(FetchError::Download(_))));
    assert!(framer.is_finished());
}

#[test]
fn test_partial_not_found_then_close() {
    let result = feed_chunked(b"NOT_FO", 1024);
    assert!(matches!(result, Err(FetchError::StreamTruncated { received: 6 })));
}

#[test]
fn test_truncated_before_status() {
    let result = feed_chunked(&[0, 0], 1024);
    assert!(matches!(result, Err(FetchError::StreamTruncated { received: 2 })));
}

#[test]
fn test_truncated_before_terminator() {
    let bytes = stream(200, "A: 1", b"body");
    let cut = &bytes[..bytes.len() - 1];

    match feed_chunked(cut, 16) {
        Err(FetchError::StreamTruncated { received }) => assert_eq!(received, cut.len()),
        other => panic!("Expected truncation, got {:?}", other),
    }
}

#[test]
fn test_empty_chunk_is_end_of_stream() {
    let mut framer = ResponseFramer::new();
    framer.feed(&200u32.to_be_bytes()).unwrap();

    assert!(matches!(
        framer.feed(&[]),
        Err(FetchError::StreamTruncated { received: 4 })
    ));
}

#[test]
fn test_malformed_header_block() {
    let result = feed_chunked(&stream(200, "no separator here", b"x"), 1024);
    assert!(matches!(result, Err(FetchError::Parse(_))));
}

#[test]
fn test_feed_after_complete() {
    let mut framer = ResponseFramer::new();
    let bytes = stream(200, "", b"");

    assert!(matches!(framer.feed(&bytes).unwrap(), Progress::Complete(_)));
    assert!(framer.is_finished());
    assert!(matches!(framer.feed(b"x"), Err(FetchError::Protocol(_))));
}

#[test]
fn test_feed_after_failure() {
    let mut framer = ResponseFramer::new();
    let _ = framer.feed(NOT_FOUND);

    assert!(matches!(framer.feed(b"x"), Err(FetchError::Protocol(_))));
}

// =============================================================================
// Stream-based Reading
// =============================================================================

#[test]
fn test_read_result_from_cursor() {
    let mut cursor = Cursor::new(stream(200, "A: 1", b"hello world"));
    let result = read_result(&mut cursor, 4).unwrap();

    assert_eq!(result.status_code, 200);
    assert_eq!(result.header("A"), Some("1"));
    assert_eq!(result.text(), "hello world");
}

#[test]
fn test_read_result_stops_at_terminator() {
    let mut bytes = stream(200, "", b"first");
    bytes.extend_from_slice(b"left for the next reply");

    let mut reader = ChunkedReader {
        chunks: vec![bytes[..bytes.len() - 23].to_vec(), bytes[bytes.len() - 23..].to_vec()],
    };
    let result = read_result(&mut reader, 1024).unwrap();

    assert_eq!(result.body, b"first");
    assert_eq!(reader.chunks.len(), 1);
}

#[test]
fn test_read_result_truncated() {
    let mut cursor = Cursor::new(200u32.to_be_bytes().to_vec());
    assert!(matches!(
        read_result(&mut cursor, 1024),
        Err(FetchError::StreamTruncated { received: 4 })
    ));
}

#[test]
fn test_read_result_not_found() {
    let mut cursor = Cursor::new(NOT_FOUND.to_vec());
    let err = read_result(&mut cursor, 1024).unwrap_err();
    assert!(err.is_download());
}
