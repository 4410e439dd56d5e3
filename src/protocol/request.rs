//! Fetch request description

use super::headers::HeaderMap;

/// Method sent when none is given
pub const DEFAULT_METHOD: &str = "get";

/// One HTTP/S fetch to hand to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Target URL
    pub url: String,

    /// Request body (POST/PUT), empty by default
    pub payload: Vec<u8>,

    /// HTTP method, any case; lower-cased on the wire
    pub method: String,

    /// Request headers
    pub headers: HeaderMap,
}

impl FetchRequest {
    /// A `get` request with no payload and no headers
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            payload: Vec::new(),
            method: DEFAULT_METHOD.to_string(),
            headers: HeaderMap::new(),
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}
