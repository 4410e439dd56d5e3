//! Thread-shareable client
//!
//! Serializes whole operations on one connection behind a mutex, so
//! command bytes and reply bytes from different callers never interleave.

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::network::{Connector, TcpConnector};
use crate::protocol::{FetchCallId, FetchRequest, FetchResult};
use super::FetchClient;

/// A [`FetchClient`] usable through `&self` from many threads
pub struct SharedFetchClient<C: Connector = TcpConnector> {
    inner: Mutex<FetchClient<C>>,
}

impl<C: Connector> SharedFetchClient<C> {
    pub fn new(client: FetchClient<C>) -> Self {
        Self {
            inner: Mutex::new(client),
        }
    }

    pub fn start_fetch(&self, request: &FetchRequest) -> Result<FetchCallId> {
        self.inner.lock().start_fetch(request)
    }

    pub fn get_result(&self, fid: &FetchCallId, nowait: bool) -> Result<FetchResult> {
        self.inner.lock().get_result(fid, nowait)
    }

    /// Start and wait, holding the lock across both commands
    pub fn fetch(&self, request: &FetchRequest) -> Result<FetchResult> {
        self.inner.lock().fetch(request)
    }

    pub fn close(&self) -> Result<()> {
        self.inner.lock().close()
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().is_open()
    }

    /// Lock for a sequence of calls that must not be interleaved
    pub fn lock(&self) -> MutexGuard<'_, FetchClient<C>> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> FetchClient<C> {
        self.inner.into_inner()
    }
}

impl<C: Connector> From<FetchClient<C>> for SharedFetchClient<C> {
    fn from(client: FetchClient<C>) -> Self {
        Self::new(client)
    }
}
