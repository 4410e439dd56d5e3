//! Client Module
//!
//! Blocking client for the URL fetch service.
//!
//! ## Connection Lifetime
//! ```text
//!   Closed ──(start_fetch / get_result)──▶ Open ──(close)──▶ Closed
//! ```
//! A closed client reopens on its next call. There is no automatic
//! reconnection after an error; call `close` and retry.

mod fetch;
mod shared;

pub use fetch::FetchClient;
pub use shared::SharedFetchClient;
