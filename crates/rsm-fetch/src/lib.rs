//! Source fetching for the ruleset merge engine.
//!
//! The merge core only needs `fetch(url) -> bytes`. This crate defines that
//! seam as [`SourceFetcher`] and ships two backends:
//!
//! - [`HttpFetcher`] — blocking HTTP(S) GET with a timeout, a descriptive
//!   `User-Agent`, and an `Accept` hint
//! - [`InMemoryFetcher`] — canned responses for tests and embedding
//!
//! Every failure is a [`FetchError`]; callers treat it as a per-source
//! problem and move on to the next URL.

pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use error::{FetchError, FetchResult};
pub use http::{HttpFetcher, HttpOptions, ACCEPT_HINT, DEFAULT_TIMEOUT};
pub use memory::InMemoryFetcher;
pub use traits::SourceFetcher;
