//! In-memory fetcher for tests and embedding.
//!
//! [`InMemoryFetcher`] serves canned bodies, statuses, or timeouts keyed by
//! URL and records every request in order. Unknown URLs answer HTTP 404.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::traits::SourceFetcher;

#[derive(Clone, Debug)]
enum Canned {
    Body(Vec<u8>),
    Status(u16),
    Timeout,
}

/// A [`SourceFetcher`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryFetcher {
    responses: RwLock<HashMap<String, Canned>>,
    requests: Mutex<Vec<String>>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn insert(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.put(url.into(), Canned::Body(body.into()));
    }

    /// Answer `url` with a non-success HTTP status.
    pub fn insert_status(&self, url: impl Into<String>, status: u16) {
        self.put(url.into(), Canned::Status(status));
    }

    /// Make `url` time out.
    pub fn insert_timeout(&self, url: impl Into<String>) {
        self.put(url.into(), Canned::Timeout);
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    fn put(&self, url: String, canned: Canned) {
        self.responses
            .write()
            .expect("lock poisoned")
            .insert(url, canned);
    }
}

impl SourceFetcher for InMemoryFetcher {
    fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
        self.requests
            .lock()
            .expect("lock poisoned")
            .push(url.to_string());
        let canned = self
            .responses
            .read()
            .expect("lock poisoned")
            .get(url)
            .cloned();
        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(Canned::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
                timeout: Duration::ZERO,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
