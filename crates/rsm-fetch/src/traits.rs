use crate::error::FetchResult;

/// Retrieves the raw bytes behind a source URL.
///
/// Implementations must bound every call by a timeout and must be safe to
/// share between worker threads. A returned error never aborts a batch; the
/// caller records it against the URL and continues.
pub trait SourceFetcher: Send + Sync {
    /// Fetch the full body of `url`.
    fn fetch(&self, url: &str) -> FetchResult<Vec<u8>>;
}
