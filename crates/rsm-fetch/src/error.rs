use std::time::Duration;

use thiserror::Error;

/// Errors from fetching a source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request did not complete within the configured timeout.
    #[error("timed out after {}s fetching {url}", timeout.as_secs())]
    Timeout { url: String, timeout: Duration },

    /// Connection, TLS, or body read failure.
    #[error("request failed for {url}: {message}")]
    Transport { url: String, message: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// The URL the failure refers to, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Status { url, .. }
            | Self::Timeout { url, .. }
            | Self::Transport { url, .. } => Some(url),
            Self::Client(_) => None,
        }
    }
}

/// Result alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
