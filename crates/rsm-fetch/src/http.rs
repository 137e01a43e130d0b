//! Blocking HTTP(S) fetcher.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::SourceFetcher;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `Accept` header sent with every request.
pub const ACCEPT_HINT: &str = "application/json, application/yaml, text/plain, */*";

/// Client settings for [`HttpFetcher`].
#[derive(Clone, Debug)]
pub struct HttpOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("rsm-ruleset-merger/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Fetches sources with a shared blocking `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(options: HttpOptions) -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            client,
            timeout: options.timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl SourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
        let parsed = parse_http_url(url)?;
        tracing::debug!(url, "fetching source");

        let response = self
            .client
            .get(parsed)
            .header(ACCEPT, ACCEPT_HINT)
            .send()
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| self.classify(url, e))?;
        tracing::debug!(url, bytes = body.len(), "fetched source");
        Ok(body.to_vec())
    }
}

/// Parse `url` and require an `http` or `https` scheme.
pub fn parse_http_url(url: &str) -> FetchResult<Url> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}
