//! Fetching meeting pages over HTTP.

use std::time::Duration;

use crate::error::{FetchError, ParishCalError, ParishCalResult};

/// Source of page bodies. Implemented over HTTP by [`HttpFetcher`]; tests
/// substitute canned pages.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain GET requests with a fixed timeout and no retries.
pub struct HttpFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> ParishCalResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("parish-cal/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ParishCalError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(HttpFetcher { http, timeout })
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout.as_secs())
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| self.classify(e))
    }
}
