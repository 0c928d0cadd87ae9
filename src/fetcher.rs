use crate::config::FetcherConfig;
use crate::error::Result;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Best-effort HTTP retrieval shared by all extractors.
///
/// One attempt per call: no retry, no backoff. Sources are polled again on
/// the next scheduled run. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` as text. Transport errors and non-2xx statuses are logged
    /// and reported as `None`; this never fails.
    ///
    /// `headers` override the client defaults, including the user agent.
    pub async fn fetch(&self, url: &str, headers: Option<HeaderMap>) -> Option<String> {
        let started = Instant::now();
        match self.try_fetch(url, headers).await {
            Ok(body) => {
                let elapsed = started.elapsed().as_secs_f64();
                debug!(url = %url, bytes = body.len(), elapsed_secs = elapsed, "Fetched page");
                crate::metrics::record_fetch_success(elapsed, body.len());
                Some(body)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Fetch failed");
                crate::metrics::record_fetch_error();
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str, headers: Option<HeaderMap>) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
