use log::debug;
use reqwest::{Client, ClientBuilder};

use crate::{config::CrawlConfig, error::CrawlError, ratelimit::RateLimiter};

pub struct RequestClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RequestClient {
    pub fn new(config: &CrawlConfig) -> anyhow::Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(concat!("lcsdl/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;
        let rate_limiter = RateLimiter::new(config.requests_per_sec(), config.request_gap());
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// GET `url` and return its body. Any non-2xx status is a fetch error.
    pub async fn fetch_url_body(&self, url: &str) -> Result<String, CrawlError> {
        // Wait (non-blocking) until we're allowed to make a request according
        // to our self-imposed rate-limiting policy.
        self.rate_limiter.wait_until_ready().await;

        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Fetch {
                url: url.to_string(),
                status: Some(status.as_u16()),
                reason: status.to_string(),
            });
        }

        response.text().await.map_err(|e| fetch_error(url, e))
    }
}

fn fetch_error(url: &str, err: reqwest::Error) -> CrawlError {
    CrawlError::Fetch {
        url: url.to_string(),
        status: err.status().map(|s| s.as_u16()),
        reason: err.to_string(),
    }
}
