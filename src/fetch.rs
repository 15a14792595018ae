use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::Config;

/// Thin wrapper over a shared `reqwest::Client` with retry on transient errors.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    backoff: Duration,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff: config.retry_backoff,
        })
    }

    /// GET `url` and return the body as text. Only 2xx responses count.
    pub async fn get_html(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.max_retries && is_transient(&e) => {
                    let backoff = self.backoff * 2u32.pow(attempt);
                    warn!(
                        "Transient error on {} (attempt {}/{}), backing off {:.1}s: {}",
                        url,
                        attempt + 1,
                        self.max_retries,
                        backoff.as_secs_f64(),
                        e
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e).with_context(|| format!("GET {} failed", url)),
            }
        }
    }

    async fn get_once(&self, url: &str) -> reqwest::Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
}

fn is_transient(e: &reqwest::Error) -> bool {
    if e.is_timeout() || e.is_connect() {
        return true;
    }
    matches!(
        e.status(),
        Some(
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::INTERNAL_SERVER_ERROR
                | StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
        )
    )
}
