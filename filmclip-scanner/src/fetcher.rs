use crate::config::{ScraperConfig, random_between};
use crate::error::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Result of fetching one listing page with retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page body of a 2xx response
    Fetched(String),
    /// Every attempt failed; `reason` is the error of the last one
    Failed { attempts: u32, reason: String },
}

impl FetchOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }

    pub fn into_markup(self) -> Option<String> {
        match self {
            FetchOutcome::Fetched(markup) => Some(markup),
            FetchOutcome::Failed { .. } => None,
        }
    }
}

/// Issues `GET <url>?page=<n>` requests over a single pooled client.
pub struct PageFetcher {
    client: Client,
    max_retries: u32,
    initial_backoff: Duration,
    backoff_factor: u32,
    max_jitter: Duration,
}

impl PageFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
            initial_backoff: config.initial_backoff,
            backoff_factor: config.backoff_factor,
            max_jitter: config.max_jitter,
        })
    }

    /// Single attempt. Non-2xx statuses are errors.
    pub async fn get_page(&self, url: &Url, page: u32) -> Result<String> {
        debug!("Fetching {} page={}", url, page);

        let response = self
            .client
            .get(url.clone())
            .query(&[("page", page)])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    /// Fetches a page, retrying with exponential backoff plus jitter.
    ///
    /// Never returns an error: once the attempts are used up the failure is
    /// reported as [`FetchOutcome::Failed`] so the caller decides what to do.
    pub async fn fetch(&self, url: &Url, page: u32) -> FetchOutcome {
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            match self.get_page(url, page).await {
                Ok(markup) => return FetchOutcome::Fetched(markup),
                Err(e) if attempt >= self.max_retries => {
                    error!(
                        "Failed to fetch page {} (attempt {}/{}): {}",
                        page, attempt, self.max_retries, e
                    );
                    return FetchOutcome::Failed {
                        attempts: attempt,
                        reason: e.to_string(),
                    };
                }
                Err(e) => {
                    let wait = backoff + random_between(Duration::ZERO, self.max_jitter);
                    warn!(
                        "Error fetching page {} (attempt {}/{}): {}. Retrying in {:.1}s",
                        page,
                        attempt,
                        self.max_retries,
                        e,
                        wait.as_secs_f64()
                    );
                    tokio::time::sleep(wait).await;
                    backoff = backoff.saturating_mul(self.backoff_factor);
                    attempt += 1;
                }
            }
        }
    }
}
