use std::time::Duration;

pub const DEFAULT_BASE_DOMAIN: &str = "https://filmarks.com";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// CSS selectors the parser and the pagination resolver rely on.
///
/// These track the markup of the listing site; when it changes, this is the
/// only place that needs to follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// One node per listed clip
    pub content_item: String,
    /// Title anchor, relative to a content item
    pub title_link: String,
    /// Star rating text, relative to a content item
    pub star_rating: String,
    /// Poster `<img>`, relative to a content item
    pub poster_image: String,
    /// "Jump to last page" anchor, relative to the document
    pub last_page_link: String,
}

impl PageLayout {
    pub fn filmarks() -> Self {
        Self {
            content_item: "div.c-content-item".to_string(),
            title_link: "h3.c-content-item__title a".to_string(),
            star_rating: ".c-content-item-infobar__item--star .c-content-item-infobar__body"
                .to_string(),
            poster_image: "div.c2-poster-m img".to_string(),
            last_page_link: "a.c2-pagination__last".to_string(),
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::filmarks()
    }
}

/// Settings shared by the fetcher, the parser and the run loop.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Total attempts per page, including the first one
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub backoff_factor: u32,
    /// Upper bound of the random jitter added to each backoff wait
    pub max_jitter: Duration,
    pub user_agent: String,
    /// Prefix for the relative links found on listing pages
    pub base_domain: String,
    pub timeout: Duration,
    pub layout: PageLayout,
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self {
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(5),
            max_retries: 3,
            initial_backoff: Duration::from_secs(2),
            backoff_factor: 2,
            max_jitter: Duration::from_secs(1),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
            timeout: Duration::from_secs(10),
            layout: PageLayout::filmarks(),
        }
    }

    pub fn with_delay_range(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max;
        self
    }

    pub fn with_max_retries(mut self, attempts: u32) -> Self {
        // at least one request is always made
        self.max_retries = attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, initial: Duration, factor: u32, max_jitter: Duration) -> Self {
        self.initial_backoff = initial;
        self.backoff_factor = factor;
        self.max_jitter = max_jitter;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_base_domain(mut self, domain: impl Into<String>) -> Self {
        self.base_domain = domain.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Config with every wait set to zero, for driving a run against a local server.
    pub fn without_delays(self) -> Self {
        self.with_delay_range(Duration::ZERO, Duration::ZERO)
            .with_backoff(Duration::ZERO, 2, Duration::ZERO)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniformly random duration in `[min, max)`; `min` when the range is empty.
pub fn random_between(min: Duration, max: Duration) -> Duration {
    use rand::Rng;

    if max <= min {
        return min;
    }
    let secs = rand::rng().random_range(min.as_secs_f64()..max.as_secs_f64());
    Duration::from_secs_f64(secs)
}
