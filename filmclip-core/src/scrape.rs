use crate::error::ScrapeError;
use crate::model::RunResult;
use crate::output::write_run_result;
use chrono::Local;
use filmclip_scanner::config::random_between;
use filmclip_scanner::{
    FetchOutcome, ListingItem, ListingParser, PageFetcher, ScraperConfig, resolve_last_page,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Options for configuring a scrape run
pub struct ScrapeOptions {
    /// Clip list URL, without the `page` parameter
    pub url: Url,
    pub output_dir: PathBuf,
    pub config: ScraperConfig,
    pub show_progress_bar: bool,
}

/// Callback for reporting scrape progress
pub type ScrapeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Why the page loop ended before the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The page could not be fetched even after retrying
    FetchFailed {
        page: u32,
        attempts: u32,
        reason: String,
    },
    /// The page was fetched but held no content items
    EmptyPage { page: u32 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::FetchFailed {
                page,
                attempts,
                reason,
            } => write!(
                f,
                "page {} could not be fetched after {} attempt(s): {}",
                page, attempts, reason
            ),
            StopReason::EmptyPage { page } => write!(f, "page {} has no items", page),
        }
    }
}

/// Items gathered by the page loop
#[derive(Debug, Clone, Default)]
pub struct PageCollection {
    pub items: Vec<ListingItem>,
    pub pages_scraped: u32,
    pub stopped: Option<StopReason>,
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct ScrapeSummary {
    pub output_path: PathBuf,
    pub result: RunResult,
    pub last_page: u32,
    pub stopped: Option<StopReason>,
}

struct Progress {
    bar: Option<ProgressBar>,
    callback: Option<ScrapeProgressCallback>,
}

impl Progress {
    fn new(show_bar: bool, callback: Option<ScrapeProgressCallback>) -> Self {
        let bar = show_bar.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb.set_message("Resolving pagination...");
            pb
        });
        Self { bar, callback }
    }

    fn silent() -> Self {
        Self {
            bar: None,
            callback: None,
        }
    }

    fn report(&self, msg: String) {
        if let Some(ref pb) = self.bar {
            pb.set_message(msg.clone());
        }
        if let Some(ref callback) = self.callback {
            callback(msg);
        }
    }

    fn finish(&self, msg: String) {
        if let Some(ref pb) = self.bar {
            pb.finish_with_message(msg.clone());
        }
        if let Some(ref callback) = self.callback {
            callback(msg);
        }
    }
}

/// Fetch and parse pages `1..=last_page` in order, stopping at the first page
/// that yields nothing.
///
/// A page that could not be fetched and a page with no items both end the
/// loop; the [`StopReason`] tells them apart.
pub async fn collect_pages(
    fetcher: &PageFetcher,
    parser: &ListingParser,
    url: &Url,
    last_page: u32,
    config: &ScraperConfig,
) -> PageCollection {
    collect_pages_with_progress(fetcher, parser, url, last_page, config, &Progress::silent()).await
}

async fn collect_pages_with_progress(
    fetcher: &PageFetcher,
    parser: &ListingParser,
    url: &Url,
    last_page: u32,
    config: &ScraperConfig,
    progress: &Progress,
) -> PageCollection {
    let mut collection = PageCollection::default();

    for page in 1..=last_page {
        progress.report(format!("Scraping page {}/{}...", page, last_page));

        let markup = match fetcher.fetch(url, page).await {
            FetchOutcome::Fetched(markup) => markup,
            FetchOutcome::Failed { attempts, reason } => {
                collection.stopped = Some(StopReason::FetchFailed {
                    page,
                    attempts,
                    reason,
                });
                break;
            }
        };

        let items = parser.parse(&markup);
        if items.is_empty() {
            collection.stopped = Some(StopReason::EmptyPage { page });
            break;
        }

        collection.items.extend(items);
        collection.pages_scraped = page;

        if page < last_page {
            let delay = random_between(config.min_delay, config.max_delay);
            progress.report(format!(
                "Page {} done, waiting {:.1}s...",
                page,
                delay.as_secs_f64()
            ));
            tokio::time::sleep(delay).await;
        }
    }

    if let Some(ref reason) = collection.stopped {
        warn!("Scraping failed or no data: {}. Stopping early.", reason);
    }

    collection
}

/// Run the whole pipeline: resolve pagination, scrape every page, write the
/// JSON file.
///
/// Pagination errors abort the run before anything is written. An early stop
/// in the page loop does not; whatever was collected is still saved.
pub async fn execute_scrape(
    options: ScrapeOptions,
    progress_callback: Option<ScrapeProgressCallback>,
) -> Result<ScrapeSummary, ScrapeError> {
    let ScrapeOptions {
        url,
        output_dir,
        config,
        show_progress_bar,
    } = options;

    let executed_at = Local::now();

    let fetcher = PageFetcher::new(&config).map_err(ScrapeError::Setup)?;
    let parser = ListingParser::new(&config).map_err(ScrapeError::Setup)?;

    let progress = Progress::new(show_progress_bar, progress_callback);

    let last_page = match resolve_last_page(&fetcher, &url, &config.layout).await {
        Ok(last_page) => last_page,
        Err(e) => {
            progress.finish("Could not determine the last page".to_string());
            return Err(ScrapeError::Pagination(e));
        }
    };
    progress.report(format!("Detected last page: {}", last_page));

    let collection =
        collect_pages_with_progress(&fetcher, &parser, &url, last_page, &config, &progress).await;

    let result = RunResult::new(&executed_at, collection.items);
    let output_path = match write_run_result(&output_dir, &result, &executed_at) {
        Ok(path) => path,
        Err(e) => {
            progress.finish("Could not write the result file".to_string());
            return Err(e);
        }
    };

    info!(
        "Saved {} items to {}",
        result.total_items(),
        output_path.display()
    );
    progress.finish(format!(
        "Scrape complete! {} items from {} page(s)",
        result.total_items(),
        collection.pages_scraped
    ));

    Ok(ScrapeSummary {
        output_path,
        result,
        last_page,
        stopped: collection.stopped,
    })
}
