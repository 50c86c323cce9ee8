use filmclip_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Could not set up the scraper: {0}")]
    Setup(ScanError),

    #[error("Error determining last page: {0}")]
    Pagination(ScanError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// True when the run stopped before any page was scraped.
    pub fn is_pagination(&self) -> bool {
        matches!(self, ScrapeError::Pagination(_))
    }
}
