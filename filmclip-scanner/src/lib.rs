pub mod config;
pub mod error;
pub mod fetcher;
pub mod listing;
pub mod pagination;
pub mod parser;

pub use config::{PageLayout, ScraperConfig};
pub use error::ScanError;
pub use fetcher::{FetchOutcome, PageFetcher};
pub use listing::ListingItem;
pub use pagination::resolve_last_page;
pub use parser::ListingParser;
