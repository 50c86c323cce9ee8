pub mod error;
pub mod model;
pub mod output;
pub mod scrape;

pub use error::ScrapeError;
pub use model::RunResult;
pub use scrape::{
    PageCollection, ScrapeOptions, ScrapeProgressCallback, ScrapeSummary, StopReason,
    collect_pages, execute_scrape,
};
