use chrono::{DateTime, TimeZone};
use filmclip_scanner::ListingItem;
use serde::Serialize;

/// Format of `metadata.executed_at`.
pub const EXECUTED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunMetadata {
    pub executed_at: String,
    pub total_items: usize,
}

/// Everything one run writes to disk.
///
/// Built once through [`RunResult::new`], which derives the item count from the
/// items themselves, so `total_items` and `movies.len()` cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    metadata: RunMetadata,
    movies: Vec<ListingItem>,
}

impl RunResult {
    pub fn new<Tz: TimeZone>(executed_at: &DateTime<Tz>, movies: Vec<ListingItem>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            metadata: RunMetadata {
                executed_at: executed_at.format(EXECUTED_AT_FORMAT).to_string(),
                total_items: movies.len(),
            },
            movies,
        }
    }

    pub fn executed_at(&self) -> &str {
        &self.metadata.executed_at
    }

    pub fn total_items(&self) -> usize {
        self.metadata.total_items
    }

    pub fn movies(&self) -> &[ListingItem] {
        &self.movies
    }
}
