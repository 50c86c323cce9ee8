use serde::{Deserialize, Serialize};

/// One clip scraped from a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingItem {
    pub title: Option<String>,
    /// Numeric rating such as `"3.8"`, or empty when the site shows none
    pub rating: String,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

impl ListingItem {
    pub fn new(
        title: Option<String>,
        rating: String,
        link: Option<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            title,
            rating,
            link,
            image_url,
        }
    }
}
