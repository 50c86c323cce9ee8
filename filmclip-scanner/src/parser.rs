use crate::config::{PageLayout, ScraperConfig};
use crate::error::{Result, ScanError};
use crate::listing::ListingItem;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

static RATING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("rating pattern compiles"));

/// Extracts [`ListingItem`]s from the markup of one listing page.
#[derive(Debug, Clone)]
pub struct ListingParser {
    base_domain: String,
    content_item: Selector,
    title_link: Selector,
    star_rating: Selector,
    poster_image: Selector,
}

impl ListingParser {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Self::with_layout(&config.layout, &config.base_domain)
    }

    pub fn with_layout(layout: &PageLayout, base_domain: &str) -> Result<Self> {
        Ok(Self {
            base_domain: base_domain.to_string(),
            content_item: compile_selector(&layout.content_item)?,
            title_link: compile_selector(&layout.title_link)?,
            star_rating: compile_selector(&layout.star_rating)?,
            poster_image: compile_selector(&layout.poster_image)?,
        })
    }

    /// One item per content node, in document order. An empty result usually
    /// means the page is past the end of the list or the layout has changed.
    pub fn parse(&self, html: &str) -> Vec<ListingItem> {
        let document = Html::parse_document(html);

        let items: Vec<ListingItem> = document
            .select(&self.content_item)
            .map(|node| self.parse_item(node))
            .collect();

        if items.is_empty() {
            warn!("No content items found on page");
        } else {
            debug!("Parsed {} content items", items.len());
        }
        items
    }

    fn parse_item(&self, node: ElementRef<'_>) -> ListingItem {
        let title_tag = node.select(&self.title_link).next();
        let title = title_tag.map(stripped_text);
        let href = title_tag.and_then(|tag| tag.value().attr("href"));
        let link = absolute_link(&self.base_domain, href);

        let raw_rating = node.select(&self.star_rating).next().map(stripped_text);
        let rating = normalize_rating(raw_rating.as_deref());

        let image_url = node
            .select(&self.poster_image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .filter(|src| !src.is_empty())
            .map(str::to_string);

        ListingItem::new(title, rating, link, image_url)
    }
}

pub(crate) fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScanError::SelectorError {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Text of an element with every text fragment trimmed and joined without separators.
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Keeps a rating only when it is an integer or decimal number.
pub fn normalize_rating(raw: Option<&str>) -> String {
    match raw {
        Some(rating) if RATING_PATTERN.is_match(rating) => rating.to_string(),
        _ => String::new(),
    }
}

/// Prefixes a site-relative href with the base domain.
pub fn absolute_link(base_domain: &str, href: Option<&str>) -> Option<String> {
    href.filter(|h| !h.is_empty())
        .map(|h| format!("{}{}", base_domain, h))
}
