use crate::config::PageLayout;
use crate::error::{Result, ScanError};
use crate::fetcher::PageFetcher;
use crate::parser::compile_selector;
use scraper::Html;
use tracing::info;
use url::Url;

/// Reads the total page count from the "last page" link on page 1.
///
/// A single request is made. Any failure here means the run cannot be planned,
/// so it is returned to the caller instead of being retried.
pub async fn resolve_last_page(fetcher: &PageFetcher, url: &Url, layout: &PageLayout) -> Result<u32> {
    let markup = fetcher.get_page(url, 1).await?;
    let last_page = last_page_from_markup(&markup, layout)?;
    info!("Detected last page: {}", last_page);
    Ok(last_page)
}

pub fn last_page_from_markup(html: &str, layout: &PageLayout) -> Result<u32> {
    let selector = compile_selector(&layout.last_page_link)?;
    let document = Html::parse_document(html);

    let href = document
        .select(&selector)
        .next()
        .and_then(|link| link.value().attr("href"))
        .filter(|href| !href.is_empty())
        .ok_or(ScanError::PaginationMissing)?;

    page_number_from_href(href)
}

/// Number after the last `page=` in an href.
///
/// Any integer is accepted. Zero or negative counts mean there is nothing to
/// scrape and come back as `0`.
pub fn page_number_from_href(href: &str) -> Result<u32> {
    let raw = href.rsplit("page=").next().unwrap_or(href).trim();
    let invalid = || ScanError::InvalidPageNumber(raw.to_string());
    let number = raw.parse::<i64>().map_err(|_| invalid())?;
    u32::try_from(number.max(0)).map_err(|_| invalid())
}
