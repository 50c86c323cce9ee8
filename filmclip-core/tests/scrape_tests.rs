// End-to-end tests for a scrape run against a mock listing site

use filmclip_core::{ScrapeError, ScrapeOptions, StopReason, execute_scrape};
use filmclip_scanner::ScraperConfig;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const CLIPS_PATH: &str = "/users/someone/clips";

fn item_html(id: u32, title: &str, rating: &str) -> String {
    format!(
        r#"<div class="c-content-item">
             <div class="c2-poster-m"><img src="https://img.example/{id}.jpg"></div>
             <h3 class="c-content-item__title"><a href="/movies/{id}">{title}</a></h3>
             <div class="c-content-item-infobar__item--star">
               <div class="c-content-item-infobar__body">{rating}</div>
             </div>
           </div>"#
    )
}

fn listing_page(items: &[String], last_page: Option<u32>) -> String {
    let pagination = last_page
        .map(|n| {
            format!(
                r#"<div class="c2-pagination"><a class="c2-pagination__last" href="{CLIPS_PATH}?page={n}">&raquo;</a></div>"#
            )
        })
        .unwrap_or_default();
    format!(
        "<html><body><div class=\"p-contents-grid\">{}</div>{}</body></html>",
        items.concat(),
        pagination
    )
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(CLIPS_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

fn options(server: &MockServer, output_dir: &Path) -> ScrapeOptions {
    ScrapeOptions {
        url: Url::parse(&format!("{}{}", server.uri(), CLIPS_PATH)).unwrap(),
        output_dir: output_dir.to_path_buf(),
        config: ScraperConfig::new()
            .without_delays()
            .with_base_domain(server.uri()),
        show_progress_bar: false,
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Full Runs
// ============================================================================

#[tokio::test]
async fn test_scrapes_all_pages_in_order() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        listing_page(&[item_html(1, "One", "3.1"), item_html(2, "Two", "3.2")], Some(3)),
    )
    .await;
    mount_page(&server, 2, listing_page(&[item_html(3, "Three", "未評価")], Some(3))).await;
    mount_page(
        &server,
        3,
        listing_page(&[item_html(4, "Four", "-"), item_html(1, "One", "3.1")], Some(3)),
    )
    .await;

    let temp_dir = TempDir::new().unwrap();
    let summary = execute_scrape(options(&server, temp_dir.path()), None)
        .await
        .unwrap();

    assert_eq!(summary.last_page, 3);
    assert_eq!(summary.stopped, None);
    assert_eq!(summary.result.total_items(), 5);

    let titles: Vec<_> = summary
        .result
        .movies()
        .iter()
        .map(|m| m.title.clone().unwrap())
        .collect();
    assert_eq!(titles, vec!["One", "Two", "Three", "Four", "One"]);

    let ratings: Vec<_> = summary.result.movies().iter().map(|m| m.rating.as_str()).collect();
    assert_eq!(ratings, vec!["3.1", "3.2", "", "", "3.1"]);

    assert_eq!(
        summary.result.movies()[0].link.as_deref(),
        Some(format!("{}/movies/1", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_written_file_matches_summary() {
    let server = MockServer::start().await;
    mount_page(&server, 1, listing_page(&[item_html(9, "パラサイト", "4.0")], Some(1))).await;

    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("data");
    let summary = execute_scrape(options(&server, &out_dir), None).await.unwrap();

    assert!(summary.output_path.starts_with(&out_dir));
    let file_name = summary.output_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("movies_") && file_name.ends_with(".json"));
    // movies_YYYYMMDD_HHMMSS.json
    assert_eq!(file_name.len(), "movies_20240101_000000.json".len());

    let raw = std::fs::read_to_string(&summary.output_path).unwrap();
    assert!(raw.contains("パラサイト"));

    let json = read_json(&summary.output_path);
    assert_eq!(json["metadata"]["total_items"], 1);
    assert_eq!(json["metadata"]["executed_at"], summary.result.executed_at());
    assert_eq!(json["movies"][0]["image_url"], "https://img.example/9.jpg");
}

// ============================================================================
// Early Stops
// ============================================================================

#[tokio::test]
async fn test_empty_second_page_keeps_first_page() {
    let server = MockServer::start().await;
    let first: Vec<String> = (1..=20)
        .map(|i| item_html(i, &format!("Movie {i}"), "3.5"))
        .collect();
    mount_page(&server, 1, listing_page(&first, Some(5))).await;
    mount_page(&server, 2, listing_page(&[], Some(5))).await;

    let temp_dir = TempDir::new().unwrap();
    let summary = execute_scrape(options(&server, temp_dir.path()), None)
        .await
        .unwrap();

    assert_eq!(summary.stopped, Some(StopReason::EmptyPage { page: 2 }));
    assert_eq!(summary.result.total_items(), 20);
    assert_eq!(summary.result.movies().len(), 20);

    let json = read_json(&summary.output_path);
    assert_eq!(json["metadata"]["total_items"], 20);
    assert_eq!(json["movies"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_fetch_failure_stops_run_and_keeps_items() {
    let server = MockServer::start().await;
    mount_page(&server, 1, listing_page(&[item_html(1, "Kept", "2.9")], Some(3))).await;
    Mock::given(method("GET"))
        .and(path(CLIPS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let summary = execute_scrape(options(&server, temp_dir.path()), None)
        .await
        .unwrap();

    match summary.stopped {
        Some(StopReason::FetchFailed { page, attempts, .. }) => {
            assert_eq!(page, 2);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected fetch failure, got {:?}", other),
    }
    assert_eq!(summary.result.total_items(), 1);
    assert!(summary.output_path.exists());
}

#[tokio::test]
async fn test_missing_pagination_writes_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, 1, listing_page(&[item_html(1, "Orphan", "3.0")], None)).await;

    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("data");
    let err = execute_scrape(options(&server, &out_dir), None)
        .await
        .unwrap_err();

    assert!(err.is_pagination());
    assert!(matches!(
        err,
        ScrapeError::Pagination(filmclip_scanner::ScanError::PaginationMissing)
    ));
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn test_invalid_last_page_number_is_fatal() {
    let server = MockServer::start().await;
    let page = r#"<html><body><a class="c2-pagination__last" href="/users/someone/clips?page=last">Last</a></body></html>"#;
    mount_page(&server, 1, page.to_string()).await;

    let temp_dir = TempDir::new().unwrap();
    let err = execute_scrape(options(&server, temp_dir.path()), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScrapeError::Pagination(filmclip_scanner::ScanError::InvalidPageNumber(_))
    ));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_non_positive_last_page_writes_empty_result() {
    let server = MockServer::start().await;
    let page = r#"<html><body><a class="c2-pagination__last" href="/users/someone/clips?page=-1">Last</a></body></html>"#;
    mount_page(&server, 1, page.to_string()).await;

    let temp_dir = TempDir::new().unwrap();
    let summary = execute_scrape(options(&server, temp_dir.path()), None)
        .await
        .unwrap();

    assert_eq!(summary.last_page, 0);
    assert_eq!(summary.stopped, None);
    let json = read_json(&summary.output_path);
    assert_eq!(json["metadata"]["total_items"], 0);
    assert_eq!(json["movies"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unwritable_output_dir_fails_with_spinner() {
    let server = MockServer::start().await;
    mount_page(&server, 1, listing_page(&[item_html(1, "Lost", "3.3")], Some(1))).await;

    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("taken");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut opts = options(&server, &blocker.join("data"));
    opts.show_progress_bar = true;

    let messages = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let callback = Arc::new(move |msg: String| {
        messages_clone.lock().unwrap().push(msg);
    });

    let err = execute_scrape(opts, Some(callback)).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Io(_)));
    assert!(!err.is_pagination());
    let messages = messages.lock().unwrap();
    assert_eq!(
        messages.last().map(String::as_str),
        Some("Could not write the result file")
    );
}

// ============================================================================
// Progress and Repeatability
// ============================================================================

#[tokio::test]
async fn test_progress_callback_reports_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, listing_page(&[item_html(1, "A", "1")], Some(2))).await;
    mount_page(&server, 2, listing_page(&[item_html(2, "B", "2")], Some(2))).await;

    let messages = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let callback = Arc::new(move |msg: String| {
        messages_clone.lock().unwrap().push(msg);
    });

    let temp_dir = TempDir::new().unwrap();
    execute_scrape(options(&server, temp_dir.path()), Some(callback))
        .await
        .unwrap();

    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m == "Detected last page: 2"));
    assert!(messages.iter().any(|m| m == "Scraping page 1/2..."));
    assert!(messages.iter().any(|m| m == "Scraping page 2/2..."));
    // only one inter-page wait for two pages
    assert_eq!(messages.iter().filter(|m| m.contains("waiting")).count(), 1);
}

#[tokio::test]
async fn test_identical_upstream_gives_identical_movies() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        listing_page(&[item_html(1, "Stalker", "4.2"), item_html(2, "Solaris", "")], Some(2)),
    )
    .await;
    mount_page(&server, 2, listing_page(&[item_html(3, "Mirror", "4.0")], Some(2))).await;

    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let first = execute_scrape(options(&server, first_dir.path()), None)
        .await
        .unwrap();
    let second = execute_scrape(options(&server, second_dir.path()), None)
        .await
        .unwrap();

    let first_movies = serde_json::to_string_pretty(&read_json(&first.output_path)["movies"]).unwrap();
    let second_movies =
        serde_json::to_string_pretty(&read_json(&second.output_path)["movies"]).unwrap();
    assert_eq!(first_movies, second_movies);
}

#[tokio::test]
async fn test_collect_pages_with_zero_pages_makes_no_requests() {
    use filmclip_core::collect_pages;
    use filmclip_scanner::{ListingParser, PageFetcher};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ScraperConfig::new().without_delays();
    let fetcher = PageFetcher::new(&config).unwrap();
    let parser = ListingParser::new(&config).unwrap();
    let url = Url::parse(&server.uri()).unwrap();

    let collection = collect_pages(&fetcher, &parser, &url, 0, &config).await;

    assert!(collection.items.is_empty());
    assert_eq!(collection.pages_scraped, 0);
    assert_eq!(collection.stopped, None);
}
