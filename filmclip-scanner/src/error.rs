use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid selector '{selector}': {reason}")]
    SelectorError { selector: String, reason: String },

    #[error("Last page link not found; the pagination layout may have changed")]
    PaginationMissing,

    #[error("Invalid page number '{0}' in pagination link")]
    InvalidPageNumber(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
