//! Sitebrief: crawl one website, summarize every page
//!
//! This crate implements a sequential crawler that drives a single browser
//! session over one website, extracts a bounded excerpt from each page, and
//! asks a local Ollama service for a short summary of it. Results are kept
//! in visit order and written out as JSON and plain text.

pub mod crawler;
pub mod extract;
pub mod fetcher;
pub mod report;
pub mod summarize;

use thiserror::Error;

/// Main error type for sitebrief operations
#[derive(Debug, Error)]
pub enum SitebriefError {
    #[error("Browser setup error: {0}")]
    BrowserSetup(String),

    #[error("Browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Summarization service unreachable at {0}")]
    ServiceUnavailable(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("URL has no network location: {0}")]
    MissingNetloc(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sitebrief operations
pub type Result<T> = std::result::Result<T, SitebriefError>;

// Re-export commonly used types
pub use crawler::{CrawlOutcome, Crawler, Frontier};
pub use extract::{extract_page, ExtractPolicy, ExtractedPage};
pub use fetcher::{FetchResult, PageFetcher, PageSource};
pub use report::{CrawlRecord, CrawlReport};
pub use summarize::{OllamaClient, Summarize};
