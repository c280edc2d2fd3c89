//! Browser-backed page fetching
//!
//! One browser session is owned by the [`PageFetcher`] for an entire crawl
//! run. Each fetch opens a fresh tab, navigates with a bounded load timeout,
//! waits for the document body to appear, allows a short settle delay for
//! client-side rendering, and returns the rendered markup. Fetch failures
//! are classified outcomes, never errors: the caller records a placeholder
//! and moves on. The tab is closed on every outcome, including an expired
//! load bound.

mod browser;

pub use browser::find_browser_executable;

use crate::Result;
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Upper bound on a single page load
pub const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// How long to poll for the document body before giving up
const BODY_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between body-presence polls
const BODY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Fixed settle delay after load; there is no DOM-quiescence detection
const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Result of fetching one URL
#[derive(Debug)]
pub enum FetchResult {
    /// Page loaded; rendered markup captured
    Success {
        /// The rendered page HTML
        html: String,
    },

    /// Page load exceeded the timeout bound
    Timeout,

    /// Navigation or browser failure
    Failed {
        /// Error description
        error: String,
    },
}

/// Source of rendered page markup
///
/// The orchestrator only depends on this trait, so tests can substitute an
/// in-memory source for the real browser session.
#[async_trait]
pub trait PageSource {
    /// Loads a URL and returns the rendered markup or a classified failure
    async fn fetch(&self, url: &str) -> FetchResult;

    /// Releases the underlying session; called exactly once at finalize
    async fn close(&mut self);
}

/// Why a page load produced no markup
#[derive(Debug)]
enum LoadError {
    /// CDP-level navigation or protocol failure
    Cdp(CdpError),

    /// The document body never appeared within its wait bound
    BodyMissing,
}

impl From<CdpError> for LoadError {
    fn from(e: CdpError) -> Self {
        LoadError::Cdp(e)
    }
}

/// Fetches pages through a single long-lived browser session
pub struct PageFetcher {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl PageFetcher {
    /// Launches the browser session
    ///
    /// # Arguments
    ///
    /// * `headless` - Whether to run the browser without a window
    pub async fn launch(headless: bool) -> Result<Self> {
        let (browser, handler_task) = browser::launch_browser(headless).await?;
        Ok(Self {
            browser,
            handler_task,
        })
    }

    async fn capture(&self, page: &Page, url: &str) -> std::result::Result<String, LoadError> {
        page.goto(url).await?;
        page.wait_for_navigation().await?;

        if !wait_for_body(page).await {
            return Err(LoadError::BodyMissing);
        }

        // Small buffer for dynamic content
        tokio::time::sleep(SETTLE_DELAY).await;

        Ok(page.content().await?)
    }
}

/// Polls for the document body; returns false if the wait bound expires first
async fn wait_for_body(page: &Page) -> bool {
    let deadline = tokio::time::Instant::now() + BODY_WAIT_TIMEOUT;

    while tokio::time::Instant::now() < deadline {
        if page.find_element("body").await.is_ok() {
            return true;
        }
        tokio::time::sleep(BODY_POLL_INTERVAL).await;
    }

    tracing::debug!("No <body> element appeared within {:?}", BODY_WAIT_TIMEOUT);
    false
}

/// Applies the load bound, classifies the outcome, and then runs the cleanup
/// future regardless of which branch was taken
///
/// An expired bound drops the load future mid-flight, so any resource it was
/// using must be released by `cleanup`, never by the load itself. A missing
/// document body counts as a timeout: the page never became readable.
async fn load_bounded<L, C>(limit: Duration, load: L, cleanup: C) -> FetchResult
where
    L: Future<Output = std::result::Result<String, LoadError>>,
    C: Future<Output = ()>,
{
    let result = match tokio::time::timeout(limit, load).await {
        Ok(Ok(html)) => FetchResult::Success { html },
        Ok(Err(LoadError::BodyMissing)) => FetchResult::Timeout,
        Ok(Err(LoadError::Cdp(e))) => FetchResult::Failed {
            error: e.to_string(),
        },
        Err(_) => FetchResult::Timeout,
    };

    cleanup.await;
    result
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        tracing::info!("Navigating to: {}", url);

        // The tab is opened outside the load bound so it can still be closed
        // when the bound expires mid-load
        let page = match self.browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Browser error on {}: {}", url, e);
                return FetchResult::Failed {
                    error: e.to_string(),
                };
            }
        };

        let tab = page.clone();
        let result = load_bounded(PAGE_LOAD_TIMEOUT, self.capture(&page, url), async move {
            if let Err(e) = tab.close().await {
                tracing::debug!("Failed to close tab for {}: {}", url, e);
            }
        })
        .await;

        match &result {
            FetchResult::Success { .. } => {}
            FetchResult::Timeout => tracing::warn!("Timeout loading page: {}", url),
            FetchResult::Failed { error } => {
                tracing::warn!("Browser error on {}: {}", url, error)
            }
        }

        result
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        // Wait for the process to fully exit before dropping the handler
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler_task.abort();
    }
}
