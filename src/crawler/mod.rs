//! Crawl orchestration
//!
//! This module contains the main crawl loop that coordinates the pipeline
//! for each URL:
//! - Pop the head of the frontier, dedup against the visited set
//! - Fetch the rendered page through the shared browser session
//! - Extract a bounded excerpt and the outbound link set
//! - Summarize the excerpt through the summarization service
//! - Record the result and enqueue admissible links
//!
//! The loop runs strictly sequentially and exits when the frontier drains,
//! the page budget is reached, or a cancellation signal arrives between
//! URLs. Every exit path closes the browser session before returning.

mod frontier;

pub use frontier::{netloc, Frontier};

use crate::extract::{extract_page, ExtractPolicy};
use crate::fetcher::{FetchResult, PageSource};
use crate::report::{CrawlRecord, CrawlReport};
use crate::summarize::Summarize;
use crate::Result;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Recorded in place of a summary when a page yields no content
pub const NO_CONTENT_PLACEHOLDER: &str = "Error: Could not extract content.";

/// Why the crawl loop exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Frontier emptied before the budget was reached
    Drained,

    /// Visited count reached the budget; remaining frontier discarded
    BudgetExhausted,

    /// Cancellation signal or unexpected loop error; partial results kept
    Interrupted,
}

/// Owns the frontier, visited set, and per-run pipeline components
pub struct Crawler<F, S> {
    fetcher: F,
    summarizer: S,
    frontier: Frontier,
    visited: HashSet<String>,
    records: Vec<CrawlRecord>,
    budget: usize,
    policy: ExtractPolicy,
}

impl<F: PageSource, S: Summarize> Crawler<F, S> {
    /// Creates a crawler with the frontier seeded at `start_url`
    pub fn new(fetcher: F, summarizer: S, start_url: &Url, budget: usize) -> Result<Self> {
        Ok(Self {
            fetcher,
            summarizer,
            frontier: Frontier::seeded(start_url)?,
            visited: HashSet::new(),
            records: Vec::new(),
            budget,
            policy: ExtractPolicy::default(),
        })
    }

    /// Replaces the default extraction policy
    pub fn with_policy(mut self, policy: ExtractPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs the crawl to one of its terminal states
    ///
    /// Cancellation is honored only between URLs; an in-flight fetch or
    /// summarization finishes (or times out) first. The browser session is
    /// closed on every exit path, and results accumulated so far are always
    /// returned.
    pub async fn run(mut self, cancel: &CancellationToken) -> (CrawlReport, CrawlOutcome) {
        tracing::info!(
            "Starting crawl of {} (budget: {} pages)",
            self.frontier.base_netloc(),
            self.budget
        );

        let outcome = loop {
            if cancel.is_cancelled() {
                tracing::info!("Crawl interrupted by cancellation signal");
                break CrawlOutcome::Interrupted;
            }

            if self.visited.len() >= self.budget {
                tracing::info!("Page budget reached, {} URLs left unvisited", self.frontier.len());
                break CrawlOutcome::BudgetExhausted;
            }

            let Some(current_url) = self.frontier.pop() else {
                tracing::info!("Frontier drained, crawl complete");
                break CrawlOutcome::Drained;
            };

            // A URL can be queued twice before its first visit
            if self.visited.contains(&current_url) {
                continue;
            }
            self.visited.insert(current_url.clone());

            tracing::info!(
                "Processing ({}/{}): {}",
                self.visited.len(),
                self.budget,
                current_url
            );

            if let Err(e) = self.process_url(&current_url).await {
                tracing::error!("Critical error processing {}: {}", current_url, e);
                break CrawlOutcome::Interrupted;
            }
        };

        self.fetcher.close().await;

        (CrawlReport::new(self.records), outcome)
    }

    /// Runs the fetch → extract → summarize pipeline for one URL
    async fn process_url(&mut self, current_url: &str) -> Result<()> {
        let base = Url::parse(current_url)?;

        let html = match self.fetcher.fetch(current_url).await {
            FetchResult::Success { html } => html,
            FetchResult::Timeout => {
                tracing::warn!("No content found for {} (load timeout)", current_url);
                self.record(current_url, NO_CONTENT_PLACEHOLDER.to_string());
                return Ok(());
            }
            FetchResult::Failed { error } => {
                tracing::warn!("No content found for {}: {}", current_url, error);
                self.record(current_url, NO_CONTENT_PLACEHOLDER.to_string());
                return Ok(());
            }
        };

        let page = extract_page(&html, &base, &self.policy);

        if page.excerpt.is_empty() {
            tracing::warn!("No content found for {}", current_url);
            self.record(current_url, NO_CONTENT_PLACEHOLDER.to_string());
            return Ok(());
        }

        tracing::info!("Summarizing content for {}...", current_url);
        let summary = self.summarizer.summarize(&page.excerpt).await;
        self.record(current_url, summary);

        let mut enqueued = 0;
        for link in &page.links {
            if self.frontier.admit(link, &self.visited) {
                enqueued += 1;
            }
        }
        tracing::debug!(
            "Enqueued {} of {} discovered links ({} now in frontier)",
            enqueued,
            page.links.len(),
            self.frontier.len()
        );

        Ok(())
    }

    fn record(&mut self, url: &str, summary: String) {
        self.records.push(CrawlRecord {
            url: url.to_string(),
            summary,
        });
    }
}
