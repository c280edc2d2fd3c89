//! FIFO frontier with same-site admission
//!
//! The frontier holds discovered-but-unvisited URLs in discovery order. A
//! candidate is admitted only if it parses, uses http/https, and its network
//! location contains the start URL's network location as a substring. The
//! visited set is the dedup authority: admission refuses anything already
//! visited, and a duplicate that slips into the queue is filtered again at
//! pop time by the orchestrator.

use crate::{Result, SitebriefError};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Computes a URL's network location: `host` or `host:port`
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Ordered queue of URLs awaiting visit, scoped to one site
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<String>,
    base_netloc: String,
}

impl Frontier {
    /// Creates a frontier seeded with exactly the start URL
    pub fn seeded(start_url: &Url) -> Result<Self> {
        let base_netloc = netloc(start_url)
            .ok_or_else(|| SitebriefError::MissingNetloc(start_url.to_string()))?;

        let mut queue = VecDeque::new();
        queue.push_back(start_url.to_string());

        Ok(Self { queue, base_netloc })
    }

    /// Removes and returns the head of the queue
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Appends a candidate to the tail if it passes admission; returns
    /// whether it was enqueued
    pub fn admit(&mut self, candidate: &str, visited: &HashSet<String>) -> bool {
        if visited.contains(candidate) {
            return false;
        }
        if !self.is_admissible(candidate) {
            return false;
        }

        self.queue.push_back(candidate.to_string());
        true
    }

    /// Checks scheme and same-site constraints for one candidate
    pub fn is_admissible(&self, candidate: &str) -> bool {
        let Ok(url) = Url::parse(candidate) else {
            return false;
        };

        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        match netloc(&url) {
            Some(candidate_netloc) => candidate_netloc.contains(&self.base_netloc),
            None => false,
        }
    }

    /// The start URL's network location
    pub fn base_netloc(&self) -> &str {
        &self.base_netloc
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
