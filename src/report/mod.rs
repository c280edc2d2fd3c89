//! Crawl result persistence and console preview
//!
//! A finished run produces two artifacts from the same records: a
//! pretty-printed JSON document mapping each visited URL to its summary (or
//! error string), and a plain-text report with one block per URL in visited
//! order. A short console preview of the first few results is printed after
//! the files are written.

use crate::Result;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Number of records shown in the console preview
const PREVIEW_LIMIT: usize = 3;

/// Summary text shown in the preview is cut to this many characters
const PREVIEW_SUMMARY_CHARS: usize = 150;

/// Separator line between text report blocks
const SEPARATOR_WIDTH: usize = 80;

/// One visited URL and its summary or error string
#[derive(Debug, Clone, Serialize)]
pub struct CrawlRecord {
    pub url: String,
    pub summary: String,
}

/// All records of one crawl run, in visited order
#[derive(Debug, Default)]
pub struct CrawlReport {
    records: Vec<CrawlRecord>,
}

impl CrawlReport {
    pub fn new(records: Vec<CrawlRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CrawlRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the pretty-printed JSON document mapping URL to summary
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut map = serde_json::Map::new();
        for record in &self.records {
            map.insert(record.url.clone(), Value::String(record.summary.clone()));
        }

        let pretty = serde_json::to_string_pretty(&Value::Object(map))?;
        std::fs::write(path, pretty)?;

        Ok(())
    }

    /// Writes the human-readable text report, one block per URL
    pub fn write_text(&self, path: &Path) -> Result<()> {
        let mut out = String::new();

        for record in &self.records {
            out.push_str(&format!("URL: {}\n", record.url));
            out.push_str(&format!("SUMMARY:\n{}\n", record.summary));
            out.push_str(&"-".repeat(SEPARATOR_WIDTH));
            out.push_str("\n\n");
        }

        std::fs::write(path, out)?;

        Ok(())
    }

    /// Prints up to three results to the console
    pub fn print_preview(&self) {
        println!("\n--- Crawl Summary Preview ---");

        for record in self.records.iter().take(PREVIEW_LIMIT) {
            let short: String = record.summary.chars().take(PREVIEW_SUMMARY_CHARS).collect();
            println!("\nURL: {}", record.url);
            println!("Summary: {}...", short);
        }
    }
}
