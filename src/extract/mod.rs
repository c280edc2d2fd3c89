//! Content extraction from rendered HTML
//!
//! This module turns one page's rendered markup into:
//! - a bounded plain-text excerpt of the main content region
//! - the set of absolute outbound links found anywhere in the document
//!
//! The excerpt walk covers headings and paragraphs inside the first matching
//! content region and is bounded by an [`ExtractPolicy`]. Pages with unusual
//! markup degrade to whole-document visible text rather than failing.

mod policy;

pub use policy::{ExtractPolicy, MAX_EXCERPT_CHARS, MAX_HEADINGS};

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Tags whose text is never content
const BOILERPLATE_TAGS: [&str; 6] = ["script", "style", "nav", "footer", "header", "noscript"];

/// Candidate content regions, tried in order; first match wins
const REGION_SELECTORS: [&str; 4] = ["#mw-content-text", "main", "article", "body"];

/// Extracted information from one rendered page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Bounded plain-text excerpt of the main content
    pub excerpt: String,

    /// Deduplicated absolute outbound links
    pub links: HashSet<String>,
}

/// Extracts the excerpt and outbound links from rendered HTML
///
/// Link collection scans the full document, not just the content region,
/// so navigation links still feed the frontier.
pub fn extract_page(html: &str, base_url: &Url, policy: &ExtractPolicy) -> ExtractedPage {
    let document = Html::parse_document(html);

    let excerpt = extract_excerpt(&document, policy);
    let links = extract_links(&document, base_url);

    ExtractedPage { excerpt, links }
}

/// Locates the main content region by trying each candidate selector in order
fn find_content_region(document: &Html) -> Option<ElementRef<'_>> {
    for candidate in REGION_SELECTORS {
        if let Ok(selector) = Selector::parse(candidate) {
            if let Some(element) = document.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

/// Returns true if the element sits inside a boilerplate ancestor
fn in_boilerplate(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| BOILERPLATE_TAGS.contains(&ancestor.value().name()))
}

/// Collects whitespace-normalized visible text under an element, skipping
/// text inside boilerplate descendants
fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in element.descendants() {
        if let Some(text) = node.value().as_text() {
            let blocked = node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| BOILERPLATE_TAGS.contains(&ancestor.value().name()));
            if !blocked {
                parts.extend(text.split_whitespace());
            }
        }
    }

    parts.join(" ")
}

/// Walks headings and paragraphs in the content region, accumulating text
/// until the policy says to stop
fn extract_excerpt(document: &Html, policy: &ExtractPolicy) -> String {
    let mut chunks: Vec<String> = Vec::new();
    let mut heading_count = 0;
    let mut char_count = 0;

    if let Some(region) = find_content_region(document) {
        if let Ok(walk) = Selector::parse("h1, h2, h3, p") {
            for element in region.select(&walk) {
                if in_boilerplate(element) {
                    continue;
                }

                let text_chunk = visible_text(element);
                let is_heading = matches!(element.value().name(), "h1" | "h2" | "h3");

                if is_heading {
                    // Pedagogical and footer sections cluster at page end, so
                    // a stop-word heading halts the walk entirely.
                    if policy.is_stop_heading(&text_chunk) {
                        tracing::debug!("Stopping extraction at heading: {}", text_chunk);
                        break;
                    }
                    heading_count += 1;
                }

                if !text_chunk.is_empty() {
                    char_count += text_chunk.chars().count();
                    chunks.push(text_chunk);
                }

                if heading_count >= policy.max_headings || char_count > policy.max_chars {
                    tracing::debug!(
                        "Truncating content at {} headings / {} chars",
                        heading_count,
                        char_count
                    );
                    break;
                }
            }
        }
    }

    let text = if chunks.is_empty() {
        // Unusual markup: fall back to all visible text in the document
        visible_text(document.root_element())
    } else {
        chunks.join(" ")
    };

    truncate_chars(&text, policy.max_chars)
}

/// Truncates a string to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Collects outbound links from every anchor in the document
///
/// Absolute `http(s)` hrefs are kept verbatim, root-relative hrefs are
/// resolved against the page URL, and everything else is dropped. The
/// frontier re-validates each candidate before enqueueing.
fn extract_links(document: &Html, base_url: &Url) -> HashSet<String> {
    let mut links = HashSet::new();

    if let Ok(anchor_selector) = Selector::parse("a[href]") {
        for element in document.select(&anchor_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(resolved) = resolve_href(href, base_url) {
                    links.insert(resolved);
                }
            }
        }
    }

    links
}

/// Resolves a single href to an absolute URL string, or drops it
fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.starts_with("http") {
        Some(href.to_string())
    } else if href.starts_with('/') {
        base_url.join(href).ok().map(|url| url.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn extract(html: &str) -> ExtractedPage {
        extract_page(html, &base_url(), &ExtractPolicy::default())
    }

    #[test]
    fn test_region_priority_prefers_content_container() {
        let html = r#"<html><body>
            <div id="mw-content-text"><p>wiki text</p></div>
            <main><p>main text</p></main>
        </body></html>"#;
        let page = extract(html);
        assert_eq!(page.excerpt, "wiki text");
    }

    #[test]
    fn test_region_falls_back_to_main_then_article() {
        let html = r#"<html><body><article><p>article text</p></article></body></html>"#;
        let page = extract(html);
        assert_eq!(page.excerpt, "article text");

        let html = r#"<html><body><main><p>main text</p></main><article><p>other</p></article></body></html>"#;
        let page = extract(html);
        assert_eq!(page.excerpt, "main text");
    }

    #[test]
    fn test_region_falls_back_to_body() {
        let html = r#"<html><body><p>plain body text</p></body></html>"#;
        let page = extract(html);
        assert_eq!(page.excerpt, "plain body text");
    }

    #[test]
    fn test_stop_word_heading_halts_extraction() {
        let html = r#"<html><body><main>
            <h2>Intro</h2><p>intro para</p>
            <h2>History</h2><p>history para</p>
            <h2>Exercises: try these</h2><p>solve x</p>
        </main></body></html>"#;
        let page = extract(html);
        assert!(page.excerpt.contains("Intro"));
        assert!(page.excerpt.contains("intro para"));
        assert!(page.excerpt.contains("History"));
        assert!(page.excerpt.contains("history para"));
        assert!(!page.excerpt.contains("Exercises"));
        assert!(!page.excerpt.contains("solve x"));
    }

    #[test]
    fn test_heading_limit_stops_walk() {
        let html = r#"<html><body><main>
            <h2>One</h2><p>a</p>
            <h2>Two</h2><p>b</p>
            <h2>Three</h2><p>c</p>
            <h2>Four</h2><p>d</p>
        </main></body></html>"#;
        let page = extract(html);
        // The third heading is kept but nothing after it is considered
        assert!(page.excerpt.contains("Three"));
        assert!(!page.excerpt.contains("c"));
        assert!(!page.excerpt.contains("Four"));
    }

    #[test]
    fn test_char_ceiling_stops_walk() {
        let long_para = "word ".repeat(30);
        let html = format!(
            "<html><body><main><p>{}</p><p>{}</p><p>tail marker</p></main></body></html>",
            long_para, long_para
        );
        let policy = ExtractPolicy {
            max_headings: 3,
            max_chars: 100,
            stop_words: vec![],
        };
        let page = extract_page(&html, &base_url(), &policy);
        assert!(!page.excerpt.contains("tail marker"));
        assert!(page.excerpt.chars().count() <= 100);
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let big = "x".repeat(40_000);
        let html = format!("<html><body><main><p>{}</p></main></body></html>", big);
        let page = extract(&html);
        assert!(page.excerpt.chars().count() <= MAX_EXCERPT_CHARS);
    }

    #[test]
    fn test_boilerplate_text_excluded() {
        let html = r#"<html><body>
            <nav><p>navigation junk</p></nav>
            <main><p>real content</p></main>
            <footer><p>footer junk</p></footer>
            <script>var x = 1;</script>
        </body></html>"#;
        let page = extract(html);
        assert_eq!(page.excerpt, "real content");
    }

    #[test]
    fn test_fallback_to_whole_document_text() {
        // No headings or paragraphs anywhere, but visible text exists
        let html = r#"<html><body><div><span>loose text</span></div></body></html>"#;
        let page = extract(html);
        assert_eq!(page.excerpt, "loose text");
    }

    #[test]
    fn test_empty_document_yields_empty_excerpt_and_links() {
        let page = extract("");
        assert!(page.excerpt.is_empty());
        assert!(page.links.is_empty());

        let page = extract("<html><body></body></html>");
        assert!(page.excerpt.is_empty());
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_absolute_links_kept_verbatim() {
        let html = r#"<html><body><a href="https://other.com/page">x</a></body></html>"#;
        let page = extract(html);
        assert!(page.links.contains("https://other.com/page"));
    }

    #[test]
    fn test_root_relative_links_resolved() {
        let html = r#"<html><body><a href="/docs/intro">x</a></body></html>"#;
        let page = extract(html);
        assert!(page.links.contains("https://example.com/docs/intro"));
    }

    #[test]
    fn test_other_hrefs_dropped() {
        let html = r##"<html><body>
            <a href="relative/path">a</a>
            <a href="#fragment">b</a>
            <a href="mailto:someone@example.com">c</a>
            <a href="javascript:void(0)">d</a>
        </body></html>"##;
        let page = extract(html);
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_links_deduplicated() {
        let html = r#"<html><body>
            <a href="/same">a</a>
            <a href="/same">b</a>
            <a href="https://example.com/same">c</a>
        </body></html>"#;
        let page = extract(html);
        assert_eq!(page.links.len(), 1);
    }

    #[test]
    fn test_links_collected_outside_content_region() {
        let html = r#"<html><body>
            <nav><a href="/from-nav">n</a></nav>
            <main><p>content</p><a href="/from-main">m</a></main>
        </body></html>"#;
        let page = extract(html);
        assert!(page.links.contains("https://example.com/from-nav"));
        assert!(page.links.contains("https://example.com/from-main"));
    }

    #[test]
    fn test_whitespace_normalized() {
        let html = "<html><body><main><p>  spaced \n\n  out   text </p></main></body></html>";
        let page = extract(html);
        assert_eq!(page.excerpt, "spaced out text");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte characters are counted as single chars
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
