//! Stop policy for excerpt extraction
//!
//! The boundary between "article body" and trailing pedagogical/footer
//! sections is detected heuristically: a fixed stop-word list for headings,
//! a heading count limit, and a character ceiling. The policy is a value so
//! tests can substitute deterministic fixtures.

/// Upper bound on excerpt length in characters
pub const MAX_EXCERPT_CHARS: usize = 15_000;

/// Number of headings to accumulate before stopping
pub const MAX_HEADINGS: usize = 3;

/// Heading keywords that mark the start of pedagogical or footer sections
const STOP_WORDS: [&str; 7] = [
    "exercise",
    "problem",
    "quiz",
    "question",
    "reference",
    "bibliography",
    "external link",
];

/// Controls where excerpt extraction stops within a page
#[derive(Debug, Clone)]
pub struct ExtractPolicy {
    /// Stop once this many headings have been accumulated
    pub max_headings: usize,

    /// Stop once the running character count exceeds this ceiling
    pub max_chars: usize,

    /// Case-insensitive substrings that terminate extraction when found in a heading
    pub stop_words: Vec<String>,
}

impl Default for ExtractPolicy {
    fn default() -> Self {
        Self {
            max_headings: MAX_HEADINGS,
            max_chars: MAX_EXCERPT_CHARS,
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl ExtractPolicy {
    /// Returns true if the heading text marks a section where extraction
    /// must halt entirely. These sections cluster at page end, so a hard
    /// stop keeps everything before the heading and nothing after.
    pub fn is_stop_heading(&self, heading_text: &str) -> bool {
        let lower = heading_text.to_lowercase();
        self.stop_words.iter().any(|word| lower.contains(word))
    }
}
