use std::sync::LazyLock;

use regex::Regex;

/// Words dropped from title searches before matching.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "so", "yet", "of", "in", "on", "at", "to",
    "for", "with", "by", "from", "into", "onto", "over", "under", "as", "about", "is",
];

// Matches a trailing " (1999)" as typed from a release listing.
static YEAR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d{4}\)\s*$").expect("valid year suffix regex"));

/// A tokenized title search. Every token must occur in a title for it to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    tokens: Vec<String>,
}

impl SearchTerms {
    /// Splits `phrase` on whitespace, strips surrounding punctuation and stop
    /// words, and lowercases what is left. Returns `None` when nothing remains.
    pub fn parse(phrase: &str) -> Option<Self> {
        let phrase = YEAR_SUFFIX.replace(phrase.trim(), "");

        let mut tokens: Vec<String> = Vec::new();
        for word in phrase.split_whitespace() {
            let word = word
                .trim_matches(|c: char| c.is_ascii_punctuation())
                .to_lowercase();
            if word.is_empty() || STOP_WORDS.contains(&word.as_str()) {
                continue;
            }
            if !tokens.contains(&word) {
                tokens.push(word);
            }
        }

        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// One escaped `%token%` LIKE pattern per token.
    pub fn like_patterns(&self) -> Vec<String> {
        self.tokens.iter().map(|t| contains_pattern(t)).collect()
    }

    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.tokens.iter().all(|t| text.contains(t.as_str()))
    }
}

/// Builds a LIKE pattern matching any value that contains `fragment`
/// literally. Uses the default backslash escape.
pub fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
