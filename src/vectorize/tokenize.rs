// Tokenizer and n-gram extraction.
//
// Text is lowercased, split into alphabetic runs of a minimum length,
// stripped of stop-words, and only then stitched into n-grams. Stop-words
// are removed before n-gram formation, so "god of war" with "of" removed
// yields the bigram "god war".

use std::collections::HashSet;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

use super::error::{VectorizeError, VectorizeResult};

/// Inclusive range of n-gram widths. `(2, 2)` is bigrams only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgramRange {
    pub min: usize,
    pub max: usize,
}

impl NgramRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// A single fixed width.
    pub fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    pub fn validate(&self) -> VectorizeResult<()> {
        if self.min == 0 || self.min > self.max {
            return Err(VectorizeError::InvalidParameter(format!(
                "ngram range ({}, {}) must satisfy 1 <= min <= max",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for NgramRange {
    fn default() -> Self {
        Self::exactly(2)
    }
}

/// The English stop-word list from the `stop-words` crate.
pub fn english_stop_words() -> HashSet<String> {
    let words: Vec<String> = get(LANGUAGE::English);
    words.into_iter().map(|w| w.to_lowercase()).collect()
}

/// Splits text into lowercase word tokens, dropping short words and stop-words.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
    stop_words: HashSet<String>,
}

impl Tokenizer {
    pub fn new(min_token_len: usize, stop_words: HashSet<String>) -> VectorizeResult<Self> {
        if min_token_len == 0 {
            return Err(VectorizeError::InvalidParameter(
                "min_token_len must be at least 1".to_string(),
            ));
        }
        let pattern = Regex::new(&format!(r"\b[a-z]{{{min_token_len},}}\b"))
            .map_err(|e| VectorizeError::InvalidParameter(e.to_string()))?;
        Ok(Self {
            pattern,
            stop_words,
        })
    }

    /// Tokenizer with the English stop-word list.
    pub fn english(min_token_len: usize) -> VectorizeResult<Self> {
        Self::new(min_token_len, english_stop_words())
    }

    /// Word tokens in document order.
    ///
    /// A letter run touching a non-ASCII letter or digit is part of a
    /// longer word and yields nothing, so "héphaïstos" produces no token.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.pattern
            .find_iter(&lower)
            .filter(|m| {
                let before = lower[..m.start()].chars().next_back();
                let after = lower[m.end()..].chars().next();
                !before.is_some_and(char::is_alphanumeric)
                    && !after.is_some_and(char::is_alphanumeric)
            })
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }

    /// Tokens followed by n-gram formation over `range`.
    pub fn analyze(&self, text: &str, range: NgramRange) -> Vec<String> {
        ngrams(&self.tokens(text), range)
    }
}

/// All contiguous n-grams for each width in `range`, joined with a single space.
///
/// Widths are emitted in ascending order; within a width, in token order.
pub fn ngrams(tokens: &[String], range: NgramRange) -> Vec<String> {
    let mut out = Vec::new();
    for n in range.min..=range.max {
        if n == 0 || n > tokens.len() {
            continue;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}
