//! Term frequency summary of free-text comments.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::TermsConfig;

use super::types::TermFrequencyEntry;

pub const DEFAULT_TOP_N: usize = 5;

/// Tokens with this many characters or fewer are dropped.
pub const DEFAULT_MIN_LENGTH: usize = 3;

pub const DEFAULT_STOPWORDS: &[&str] = &[
    "flyer", "not", "found", "store", "the", "and", "was", "for", "with", "have", "had",
];

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("Invalid regex"));

/// Counts the most frequent meaningful words in a corpus.
///
/// Holds only its settings, so every call starts from scratch.
#[derive(Debug, Clone)]
pub struct TermSummarizer {
    stopwords: HashSet<String>,
    top_n: usize,
    min_length: usize,
}

impl Default for TermSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter().copied(), DEFAULT_TOP_N)
    }
}

impl TermSummarizer {
    pub fn new<I, S>(stopwords: I, top_n: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            top_n,
            min_length: DEFAULT_MIN_LENGTH,
        }
    }

    pub fn from_config(config: &TermsConfig) -> Self {
        Self::new(config.stopwords.iter().map(|w| w.to_lowercase()), config.top_n)
            .with_min_length(config.min_length)
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Top terms by descending count; ties keep first-appearance order.
    pub fn summarize(&self, corpus: &str) -> Vec<TermFrequencyEntry> {
        let mut order: Vec<(&str, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut kept = 0usize;

        for token in WORD_PATTERN.find_iter(corpus).map(|m| m.as_str()) {
            if token.chars().count() <= self.min_length || self.stopwords.contains(token) {
                continue;
            }
            kept += 1;
            match index.get(token) {
                Some(&slot) => order[slot].1 += 1,
                None => {
                    index.insert(token, order.len());
                    order.push((token, 1));
                }
            }
        }

        if kept == 0 {
            return Vec::new();
        }

        // Stable sort keeps first-appearance order among equal counts.
        order.sort_by(|a, b| b.1.cmp(&a.1));
        order
            .into_iter()
            .take(self.top_n)
            .map(|(term, count)| TermFrequencyEntry {
                term: term.to_string(),
                count,
                share_of_corpus: count as f64 * 100.0 / kept as f64,
            })
            .collect()
    }
}

/// Summarize `corpus` with an explicit stopword set.
pub fn summarize(
    corpus: &str,
    stopwords: &HashSet<String>,
    top_n: usize,
) -> Vec<TermFrequencyEntry> {
    TermSummarizer::new(stopwords.iter().cloned(), top_n).summarize(corpus)
}
