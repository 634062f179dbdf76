//! Query Intent Classifier.
//!
//! Maps a free-text question to an [`Intent`] with keyword rules. Rules are
//! evaluated in a fixed order and the first match wins; there is no scoring.
//! The no-flyer rule must run before the comment rule because it is the one
//! that excludes "comment" and "summarize".

use tracing::debug;

use super::types::Intent;

// ============================================================================
// Keywords
// ============================================================================

const NOT_VISITED_KEYWORDS: &[&str] = &["not visited", "not been visited", "unvisited"];
const NO_FLYER_KEYWORDS: &[&str] = &[
    "which",
    "stores",
    "didn't have",
    "without flyer",
    "no flyer",
];
const COMMENT_KEYWORDS: &[&str] = &["comment", "summarize"];
const FLYER: &str = "flyer";

/// A guarded rule: the intent is chosen when the predicate holds.
struct Rule {
    intent: Intent,
    name: &'static str,
    matches: fn(&str) -> bool,
}

/// Rules in priority order.
const RULES: &[Rule] = &[
    Rule {
        intent: Intent::NotVisited,
        name: "not_visited",
        matches: mentions_not_visited,
    },
    Rule {
        intent: Intent::NoFlyer,
        name: "no_flyer",
        matches: asks_for_missing_flyers,
    },
    Rule {
        intent: Intent::SummarizeFlyerComments,
        name: "flyer_comments",
        matches: asks_for_flyer_comments,
    },
];

// ============================================================================
// Intent Classifier
// ============================================================================

/// Classifies free-text survey questions into intents.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query. Never fails: unmatched input is `Unrecognized`.
    pub fn classify(&self, query: &str) -> Intent {
        let query_lower = query.to_lowercase();

        let intent = RULES
            .iter()
            .find(|rule| (rule.matches)(&query_lower))
            .map(|rule| {
                debug!(rule = rule.name, "Query matched rule");
                rule.intent
            })
            .unwrap_or_default();

        debug!(query, intent = intent.as_str(), "Classified query");
        intent
    }
}

// ============================================================================
// Predicates (expect lowercased input)
// ============================================================================

fn contains_any(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| query.contains(keyword))
}

fn mentions_not_visited(query: &str) -> bool {
    contains_any(query, NOT_VISITED_KEYWORDS)
}

fn asks_for_missing_flyers(query: &str) -> bool {
    contains_any(query, NO_FLYER_KEYWORDS)
        && query.contains(FLYER)
        && !query.contains("comment")
        && !query.contains("summarize")
}

fn asks_for_flyer_comments(query: &str) -> bool {
    contains_any(query, COMMENT_KEYWORDS) && query.contains(FLYER)
}

// ============================================================================
// Tests
// ============================================================================
