//! Types for the survey query system.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::store::{Column, SurveyRecord};

/// Example questions shown when a query is not understood.
pub const EXAMPLE_QUERIES: [&str; 3] = [
    "How many stores have not been visited?",
    "Which stores didn't have a flyer?",
    "Summarize the comments about the flyer",
];

pub const GUIDANCE_MESSAGE: &str =
    "I couldn't understand your question. Please try one of the following:";

// ============================================================================
// Intent
// ============================================================================

/// What a query is asking for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Stores whose visit is not completed
    NotVisited,
    /// Stores where the flyer was not found
    NoFlyer,
    /// Common terms in the flyer comments
    SummarizeFlyerComments,
    /// No rule matched
    #[default]
    Unrecognized,
}

impl Intent {
    /// Get a human-readable name for this intent.
    pub fn display_name(&self) -> &str {
        match self {
            Self::NotVisited => "Stores Not Visited",
            Self::NoFlyer => "Stores Without Flyers",
            Self::SummarizeFlyerComments => "Flyer Comments Summary",
            Self::Unrecognized => "Unrecognized",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotVisited => "not_visited",
            Self::NoFlyer => "no_flyer",
            Self::SummarizeFlyerComments => "summarize_flyer_comments",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Whether executing this intent reads the record store.
    pub fn reads_store(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

// ============================================================================
// Compliance Band
// ============================================================================

/// Flyer availability grading attached to a no-flyer report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceBand {
    Good,
    Moderate,
    Poor,
}

impl ComplianceBand {
    /// Band for an availability rate in percent.
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 80.0 {
            Self::Good
        } else if rate >= 50.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
        }
    }
}

// ============================================================================
// Term Frequency
// ============================================================================

/// A term and how often it appears in the comment corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermFrequencyEntry {
    pub term: String,
    pub count: usize,
    /// Percentage of all kept tokens
    pub share_of_corpus: f64,
}

// ============================================================================
// Reports
// ============================================================================

/// Stores awaiting a visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitReport {
    pub total: usize,
    pub matched_count: usize,
    /// Completion rate in percent
    pub rate: f64,
    pub columns: Vec<Column>,
    pub stores: Vec<SurveyRecord>,
}

/// Stores where the flyer was not found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyerReport {
    /// Rows that answered the flyer question
    pub responses: usize,
    pub matched_count: usize,
    /// Flyer availability rate in percent
    pub rate: f64,
    pub band: ComplianceBand,
    pub columns: Vec<Column>,
    pub stores: Vec<SurveyRecord>,
}

/// Flyer comments and their most frequent terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentReport {
    pub total: usize,
    pub matched_count: usize,
    /// Share of all stores that left a comment, in percent
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_terms: Vec<TermFrequencyEntry>,
    pub columns: Vec<Column>,
    pub comments: Vec<SurveyRecord>,
}

/// Returned for unrecognized queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guidance {
    pub message: String,
    pub examples: Vec<String>,
}

impl Default for Guidance {
    fn default() -> Self {
        Self {
            message: GUIDANCE_MESSAGE.to_string(),
            examples: EXAMPLE_QUERIES.iter().map(|q| q.to_string()).collect(),
        }
    }
}

// ============================================================================
// Query Result
// ============================================================================

/// Outcome of executing an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryResult {
    NotVisited(VisitReport),
    NoFlyer(FlyerReport),
    FlyerComments(CommentReport),
    Unrecognized(Guidance),
}

impl QueryResult {
    pub fn intent(&self) -> Intent {
        match self {
            Self::NotVisited(_) => Intent::NotVisited,
            Self::NoFlyer(_) => Intent::NoFlyer,
            Self::FlyerComments(_) => Intent::SummarizeFlyerComments,
            Self::Unrecognized(_) => Intent::Unrecognized,
        }
    }

    /// Matched rows in source order.
    pub fn rows(&self) -> &[SurveyRecord] {
        match self {
            Self::NotVisited(report) => &report.stores,
            Self::NoFlyer(report) => &report.stores,
            Self::FlyerComments(report) => &report.comments,
            Self::Unrecognized(_) => &[],
        }
    }

    pub fn matched_count(&self) -> usize {
        self.rows().len()
    }
}

// ============================================================================
// Query Response
// ============================================================================

/// A classified and executed query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub intent: Intent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QueryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<QueryError>,
    pub stats: QueryStats,
}

impl QueryResponse {
    pub fn new(
        query: impl Into<String>,
        intent: Intent,
        outcome: Result<QueryResult, QueryError>,
    ) -> Self {
        let (result, error) = match outcome {
            Ok(result) => (Some(result), None),
            Err(error) => (None, Some(error)),
        };
        Self {
            query: query.into(),
            intent,
            result,
            error,
            stats: QueryStats::default(),
        }
    }

    pub fn with_stats(mut self, stats: QueryStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Query execution statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryStats {
    /// Classification time in microseconds
    pub classification_time_us: u64,
    /// Execution time in microseconds
    pub execution_time_us: u64,
    /// Total time in microseconds
    pub total_time_us: u64,
}

// ============================================================================
// Tests
// ============================================================================
