//! Query Executor.
//!
//! Runs a classified intent against the record store. Execution is a pure
//! scan over borrowed rows; results own copies of the matched rows.

use std::time::Instant;

use tracing::debug;

use crate::config::Config;
use crate::error::QueryError;
use crate::store::{Column, RecordStore, SurveyRecord};

use super::classifier::IntentClassifier;
use super::summarizer::TermSummarizer;
use super::types::*;

const NOT_COMPLETED: &str = "not completed";
const FLYER_NOT_FOUND: &str = "no";

const NOT_VISITED_COLUMNS: [Column; 4] = [
    Column::SiteCode,
    Column::SiteName,
    Column::Status,
    Column::BannerName,
];
const NO_FLYER_COLUMNS: [Column; 4] = [
    Column::SiteCode,
    Column::SiteName,
    Column::BannerName,
    Column::Status,
];
const COMMENT_COLUMNS: [Column; 3] = [Column::SiteName, Column::SiteCode, Column::FlyerComment];

// ============================================================================
// Query Executor
// ============================================================================

/// Classifies and executes survey questions.
#[derive(Debug, Clone, Default)]
pub struct QueryExecutor {
    classifier: IntentClassifier,
    summarizer: TermSummarizer,
}

impl QueryExecutor {
    pub fn new(summarizer: TermSummarizer) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            summarizer,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(TermSummarizer::from_config(&config.terms))
    }

    /// Classify and execute a free-text query.
    pub fn run(&self, query: &str, store: &RecordStore) -> QueryResponse {
        let total_start = Instant::now();

        let intent = self.classifier.classify(query);
        let classification_time = total_start.elapsed().as_micros() as u64;

        let exec_start = Instant::now();
        let outcome = self.execute(intent, store);
        let execution_time = exec_start.elapsed().as_micros() as u64;

        if let Err(ref error) = outcome {
            debug!(intent = intent.as_str(), %error, "Query failed");
        }

        QueryResponse::new(query, intent, outcome).with_stats(QueryStats {
            classification_time_us: classification_time,
            execution_time_us: execution_time,
            total_time_us: total_start.elapsed().as_micros() as u64,
        })
    }

    /// Execute an intent against the store.
    pub fn execute(&self, intent: Intent, store: &RecordStore) -> Result<QueryResult, QueryError> {
        if store.is_empty() {
            return Err(QueryError::EmptyDataset);
        }

        if !intent.reads_store() {
            return Ok(QueryResult::Unrecognized(Guidance::default()));
        }

        match intent {
            Intent::NotVisited => self.not_visited(store).map(QueryResult::NotVisited),
            Intent::NoFlyer => self.no_flyer(store).map(QueryResult::NoFlyer),
            Intent::SummarizeFlyerComments => {
                self.flyer_comments(store).map(QueryResult::FlyerComments)
            }
            Intent::Unrecognized => Ok(QueryResult::Unrecognized(Guidance::default())),
        }
    }

    // ========================================================================
    // Intents
    // ========================================================================

    fn not_visited(&self, store: &RecordStore) -> Result<VisitReport, QueryError> {
        require_columns(store, Column::Status, &NOT_VISITED_COLUMNS)?;

        let stores: Vec<SurveyRecord> = store
            .iter()
            .filter(|r| contains_ignore_case(r.status.as_deref(), NOT_COMPLETED))
            .cloned()
            .collect();

        let total = store.len();
        let matched_count = stores.len();
        debug!(total, matched_count, "Not visited scan");

        Ok(VisitReport {
            total,
            matched_count,
            rate: percentage(total - matched_count, total),
            columns: NOT_VISITED_COLUMNS.to_vec(),
            stores,
        })
    }

    fn no_flyer(&self, store: &RecordStore) -> Result<FlyerReport, QueryError> {
        require_columns(store, Column::FlyerFound, &NO_FLYER_COLUMNS)?;

        let answered: Vec<&SurveyRecord> =
            store.iter().filter(|r| r.flyer_found.is_some()).collect();
        let stores: Vec<SurveyRecord> = answered
            .iter()
            .filter(|r| contains_ignore_case(r.flyer_found.as_deref(), FLYER_NOT_FOUND))
            .map(|r| (*r).clone())
            .collect();

        let responses = answered.len();
        let matched_count = stores.len();
        // The band uses the unrounded rate; only the reported rate is rounded.
        let raw_rate = raw_percentage(responses - matched_count, responses);
        let band = ComplianceBand::from_rate(raw_rate);
        let rate = round_rate(raw_rate);
        debug!(responses, matched_count, rate, band = band.as_str(), "No flyer scan");

        Ok(FlyerReport {
            responses,
            matched_count,
            rate,
            band,
            columns: NO_FLYER_COLUMNS.to_vec(),
            stores,
        })
    }

    fn flyer_comments(&self, store: &RecordStore) -> Result<CommentReport, QueryError> {
        require_columns(store, Column::FlyerComment, &COMMENT_COLUMNS)?;

        let comments: Vec<SurveyRecord> = store
            .iter()
            .filter(|r| {
                r.flyer_comment
                    .as_deref()
                    .is_some_and(|c| !c.trim().is_empty())
            })
            .cloned()
            .collect();

        let total = store.len();
        let matched_count = comments.len();

        let top_terms = if comments.is_empty() {
            Vec::new()
        } else {
            let corpus = comments
                .iter()
                .filter_map(|r| r.flyer_comment.as_deref())
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join(" ");
            self.summarizer.summarize(&corpus)
        };
        debug!(total, matched_count, terms = top_terms.len(), "Flyer comment scan");

        Ok(CommentReport {
            total,
            matched_count,
            rate: percentage(matched_count, total),
            top_terms,
            columns: COMMENT_COLUMNS.to_vec(),
            comments,
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check the filter column first, then the projected columns.
fn require_columns(
    store: &RecordStore,
    filter: Column,
    projection: &[Column],
) -> Result<(), QueryError> {
    let schema = store.schema();
    schema.require(filter)?;
    projection
        .iter()
        .try_for_each(|column| schema.require(*column))
}

fn contains_ignore_case(value: Option<&str>, needle: &str) -> bool {
    value.is_some_and(|v| v.to_lowercase().contains(needle))
}

/// `part / whole` in percent; 0 when `whole` is 0.
pub fn raw_percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

/// Round a percentage to one decimal for display.
pub fn round_rate(rate: f64) -> f64 {
    (rate * 10.0).round() / 10.0
}

/// `part / whole` in percent, rounded to one decimal; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    round_rate(raw_percentage(part, whole))
}

// ============================================================================
// Tests
// ============================================================================
