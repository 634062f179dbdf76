//! survey-query: keyword-driven questions over store-visit survey results.
//!
//! A question is classified into an [`Intent`] by ordered keyword rules, then
//! executed as a filter and aggregation over a read-only [`RecordStore`].
//! Flyer comments are summarized by term frequency.

pub mod config;
pub mod error;
pub mod query;
pub mod store;

pub use config::{ColumnsConfig, Config, DataConfig, TermsConfig, TextEncoding};
pub use error::{ConfigError, LoadError, QueryError, Result, SurveyError};
pub use query::{
    ComplianceBand, CommentReport, FlyerReport, Guidance, Intent, IntentClassifier,
    QueryExecutor, QueryResponse, QueryResult, QueryStats, TermFrequencyEntry, TermSummarizer,
    VisitReport, EXAMPLE_QUERIES,
};
pub use store::{Column, RecordStore, Schema, StoreSummary, SurveyLoader, SurveyRecord};

/// Load the survey extract named by `config`.
pub fn load_store(config: &Config) -> Result<RecordStore> {
    let store = SurveyLoader::from_config(config).load_path(config.data_path())?;
    Ok(store)
}
