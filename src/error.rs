//! Error types for survey-query.

use serde::Serialize;
use thiserror::Error;

/// Main error type for survey-query operations.
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors raised while reading the survey extract.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File is not valid {0}")]
    Encoding(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing key column: {0}")]
    MissingKeyColumn(String),

    #[error("Row {row} has a blank site code")]
    BlankSiteCode { row: usize },

    #[error("Duplicate site code {code} at row {row}")]
    DuplicateSiteCode { code: String, row: usize },
}

/// Errors a query can surface to the presenter.
///
/// A failed query never carries partial rows.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryError {
    #[error("Cannot find column '{field}' in the survey data")]
    SchemaMissing { field: String },

    #[error("Survey data contains no rows. Please check the file and try again.")]
    EmptyDataset,
}

/// Result type alias for survey-query operations.
pub type Result<T> = std::result::Result<T, SurveyError>;
