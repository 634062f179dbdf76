//! Survey data: the read-only record table and the CSV loader that builds it.

pub mod loader;
pub mod records;

pub use loader::{parse_activity_date, SurveyLoader};
pub use records::{Column, RecordStore, Schema, StoreSummary, SurveyRecord};
