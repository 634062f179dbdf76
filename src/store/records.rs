//! In-memory survey table.
//!
//! A [`RecordStore`] is built once and then only read. Rows keep the order of
//! the source extract, and the [`Schema`] remembers which columns the source
//! actually provided so queries can tell "column missing" apart from
//! "value missing".

use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ColumnsConfig;
use crate::error::{LoadError, QueryError};

// ============================================================================
// Column
// ============================================================================

/// Known columns of the survey extract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    SiteCode,
    SiteName,
    BannerName,
    Status,
    FlyerFound,
    FlyerComment,
    ActivityDate,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::SiteCode,
        Column::SiteName,
        Column::BannerName,
        Column::Status,
        Column::FlyerFound,
        Column::FlyerComment,
        Column::ActivityDate,
    ];

    /// Config key for this column.
    pub fn key(&self) -> &'static str {
        match self {
            Self::SiteCode => "site_code",
            Self::SiteName => "site_name",
            Self::BannerName => "banner_name",
            Self::Status => "status",
            Self::FlyerFound => "flyer_found",
            Self::FlyerComment => "flyer_comment",
            Self::ActivityDate => "activity_date",
        }
    }

    /// Short label used for table headings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SiteCode => "Site Code",
            Self::SiteName => "Site Name",
            Self::BannerName => "Banner Name",
            Self::Status => "Status",
            Self::FlyerFound => "Flyer Found",
            Self::FlyerComment => "Comment",
            Self::ActivityDate => "Activity Date",
        }
    }
}

// ============================================================================
// Survey Record
// ============================================================================

/// One row of the survey extract.
///
/// Optional fields are `None` when the source cell was empty, never `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub site_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flyer_found: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flyer_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_date: Option<NaiveDate>,
}

impl SurveyRecord {
    pub fn new(site_code: impl Into<String>) -> Self {
        Self {
            site_code: site_code.into(),
            site_name: None,
            banner_name: None,
            status: None,
            flyer_found: None,
            flyer_comment: None,
            activity_date: None,
        }
    }

    pub fn with_site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner_name = Some(banner.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_flyer_found(mut self, found: impl Into<String>) -> Self {
        self.flyer_found = Some(found.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.flyer_comment = Some(comment.into());
        self
    }

    pub fn with_activity_date(mut self, date: NaiveDate) -> Self {
        self.activity_date = Some(date);
        self
    }

    /// Display value of a column, `None` when missing.
    pub fn value(&self, column: Column) -> Option<Cow<'_, str>> {
        match column {
            Column::SiteCode => Some(Cow::Borrowed(self.site_code.as_str())),
            Column::SiteName => self.site_name.as_deref().map(Cow::Borrowed),
            Column::BannerName => self.banner_name.as_deref().map(Cow::Borrowed),
            Column::Status => self.status.as_deref().map(Cow::Borrowed),
            Column::FlyerFound => self.flyer_found.as_deref().map(Cow::Borrowed),
            Column::FlyerComment => self.flyer_comment.as_deref().map(Cow::Borrowed),
            Column::ActivityDate => self
                .activity_date
                .map(|date| Cow::Owned(date.format("%Y-%m-%d").to_string())),
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Columns present in the source, plus the expected header of every column.
#[derive(Debug, Clone)]
pub struct Schema {
    headers: ColumnsConfig,
    present: BTreeSet<Column>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::full(ColumnsConfig::default())
    }
}

impl Schema {
    /// Schema with every known column present.
    pub fn full(headers: ColumnsConfig) -> Self {
        Self {
            headers,
            present: Column::ALL.into_iter().collect(),
        }
    }

    pub fn new(headers: ColumnsConfig, present: impl IntoIterator<Item = Column>) -> Self {
        Self {
            headers,
            present: present.into_iter().collect(),
        }
    }

    /// Default headers with only the given columns present.
    pub fn with_columns(present: impl IntoIterator<Item = Column>) -> Self {
        Self::new(ColumnsConfig::default(), present)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.present.contains(&column)
    }

    /// Expected header name for a column, whether present or not.
    pub fn header(&self, column: Column) -> &str {
        self.headers.header(column)
    }

    /// Fail with `SchemaMissing` when the column is absent from the source.
    pub fn require(&self, column: Column) -> Result<(), QueryError> {
        if self.contains(column) {
            Ok(())
        } else {
            Err(QueryError::SchemaMissing {
                field: self.header(column).trim().to_string(),
            })
        }
    }

    pub fn present(&self) -> impl Iterator<Item = Column> + '_ {
        self.present.iter().copied()
    }

    pub fn missing(&self) -> impl Iterator<Item = Column> + '_ {
        Column::ALL
            .into_iter()
            .filter(|column| !self.present.contains(column))
    }
}

// ============================================================================
// Record Store
// ============================================================================

/// Read-only table of survey rows in source order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    schema: Schema,
    records: Vec<SurveyRecord>,
}

impl RecordStore {
    /// Build a store with every column present and default headers.
    pub fn new(records: Vec<SurveyRecord>) -> Result<Self, LoadError> {
        Self::with_schema(Schema::default(), records)
    }

    /// Build a store, rejecting blank or duplicate site codes.
    pub fn with_schema(schema: Schema, records: Vec<SurveyRecord>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if record.site_code.trim().is_empty() {
                return Err(LoadError::BlankSiteCode { row: idx + 1 });
            }
            if !seen.insert(record.site_code.as_str()) {
                return Err(LoadError::DuplicateSiteCode {
                    code: record.site_code.clone(),
                    row: idx + 1,
                });
            }
        }

        Ok(Self { schema, records })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SurveyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a row by site code.
    pub fn get(&self, site_code: &str) -> Option<&SurveyRecord> {
        self.records.iter().find(|r| r.site_code == site_code)
    }

    /// Row count, column coverage and activity date range.
    pub fn summary(&self) -> StoreSummary {
        let dates = self.records.iter().filter_map(|r| r.activity_date);
        let first_activity = dates.clone().min();
        let last_activity = dates.max();

        StoreSummary {
            rows: self.records.len(),
            present_columns: self
                .schema
                .present()
                .map(|c| self.schema.header(c).to_string())
                .collect(),
            missing_columns: self
                .schema
                .missing()
                .map(|c| self.schema.header(c).to_string())
                .collect(),
            first_activity,
            last_activity,
            undated_rows: self
                .records
                .iter()
                .filter(|r| r.activity_date.is_none())
                .count(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a SurveyRecord;
    type IntoIter = std::slice::Iter<'a, SurveyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Overview of a loaded store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub rows: usize,
    pub present_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_activity: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<NaiveDate>,
    pub undated_rows: usize,
}
