//! CSV ingestion for the survey extract.

use std::borrow::Cow;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::config::{ColumnsConfig, Config, TextEncoding};
use crate::error::LoadError;

use super::records::{Column, RecordStore, Schema, SurveyRecord};

/// Date layouts accepted for the activity date column.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y", "%b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Cell values read as missing, matched exactly. Same list as the pandas
/// `read_csv` defaults.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Windows-1252 code points for bytes 0x80..=0x9F. Unassigned bytes map to
/// the matching C1 control.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Reads a survey CSV into a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct SurveyLoader {
    columns: ColumnsConfig,
    encoding: TextEncoding,
}

impl Default for SurveyLoader {
    fn default() -> Self {
        Self::new(ColumnsConfig::default(), TextEncoding::Auto)
    }
}

impl SurveyLoader {
    pub fn new(columns: ColumnsConfig, encoding: TextEncoding) -> Self {
        Self { columns, encoding }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.columns.clone(), config.data.encoding)
    }

    /// Load the extract at `path`.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<RecordStore, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let store = self.load_bytes(&bytes)?;
        info!(
            path = %path.display(),
            rows = store.len(),
            "Loaded survey extract"
        );
        Ok(store)
    }

    /// Decode and parse raw CSV bytes.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<RecordStore, LoadError> {
        let text = decode(bytes, self.encoding)?;
        self.load_str(&text)
    }

    /// Parse CSV text.
    pub fn load_str(&self, text: &str) -> Result<RecordStore, LoadError> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        // First matching header wins when the extract repeats a column.
        let mut positions: Vec<(Column, usize)> = Vec::new();
        for (idx, header) in reader.headers()?.iter().enumerate() {
            match self.columns.column_for(header) {
                Some(column) if !positions.iter().any(|(c, _)| *c == column) => {
                    positions.push((column, idx));
                }
                Some(_) => debug!(header = header.trim(), "Ignoring repeated column"),
                None => debug!(header = header.trim(), "Ignoring unknown column"),
            }
        }

        let position = |column: Column| {
            positions
                .iter()
                .find(|(c, _)| *c == column)
                .map(|(_, idx)| *idx)
        };

        let site_code_idx = position(Column::SiteCode).ok_or_else(|| {
            LoadError::MissingKeyColumn(self.columns.header(Column::SiteCode).trim().to_string())
        })?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let cell = |column: Column| -> Option<String> {
                position(column)
                    .and_then(|idx| record.get(idx))
                    .filter(|value| !is_missing(value))
                    .map(str::to_string)
            };

            let site_code = record
                .get(site_code_idx)
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .ok_or(LoadError::BlankSiteCode { row: row + 1 })?;

            let activity_date = cell(Column::ActivityDate).and_then(|raw| {
                let parsed = parse_activity_date(&raw);
                if parsed.is_none() {
                    warn!(site_code, value = %raw, "Unparseable activity date");
                }
                parsed
            });

            records.push(SurveyRecord {
                site_code: site_code.to_string(),
                site_name: cell(Column::SiteName),
                banner_name: cell(Column::BannerName),
                status: cell(Column::Status),
                flyer_found: cell(Column::FlyerFound),
                flyer_comment: cell(Column::FlyerComment),
                activity_date,
            });
        }

        let schema = Schema::new(
            self.columns.clone(),
            positions.iter().map(|(column, _)| *column),
        );
        for column in schema.missing() {
            warn!(header = schema.header(column), "Survey extract has no such column");
        }

        RecordStore::with_schema(schema, records)
    }
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || MISSING_MARKERS.contains(&value)
}

/// Decode extract bytes according to the configured encoding.
fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<Cow<'_, str>, LoadError> {
    match encoding {
        TextEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| LoadError::Encoding(format!("UTF-8: {}", e))),
        TextEncoding::Windows1252 => Ok(Cow::Owned(decode_windows_1252(bytes))),
        TextEncoding::Auto => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Cow::Borrowed(text)),
            Err(_) => {
                debug!("Extract is not UTF-8, decoding as Windows-1252");
                Ok(Cow::Owned(decode_windows_1252(bytes)))
            }
        },
    }
}

fn decode_windows_1252(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => WINDOWS_1252_HIGH[(b - 0x80) as usize],
            _ => char::from(b),
        })
        .collect()
}

/// Parse an activity date, accepting date-only and date-time layouts.
pub fn parse_activity_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Site Code,Site Name,Banner Name,Status,Where you able to find the flyer?,Provide notes and what was discussed with the store staff if the flyer was not found.,Activity Date";

    #[test]
    fn test_load_basic_extract() {
        let csv = format!(
            "{}\nS1,Main St,FreshCo,Completed,Yes,,2024-03-01\nS2,Elm Ave,FreshCo,Not Completed,,,\nS3,Oak Rd,ValueMart,Completed,No,Display rack empty,03/04/2024\n",
            HEADER
        );

        let store = SurveyLoader::default().load_str(&csv).unwrap();
        assert_eq!(store.len(), 3);
        assert!(Column::ALL.iter().all(|c| store.schema().contains(*c)));

        let s2 = store.get("S2").unwrap();
        assert_eq!(s2.status.as_deref(), Some("Not Completed"));
        assert_eq!(s2.flyer_found, None);
        assert_eq!(s2.flyer_comment, None);
        assert_eq!(s2.activity_date, None);

        let s3 = store.get("S3").unwrap();
        assert_eq!(s3.flyer_comment.as_deref(), Some("Display rack empty"));
        assert_eq!(s3.activity_date, NaiveDate::from_ymd_opt(2024, 3, 4));
    }

    #[test]
    fn test_headers_are_trimmed() {
        let csv = " Site Code , Status \nS1,Completed\n";
        let store = SurveyLoader::default().load_str(csv).unwrap();

        assert!(store.schema().contains(Column::Status));
        assert!(!store.schema().contains(Column::FlyerFound));
        assert_eq!(store.records()[0].status.as_deref(), Some("Completed"));
    }

    #[test]
    fn test_missing_site_code_column() {
        let csv = "Site Name,Status\nMain St,Completed\n";
        let err = SurveyLoader::default().load_str(csv).unwrap_err();
        assert!(matches!(err, LoadError::MissingKeyColumn(ref h) if h == "Site Code"));
    }

    #[test]
    fn test_blank_site_code() {
        let csv = "Site Code,Status\nS1,Completed\n ,Completed\n";
        let err = SurveyLoader::default().load_str(csv).unwrap_err();
        assert!(matches!(err, LoadError::BlankSiteCode { row: 2 }));
    }

    #[test]
    fn test_whitespace_cell_is_not_missing() {
        let csv = "Site Code,Where you able to find the flyer?\nS1,\"  \"\nS2,\n";
        let store = SurveyLoader::default().load_str(csv).unwrap();

        assert_eq!(store.records()[0].flyer_found.as_deref(), Some("  "));
        assert_eq!(store.records()[1].flyer_found, None);
    }

    #[test]
    fn test_missing_markers() {
        let csv = "Site Code,Where you able to find the flyer?,Status\nS1,None,NA\nS2,N/A,null\nS3,No,Not Completed\nS4,none,\n";
        let store = SurveyLoader::default().load_str(csv).unwrap();

        assert_eq!(store.get("S1").unwrap().flyer_found, None);
        assert_eq!(store.get("S1").unwrap().status, None);
        assert_eq!(store.get("S2").unwrap().flyer_found, None);
        assert_eq!(store.get("S2").unwrap().status, None);
        assert_eq!(store.get("S3").unwrap().flyer_found.as_deref(), Some("No"));
        // Matching is exact, as in pandas.
        assert_eq!(store.get("S4").unwrap().flyer_found.as_deref(), Some("none"));
        assert!(is_missing("nan"));
        assert!(!is_missing(" NA"));
    }

    #[test]
    fn test_windows_1252_fallback() {
        let bytes = b"Site Code,Site Name\nS1,Caf\xe9 \x93One\x94\n";
        let store = SurveyLoader::default().load_bytes(bytes).unwrap();
        assert_eq!(
            store.records()[0].site_name.as_deref(),
            Some("Caf\u{e9} \u{201C}One\u{201D}")
        );

        let strict = SurveyLoader::new(ColumnsConfig::default(), TextEncoding::Utf8);
        assert!(matches!(
            strict.load_bytes(bytes),
            Err(LoadError::Encoding(_))
        ));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let csv = "\u{FEFF}Site Code,Status\nS1,Completed\n";
        let store = SurveyLoader::default().load_str(csv).unwrap();
        assert!(store.schema().contains(Column::SiteCode));
    }

    #[test]
    fn test_custom_headers() {
        let columns = ColumnsConfig {
            status: "Visit Status".to_string(),
            ..ColumnsConfig::default()
        };
        let csv = "Site Code,Visit Status\nS1,Not Completed\n";
        let store = SurveyLoader::new(columns, TextEncoding::Utf8)
            .load_str(csv)
            .unwrap();

        assert!(store.schema().contains(Column::Status));
        assert_eq!(store.schema().header(Column::Status), "Visit Status");
    }

    #[test]
    fn test_parse_activity_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_activity_date("2024-01-15"), expected);
        assert_eq!(parse_activity_date("01/15/2024"), expected);
        assert_eq!(parse_activity_date("2024-01-15 09:30:00"), expected);
        assert_eq!(parse_activity_date("1/15/2024 9:30 AM"), expected);
        assert_eq!(parse_activity_date("next tuesday"), None);
        assert_eq!(parse_activity_date("   "), None);
    }

    #[test]
    fn test_load_path_missing_file() {
        let err = SurveyLoader::default()
            .load_path("/nonexistent/survey.csv")
            .unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
