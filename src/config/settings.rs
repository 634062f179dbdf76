//! Configuration settings for survey-query.

use crate::error::{ConfigError, Result};
use crate::store::Column;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub columns: ColumnsConfig,
    pub terms: TermsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("survey-query.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("survey-query/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".survey-query/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.data.path.trim().is_empty() {
            return Err(ConfigError::MissingField("data.path".to_string()).into());
        }

        if self.terms.top_n == 0 {
            return Err(ConfigError::Invalid("terms.top_n must be > 0".to_string()).into());
        }

        let mut seen = HashSet::new();
        for column in Column::ALL {
            let header = self.columns.header(column).trim();
            if header.is_empty() {
                return Err(ConfigError::MissingField(format!("columns.{}", column.key())).into());
            }
            if !seen.insert(header) {
                return Err(ConfigError::Invalid(format!(
                    "header '{}' is mapped to more than one column",
                    header
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Expand the survey extract path.
    pub fn data_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.data.path);
        PathBuf::from(expanded.as_ref())
    }
}

/// Survey extract location and decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the CSV extract
    pub path: String,
    /// Text encoding of the extract
    pub encoding: TextEncoding,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "SurveyResultsExtractShort.csv".to_string(),
            encoding: TextEncoding::Auto,
        }
    }
}

/// Text encoding of the CSV extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// UTF-8, falling back to Windows-1252 when the bytes are not valid UTF-8
    Auto,
    #[serde(alias = "utf-8")]
    Utf8,
    #[serde(rename = "windows-1252", alias = "cp1252")]
    Windows1252,
}

/// Header names the survey extract uses for each known column.
///
/// Headers are compared after trimming surrounding whitespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub site_code: String,
    pub site_name: String,
    pub banner_name: String,
    pub status: String,
    pub flyer_found: String,
    pub flyer_comment: String,
    pub activity_date: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            site_code: "Site Code".to_string(),
            site_name: "Site Name".to_string(),
            banner_name: "Banner Name".to_string(),
            status: "Status".to_string(),
            flyer_found: "Where you able to find the flyer?".to_string(),
            flyer_comment:
                "Provide notes and what was discussed with the store staff if the flyer was not found."
                    .to_string(),
            activity_date: "Activity Date".to_string(),
        }
    }
}

impl ColumnsConfig {
    /// Header name configured for a column.
    pub fn header(&self, column: Column) -> &str {
        match column {
            Column::SiteCode => &self.site_code,
            Column::SiteName => &self.site_name,
            Column::BannerName => &self.banner_name,
            Column::Status => &self.status,
            Column::FlyerFound => &self.flyer_found,
            Column::FlyerComment => &self.flyer_comment,
            Column::ActivityDate => &self.activity_date,
        }
    }

    /// Resolve a (trimmed) header back to its column.
    pub fn column_for(&self, header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL
            .into_iter()
            .find(|column| self.header(*column).trim() == header)
    }
}

/// Term summarizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsConfig {
    /// Number of terms to report
    pub top_n: usize,
    /// Tokens with this many characters or fewer are discarded
    pub min_length: usize,
    /// Words excluded from the frequency count
    pub stopwords: Vec<String>,
}

impl Default for TermsConfig {
    fn default() -> Self {
        Self {
            top_n: crate::query::DEFAULT_TOP_N,
            min_length: crate::query::DEFAULT_MIN_LENGTH,
            stopwords: crate::query::DEFAULT_STOPWORDS
                .iter()
                .map(|word| word.to_string())
                .collect(),
        }
    }
}
