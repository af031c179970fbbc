//! Configuration types for imdb-top-ratings

use crate::error::{Error, Result};
use crate::output::OutputStage;
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};
use url::Url;

/// Smallest accepted number of movies per run
pub const MIN_LIMIT: u32 = 1;

/// Largest accepted number of movies per run (size of the chart)
pub const MAX_LIMIT: u32 = 250;

/// How pages are requested from the upstream site
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Site root that listing paths and relative detail links resolve against
    /// (default: "https://www.imdb.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the ranked chart, relative to `base_url` (default: "/chart/top/")
    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    /// `Accept-Language` sent with the listing request so results do not vary
    /// with geolocation (default: "en-US")
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// `User-Agent` sent with detail requests; the site answers 403 without one
    /// (default: "Mozilla/5.0")
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (default: 30 seconds, `null` disables it)
    #[serde(
        default = "default_fetch_timeout",
        with = "optional_duration_serde"
    )]
    pub fetch_timeout: Option<Duration>,

    /// Upper bound on in-flight detail requests (default: none, every detail
    /// page is requested at once)
    #[serde(default)]
    pub max_concurrent_fetches: Option<usize>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            listing_path: default_listing_path(),
            accept_language: default_accept_language(),
            user_agent: default_user_agent(),
            fetch_timeout: default_fetch_timeout(),
            max_concurrent_fetches: None,
        }
    }
}

impl ScrapeConfig {
    /// Parsed `base_url`
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL {:?}: {}", self.base_url, e),
            key: Some("scrape.base_url".to_string()),
        })
    }

    /// Absolute URL of the ranked chart
    pub fn listing_url(&self) -> Result<Url> {
        self.base()?
            .join(&self.listing_path)
            .map_err(|e| Error::Config {
                message: format!("invalid listing path {:?}: {}", self.listing_path, e),
                key: Some("scrape.listing_path".to_string()),
            })
    }
}

/// One CSV file written at the end of a run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    /// Which columns the file holds
    pub stage: OutputStage,
    /// File name without the `.csv` suffix
    pub name: String,
}

impl OutputFile {
    /// Create an output file entry
    pub fn new(stage: OutputStage, name: impl Into<String>) -> Self {
        Self {
            stage,
            name: name.into(),
        }
    }
}

/// Where and what the run persists
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the CSV files are written to (default: ".")
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Files to write; an empty list persists nothing
    #[serde(default = "default_output_files")]
    pub files: Vec<OutputFile>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            files: default_output_files(),
        }
    }
}

/// Main configuration for a pipeline run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Number of chart rows to process when the caller does not specify one (default: 20)
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Request settings
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            scrape: ScrapeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<()> {
        self.scrape.listing_url()?;

        if self.scrape.max_concurrent_fetches == Some(0) {
            return Err(Error::Config {
                message: "max_concurrent_fetches must be at least 1".to_string(),
                key: Some("scrape.max_concurrent_fetches".to_string()),
            });
        }

        if let Some(file) = self.output.files.iter().find(|f| f.name.trim().is_empty()) {
            return Err(Error::Config {
                message: format!("output file for stage {:?} has an empty name", file.stage),
                key: Some("output.files".to_string()),
            });
        }

        Ok(())
    }
}

/// Check the number of movies requested for a run
///
/// Runs before any network access so an out-of-range request never touches the site.
pub fn validate_limit(n: i64) -> Result<usize> {
    if n < i64::from(MIN_LIMIT) || n > i64::from(MAX_LIMIT) {
        return Err(Error::InvalidParameter {
            value: n,
            min: MIN_LIMIT,
            max: MAX_LIMIT,
        });
    }
    Ok(n as usize)
}

fn default_limit() -> u32 {
    20
}

fn default_base_url() -> String {
    "https://www.imdb.com".to_string()
}

fn default_listing_path() -> String {
    "/chart/top/".to_string()
}

fn default_accept_language() -> String {
    "en-US".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_fetch_timeout() -> Option<Duration> {
    Some(Duration::from_secs(30))
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_files() -> Vec<OutputFile> {
    vec![
        OutputFile::new(OutputStage::Original, "original_ratings"),
        OutputFile::new(OutputStage::OscarAdjusted, "oscar_adjusted_ratings"),
        OutputFile::new(OutputStage::VoteAdjusted, "vote_adjusted_ratings"),
    ]
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
