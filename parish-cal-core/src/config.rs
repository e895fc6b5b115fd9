//! Scraper configuration.
//!
//! The compiled-in defaults describe the St Mewan Parish Council site. An
//! optional TOML file at ~/.config/parish-cal/config.toml can override any
//! field:
//!
//! ```toml
//! output_file = "~/calendars/stmewan.ics"
//! request_timeout = "30s"
//! default_duration = "90m"
//!
//! [[sources]]
//! name = "Planning"
//! url = "/Planning_24621.aspx"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use config::{Config, File, FileFormat};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ParishCalError, ParishCalResult};

pub const ORGANIZATION: &str = "St Mewan Parish";
pub const PRODUCT_ID: &str = "-//St Mewan Parish Council//EN";
pub const BASE_URL: &str = "https://www.stmewanparishcouncil.gov.uk";
pub const OUTPUT_FILE: &str = "stmewan.ics";
pub const TIMEZONE: &str = "Europe/London";
pub const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(20);
pub const DEFAULT_MEETING_DURATION_HOURS: i64 = 1;
/// Upper bound accepted for `default_duration`
pub const MAX_MEETING_DURATION_HOURS: i64 = 24;

const DEFAULT_SOURCES: [(&str, &str); 6] = [
    ("Full Council", "/Full_Council_24620.aspx"),
    ("Planning", "/Planning_24621.aspx"),
    (
        "Extra Ordinary Council",
        "/Extra_Ordinary_Council_Meeting_30589.aspx",
    ),
    (
        "Finance, Staffing, General Purposes & Audit",
        "/Finance_Staffing_General_Purposes__and__Audit_24623.aspx",
    ),
    ("Playing Fields", "/Playing_Fields_24624.aspx"),
    ("Rights of Way", "/Rights_of_Way_24622.aspx"),
];

/// One meeting category and the page listing its meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSource {
    pub name: String,
    pub url: String,
}

impl MeetingSource {
    pub fn new(name: &str, url: &str) -> Self {
        MeetingSource {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Prefix of every event title ("<organization> - <category> Meeting")
    pub organization: String,
    pub product_id: String,
    /// Prepended to relative links and relative source URLs
    pub base_url: String,
    pub output_file: PathBuf,
    /// IANA identifier written as the TZID of every timestamp
    pub timezone: String,
    #[serde(deserialize_with = "deserialize_std_duration")]
    pub request_timeout: StdDuration,
    #[serde(deserialize_with = "deserialize_chrono_duration")]
    pub default_duration: chrono::Duration,
    pub sources: Vec<MeetingSource>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            organization: ORGANIZATION.to_string(),
            product_id: PRODUCT_ID.to_string(),
            base_url: BASE_URL.to_string(),
            output_file: PathBuf::from(OUTPUT_FILE),
            timezone: TIMEZONE.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            default_duration: chrono::Duration::hours(DEFAULT_MEETING_DURATION_HOURS),
            sources: DEFAULT_SOURCES
                .iter()
                .map(|(name, path)| MeetingSource::new(name, &format!("{BASE_URL}{path}")))
                .collect(),
        }
    }
}

impl ScraperConfig {
    /// Default config file location (~/.config/parish-cal/config.toml).
    pub fn config_path() -> ParishCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ParishCalError::Config("Could not determine config directory".into()))?
            .join("parish-cal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default config file is
    /// used when present and the compiled-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> ParishCalResult<Self> {
        let source = match path {
            Some(p) => File::from(p.to_path_buf()).required(true),
            None => match Self::config_path() {
                Ok(p) => File::from(p).required(false),
                Err(_) => return Self::default().finish(),
            },
        };

        let config: ScraperConfig = Config::builder()
            .add_source(source)
            .build()
            .map_err(|e| ParishCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ParishCalError::Config(e.to_string()))?;

        config.finish()
    }

    /// Parse configuration from a TOML string (over the defaults).
    pub fn from_toml(contents: &str) -> ParishCalResult<Self> {
        let config: ScraperConfig = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .map_err(|e| ParishCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ParishCalError::Config(e.to_string()))?;

        config.finish()
    }

    fn finish(mut self) -> ParishCalResult<Self> {
        self.resolve_source_urls();
        self.validate()?;
        Ok(self)
    }

    /// Make relative source URLs absolute against `base_url`.
    fn resolve_source_urls(&mut self) {
        for source in &mut self.sources {
            source.url = resolve_link(&self.base_url, &source.url);
        }
    }

    pub fn validate(&self) -> ParishCalResult<()> {
        if self.sources.is_empty() {
            return Err(ParishCalError::Config(
                "At least one meeting source must be configured".into(),
            ));
        }

        self.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
            ParishCalError::Config(format!("Unknown timezone '{}'", self.timezone))
        })?;

        url::Url::parse(&self.base_url).map_err(|e| {
            ParishCalError::Config(format!("Invalid base_url '{}': {e}", self.base_url))
        })?;

        if self.default_duration <= chrono::Duration::zero() {
            return Err(ParishCalError::Config(
                "default_duration must be greater than zero".into(),
            ));
        }

        if self.default_duration > chrono::Duration::hours(MAX_MEETING_DURATION_HOURS) {
            return Err(ParishCalError::Config(format!(
                "default_duration must be at most {MAX_MEETING_DURATION_HOURS}h"
            )));
        }

        Ok(())
    }

    /// Output path with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.output_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Host part of `base_url`, used to qualify event UIDs.
    pub fn base_host(&self) -> String {
        url::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.organization.clone())
    }
}

/// Prefix `target` with `base_url` unless it already carries a scheme.
pub fn resolve_link(base_url: &str, target: &str) -> String {
    if target.starts_with("http") {
        target.to_string()
    } else {
        format!("{base_url}{target}")
    }
}

fn deserialize_std_duration<'de, D>(deserializer: D) -> Result<StdDuration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

fn deserialize_chrono_duration<'de, D>(deserializer: D) -> Result<chrono::Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let std = deserialize_std_duration(deserializer)?;
    chrono::Duration::from_std(std).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScraperConfig::default();
        config.validate().unwrap();

        assert_eq!(config.sources.len(), 6);
        assert_eq!(config.sources[0].name, "Full Council");
        assert_eq!(
            config.sources[0].url,
            "https://www.stmewanparishcouncil.gov.uk/Full_Council_24620.aspx"
        );
        assert_eq!(config.request_timeout, StdDuration::from_secs(20));
        assert_eq!(config.default_duration, chrono::Duration::hours(1));
        assert_eq!(config.base_host(), "www.stmewanparishcouncil.gov.uk");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = ScraperConfig::from_toml(
            r#"
            organization = "Trewoon Parish"
            request_timeout = "5s"
            default_duration = "90m"
            base_url = "https://example.org"

            [[sources]]
            name = "Planning"
            url = "/planning.aspx"

            [[sources]]
            name = "Allotments"
            url = "https://other.example.org/allotments"
            "#,
        )
        .unwrap();

        assert_eq!(config.organization, "Trewoon Parish");
        assert_eq!(config.request_timeout, StdDuration::from_secs(5));
        assert_eq!(config.default_duration, chrono::Duration::minutes(90));
        // Untouched fields keep their defaults
        assert_eq!(config.timezone, TIMEZONE);
        assert_eq!(
            config.sources,
            vec![
                MeetingSource::new("Planning", "https://example.org/planning.aspx"),
                MeetingSource::new("Allotments", "https://other.example.org/allotments"),
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_timezone() {
        let err = ScraperConfig::from_toml(r#"timezone = "Europe/Atlantis""#).unwrap_err();
        assert!(err.to_string().contains("Europe/Atlantis"), "{err}");
    }

    #[test]
    fn test_rejects_bad_duration() {
        assert!(ScraperConfig::from_toml(r#"default_duration = "soon""#).is_err());
        assert!(ScraperConfig::from_toml(r#"default_duration = "0s""#).is_err());
        assert!(ScraperConfig::from_toml(r#"default_duration = "2000000years""#).is_err());
        assert!(ScraperConfig::from_toml(r#"default_duration = "25h""#).is_err());
        assert!(ScraperConfig::from_toml(r#"default_duration = "24h""#).is_ok());
    }

    #[test]
    fn test_rejects_empty_sources() {
        let config = ScraperConfig {
            sources: vec![],
            ..ScraperConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "output_file = \"out/council.ics\"\n").unwrap();

        let config = ScraperConfig::load(Some(&path)).unwrap();
        assert_eq!(config.output_path(), PathBuf::from("out/council.ics"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            ScraperConfig::load(Some(&path)),
            Err(ParishCalError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link("https://example.org", "/docs/a.pdf"),
            "https://example.org/docs/a.pdf"
        );
        assert_eq!(
            resolve_link("https://example.org", "https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
        assert_eq!(
            resolve_link("https://example.org", "http://legacy.example.com/a.pdf"),
            "http://legacy.example.com/a.pdf"
        );
    }
}
