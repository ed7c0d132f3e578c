//! calmerge configuration, loaded from `~/.config/calmerge/config.json`.
//!
//! JSON and TOML files are both accepted (picked by extension), and any
//! scalar field can be overridden with a `CALMERGE_*` environment variable,
//! e.g. `CALMERGE_ENVIRONMENT=test` or `CALMERGE_DELETE_ALL=true`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, File};
use anyhow::{Context, Result};
use calmerge_core::window::DEFAULT_LOOKAHEAD_MONTHS;
use calmerge_core::{Blacklist, PublishPolicy, SyncSettings};
use serde::Deserialize;

const DEFAULT_SYNC_INTERVAL_MINS: u64 = 15;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

fn default_sync_interval_mins() -> u64 {
    DEFAULT_SYNC_INTERVAL_MINS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_lookahead_months() -> u32 {
    DEFAULT_LOOKAHEAD_MONTHS
}

/// Which set of calendar ids a run works on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Prod,
    Test,
    Dev,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Prod => write!(f, "prod"),
            Environment::Test => write!(f, "test"),
            Environment::Dev => write!(f, "dev"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalmergeConfig {
    #[serde(default)]
    pub input_calendar_ids: Vec<String>,

    #[serde(default)]
    pub output_calendar_id: String,

    #[serde(default)]
    pub test_input_calendar_ids: Vec<String>,

    #[serde(default)]
    pub test_output_calendar_id: String,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default = "default_sync_interval_mins")]
    pub sync_interval_mins: u64,

    /// Events whose title contains any of these words are never published
    #[serde(default)]
    pub blacklisted_words: Blacklist,

    #[serde(default = "default_lookahead_months")]
    pub lookahead_months: u32,

    #[serde(default)]
    pub cleanup_duplicates: bool,

    #[serde(default)]
    pub delete_all: bool,

    #[serde(default)]
    pub on_publish_error: PublishPolicy,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Google account the calendars belong to (as printed by `calmerge auth`)
    #[serde(default)]
    pub google_account: Option<String>,
}

impl CalmergeConfig {
    /// `~/.config/calmerge/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("calmerge");

        Ok(config_dir.join("config.json"))
    }

    /// Load from `path` (tilde-expanded) or from the default location.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => PathBuf::from(shellexpand::tilde(p).into_owned()),
            None => Self::default_path()?,
        };

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Config file not found at {}\n\n\
                Create it with the calendars to merge:\n\n\
                {{\n\
                \x20 \"google_account\": \"you@gmail.com\",\n\
                \x20 \"input_calendar_ids\": [\"work@group.calendar.google.com\"],\n\
                \x20 \"output_calendar_id\": \"merged@group.calendar.google.com\"\n\
                }}",
                path.display()
            );
        }

        let config: CalmergeConfig = Config::builder()
            .add_source(File::from(path))
            .add_source(::config::Environment::with_prefix("CALMERGE").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read config file at {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        if config.sync_interval_mins == 0 {
            anyhow::bail!("sync_interval_mins must be at least 1");
        }

        if config.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be at least 1");
        }

        // Settings never change while running, so reject them up front
        config
            .sync_settings()
            .validate()
            .with_context(|| format!("Invalid config file at {}", path.display()))?;

        Ok(config)
    }

    /// Source and destination ids for the configured environment.
    pub fn calendar_ids(&self) -> (&[String], &str) {
        match self.environment {
            Environment::Prod => (&self.input_calendar_ids, &self.output_calendar_id),
            Environment::Test | Environment::Dev => {
                (&self.test_input_calendar_ids, &self.test_output_calendar_id)
            }
        }
    }

    pub fn sync_settings(&self) -> SyncSettings {
        let (sources, destination) = self.calendar_ids();

        SyncSettings {
            lookahead_months: self.lookahead_months,
            blacklist: self.blacklisted_words.clone(),
            cleanup_duplicates: self.cleanup_duplicates,
            delete_all: self.delete_all,
            publish_policy: self.on_publish_error,
            ..SyncSettings::new(sources.to_vec(), destination.to_string())
        }
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_mins.saturating_mul(60))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn google_account(&self) -> Result<&str> {
        self.google_account.as_deref().context(
            "No google_account configured.\n\
            Run `calmerge auth` first, then add the printed account to your config",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_json_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{
                "input_calendar_ids": ["a@group.calendar.google.com", "b@group.calendar.google.com"],
                "output_calendar_id": "merged@group.calendar.google.com",
                "blacklisted_words": ["TCF"]
            }"#,
        );

        let config = CalmergeConfig::load_from(&path).unwrap();

        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.sync_interval_mins, 15);
        assert_eq!(config.lookahead_months, 2);
        assert_eq!(config.on_publish_error, PublishPolicy::Abort);
        assert_eq!(config.sync_interval(), Duration::from_secs(900));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.blacklisted_words.words(), &["TCF".to_string()]);
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.toml",
            r#"
input_calendar_ids = ["a"]
output_calendar_id = "dest"
sync_interval_mins = 5
on_publish_error = "skip"
cleanup_duplicates = true
"#,
        );

        let config = CalmergeConfig::load_from(&path).unwrap();

        assert_eq!(config.sync_interval_mins, 5);
        assert_eq!(config.on_publish_error, PublishPolicy::Skip);
        assert!(config.cleanup_duplicates);
    }

    #[test]
    fn test_missing_file_explains_setup() {
        let dir = TempDir::new().unwrap();
        let err = CalmergeConfig::load_from(&dir.path().join("config.json")).unwrap_err();

        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{ "input_calendar_ids": ["a"], "output_calendar_id": "d", "sync_interval_mins": 0 }"#,
        );

        assert!(CalmergeConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_environment_selects_calendar_ids() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{
                "input_calendar_ids": ["prod-a"],
                "output_calendar_id": "prod-out",
                "test_input_calendar_ids": ["test-a", "test-b"],
                "test_output_calendar_id": "test-out",
                "environment": "dev"
            }"#,
        );

        let mut config = CalmergeConfig::load_from(&path).unwrap();

        let (sources, destination) = config.calendar_ids();
        assert_eq!(sources, &["test-a".to_string(), "test-b".to_string()]);
        assert_eq!(destination, "test-out");

        config.environment = Environment::Prod;
        let settings = config.sync_settings();
        assert_eq!(settings.source_calendar_ids, vec!["prod-a".to_string()]);
        assert_eq!(settings.destination_calendar_id, "prod-out");
    }

    #[test]
    fn test_sync_settings_carries_policies() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{
                "input_calendar_ids": ["a"],
                "output_calendar_id": "d",
                "lookahead_months": 3,
                "delete_all": true,
                "blacklisted_words": ["Lunch", "TCF"]
            }"#,
        );

        let settings = CalmergeConfig::load_from(&path).unwrap().sync_settings();

        assert_eq!(settings.lookahead_months, 3);
        assert!(settings.delete_all);
        assert!(!settings.cleanup_duplicates);
        assert_eq!(settings.blacklist.words().len(), 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_destination_listed_as_source_rejected_at_load() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{
                "input_calendar_ids": ["a", "merged"],
                "output_calendar_id": "merged"
            }"#,
        );

        let err = CalmergeConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("also listed as a source"));
    }

    #[test]
    fn test_missing_sources_rejected_at_load() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "config.json", r#"{ "output_calendar_id": "merged" }"#);

        assert!(CalmergeConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_out_of_range_lookahead_rejected_at_load() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{ "input_calendar_ids": ["a"], "output_calendar_id": "d", "lookahead_months": 12 }"#,
        );

        assert!(CalmergeConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_huge_interval_saturates() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{ "input_calendar_ids": ["a"], "output_calendar_id": "d", "sync_interval_mins": 9223372036854775807 }"#,
        );

        let config = CalmergeConfig::load_from(&path).unwrap();
        assert_eq!(config.sync_interval(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_google_account_required() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{ "input_calendar_ids": ["a"], "output_calendar_id": "d" }"#,
        );

        let config = CalmergeConfig::load_from(&path).unwrap();
        assert!(config.google_account().is_err());
    }
}
