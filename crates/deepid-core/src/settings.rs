//! Persistent user settings.
//!
//! Stored as JSON at `<config_dir>/deepid/settings.json`. A missing or
//! unreadable file yields defaults, so a first run only needs the
//! `DEEPID_API_KEY` environment variable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{
    API_KEY_ENV_VAR, DEFAULT_MAX_RETRIES, DEFAULT_RESULTS_DIR, DEFAULT_RETRY_DELAY_SECS,
    Environment,
};
use crate::poll::PollConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// DeepID API key (falls back to `DEEPID_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub environment: Environment,

    /// Overrides the environment's base URL, e.g. for a proxy
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Ask for written explanations with every analysis
    #[serde(default)]
    pub run_description: bool,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

fn default_results_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RESULTS_DIR)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            environment: Environment::default(),
            api_url: None,
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            results_dir: default_results_dir(),
            run_description: false,
        }
    }
}

impl Settings {
    /// Default settings file location
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deepid")
            .join("settings.json")
    }

    /// Load from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load from `path`, falling back to defaults if it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!(
                    "Warning: ignoring invalid settings file {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        crate::verbose!("Settings saved to {}", path.display());
        Ok(())
    }

    /// API key from settings, then from the environment
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Base URL to use: explicit override, else the environment's
    pub fn base_url(&self) -> String {
        self.api_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.environment.base_url().to_string())
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }

    /// Stored API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> Option<String> {
        let key = self.api_key.as_deref()?;
        let visible: String = key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        Some(format!("****{visible}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.poll_config(), PollConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"environment":"staging","max_retries":3}"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.retry_delay_secs, DEFAULT_RETRY_DELAY_SECS);
        assert_eq!(settings.base_url(), Environment::Staging.base_url());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deepid").join("settings.json");
        let settings = Settings {
            api_key: Some("dk_live_abcdef123456".to_string()),
            api_url: Some("http://localhost:9000".to_string()),
            results_dir: PathBuf::from("/tmp/out"),
            run_description: true,
            ..Default::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
        assert_eq!(settings.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_stored_key_wins() {
        let settings = Settings {
            api_key: Some("stored-key".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.get_api_key().as_deref(), Some("stored-key"));
    }

    #[test]
    fn test_masked_api_key() {
        let settings = Settings {
            api_key: Some("dk_live_abcdef123456".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.masked_api_key().as_deref(), Some("****3456"));
        assert_eq!(Settings::default().masked_api_key(), None);
    }
}
