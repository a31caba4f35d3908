use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::database::DatabaseConnection;
use crate::language_utils;
use crate::providers::mymemory;

/// Application configuration module
/// This module handles loading, validating and saving the JSON settings file.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language words are translated from (ISO code)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language words are translated into (ISO code)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Vocabulary database file; the user data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Translation provider settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Flashcard export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    // @field: Provider URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Flashcard export settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// Number of cards exported when no limit is given
    #[serde(default = "default_export_limit")]
    pub default_limit: usize,

    /// Largest accepted limit
    #[serde(default = "default_max_export_limit")]
    pub max_limit: usize,

    /// Output file used when none is given
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_limit: default_export_limit(),
            max_limit: default_max_export_limit(),
            output_file: default_output_file(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "fa".to_string()
}

fn default_endpoint() -> String {
    mymemory::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    mymemory::DEFAULT_TIMEOUT_SECS
}

fn default_export_limit() -> usize {
    50
}

fn default_max_export_limit() -> usize {
    10_000
}

fn default_output_file() -> PathBuf {
    PathBuf::from("anki_cards.csv")
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.source_language)
            .context("Invalid source_language")?;
        language_utils::validate_language_code(&self.target_language)
            .context("Invalid target_language")?;

        if language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language are the same: {} / {}",
                self.source_language,
                self.target_language
            ));
        }

        let endpoint = url::Url::parse(&self.translation.endpoint)
            .with_context(|| format!("Invalid translation endpoint: {}", self.translation.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!("Translation endpoint must be http(s): {}", endpoint));
        }

        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("Translation timeout must be at least 1 second"));
        }

        if self.export.default_limit == 0 || self.export.default_limit > self.export.max_limit {
            return Err(anyhow!(
                "Export default_limit must be between 1 and {} (got {})",
                self.export.max_limit,
                self.export.default_limit
            ));
        }

        Ok(())
    }

    /// Load the config at `path`, writing a default file first if none exists
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        log::warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Database file to open
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => DatabaseConnection::default_database_path(),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            database_path: None,
            translation: TranslationConfig::default(),
            export: ExportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
