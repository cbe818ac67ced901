//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Explicit path (`--config`)
//! 2. Current directory: ./smart-todo.toml or ./.smart-todo/config.toml
//! 3. User config: ~/.smart-todo/config.toml
//! 4. System config: /etc/smart-todo/config.toml
//! 5. Built-in defaults
//!
//! `SMART_TODO_API_URL` and `SMART_TODO_AI_URL` override the base URLs of
//! whatever configuration was loaded.

use crate::env::{self, defaults, vars};
use crate::task::ConflictWindow;
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub enrichment: EnrichmentConfig,
    pub orchestrator: OrchestratorConfig,
    pub import: ImportConfig,
}

/// Task store connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Enrichment service connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Reprioritization rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Conflicts needed before the user is asked to confirm and tasks are rescored
    pub confirmation_threshold: usize,
    pub conflict_window_days: i64,
    /// Tasks at or above this completion percentage never conflict
    pub completion_exemption: u8,
}

/// Bulk import settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Records enriched at once; 1 keeps the import strictly sequential
    pub concurrency: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            timeout_secs: defaults::STORE_TIMEOUT_SECS,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            timeout_secs: defaults::ENRICHMENT_TIMEOUT_SECS,
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            confirmation_threshold: defaults::CONFIRMATION_THRESHOLD,
            conflict_window_days: defaults::CONFLICT_WINDOW_DAYS,
            completion_exemption: defaults::COMPLETION_EXEMPTION,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            concurrency: defaults::IMPORT_CONCURRENCY,
        }
    }
}

impl OrchestratorConfig {
    pub fn conflict_window(&self) -> ConflictWindow {
        ConflictWindow {
            max_days_apart: self.conflict_window_days,
            completion_exemption: self.completion_exemption,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check values that would otherwise only fail deep inside a workflow
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, base_url) in [
            ("store.base_url", &self.store.base_url),
            ("enrichment.base_url", &self.enrichment.base_url),
        ] {
            Url::parse(base_url)
                .map_err(|e| ConfigError::Invalid(format!("{} '{}': {}", name, base_url, e)))?;
        }

        if self.store.timeout_secs == 0 || self.enrichment.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be at least one second".to_string(),
            ));
        }

        if self.orchestrator.conflict_window_days < 0 {
            return Err(ConfigError::Invalid(
                "orchestrator.conflict_window_days must not be negative".to_string(),
            ));
        }

        if self.orchestrator.completion_exemption > 100 {
            return Err(ConfigError::Invalid(
                "orchestrator.completion_exemption is a percentage (0-100)".to_string(),
            ));
        }

        if self.import.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "import.concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply `SMART_TODO_API_URL` / `SMART_TODO_AI_URL`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_url) = std_env::var(vars::API_URL) {
            debug!("{} overrides base URLs with {}", vars::API_URL, api_url);
            self.store.base_url = api_url.clone();
            self.enrichment.base_url = api_url;
        }

        if let Ok(ai_url) = std_env::var(vars::AI_URL) {
            debug!("{} overrides enrichment URL with {}", vars::AI_URL, ai_url);
            self.enrichment.base_url = ai_url;
        }
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load the explicit config if given, otherwise discover one, then apply
    /// environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let mut config = match explicit {
            Some(path) => {
                info!("Loading configuration override from: {:?}", path);
                AppConfig::from_toml_file(path)?
            }
            None => Self::discover_config()?,
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<AppConfig, ConfigError> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return AppConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(AppConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        for candidate in Self::get_config_candidates() {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Get list of configuration file candidates in priority order
    fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(current_dir.join(env::LOCAL_CONFIG_FILE_NAME));
            candidates.push(env::local_config_file_path(&current_dir));
        }

        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        #[cfg(unix)]
        candidates.push(PathBuf::from(env::SYSTEM_CONFIG_FILE));

        candidates
    }

    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        for (i, candidate) in Self::get_config_candidates().iter().enumerate() {
            let status = if candidate.is_file() {
                "EXISTS"
            } else if candidate.exists() {
                "NOT A FILE"
            } else {
                "NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        match Self::find_config_file() {
            Some(found) => println!("Active configuration: {:?}", found),
            None => println!("Active configuration: Built-in defaults"),
        }
    }
}
