//! Application configuration.
//!
//! Sources, highest priority first:
//!
//! 1. command-line flags (applied by the binary)
//! 2. `QUOTE_MANAGER_QUOTES_DIR` and `QUOTE_MANAGER_LANGUAGE`
//! 3. the TOML file, `config.toml` in the platform config directory unless
//!    `--config` names another one
//! 4. defaults
//!
//! ```toml
//! quotes_dir = "/home/me/Documents/preventivi-officina"
//! language = "it"          # it | en
//! log_level = "info"
//! log_file = "/tmp/quote-manager.log"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use quote_export::Language;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::logging::DEFAULT_LEVEL;

pub const ENV_QUOTES_DIR: &str = "QUOTE_MANAGER_QUOTES_DIR";
pub const ENV_LANGUAGE: &str = "QUOTE_MANAGER_LANGUAGE";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where quotes are stored; the documents directory when unset.
    pub quotes_dir: Option<PathBuf>,
    /// Default language for PDF exports and printed amounts.
    pub language: Language,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quotes_dir: None,
            language: Language::default(),
            log_level: DEFAULT_LEVEL.to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Loads the configuration and applies environment overrides.
    ///
    /// An explicit `path` must exist. The default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(path = %path.display(), "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        info!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `config.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("it", "officina", "quote-manager")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides read through `lookup`. Blank values are ignored and
    /// an unknown language keeps the current one.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = non_blank(ENV_QUOTES_DIR) {
            debug!(dir = %dir, "Quotes directory overridden from environment");
            self.quotes_dir = Some(PathBuf::from(dir));
        }

        if let Some(language) = non_blank(ENV_LANGUAGE) {
            match language.parse::<Language>() {
                Ok(language) => {
                    debug!(%language, "Language overridden from environment");
                    self.language = language;
                }
                Err(_) => warn!("Invalid {}: {}", ENV_LANGUAGE, language),
            }
        }
    }
}
