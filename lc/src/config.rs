//! Library catalog configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogOptions;
use crate::codec::YearParsing;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the catalog file
    #[serde(rename = "catalog-file")]
    pub catalog_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// How the year column is read when loading
    #[serde(rename = "year-parsing")]
    pub year_parsing: YearParsing,

    /// Refuse to add a book whose ISBN is already in the catalog
    #[serde(rename = "unique-isbn")]
    pub unique_isbn: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_file: PathBuf::from("books.db"),
            log_level: None,
            year_parsing: YearParsing::default(),
            unique_isbn: false,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: .librarycatalog.yml
        let local_config = PathBuf::from(".librarycatalog.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/librarycatalog/librarycatalog.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("librarycatalog").join("librarycatalog.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Options handed to the catalog
    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            year_parsing: self.year_parsing,
            unique_isbn: self.unique_isbn,
        }
    }
}
