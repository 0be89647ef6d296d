//! Application configuration management.
//!
//! This module handles loading and saving application-wide configuration
//! settings, such as the default output file and the duplicate policy.
//! CLI flags always take precedence over the config file.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default text output file used when `scan` is given neither
    /// `--output` nor `--database`.
    #[serde(default)]
    pub default_output: Option<PathBuf>,

    /// Record fonts even when they were already recorded.
    #[serde(default)]
    pub allow_duplicates: bool,
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// A missing or unreadable config file falls back to defaults.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "psdfonts", "psdfonts")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}
