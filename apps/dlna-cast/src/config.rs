//! CLI configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::Path;

use anyhow::{Context, Result};
use dlna_core::Config;
use serde::Deserialize;

/// CLI configuration loaded from YAML with environment overrides.
///
/// Library settings sit at the top level of the document next to the
/// CLI-only keys.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    /// Device (friendly name or UDN) picked automatically by `play`.
    pub default_device: Option<String>,

    #[serde(flatten)]
    pub core: Config,
}

impl CastConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DLNA_CAST_DISCOVERY_WINDOW_MS") {
            if let Ok(window) = val.parse() {
                self.core.discovery_window_ms = window;
            }
        }

        if let Ok(val) = std::env::var("DLNA_CAST_SEARCH_TARGET") {
            if !val.trim().is_empty() {
                self.core.search_target = val;
            }
        }
    }
}
