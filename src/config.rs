use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::{CODECOGS_ENDPOINT, DEFAULT_DPI, DEFAULT_TIMEOUT_SECS};
use crate::pipeline::ConvertOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    CODECOGS_ENDPOINT.to_string()
}

fn default_dpi() -> u32 {
    DEFAULT_DPI
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            dpi: default_dpi(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings file: conversion defaults plus the math service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: ConvertOptions,
    #[serde(default)]
    pub math: MathConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::ConfigToml)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
[defaults]
theme = "ocean"

[math]
enabled = false
dpi = 200
"#,
        )
        .unwrap();
        assert_eq!(config.defaults.theme, "ocean");
        assert_eq!(config.defaults.code_theme, "github");
        assert!(!config.math.enabled);
        assert_eq!(config.math.dpi, 200);
        assert_eq!(config.math.endpoint, CODECOGS_ENDPOINT);
        assert_eq!(config.math.timeout_secs, 10);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = Config::from_toml("[math\nenabled = 1").unwrap_err();
        assert!(matches!(err, Error::ConfigToml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load(Path::new("/nonexistent/md2html.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
