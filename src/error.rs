use thiserror::Error;

use crate::color::ColorError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid color: {0}")]
    Color(#[from] ColorError),

    #[error("failed to parse theme TOML: {0}")]
    ThemeToml(#[source] toml::de::Error),

    #[error("failed to parse theme YAML: {0}")]
    ThemeYaml(#[source] serde_yaml::Error),

    #[error("failed to parse config TOML: {0}")]
    ConfigToml(#[source] toml::de::Error),

    #[error("unknown built-in theme '{name}'. Available: {available}")]
    UnknownBuiltin { name: String, available: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
