use thiserror::Error;

/// Errors that can occur while loading configuration or linting files.
#[derive(Debug, Error)]
pub enum XpLintError {
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid lint config: {0}")]
    InvalidConfig(String),

    #[error("Settings unavailable for '{uri}': {reason}")]
    Settings { uri: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, XpLintError>;
