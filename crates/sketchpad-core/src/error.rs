//! Error types for fallible setup steps.
//!
//! Interactive operations never fail; they clamp or no-op instead.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
