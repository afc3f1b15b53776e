//! Configuration error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Host must not be empty")]
    EmptyHost,

    #[error("Font family must not be empty")]
    EmptyFontFamily,

    #[error("Image fetch timeout must be positive")]
    InvalidTimeout,
}
