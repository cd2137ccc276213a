//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid oracle base URL")]
    InvalidBaseUrl,

    #[error("Model name must not be empty: {0}")]
    EmptyModel(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Max empty completions must be at least 1")]
    InvalidEmptyCompletionLimit,

    #[error("Image max width must be between 64 and 4096 pixels")]
    InvalidMaxWidth,

    #[error("JPEG quality must be between 1 and 100")]
    InvalidJpegQuality,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
