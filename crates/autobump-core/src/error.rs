//! Error types for autobump-core

use thiserror::Error;

/// Errors that can occur when resolving configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize the environment into a [`crate::config::Config`].
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// A required environment variable is not set.
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
