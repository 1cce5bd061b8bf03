//! Error types for configuration resolution

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving deployment configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables are absent or empty
    ///
    /// Keys are listed once each, in declaration order.
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    /// The selected env file exists but could not be parsed
    #[error("Failed to read env file {path:?}: {message}")]
    EnvFile {
        /// Path of the env file
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

impl ConfigError {
    /// Names of the missing variables, empty for other error kinds
    pub fn missing_keys(&self) -> &[String] {
        match self {
            Self::MissingVariables(keys) => keys,
            Self::EnvFile { .. } => &[],
        }
    }
}
