//! Error types for starwars.
//!
//! Module-level validation failures live in [`crate::modules::ModuleError`];
//! this type wraps them together with the failures of the surrounding
//! plumbing (argument files, configuration).

use crate::modules::ModuleError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for starwars operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for starwars.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Invocation Errors
    // ========================================================================
    /// The module arguments file could not be read.
    #[error("Failed to read module arguments from '{path}': {source}")]
    ArgsFile {
        /// Path to the arguments file
        path: PathBuf,
        /// Source error
        #[source]
        source: std::io::Error,
    },

    /// The module arguments were not a JSON object.
    #[error("Failed to parse module arguments: {0}")]
    ArgsParse(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration.
    #[error("Configuration error in '{path}': {message}")]
    Config {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Module Errors
    // ========================================================================
    /// A module rejected its arguments or failed.
    #[error(transparent)]
    Module(#[from] ModuleError),
}

impl Error {
    /// Create an argument parsing error.
    pub fn args_parse(message: impl Into<String>) -> Self {
        Error::ArgsParse(message.into())
    }

    /// Create a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ArgsParse(err.to_string())
    }
}
