use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

/// Error types for the tab bridge host.
///
/// Covers startup concerns: configuration loading, socket setup and
/// logging initialization. Per-message failures on either protocol never
/// surface here; they are logged or turned into structured responses.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A configuration value is out of range
    #[error("configuration validation failed for '{component}': {details}")]
    ConfigValidation {
        /// Component that failed validation
        component: String,
        /// Validation error details
        details: String,
    },

    /// I/O failure on a specific file or socket path
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// I/O failure without path context, e.g. on the browser stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is not valid TOML for [`crate::config::Config`]
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tracing subscriber could not be installed
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

/// A specialized `Result` type for bridge operations.
pub type Result<T> = result::Result<T, BridgeError>;

impl BridgeError {
    /// TOML error located at `path`, or at "string" for in-memory input.
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        BridgeError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an I/O error carrying the path it happened on.
    pub fn io_at(error: impl fmt::Display, path: &Path) -> Self {
        BridgeError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}
