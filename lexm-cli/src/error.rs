//! Error handling module for the lexm CLI.
//!
//! Library failures are wrapped so every command returns one error type.

use std::path::PathBuf;

use lexm_lex::ConfigError;
use thiserror::Error;

/// Main error type for the lexm CLI application.
#[derive(Error, Debug)]
pub enum CliError {
    /// The configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A configuration file named on the command line does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Reading an input file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Command-line arguments are inconsistent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Scanning found input no token accepts.
    #[error("{0} unrecognized span(s) in input")]
    Unrecognized(usize),

    /// Generated literals did not read back unchanged.
    #[error("{0} generated literal(s) failed the round trip")]
    RoundTrip(usize),

    /// The logging subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type alias using CliError.
pub type Result<T> = std::result::Result<T, CliError>;
