//! Error types for the lexm-lex crate
//!
//! Malformed source text is never an error here; it surfaces as unrecognized
//! lexemes. These types cover configuration and stream validation only.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for loading and validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration text is not valid TOML for the expected schema
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration file could not be read or written
    #[error("Failed to access {path}: {source}")]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A numeric separator already has a meaning in numeric literals
    #[error("Numeric {role} {c:?} collides with the literal grammar")]
    ReservedSeparator {
        /// Which separator, `digit separator` or `fraction separator`
        role: &'static str,
        /// The offending character
        c: char,
    },

    /// Digit and fraction separators must differ
    #[error("Digit separator and fraction separator are both {0:?}")]
    SameSeparators(char),

    /// Separators must be ASCII, tokens only ever see ASCII
    #[error("Numeric {role} {c:?} is not ASCII")]
    NonAsciiSeparator {
        /// Which separator, `digit separator` or `fraction separator`
        role: &'static str,
        /// The offending character
        c: char,
    },
}

/// Error type for checking pretokenized lexeme streams
#[derive(Debug, Error)]
pub enum ScanError {
    /// A syntax refused a lexeme in its current state
    #[error("Lexeme {index} ({text:?} at {line}:{column}) is not valid here")]
    Rejected {
        /// Position of the lexeme in the stream
        index: usize,
        /// Text of the lexeme
        text: String,
        /// Line the lexeme starts on
        line: u32,
        /// Column the lexeme starts at (1-based)
        column: u32,
    },
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_error_display() {
        let err = ConfigError::ReservedSeparator {
            role: "digit separator",
            c: 'e',
        };
        assert_eq!(
            err.to_string(),
            "Numeric digit separator 'e' collides with the literal grammar"
        );
    }

    #[test]
    fn test_rejected_display() {
        let err = ScanError::Rejected {
            index: 2,
            text: "x".into(),
            line: 1,
            column: 5,
        };
        assert_eq!(err.to_string(), "Lexeme 2 (\"x\" at 1:5) is not valid here");
    }
}
