//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use std::path::PathBuf;
use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<PathBuf>,
    },

    /// File parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Deck is structurally invalid (bad slide numbers, dangling references)
    #[error("Invalid deck: {message}. {hint}")]
    Deck {
        /// Description of the problem.
        message: String,
        /// Actionable guidance for fixing the deck file.
        hint: &'static str,
    },

    /// Visualization data missing or malformed
    #[error("Data error: {0}")]
    Data(String),

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// SVG serialization failure
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Create a deck validation error with actionable hint
    pub fn deck(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Deck { message: message.into(), hint }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a data error
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Self::Render(e.to_string())
    }
}
