//! Error types for hilite

use thiserror::Error;

/// Result type alias for highlighter operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighter error types
#[derive(Error, Debug)]
pub enum HighlightError {
    /// The language identifier does not resolve in the registry.
    ///
    /// `highlight` recovers from this by rendering the escaped source and
    /// reporting the error alongside the output.
    #[error("No such language: {0}")]
    UnknownLanguage(String),

    #[error("Invalid render config: {0}")]
    InvalidRenderConfig(String),

    #[error("Input of {len} bytes exceeds the budget of {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },

    #[error("Invalid pattern in {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid language definition: {0}")]
    InvalidLanguage(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HighlightError {
    /// Whether the error is the recoverable unknown-language case
    pub fn is_unknown_language(&self) -> bool {
        matches!(self, HighlightError::UnknownLanguage(_))
    }
}
