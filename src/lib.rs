//! hilite - generic source code syntax highlighter
//!
//! Turns source text in a declared language into HTML markup. Languages are
//! declarative tables (comment markers, quote marks, keyword groups, regexp
//! rules, ...) held in a [`LanguageRegistry`]; presentation is controlled by
//! a per-call [`RenderConfig`].
//!
//! ```no_run
//! use hilite::{highlight, RenderConfig};
//!
//! let result = highlight("int x = 42;", "c", &RenderConfig::default())?;
//! println!("{}", result.markup);
//! # Ok::<(), hilite::HighlightError>(())
//! ```

pub mod config;
pub mod error;
pub mod highlighter;
pub mod render;
pub mod stylesheet;
pub mod syntax;

pub use config::{HeaderKind, LineNumbers, LinkStyles, RenderConfig};
pub use error::{HighlightError, Result};
pub use highlighter::{HighlightResult, Highlighter};
pub use syntax::{Category, EnabledCategories, LanguageDefinition, LanguageRegistry};

/// Highlight `source` as `language` with the built-in languages
pub fn highlight(source: &str, language: &str, config: &RenderConfig) -> Result<HighlightResult> {
    Highlighter::new(LanguageRegistry::global()).highlight(source, language, config)
}

/// Generate the stylesheet for a built-in language
pub fn stylesheet(language: &str, config: &RenderConfig, economy: bool) -> Result<String> {
    Highlighter::new(LanguageRegistry::global()).stylesheet(language, config, economy)
}
