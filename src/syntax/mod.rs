//! Syntax module
//!
//! This module provides everything needed to turn source text into tokens:
//! - Language definitions (built-in and loaded from TOML)
//! - The language registry
//! - The character scanner and the decorator passes over plain runs

mod builtin;
mod decorator;
mod language;
mod loader;
mod registry;
mod rules;
mod scanner;
mod style;
mod tokens;

pub use decorator::Decorator;
pub use language::{LanguageDefinition, StrictMode, DEFAULT_TAB_WIDTH};
pub use loader::{from_toml_str as language_from_toml, load_file as load_language_file};
pub use registry::{normalize_identifier, LanguageRegistry};
pub use rules::{KeywordGroup, ObjectSplitter, RegexpRule, ScriptDelimiter};
pub use scanner::{ScanOptions, Scanner};
pub use style::{CaseConversion, Styles};
pub use tokens::{Block, Category, EnabledCategories, Token};
