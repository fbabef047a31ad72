//! Built-in language definitions
//!
//! This module provides highlighting definitions for
//! common programming languages.

mod c;
mod java;
mod php;
mod python;
mod rust;
mod toml_lang;

use super::language::LanguageDefinition;

/// Get all built-in language definitions
pub fn all_languages() -> Vec<LanguageDefinition> {
    vec![
        java::java_language(),
        c::c_language(),
        python::python_language(),
        rust::rust_language(),
        php::php_language(),
        toml_lang::toml_language(),
    ]
}
