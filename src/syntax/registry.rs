//! Language registry
//!
//! The [`LanguageRegistry`] owns every loaded language definition, keyed by
//! normalized identifier, and maps file extensions to languages. Definitions
//! are shared behind `Arc` so a highlight call never copies one.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use super::builtin;
use super::language::LanguageDefinition;
use super::loader;
use crate::error::Result;

/// Normalize a language identifier
///
/// Characters outside `[A-Za-z0-9_-]` are dropped and the rest lowercased,
/// so `"C++"`, `" c "` and `"C"` all resolve to `"c"`.
pub fn normalize_identifier(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Registry of language definitions
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    /// Loaded language definitions by normalized id
    languages: HashMap<String, Arc<LanguageDefinition>>,
    /// Extension to language id mapping
    extension_map: HashMap<String, String>,
}

impl LanguageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in languages
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for lang in builtin::all_languages() {
            registry.add_language(lang);
        }
        tracing::debug!(count = registry.languages.len(), "loaded built-in languages");
        registry
    }

    /// The process-wide registry of built-in languages
    pub fn global() -> &'static LanguageRegistry {
        static GLOBAL: OnceLock<LanguageRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::with_builtins)
    }

    /// Add a language definition, replacing one with the same id
    pub fn add_language(&mut self, mut lang: LanguageDefinition) {
        let id = normalize_identifier(&lang.id);
        lang.id = id.clone();
        for ext in &lang.extensions {
            self.extension_map.insert(ext.to_lowercase(), id.clone());
        }
        self.languages.insert(id, Arc::new(lang));
    }

    /// Load a language definition from a TOML file and add it
    ///
    /// Returns the normalized id of the loaded language.
    pub fn load_file(&mut self, path: &Path) -> Result<String> {
        let lang = loader::load_file(path)?;
        let id = normalize_identifier(&lang.id);
        tracing::debug!(language = %id, path = %path.display(), "loaded language file");
        self.add_language(lang);
        Ok(id)
    }

    /// Get a language definition by identifier
    pub fn get(&self, id: &str) -> Option<Arc<LanguageDefinition>> {
        self.languages.get(&normalize_identifier(id)).cloned()
    }

    /// Check whether a language is registered
    pub fn contains(&self, id: &str) -> bool {
        self.languages.contains_key(&normalize_identifier(id))
    }

    /// Detect language from filename
    pub fn detect_language(&self, filename: &Path) -> Option<&str> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        self.extension_map.get(&ext).map(|s| s.as_str())
    }

    /// List available languages
    pub fn list_languages(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.languages.keys().map(|s| s.as_str()).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("Java"), "java");
        assert_eq!(normalize_identifier(" C++ "), "c");
        assert_eq!(normalize_identifier("../php"), "php");
        assert_eq!(normalize_identifier("x86-asm_64"), "x86-asm_64");
    }

    #[test]
    fn test_detect_language() {
        let registry = LanguageRegistry::with_builtins();

        assert_eq!(registry.detect_language(Path::new("Main.java")), Some("java"));
        assert_eq!(registry.detect_language(Path::new("main.rs")), Some("rust"));
        assert_eq!(registry.detect_language(Path::new("test.py")), Some("python"));
        assert_eq!(registry.detect_language(Path::new("Cargo.toml")), Some("toml"));
        assert_eq!(registry.detect_language(Path::new("index.PHP")), Some("php"));
        assert_eq!(registry.detect_language(Path::new("main.c")), Some("c"));
        assert_eq!(registry.detect_language(Path::new("no_extension")), None);
    }

    #[test]
    fn test_get_normalizes() {
        let registry = LanguageRegistry::with_builtins();
        assert!(registry.get("JAVA").is_some());
        assert!(registry.contains("Python"));
        assert!(registry.get("no-such-lang").is_none());
    }

    #[test]
    fn test_list_languages() {
        let registry = LanguageRegistry::global();
        assert_eq!(
            registry.list_languages(),
            vec!["c", "java", "php", "python", "rust", "toml"]
        );
    }

    #[test]
    fn test_add_language_replaces() {
        let mut registry = LanguageRegistry::new();
        registry.add_language(LanguageDefinition::new("Demo", "First"));
        registry.add_language(LanguageDefinition::new("demo", "Second"));
        assert_eq!(registry.list_languages(), vec!["demo"]);
        assert_eq!(registry.get("demo").unwrap().name, "Second");
    }
}
