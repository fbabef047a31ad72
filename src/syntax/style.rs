//! Style tables for rendered categories
//!
//! Styles are CSS declaration text (e.g. `color: #b1b100;`). They are used
//! verbatim as `style="..."` attributes, or emitted as rules by the
//! stylesheet generator when CSS classes are in use.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::tokens::Category;

/// Per-category style text for one language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Styles {
    entries: BTreeMap<Category, String>,
}

impl Styles {
    /// Create an empty style table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style for a category
    pub fn set(&mut self, category: Category, style: impl Into<String>) {
        self.entries.insert(category, style.into());
    }

    /// Get the style for a category
    ///
    /// A category without an entry has an empty style.
    pub fn get(&self, category: Category) -> &str {
        self.entries.get(&category).map(|s| s.as_str()).unwrap_or("")
    }
}

/// Letter-case policy applied to matched keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseConversion {
    /// Leave keywords as written in the source
    #[default]
    None,
    /// Uppercase keywords
    Upper,
    /// Lowercase keywords
    Lower,
}

impl CaseConversion {
    /// Apply the policy to a piece of text
    pub fn apply(&self, text: &str) -> String {
        match self {
            CaseConversion::None => text.to_string(),
            CaseConversion::Upper => text.to_uppercase(),
            CaseConversion::Lower => text.to_lowercase(),
        }
    }

    /// Parse a policy from a string name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "none" | "no-change" => Some(CaseConversion::None),
            "upper" => Some(CaseConversion::Upper),
            "lower" => Some(CaseConversion::Lower),
            _ => None,
        }
    }
}
