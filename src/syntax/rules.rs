//! Rule types making up a language definition
//!
//! Keyword groups, regexp rules, object splitters and script delimiters.
//! Regexes are compiled once when a rule is built, so a loaded language
//! definition can be shared across highlight calls.

use regex::{Captures, Regex, RegexBuilder};

use crate::error::{HighlightError, Result};

/// A numbered group of literal keywords
#[derive(Debug, Clone)]
pub struct KeywordGroup {
    /// Group id (selects the `kwN` class and style)
    pub id: usize,
    /// Words in this group, in match order
    pub words: Vec<String>,
    /// Whether words must match with the same letter case
    pub case_sensitive: bool,
    /// URL template for keyword links; `{FNAME}` is replaced by the keyword
    pub url: Option<String>,
}

impl KeywordGroup {
    /// Create a case-sensitive group without links
    pub fn new(id: usize, words: &[&str]) -> Self {
        Self {
            id,
            words: words.iter().map(|w| w.to_string()).collect(),
            case_sensitive: true,
            url: None,
        }
    }

    /// Builder: set case sensitivity
    pub fn case_sensitive(mut self, flag: bool) -> Self {
        self.case_sensitive = flag;
        self
    }

    /// Builder: set the URL template
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = if url.is_empty() { None } else { Some(url.to_string()) };
        self
    }

    /// Find the spelling used by this group for a matched word
    pub fn canonical(&self, matched: &str) -> Option<&str> {
        self.words
            .iter()
            .find(|w| w.eq_ignore_ascii_case(matched))
            .map(|w| w.as_str())
    }
}

/// A regexp rule applied to non-string, non-comment text
///
/// `replace`, `before` and `after` are expansion templates (`$1`, `${name}`)
/// evaluated against each match: `before` and `after` stay undecorated,
/// `replace` becomes the styled token.
#[derive(Debug, Clone)]
pub struct RegexpRule {
    /// Rule id (selects the `reN` class and style)
    pub id: usize,
    /// Compiled search pattern
    pub pattern: Regex,
    /// Template for the styled part
    pub replace: String,
    /// Template for undecorated text placed before the styled part
    pub before: String,
    /// Template for undecorated text placed after the styled part
    pub after: String,
    /// Custom CSS class used instead of `reN`
    pub class: Option<String>,
}

impl RegexpRule {
    /// Create a rule styling each whole match
    pub fn new(id: usize, pattern: &str) -> Result<Self> {
        Self::with_modifiers(id, pattern, "")
    }

    /// Create a rule with pattern modifiers
    ///
    /// Recognized modifiers: `i` (case-insensitive), `m` (multi-line),
    /// `s` (dot matches newline), `x` (ignore whitespace), `U` (swap greed).
    pub fn with_modifiers(id: usize, pattern: &str, modifiers: &str) -> Result<Self> {
        let mut builder = RegexBuilder::new(pattern);
        for modifier in modifiers.chars() {
            match modifier {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                'U' => builder.swap_greed(true),
                other => {
                    return Err(HighlightError::InvalidLanguage(format!(
                        "unknown regexp modifier `{}` in rule {}",
                        other, id
                    )))
                }
            };
        }
        let pattern = builder.build().map_err(|source| HighlightError::InvalidPattern {
            name: format!("regexp {}", id),
            source,
        })?;
        Ok(Self {
            id,
            pattern,
            replace: "$0".to_string(),
            before: String::new(),
            after: String::new(),
            class: None,
        })
    }

    /// Builder: set the replace template
    pub fn replace(mut self, template: &str) -> Self {
        self.replace = template.to_string();
        self
    }

    /// Builder: set the before and after templates
    pub fn surround(mut self, before: &str, after: &str) -> Self {
        self.before = before.to_string();
        self.after = after.to_string();
        self
    }

    /// Builder: set a custom CSS class
    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    /// Expand a template against a match
    pub fn expand(caps: &Captures<'_>, template: &str) -> String {
        let mut out = String::new();
        if !template.is_empty() {
            caps.expand(template, &mut out);
        }
        out
    }
}

/// An object splitter such as `.` or `->`
///
/// The identifier following the splitter is styled as a member access.
#[derive(Debug, Clone)]
pub struct ObjectSplitter {
    /// Splitter id (selects the `meN` class and style)
    pub id: usize,
    /// The splitter text
    pub token: String,
    /// `(splitter\s*)(identifier)`
    pub pattern: Regex,
}

impl ObjectSplitter {
    /// Create a splitter
    pub fn new(id: usize, token: &str) -> Result<Self> {
        let source = format!(r"({}\s*)([a-zA-Z*(][a-zA-Z0-9_*]*)", regex::escape(token));
        let pattern = Regex::new(&source).map_err(|source| HighlightError::InvalidPattern {
            name: format!("object splitter {}", id),
            source,
        })?;
        Ok(Self {
            id,
            token: token.to_string(),
            pattern,
        })
    }
}

/// Delimiters of an embedded script region (strict mode)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDelimiter {
    /// Delimiter id (selects the `scN` class and style)
    pub id: usize,
    /// Text that opens the region
    pub open: String,
    /// Text that closes the region
    pub close: String,
    /// Whether the region's interior is highlighted
    pub highlight: bool,
}

impl ScriptDelimiter {
    /// Create a delimiter pair whose interior is highlighted
    pub fn new(id: usize, open: &str, close: &str) -> Self {
        Self {
            id,
            open: open.to_string(),
            close: close.to_string(),
            highlight: true,
        }
    }

    /// Builder: set whether the interior is highlighted
    pub fn highlighted(mut self, flag: bool) -> Self {
        self.highlight = flag;
        self
    }
}
