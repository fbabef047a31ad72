//! Lexical categories and tokens
//!
//! Every piece of highlighted text belongs to at most one category. The
//! scanner and decorator emit [`Token`]s tagged with a category; the renderer
//! resolves each category to a CSS class or an inline style.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

/// Lexical categories recognized by the highlighter
///
/// Categories that come in numbered groups carry the group id used by the
/// language definition (keyword group, comment group, regexp rule, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Keyword from the numbered keyword group
    Keyword(usize),
    /// Single-line comment from the numbered comment group
    Comment(usize),
    /// Multi-line comment
    CommentMulti,
    /// Escape sequence inside a string
    Escape,
    /// One of `()[]{}`
    Bracket,
    /// Other symbol character listed by the language
    Symbol,
    /// String literal
    String,
    /// Numeric literal
    Number,
    /// Member access after the numbered object splitter
    Method(usize),
    /// Match of the numbered regexp rule
    Regexp(usize),
    /// Embedded script region of the numbered delimiter (strict mode)
    Script(usize),
}

impl Category {
    /// The default CSS class name for this category
    ///
    /// Regexp rules may override this with a custom class; see
    /// [`LanguageDefinition::class_name`](super::LanguageDefinition::class_name).
    pub fn class_name(&self) -> String {
        match self {
            Category::Keyword(n) => format!("kw{}", n),
            Category::Comment(n) => format!("co{}", n),
            Category::CommentMulti => "coMULTI".to_string(),
            Category::Escape => "es0".to_string(),
            Category::Bracket => "br0".to_string(),
            Category::Symbol => "sy0".to_string(),
            Category::String => "st0".to_string(),
            Category::Number => "nu0".to_string(),
            Category::Method(n) => format!("me{}", n),
            Category::Regexp(n) => format!("re{}", n),
            Category::Script(n) => format!("sc{}", n),
        }
    }

    /// Parse a category from its default class name (for TOML loading)
    pub fn from_class_name(name: &str) -> Option<Self> {
        match name {
            "coMULTI" => return Some(Category::CommentMulti),
            "es0" => return Some(Category::Escape),
            "br0" => return Some(Category::Bracket),
            "sy0" => return Some(Category::Symbol),
            "st0" => return Some(Category::String),
            "nu0" => return Some(Category::Number),
            _ => {}
        }

        if name.len() < 3 || !name.is_char_boundary(2) {
            return None;
        }
        let (prefix, digits) = name.split_at(2);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n: usize = digits.parse().ok()?;
        match prefix {
            "kw" => Some(Category::Keyword(n)),
            "co" => Some(Category::Comment(n)),
            "me" => Some(Category::Method(n)),
            "re" => Some(Category::Regexp(n)),
            "sc" => Some(Category::Script(n)),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class_name())
    }
}

/// A run of source text with at most one category
///
/// `text` is raw source text; HTML escaping happens when rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Category of this token (None = plain text)
    pub category: Option<Category>,
    /// Source text covered by this token
    pub text: String,
    /// Hyperlink target for linked keywords
    pub link: Option<String>,
}

impl Token {
    /// Create a plain, undecorated token
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            category: None,
            text: text.into(),
            link: None,
        }
    }

    /// Create a token of the given category
    pub fn styled(category: Category, text: impl Into<String>) -> Self {
        Self {
            category: Some(category),
            text: text.into(),
            link: None,
        }
    }

    /// Builder: attach a hyperlink
    pub fn with_link(mut self, href: impl Into<String>) -> Self {
        self.link = Some(href.into());
        self
    }

    /// Check if this token is plain text
    pub fn is_plain(&self) -> bool {
        self.category.is_none()
    }
}

/// A run of tokens, optionally inside an embedded script region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// Script delimiter id when this block is a strict-mode script region
    pub script: Option<usize>,
    /// Tokens in source order
    pub tokens: Vec<Token>,
}

impl Block {
    /// Concatenated source text of all tokens
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Which categories are highlighted for one call
///
/// Everything is enabled unless listed as disabled. In TOML this is written
/// as a list of class names, e.g. `disabled = ["kw3", "nu0"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct EnabledCategories {
    disabled: BTreeSet<Category>,
}

impl EnabledCategories {
    /// All categories enabled
    pub fn all() -> Self {
        Self::default()
    }

    /// Check whether a category is highlighted
    pub fn is_enabled(&self, category: Category) -> bool {
        !self.disabled.contains(&category)
    }

    /// Disable highlighting of a category
    pub fn disable(&mut self, category: Category) {
        self.disabled.insert(category);
    }

    /// Re-enable highlighting of a category
    pub fn enable(&mut self, category: Category) {
        self.disabled.remove(&category);
    }

    /// Builder: disable a category
    pub fn without(mut self, category: Category) -> Self {
        self.disable(category);
        self
    }
}

impl TryFrom<Vec<String>> for EnabledCategories {
    type Error = String;

    fn try_from(names: Vec<String>) -> std::result::Result<Self, Self::Error> {
        let mut enabled = Self::all();
        for name in names {
            let category = Category::from_class_name(&name)
                .ok_or_else(|| format!("unknown category `{}`", name))?;
            enabled.disable(category);
        }
        Ok(enabled)
    }
}
