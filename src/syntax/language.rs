//! Language definitions for syntax highlighting
//!
//! A [`LanguageDefinition`] is pure data: comment markers, quote marks,
//! keyword groups, symbols, regexp rules, object splitters, script
//! delimiters and per-category styles. The scanner and decorator read it;
//! nothing mutates it once it is registered.

use serde::Deserialize;

use super::rules::{KeywordGroup, ObjectSplitter, RegexpRule, ScriptDelimiter};
use super::style::{CaseConversion, Styles};
use super::tokens::Category;

/// Tab stop width used when a language does not suggest one
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// When strict (embedded script) mode applies to a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrictMode {
    /// Never: the whole source is code
    #[default]
    Never,
    /// Maybe: only when the caller enables it
    Maybe,
    /// Always: code lives only inside script delimiters
    Always,
}

/// A complete language definition for syntax highlighting
#[derive(Debug, Clone)]
pub struct LanguageDefinition {
    /// Normalized identifier (e.g., "java")
    pub id: String,
    /// Display name (e.g., "Java")
    pub name: String,
    /// File extensions (e.g., ["java"])
    pub extensions: Vec<String>,
    /// Single-line comment markers by group id
    pub comment_single: Vec<(usize, String)>,
    /// Whether single-line comment markers match case-sensitively
    pub comment_case_sensitive: bool,
    /// Multi-line comment open/close markers; first match wins
    pub comment_multi: Vec<(String, String)>,
    /// Characters opening and closing string literals
    pub quote_marks: Vec<char>,
    /// Character escaping the next character inside strings
    pub escape_char: Option<char>,
    /// Open/close markers of hard-quoted strings, where the escape
    /// character has no effect (C# `@"..."`)
    pub hard_quote: Option<(String, String)>,
    /// Sequences that do not close a hard-quoted string (C# `""`)
    pub hard_escapes: Vec<String>,
    /// Keyword groups in match order
    pub keyword_groups: Vec<KeywordGroup>,
    /// Default case conversion for matched keywords
    pub case_keywords: CaseConversion,
    /// Symbol characters (brackets are always symbols)
    pub symbols: Vec<char>,
    /// Regexp rules in application order
    pub regexps: Vec<RegexpRule>,
    /// Whether object member accesses are highlighted
    pub oo_lang: bool,
    /// Object splitters (e.g. `.`, `->`)
    pub object_splitters: Vec<ObjectSplitter>,
    /// Embedded script regions used in strict mode
    pub script_delimiters: Vec<ScriptDelimiter>,
    /// When strict mode applies
    pub strict_mode: StrictMode,
    /// Suggested tab stop width
    pub tab_width: usize,
    /// Per-category styles
    pub styles: Styles,
}

impl LanguageDefinition {
    /// Create a new empty language definition
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            extensions: Vec::new(),
            comment_single: Vec::new(),
            comment_case_sensitive: true,
            comment_multi: Vec::new(),
            quote_marks: Vec::new(),
            escape_char: None,
            hard_quote: None,
            hard_escapes: Vec::new(),
            keyword_groups: Vec::new(),
            case_keywords: CaseConversion::None,
            symbols: Vec::new(),
            regexps: Vec::new(),
            oo_lang: false,
            object_splitters: Vec::new(),
            script_delimiters: Vec::new(),
            strict_mode: StrictMode::Never,
            tab_width: DEFAULT_TAB_WIDTH,
            styles: Styles::new(),
        }
    }

    /// Add a file extension
    pub fn add_extension(&mut self, ext: &str) {
        self.extensions.push(ext.to_string());
    }

    /// Add a single-line comment marker
    pub fn add_comment_single(&mut self, id: usize, marker: &str, style: &str) {
        self.comment_single.push((id, marker.to_string()));
        self.styles.set(Category::Comment(id), style);
    }

    /// Add a multi-line comment marker pair
    pub fn add_comment_multi(&mut self, open: &str, close: &str) {
        self.comment_multi.push((open.to_string(), close.to_string()));
    }

    /// Set the hard quote markers and the sequences escaped inside them
    pub fn set_hard_quote(&mut self, open: &str, close: &str, escapes: &[&str]) {
        self.hard_quote = Some((open.to_string(), close.to_string()));
        self.hard_escapes = escapes.iter().map(|e| e.to_string()).collect();
    }

    /// Add a keyword group with its style
    pub fn add_keywords(&mut self, group: KeywordGroup, style: &str) {
        self.styles.set(Category::Keyword(group.id), style);
        self.keyword_groups.push(group);
    }

    /// Add a regexp rule with its style
    pub fn add_regexp(&mut self, rule: RegexpRule, style: &str) {
        self.styles.set(Category::Regexp(rule.id), style);
        self.regexps.push(rule);
    }

    /// Add an object splitter with its style
    ///
    /// Adding a splitter marks the language as object-oriented.
    pub fn add_object_splitter(&mut self, splitter: ObjectSplitter, style: &str) {
        self.styles.set(Category::Method(splitter.id), style);
        self.object_splitters.push(splitter);
        self.oo_lang = true;
    }

    /// Add a script delimiter with its style
    pub fn add_script_delimiter(&mut self, delimiter: ScriptDelimiter, style: &str) {
        self.styles.set(Category::Script(delimiter.id), style);
        self.script_delimiters.push(delimiter);
    }

    /// Set the style for a category
    pub fn set_style(&mut self, category: Category, style: &str) {
        self.styles.set(category, style);
    }

    /// Find a regexp rule by id
    pub fn regexp(&self, id: usize) -> Option<&RegexpRule> {
        self.regexps.iter().find(|r| r.id == id)
    }

    /// The CSS class used for a category
    ///
    /// Same as [`Category::class_name`] except for regexp rules that carry a
    /// custom class.
    pub fn class_name(&self, category: Category) -> String {
        if let Category::Regexp(id) = category {
            if let Some(class) = self.regexp(id).and_then(|r| r.class.as_ref()) {
                return class.clone();
            }
        }
        category.class_name()
    }

    /// Whether strict mode is in effect given the caller's preference
    pub fn strict_for(&self, requested: Option<bool>) -> bool {
        match self.strict_mode {
            StrictMode::Never => false,
            StrictMode::Maybe => requested.unwrap_or(false),
            StrictMode::Always => true,
        }
    }

    /// Every category this definition can produce, in stylesheet order
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .keyword_groups
            .iter()
            .map(|g| Category::Keyword(g.id))
            .collect();
        categories.extend(self.comment_single.iter().map(|(id, _)| Category::Comment(*id)));
        categories.extend([
            Category::CommentMulti,
            Category::Escape,
            Category::Bracket,
            Category::Symbol,
            Category::String,
            Category::Number,
        ]);
        categories.extend(self.object_splitters.iter().map(|s| Category::Method(s.id)));
        categories.extend(self.script_delimiters.iter().map(|d| Category::Script(d.id)));
        categories.extend(self.regexps.iter().map(|r| Category::Regexp(r.id)));
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_language() -> LanguageDefinition {
        let mut lang = LanguageDefinition::new("test", "Test");
        lang.add_extension("test");
        lang.add_comment_single(1, "//", "color: gray;");
        lang.add_comment_multi("/*", "*/");
        lang.add_keywords(KeywordGroup::new(1, &["if", "else"]), "color: blue;");
        if let Ok(rule) = RegexpRule::new(0, r"\$\w+") {
            lang.add_regexp(rule.with_class("var"), "color: green;");
        }
        if let Ok(splitter) = ObjectSplitter::new(1, ".") {
            lang.add_object_splitter(splitter, "color: teal;");
        }
        lang
    }

    #[test]
    fn test_styles_registered_with_rules() {
        let lang = create_test_language();
        assert_eq!(lang.styles.get(Category::Comment(1)), "color: gray;");
        assert_eq!(lang.styles.get(Category::Keyword(1)), "color: blue;");
        assert_eq!(lang.styles.get(Category::Regexp(0)), "color: green;");
        assert_eq!(lang.styles.get(Category::String), "");
        assert!(lang.oo_lang);
    }

    #[test]
    fn test_custom_class_name() {
        let lang = create_test_language();
        assert_eq!(lang.class_name(Category::Regexp(0)), "var");
        assert_eq!(lang.class_name(Category::Regexp(1)), "re1");
        assert_eq!(lang.class_name(Category::Keyword(1)), "kw1");
    }

    #[test]
    fn test_strict_for() {
        let mut lang = create_test_language();
        assert!(!lang.strict_for(Some(true)));

        lang.strict_mode = StrictMode::Maybe;
        assert!(!lang.strict_for(None));
        assert!(lang.strict_for(Some(true)));

        lang.strict_mode = StrictMode::Always;
        assert!(lang.strict_for(Some(false)));
    }

    #[test]
    fn test_categories_listing() {
        let lang = create_test_language();
        let categories = lang.categories();
        assert_eq!(categories[0], Category::Keyword(1));
        assert!(categories.contains(&Category::Comment(1)));
        assert!(categories.contains(&Category::Method(1)));
        assert_eq!(categories.last(), Some(&Category::Regexp(0)));
    }
}
