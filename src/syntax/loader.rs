//! Language definition files
//!
//! Languages beyond the built-ins are described in TOML:
//!
//! ```toml
//! id = "demo"
//! name = "Demo"
//! extensions = ["demo"]
//! quote-marks = ["\""]
//! escape-char = "\\"
//! symbols = [";", "="]
//!
//! [hard-quote]
//! open = "@\""
//! close = "\""
//! escapes = ["\"\""]
//!
//! [[comment-single]]
//! id = 1
//! marker = "//"
//! style = "color: gray;"
//!
//! [[keywords]]
//! id = 1
//! words = ["if", "else"]
//! style = "color: blue;"
//!
//! [[regexps]]
//! id = 0
//! pattern = '(\w+)='
//! replace = '\1'
//! after = "="
//! style = "color: green;"
//!
//! [styles]
//! st0 = "color: red;"
//! ```
//!
//! Regexp templates reference capture groups as `\N`.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::language::{LanguageDefinition, StrictMode, DEFAULT_TAB_WIDTH};
use super::rules::{KeywordGroup, ObjectSplitter, RegexpRule, ScriptDelimiter};
use super::style::CaseConversion;
use super::tokens::Category;
use crate::error::{HighlightError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct LanguageFile {
    id: String,
    name: Option<String>,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    comment_single: Vec<CommentSingleEntry>,
    #[serde(default = "default_true")]
    comment_case_sensitive: bool,
    #[serde(default)]
    comment_multi: Vec<CommentMultiEntry>,
    #[serde(default)]
    quote_marks: Vec<char>,
    escape_char: Option<char>,
    hard_quote: Option<HardQuoteEntry>,
    #[serde(default)]
    keywords: Vec<KeywordEntry>,
    #[serde(default)]
    case_keywords: CaseConversion,
    #[serde(default)]
    symbols: Vec<char>,
    #[serde(default)]
    regexps: Vec<RegexpEntry>,
    #[serde(default)]
    object_splitters: Vec<SplitterEntry>,
    #[serde(default)]
    script_delimiters: Vec<DelimiterEntry>,
    #[serde(default)]
    strict_mode: StrictMode,
    tab_width: Option<usize>,
    #[serde(default)]
    styles: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CommentSingleEntry {
    id: usize,
    marker: String,
    #[serde(default)]
    style: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CommentMultiEntry {
    open: String,
    close: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct HardQuoteEntry {
    open: String,
    close: String,
    #[serde(default)]
    escapes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct KeywordEntry {
    id: usize,
    words: Vec<String>,
    #[serde(default = "default_true")]
    case_sensitive: bool,
    #[serde(default)]
    url: String,
    #[serde(default)]
    style: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RegexpEntry {
    id: usize,
    pattern: String,
    replace: Option<String>,
    #[serde(default)]
    before: String,
    #[serde(default)]
    after: String,
    #[serde(default)]
    modifiers: String,
    class: Option<String>,
    #[serde(default)]
    style: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SplitterEntry {
    id: usize,
    token: String,
    #[serde(default)]
    style: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct DelimiterEntry {
    id: usize,
    open: String,
    close: String,
    #[serde(default = "default_true")]
    highlight: bool,
    #[serde(default)]
    style: String,
}

fn default_true() -> bool {
    true
}

/// Convert a `\N` capture template to the regex crate's `${N}` syntax
///
/// A literal `$` is doubled so it survives expansion.
fn convert_template(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' if chars.peek().is_some_and(|d| d.is_ascii_digit()) => {
                out.push_str("${");
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    out.push(d);
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }
    out
}

fn check_unique<I>(kind: &str, ids: I) -> Result<()>
where
    I: IntoIterator<Item = usize>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(HighlightError::InvalidLanguage(format!(
                "duplicate {} id {}",
                kind, id
            )));
        }
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> HighlightError {
    HighlightError::InvalidLanguage(reason.into())
}

impl LanguageFile {
    fn compile(self) -> Result<LanguageDefinition> {
        if self.id.trim().is_empty() {
            return Err(invalid("language id is empty"));
        }
        check_unique("comment", self.comment_single.iter().map(|c| c.id))?;
        check_unique("keyword group", self.keywords.iter().map(|k| k.id))?;
        check_unique("regexp", self.regexps.iter().map(|r| r.id))?;
        check_unique("object splitter", self.object_splitters.iter().map(|s| s.id))?;
        check_unique("script delimiter", self.script_delimiters.iter().map(|d| d.id))?;

        let name = self.name.unwrap_or_else(|| self.id.clone());
        let mut lang = LanguageDefinition::new(&self.id, &name);
        for ext in &self.extensions {
            lang.add_extension(ext.trim_start_matches('.'));
        }

        for entry in self.comment_single {
            if entry.marker.is_empty() {
                return Err(invalid(format!("comment {} has an empty marker", entry.id)));
            }
            lang.add_comment_single(entry.id, &entry.marker, &entry.style);
        }
        lang.comment_case_sensitive = self.comment_case_sensitive;
        for entry in self.comment_multi {
            if entry.open.is_empty() || entry.close.is_empty() {
                return Err(invalid("multi-line comment with an empty marker"));
            }
            lang.add_comment_multi(&entry.open, &entry.close);
        }

        lang.quote_marks = self.quote_marks;
        lang.escape_char = self.escape_char;
        if let Some(hard) = self.hard_quote {
            if hard.open.is_empty() || hard.close.is_empty() {
                return Err(invalid("hard quote with an empty marker"));
            }
            if hard.escapes.iter().any(|e| e.is_empty()) {
                return Err(invalid("empty hard escape sequence"));
            }
            let escapes: Vec<&str> = hard.escapes.iter().map(|e| e.as_str()).collect();
            lang.set_hard_quote(&hard.open, &hard.close, &escapes);
        }
        lang.case_keywords = self.case_keywords;
        lang.symbols = self.symbols;

        for entry in self.keywords {
            let words: Vec<&str> = entry.words.iter().map(|w| w.as_str()).collect();
            let group = KeywordGroup::new(entry.id, &words)
                .case_sensitive(entry.case_sensitive)
                .with_url(&entry.url);
            lang.add_keywords(group, &entry.style);
        }

        for entry in self.regexps {
            let mut rule = RegexpRule::with_modifiers(entry.id, &entry.pattern, &entry.modifiers)?
                .surround(&convert_template(&entry.before), &convert_template(&entry.after));
            if let Some(replace) = entry.replace {
                rule = rule.replace(&convert_template(&replace));
            }
            if let Some(class) = entry.class.filter(|c| !c.is_empty()) {
                rule = rule.with_class(&class);
            }
            lang.add_regexp(rule, &entry.style);
        }

        for entry in self.object_splitters {
            if entry.token.is_empty() {
                return Err(invalid(format!("object splitter {} is empty", entry.id)));
            }
            lang.add_object_splitter(ObjectSplitter::new(entry.id, &entry.token)?, &entry.style);
        }

        for entry in self.script_delimiters {
            if entry.open.is_empty() || entry.close.is_empty() {
                return Err(invalid(format!("script delimiter {} is empty", entry.id)));
            }
            let delimiter =
                ScriptDelimiter::new(entry.id, &entry.open, &entry.close).highlighted(entry.highlight);
            lang.add_script_delimiter(delimiter, &entry.style);
        }
        lang.strict_mode = self.strict_mode;

        lang.tab_width = match self.tab_width {
            Some(0) => return Err(invalid("tab width must be at least 1")),
            Some(width) => width,
            None => DEFAULT_TAB_WIDTH,
        };

        for (class, style) in self.styles {
            let category = Category::from_class_name(&class)
                .ok_or_else(|| invalid(format!("unknown style class `{}`", class)))?;
            lang.set_style(category, &style);
        }

        Ok(lang)
    }
}

/// Parse a language definition from TOML text
pub fn from_toml_str(content: &str) -> Result<LanguageDefinition> {
    let file: LanguageFile = toml::from_str(content)?;
    file.compile()
}

/// Load a language definition from a TOML file
pub fn load_file(path: &Path) -> Result<LanguageDefinition> {
    let content = fs::read_to_string(path)?;
    from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = r#"
id = "Demo"
name = "Demo Language"
extensions = [".demo"]
quote-marks = ['"']
escape-char = "\\"
symbols = [";", "="]
tab-width = 2

[hard-quote]
open = '@"'
close = '"'
escapes = ['""']

[[comment-single]]
id = 1
marker = "--"
style = "color: gray;"

[[comment-multi]]
open = "{-"
close = "-}"

[[keywords]]
id = 1
words = ["let", "in"]
case-sensitive = false
url = "http://demo/{FNAME}"
style = "color: blue;"

[[regexps]]
id = 0
pattern = '(\w+)\s*='
replace = '\1'
after = " ="
class = "binding"
style = "color: green;"

[[object-splitters]]
id = 1
token = "."
style = "color: teal;"

[styles]
st0 = "color: red;"
coMULTI = "color: silver;"
"#;

    #[test]
    fn test_convert_template() {
        assert_eq!(convert_template(r"\1"), "${1}");
        assert_eq!(convert_template(r"<\12>"), "<${12}>");
        assert_eq!(convert_template("$5"), "$$5");
        assert_eq!(convert_template(r"a\b"), r"a\b");
    }

    #[test]
    fn test_load_demo_language() {
        let lang = from_toml_str(DEMO).unwrap();
        assert_eq!(lang.id, "Demo");
        assert_eq!(lang.name, "Demo Language");
        assert_eq!(lang.extensions, vec!["demo"]);
        assert_eq!(lang.tab_width, 2);
        assert_eq!(lang.comment_single, vec![(1, "--".to_string())]);
        assert_eq!(lang.comment_multi, vec![("{-".to_string(), "-}".to_string())]);
        assert_eq!(lang.escape_char, Some('\\'));
        assert_eq!(lang.hard_quote, Some(("@\"".to_string(), "\"".to_string())));
        assert_eq!(lang.hard_escapes, vec!["\"\""]);
        assert!(lang.oo_lang);

        let group = &lang.keyword_groups[0];
        assert!(!group.case_sensitive);
        assert_eq!(group.url.as_deref(), Some("http://demo/{FNAME}"));

        let rule = lang.regexp(0).unwrap();
        assert_eq!(rule.replace, "${1}");
        assert_eq!(rule.after, " =");
        assert_eq!(lang.class_name(Category::Regexp(0)), "binding");

        assert_eq!(lang.styles.get(Category::String), "color: red;");
        assert_eq!(lang.styles.get(Category::CommentMulti), "color: silver;");
    }

    #[test]
    fn test_bad_pattern() {
        let text = "id = \"x\"\n[[regexps]]\nid = 0\npattern = \"(\"\n";
        let err = from_toml_str(text).unwrap_err();
        assert!(matches!(err, HighlightError::InvalidPattern { .. }));
    }

    #[test]
    fn test_duplicate_ids() {
        let text = "id = \"x\"\n[[keywords]]\nid = 1\nwords = []\n[[keywords]]\nid = 1\nwords = []\n";
        let err = from_toml_str(text).unwrap_err();
        assert!(matches!(err, HighlightError::InvalidLanguage(_)));
    }

    #[test]
    fn test_empty_hard_quote_marker() {
        let text = "id = \"x\"\n[hard-quote]\nopen = \"@\"\nclose = \"\"\n";
        assert!(matches!(
            from_toml_str(text).unwrap_err(),
            HighlightError::InvalidLanguage(_)
        ));
    }

    #[test]
    fn test_unknown_style_class() {
        let text = "id = \"x\"\n[styles]\nbogus = \"color: red;\"\n";
        assert!(matches!(
            from_toml_str(text).unwrap_err(),
            HighlightError::InvalidLanguage(_)
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            from_toml_str("id = ").unwrap_err(),
            HighlightError::Config(_)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(Path::new("/nonexistent/lang.toml")).unwrap_err();
        assert!(matches!(err, HighlightError::Io(_)));
    }
}
