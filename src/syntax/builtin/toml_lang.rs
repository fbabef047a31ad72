//! TOML language definition

use crate::syntax::language::LanguageDefinition;
use crate::syntax::rules::{KeywordGroup, RegexpRule};
use crate::syntax::tokens::Category;

/// Create TOML language definition
pub fn toml_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("toml", "TOML");
    lang.add_extension("toml");

    lang.add_comment_single(1, "#", "color: #808080; font-style: italic;");
    lang.quote_marks = vec!['"', '\''];
    lang.escape_char = Some('\\');

    lang.add_keywords(
        KeywordGroup::new(1, &["true", "false", "inf", "nan"]),
        "color: #b13366;",
    );

    // Table headers
    if let Ok(rule) = RegexpRule::with_modifiers(0, r"^[ \t]*\[\[?[^\]\n]+\]\]?", "m") {
        lang.add_regexp(rule.with_class("table"), "color: #000080; font-weight: bold;");
    }

    // Keys (before = sign)
    if let Ok(rule) = RegexpRule::with_modifiers(1, r"^([ \t]*)([\w.\-]+)([ \t]*=)", "m") {
        lang.add_regexp(rule.replace("$2").surround("$1", "$3"), "color: #0000cd;");
    }

    // Dates and times
    if let Ok(rule) = RegexpRule::new(
        2,
        r"\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?)?",
    ) {
        lang.add_regexp(rule, "color: #cc66cc;");
    }

    // Hex, octal and binary integers
    if let Ok(rule) = RegexpRule::new(3, r"\b0(?:x[0-9a-fA-F_]+|o[0-7_]+|b[01_]+)\b") {
        lang.add_regexp(rule, "color: #cc66cc;");
    }

    lang.symbols = vec!['=', ',', '.'];

    lang.set_style(Category::Escape, "color: #000099; font-weight: bold;");
    lang.set_style(Category::Bracket, "color: #66cc66;");
    lang.set_style(Category::String, "color: #ff0000;");
    lang.set_style(Category::Number, "color: #cc66cc;");
    lang.set_style(Category::Symbol, "color: #66cc66;");

    lang
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::scanner::{ScanOptions, Scanner};

    #[test]
    fn test_toml_key_and_table() {
        let lang = toml_language();
        let options = ScanOptions::default();
        let tokens: Vec<_> = Scanner::new(&lang, &options)
            .scan("[package]\nname = \"hilite\"\n")
            .into_iter()
            .flat_map(|block| block.tokens)
            .collect();

        assert!(tokens
            .iter()
            .any(|t| t.category == Some(Category::Regexp(0)) && t.text == "[package]"));
        assert!(tokens
            .iter()
            .any(|t| t.category == Some(Category::Regexp(1)) && t.text == "name"));
        assert_eq!(lang.class_name(Category::Regexp(0)), "table");
    }
}
