//! PHP language definition
//!
//! PHP is the one built-in with script delimiters: in strict mode only the
//! text between `<?php ... ?>` (and friends) is highlighted.

use crate::syntax::language::{LanguageDefinition, StrictMode};
use crate::syntax::rules::{KeywordGroup, ObjectSplitter, RegexpRule, ScriptDelimiter};
use crate::syntax::tokens::Category;

/// Create PHP language definition
pub fn php_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("php", "PHP");
    lang.add_extension("php");
    lang.add_extension("php3");
    lang.add_extension("php4");
    lang.add_extension("php5");
    lang.add_extension("phtml");
    lang.tab_width = 4;

    lang.add_comment_single(1, "//", "color: #808080; font-style: italic;");
    lang.add_comment_single(2, "#", "color: #808080; font-style: italic;");
    lang.add_comment_multi("/*", "*/");
    lang.quote_marks = vec!['\'', '"'];
    lang.escape_char = Some('\\');

    lang.add_keywords(
        KeywordGroup::new(1, &[
            "include", "require", "include_once", "require_once", "for",
            "foreach", "as", "if", "elseif", "else", "while", "do", "endwhile",
            "endif", "switch", "case", "endswitch", "endfor", "endforeach",
            "return", "break", "continue", "try", "catch", "throw", "finally",
        ])
        .case_sensitive(false),
        "color: #b1b100;",
    );

    lang.add_keywords(
        KeywordGroup::new(2, &[
            "null", "__LINE__", "__FILE__", "__DIR__", "__FUNCTION__", "__CLASS__",
            "__METHOD__", "false", "true", "var", "default", "function", "class",
            "interface", "trait", "new", "clone", "abstract", "final", "static",
            "public", "private", "protected", "extends", "implements",
            "namespace", "use", "global", "const", "echo", "print", "instanceof",
        ])
        .case_sensitive(false),
        "color: #000000; font-weight: bold;",
    );

    lang.add_keywords(
        KeywordGroup::new(3, &[
            "array", "count", "isset", "unset", "empty", "strlen", "strpos",
            "substr", "str_replace", "explode", "implode", "trim", "sprintf",
            "printf", "preg_match", "preg_replace", "in_array", "array_keys",
            "array_values", "array_merge", "array_map", "array_filter",
            "json_encode", "json_decode", "htmlspecialchars", "file_get_contents",
            "file_put_contents", "fopen", "fclose", "fread", "fwrite", "die",
            "exit", "define", "defined", "header", "date", "time",
        ])
        .case_sensitive(false)
        .with_url("http://www.php.net/{FNAME}"),
        "color: #000066;",
    );

    // Variables
    if let Ok(rule) = RegexpRule::new(0, r"\$[A-Za-z_][A-Za-z0-9_]*") {
        lang.add_regexp(rule, "color: #0000ff;");
    }

    lang.symbols = vec![
        '!', '@', '%', '&', '*', '|', '/', '<', '>', '=', '-', '+', ';', ',', '.', '?', ':',
    ];

    if let Ok(splitter) = ObjectSplitter::new(1, "->") {
        lang.add_object_splitter(splitter, "color: #006600;");
    }
    if let Ok(splitter) = ObjectSplitter::new(2, "::") {
        lang.add_object_splitter(splitter, "color: #006600;");
    }

    lang.strict_mode = StrictMode::Maybe;
    lang.add_script_delimiter(ScriptDelimiter::new(0, "<?php", "?>"), "");
    lang.add_script_delimiter(ScriptDelimiter::new(1, "<?", "?>"), "");
    lang.add_script_delimiter(ScriptDelimiter::new(2, "<%", "%>"), "");
    lang.add_script_delimiter(
        ScriptDelimiter::new(3, "<script language=\"php\">", "</script>"),
        "",
    );

    lang.set_style(Category::CommentMulti, "color: #808080; font-style: italic;");
    lang.set_style(Category::Escape, "color: #000099; font-weight: bold;");
    lang.set_style(Category::Bracket, "color: #66cc66;");
    lang.set_style(Category::String, "color: #ff0000;");
    lang.set_style(Category::Number, "color: #cc66cc;");
    lang.set_style(Category::Symbol, "color: #66cc66;");

    lang
}
