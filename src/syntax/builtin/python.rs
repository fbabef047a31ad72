//! Python language definition

use crate::syntax::language::LanguageDefinition;
use crate::syntax::rules::{KeywordGroup, ObjectSplitter, RegexpRule};
use crate::syntax::tokens::Category;

/// Create Python language definition
pub fn python_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("python", "Python");
    lang.add_extension("py");
    lang.add_extension("pyw");
    lang.add_extension("pyi");
    lang.tab_width = 4;

    lang.add_comment_single(1, "#", "color: #808080; font-style: italic;");
    // Docstrings render as block comments
    lang.add_comment_multi("\"\"\"", "\"\"\"");
    lang.add_comment_multi("'''", "'''");
    lang.quote_marks = vec!['"', '\''];
    lang.escape_char = Some('\\');

    lang.add_keywords(
        KeywordGroup::new(1, &[
            "and", "as", "assert", "async", "await", "break", "class", "continue",
            "def", "del", "elif", "else", "except", "finally", "for", "from",
            "global", "if", "import", "in", "is", "lambda", "nonlocal", "not",
            "or", "pass", "raise", "return", "try", "while", "with", "yield",
        ]),
        "color: #ff7700; font-weight: bold;",
    );

    lang.add_keywords(
        KeywordGroup::new(2, &["False", "None", "True", "self", "cls"]),
        "color: #008000;",
    );

    lang.add_keywords(
        KeywordGroup::new(3, &[
            "abs", "all", "any", "ascii", "bin", "bool", "bytearray", "bytes",
            "callable", "chr", "classmethod", "compile", "complex", "delattr",
            "dict", "dir", "divmod", "enumerate", "eval", "exec", "filter",
            "float", "format", "frozenset", "getattr", "globals", "hasattr",
            "hash", "help", "hex", "id", "input", "int", "isinstance",
            "issubclass", "iter", "len", "list", "locals", "map", "max",
            "memoryview", "min", "next", "object", "oct", "open", "ord", "pow",
            "print", "property", "range", "repr", "reversed", "round", "set",
            "setattr", "slice", "sorted", "staticmethod", "str", "sum", "super",
            "tuple", "type", "vars", "zip",
        ])
        .with_url("https://docs.python.org/3/library/functions.html#{FNAME}"),
        "color: #dc143c;",
    );

    // Decorators
    if let Ok(rule) = RegexpRule::new(0, r"@[A-Za-z_][\w.]*") {
        lang.add_regexp(rule, "color: #0000cd;");
    }

    lang.symbols = vec![
        '+', '-', '*', '/', '%', '&', '|', '^', '!', '<', '>', '=', '~', ':', ',', '@',
    ];

    if let Ok(splitter) = ObjectSplitter::new(1, ".") {
        lang.add_object_splitter(splitter, "color: black;");
    }

    lang.set_style(Category::CommentMulti, "color: #483d8b;");
    lang.set_style(Category::Escape, "color: #000099; font-weight: bold;");
    lang.set_style(Category::Bracket, "color: black;");
    lang.set_style(Category::String, "color: #483d8b;");
    lang.set_style(Category::Number, "color: #ff4500;");
    lang.set_style(Category::Symbol, "color: #66cc66;");

    lang
}
