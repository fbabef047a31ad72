//! Rust language definition

use crate::syntax::language::LanguageDefinition;
use crate::syntax::rules::{KeywordGroup, ObjectSplitter, RegexpRule};
use crate::syntax::tokens::Category;

/// Create Rust language definition
pub fn rust_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("rust", "Rust");
    lang.add_extension("rs");
    lang.tab_width = 4;

    // Doc comments first so `///` wins over `//`
    lang.add_comment_single(2, "///", "color: #3d7b3d; font-style: italic;");
    lang.add_comment_single(1, "//", "color: #808080; font-style: italic;");
    lang.add_comment_multi("/*", "*/");
    // `'` opens lifetimes too, so character literals are a regexp
    lang.quote_marks = vec!['"'];
    lang.escape_char = Some('\\');

    lang.add_keywords(
        KeywordGroup::new(1, &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn",
            "else", "enum", "extern", "fn", "for", "if", "impl", "in", "let",
            "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
            "static", "struct", "super", "trait", "type", "union", "unsafe",
            "use", "where", "while",
        ]),
        "color: #0000ff; font-weight: bold;",
    );

    lang.add_keywords(
        KeywordGroup::new(2, &["true", "false", "self", "Self", "Some", "None", "Ok", "Err"]),
        "color: #b13366;",
    );

    lang.add_keywords(
        KeywordGroup::new(3, &[
            "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8",
            "i16", "i32", "i64", "i128", "isize", "f32", "f64",
        ]),
        "color: #993333;",
    );

    lang.add_keywords(
        KeywordGroup::new(4, &[
            "String", "Vec", "Box", "Rc", "Arc", "Option", "Result", "HashMap",
            "HashSet", "BTreeMap", "BTreeSet",
        ])
        .with_url("https://doc.rust-lang.org/std/?search={FNAME}"),
        "color: #2b91af;",
    );

    // Character literals, then lifetimes
    if let Ok(rule) = RegexpRule::new(0, r"'(?:[^'\\\n]|\\.)'") {
        lang.add_regexp(rule, "color: #ff0000;");
    }
    if let Ok(rule) = RegexpRule::new(1, r"'[A-Za-z_]\w*") {
        lang.add_regexp(rule, "color: #a0522d;");
    }

    // Macros (ending with !)
    if let Ok(rule) = RegexpRule::new(2, r"\b[A-Za-z_]\w*!") {
        lang.add_regexp(rule, "color: #6f42c1;");
    }

    // Attributes
    if let Ok(rule) = RegexpRule::new(3, r"#!?\[[A-Za-z_][\w:]*") {
        lang.add_regexp(rule, "color: #808030;");
    }

    lang.symbols = vec![
        '+', '-', '*', '/', '%', '&', '|', '^', '!', '<', '>', '=', '?', ':', ';', ',', '@',
    ];

    if let Ok(splitter) = ObjectSplitter::new(1, ".") {
        lang.add_object_splitter(splitter, "color: #006600;");
    }
    if let Ok(splitter) = ObjectSplitter::new(2, "::") {
        lang.add_object_splitter(splitter, "color: #006600;");
    }

    lang.set_style(Category::CommentMulti, "color: #808080; font-style: italic;");
    lang.set_style(Category::Escape, "color: #000099; font-weight: bold;");
    lang.set_style(Category::Bracket, "color: #66cc66;");
    lang.set_style(Category::String, "color: #ff0000;");
    lang.set_style(Category::Number, "color: #cc66cc;");
    lang.set_style(Category::Symbol, "color: #66cc66;");

    lang
}
