//! C/C++ language definition

use crate::syntax::language::LanguageDefinition;
use crate::syntax::rules::{KeywordGroup, ObjectSplitter, RegexpRule};
use crate::syntax::tokens::Category;

/// Create C language definition (also works for C++)
pub fn c_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("c", "C");
    lang.add_extension("c");
    lang.add_extension("h");
    lang.add_extension("cpp");
    lang.add_extension("hpp");
    lang.add_extension("cc");
    lang.add_extension("cxx");

    lang.add_comment_single(1, "//", "color: #808080; font-style: italic;");
    lang.add_comment_multi("/*", "*/");
    lang.quote_marks = vec!['\'', '"'];
    lang.escape_char = Some('\\');

    lang.add_keywords(
        KeywordGroup::new(1, &[
            "if", "return", "while", "case", "continue", "default", "do", "else",
            "for", "switch", "goto", "break",
        ]),
        "color: #b1b100;",
    );

    lang.add_keywords(
        KeywordGroup::new(2, &[
            "auto", "const", "enum", "extern", "inline", "register", "restrict",
            "sizeof", "static", "struct", "typedef", "union", "volatile",
            "_Alignas", "_Alignof", "_Atomic", "_Generic", "_Noreturn",
            "_Static_assert", "_Thread_local",
        ]),
        "color: #000000; font-weight: bold;",
    );

    lang.add_keywords(
        KeywordGroup::new(3, &[
            "char", "double", "float", "int", "long", "short", "signed", "unsigned",
            "void", "_Bool", "_Complex", "_Imaginary", "size_t", "ptrdiff_t",
            "intptr_t", "uintptr_t", "int8_t", "int16_t", "int32_t", "int64_t",
            "uint8_t", "uint16_t", "uint32_t", "uint64_t", "FILE",
        ]),
        "color: #993333;",
    );

    // C++ keywords
    lang.add_keywords(
        KeywordGroup::new(4, &[
            "alignas", "alignof", "bool", "catch", "class", "constexpr",
            "const_cast", "decltype", "delete", "dynamic_cast", "explicit",
            "export", "false", "friend", "mutable", "namespace", "new",
            "noexcept", "nullptr", "operator", "private", "protected", "public",
            "reinterpret_cast", "static_assert", "static_cast", "template",
            "this", "throw", "true", "try", "typeid", "typename", "using",
            "virtual", "NULL",
        ]),
        "color: #0000dd;",
    );

    // Preprocessor directives
    if let Ok(rule) = RegexpRule::with_modifiers(0, r"^[ \t]*#[ \t]*[a-z]+", "m") {
        lang.add_regexp(rule, "color: #339933;");
    }

    // Hex literals, which the number pass would split
    if let Ok(rule) = RegexpRule::new(1, r"\b0[xX][0-9a-fA-F]+[uUlL]*\b") {
        lang.add_regexp(rule, "color: #cc66cc;");
    }

    lang.symbols = vec![
        '+', '-', '*', '/', '%', '&', '|', '^', '!', '<', '>', '=', '~', '?', ':', ';', ',',
    ];

    if let Ok(splitter) = ObjectSplitter::new(1, ".") {
        lang.add_object_splitter(splitter, "color: #202020;");
    }
    if let Ok(splitter) = ObjectSplitter::new(2, "->") {
        lang.add_object_splitter(splitter, "color: #202020;");
    }
    if let Ok(splitter) = ObjectSplitter::new(3, "::") {
        lang.add_object_splitter(splitter, "color: #202020;");
    }

    lang.set_style(Category::CommentMulti, "color: #808080; font-style: italic;");
    lang.set_style(Category::Escape, "color: #000099; font-weight: bold;");
    lang.set_style(Category::Bracket, "color: #66cc66;");
    lang.set_style(Category::String, "color: #ff0000;");
    lang.set_style(Category::Number, "color: #cc66cc;");
    lang.set_style(Category::Symbol, "color: #66cc66;");

    lang
}
