//! Character scanner
//!
//! First pass of highlighting. The scanner walks the source once with an
//! explicit [`ScanState`], cutting out strings, escape sequences and comments.
//! Everything else is collected into plain runs which are handed to the
//! [`Decorator`] as soon as a string or comment begins.
//!
//! In strict mode the source is first partitioned into script regions by the
//! language's script delimiters; only the regions are scanned.

use super::decorator::Decorator;
use super::language::LanguageDefinition;
use super::rules::ScriptDelimiter;
use super::style::CaseConversion;
use super::tokens::{Block, Category, EnabledCategories, Token};

/// Per-call options for scanning and decoration
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Categories to highlight
    pub enabled: EnabledCategories,
    /// Case policy applied to keywords and comment markers
    pub case: CaseConversion,
    /// Whether keywords with a URL template become links
    pub keyword_links: bool,
    /// Whether the source is partitioned by script delimiters
    pub strict: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            enabled: EnabledCategories::all(),
            case: CaseConversion::None,
            keyword_links: true,
            strict: false,
        }
    }
}

/// Scanner state between two steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState<'a> {
    /// Plain code
    Normal,
    /// Inside a string opened by `quote`
    InString { quote: char },
    /// Right after an escape character inside a string
    InEscape { quote: char },
    /// Inside a hard-quoted string, which only `close` ends
    InHardString { close: &'a str },
    /// Inside a comment; `inclusive` comments swallow their close marker
    InComment { close: &'a str, inclusive: bool },
}

/// Output under construction
#[derive(Debug, Default)]
struct ScanOutput {
    /// Pending plain text, not yet decorated
    plain: String,
    /// String, escape or comment token being built
    current: Option<Token>,
    tokens: Vec<Token>,
}

impl ScanOutput {
    fn flush_plain(&mut self, decorator: &Decorator<'_>) {
        if !self.plain.is_empty() {
            let plain = std::mem::take(&mut self.plain);
            self.tokens.extend(decorator.decorate(&plain));
        }
    }

    fn open(&mut self, category: Option<Category>, text: &str) {
        self.close_current();
        self.current = Some(Token {
            category,
            text: text.to_string(),
            link: None,
        });
    }

    fn push(&mut self, text: &str) {
        match self.current.as_mut() {
            Some(token) => token.text.push_str(text),
            None => self.current = Some(Token::plain(text)),
        }
    }

    fn close_current(&mut self) {
        if let Some(token) = self.current.take() {
            if !token.text.is_empty() {
                self.tokens.push(token);
            }
        }
    }

    fn finish(mut self, decorator: &Decorator<'_>) -> Vec<Token> {
        self.flush_plain(decorator);
        self.close_current();
        self.tokens
    }
}

fn first_char(rest: &str) -> (char, usize) {
    rest.chars()
        .next()
        .map_or(('\0', rest.len().max(1)), |c| (c, c.len_utf8()))
}

/// Single-pass scanner for one language and one call
pub struct Scanner<'a> {
    lang: &'a LanguageDefinition,
    options: &'a ScanOptions,
    decorator: Decorator<'a>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner
    pub fn new(lang: &'a LanguageDefinition, options: &'a ScanOptions) -> Self {
        Self {
            lang,
            options,
            decorator: Decorator::new(lang, options),
        }
    }

    /// Scan source text into blocks
    ///
    /// Without strict mode the result is a single block. Newlines must
    /// already be normalized to `\n`.
    pub fn scan(&self, source: &str) -> Vec<Block> {
        if !self.options.strict || self.lang.script_delimiters.is_empty() {
            return vec![Block {
                script: None,
                tokens: self.scan_code(source),
            }];
        }

        let regions = self.partition(source);
        tracing::trace!(
            language = %self.lang.id,
            regions = regions.len(),
            "partitioned source by script delimiters"
        );

        regions
            .into_iter()
            .map(|(delimiter, text)| match delimiter {
                Some(d) if d.highlight => Block {
                    script: Some(d.id),
                    tokens: self.scan_code(text),
                },
                Some(d) => Block {
                    script: Some(d.id),
                    tokens: vec![Token::plain(text)],
                },
                None => Block {
                    script: None,
                    tokens: vec![Token::plain(text)],
                },
            })
            .collect()
    }

    /// Split source into outside regions and delimited script regions
    ///
    /// A region includes its delimiters. The earliest open marker wins, and
    /// on a tie the delimiter listed first. An unclosed region runs to the
    /// end of the source.
    fn partition<'s>(&self, source: &'s str) -> Vec<(Option<&'a ScriptDelimiter>, &'s str)> {
        let mut regions = Vec::new();
        let mut rest = source;

        while !rest.is_empty() {
            let next = self
                .lang
                .script_delimiters
                .iter()
                .filter(|d| !d.open.is_empty())
                .filter_map(|d| rest.find(d.open.as_str()).map(|start| (start, d)))
                .min_by_key(|(start, _)| *start);

            let Some((start, delimiter)) = next else {
                regions.push((None, rest));
                break;
            };

            if start > 0 {
                regions.push((None, &rest[..start]));
            }
            let body = start + delimiter.open.len();
            let end = rest[body..]
                .find(delimiter.close.as_str())
                .map_or(rest.len(), |i| body + i + delimiter.close.len());
            regions.push((Some(delimiter), &rest[start..end]));
            rest = &rest[end..];
        }

        regions
    }

    fn enabled(&self, category: Category) -> bool {
        self.options.enabled.is_enabled(category)
    }

    /// The category to use for a construct, or none when it is disabled
    fn styled_if(&self, category: Category) -> Option<Category> {
        self.enabled(category).then_some(category)
    }

    /// Scan one region of code into tokens
    fn scan_code(&self, text: &str) -> Vec<Token> {
        let mut out = ScanOutput::default();
        let mut state = ScanState::Normal;
        let mut pos = 0;

        while pos < text.len() {
            let (next, consumed) = self.step(state, &text[pos..], &mut out);
            state = next;
            pos += consumed;
        }

        out.finish(&self.decorator)
    }

    fn match_comment_multi(&self, rest: &str) -> Option<(&'a str, &'a str)> {
        self.lang
            .comment_multi
            .iter()
            .find(|(open, _)| !open.is_empty() && rest.starts_with(open.as_str()))
            .map(|(open, close)| (open.as_str(), close.as_str()))
    }

    fn match_comment_single(&self, rest: &str) -> Option<(usize, usize)> {
        self.lang
            .comment_single
            .iter()
            .find(|(_, marker)| {
                if marker.is_empty() {
                    false
                } else if self.lang.comment_case_sensitive {
                    rest.starts_with(marker.as_str())
                } else {
                    rest.get(..marker.len())
                        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker))
                }
            })
            .map(|(id, marker)| (*id, marker.len()))
    }

    fn match_hard_quote(&self, rest: &str) -> Option<(&'a str, &'a str)> {
        let (open, close) = self.lang.hard_quote.as_ref()?;
        let usable = !open.is_empty() && !close.is_empty() && self.enabled(Category::String);
        (usable && rest.starts_with(open.as_str())).then(|| (open.as_str(), close.as_str()))
    }

    /// Advance one step from `state`
    ///
    /// Returns the next state and the number of bytes consumed. A step may
    /// consume nothing only when it leaves a state, so the loop always
    /// makes progress.
    fn step(&self, state: ScanState<'a>, rest: &str, out: &mut ScanOutput) -> (ScanState<'a>, usize) {
        match state {
            ScanState::Normal => {
                if let Some((open, close)) = self.match_comment_multi(rest) {
                    out.flush_plain(&self.decorator);
                    out.open(self.styled_if(Category::CommentMulti), open);
                    return (ScanState::InComment { close, inclusive: true }, open.len());
                }

                if let Some((id, len)) = self.match_comment_single(rest) {
                    out.flush_plain(&self.decorator);
                    let marker = self.options.case.apply(&rest[..len]);
                    out.open(self.styled_if(Category::Comment(id)), &marker);
                    return (ScanState::InComment { close: "\n", inclusive: false }, len);
                }

                if let Some((open, close)) = self.match_hard_quote(rest) {
                    out.flush_plain(&self.decorator);
                    out.open(Some(Category::String), open);
                    return (ScanState::InHardString { close }, open.len());
                }

                let (ch, len) = first_char(rest);
                if self.lang.quote_marks.contains(&ch) && self.enabled(Category::String) {
                    out.flush_plain(&self.decorator);
                    out.open(Some(Category::String), &rest[..len]);
                    return (ScanState::InString { quote: ch }, len);
                }

                out.plain.push_str(&rest[..len]);
                (ScanState::Normal, len)
            }

            ScanState::InString { quote } => {
                let (ch, len) = first_char(rest);
                if Some(ch) == self.lang.escape_char {
                    if self.enabled(Category::Escape) {
                        out.open(Some(Category::Escape), &rest[..len]);
                        return (ScanState::InEscape { quote }, len);
                    }
                    // Escapes stay in the string, but still protect the next character
                    let (_, next_len) = first_char(&rest[len..]);
                    let end = (len + next_len).min(rest.len());
                    out.push(&rest[..end]);
                    return (ScanState::InString { quote }, end);
                }

                out.push(&rest[..len]);
                if ch == quote {
                    out.close_current();
                    return (ScanState::Normal, len);
                }
                (ScanState::InString { quote }, len)
            }

            ScanState::InEscape { quote } => {
                let (ch, len) = first_char(rest);
                if ch == '\n' {
                    out.open(Some(Category::String), "");
                    return (ScanState::InString { quote }, 0);
                }
                out.push(&rest[..len]);
                out.open(Some(Category::String), "");
                (ScanState::InString { quote }, len)
            }

            ScanState::InHardString { close } => {
                if let Some(escape) = self
                    .lang
                    .hard_escapes
                    .iter()
                    .find(|e| !e.is_empty() && rest.starts_with(e.as_str()))
                {
                    if self.enabled(Category::Escape) {
                        out.open(Some(Category::Escape), escape);
                        out.open(Some(Category::String), "");
                    } else {
                        out.push(escape);
                    }
                    return (ScanState::InHardString { close }, escape.len());
                }

                if rest.starts_with(close) {
                    out.push(close);
                    out.close_current();
                    return (ScanState::Normal, close.len());
                }

                let (_, len) = first_char(rest);
                out.push(&rest[..len]);
                (ScanState::InHardString { close }, len)
            }

            ScanState::InComment { close, inclusive } => match rest.find(close) {
                Some(i) if inclusive => {
                    let end = i + close.len();
                    out.push(&rest[..end]);
                    out.close_current();
                    (ScanState::Normal, end)
                }
                Some(i) => {
                    out.push(&rest[..i]);
                    out.close_current();
                    (ScanState::Normal, i)
                }
                None => {
                    out.push(rest);
                    (ScanState::InComment { close, inclusive }, rest.len())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::{KeywordGroup, ScriptDelimiter};

    fn create_test_language() -> LanguageDefinition {
        let mut lang = LanguageDefinition::new("test", "Test");
        lang.add_comment_single(1, "//", "color: gray;");
        lang.add_comment_single(2, "rem", "color: silver;");
        lang.add_comment_multi("/*", "*/");
        lang.quote_marks = vec!['\'', '"'];
        lang.escape_char = Some('\\');
        lang.add_keywords(KeywordGroup::new(1, &["if"]), "color: blue;");
        lang
    }

    fn scan_tokens(lang: &LanguageDefinition, options: &ScanOptions, text: &str) -> Vec<Token> {
        Scanner::new(lang, options)
            .scan(text)
            .into_iter()
            .flat_map(|b| b.tokens)
            .collect()
    }

    fn summary(tokens: &[Token]) -> Vec<(Option<String>, &str)> {
        tokens
            .iter()
            .map(|t| (t.category.map(|c| c.class_name()), t.text.as_str()))
            .collect()
    }

    fn class(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    #[test]
    fn test_strings_and_comments() {
        let lang = create_test_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, "if \"a\" // x\n/* y */");
        assert_eq!(
            summary(&tokens),
            vec![
                (class("kw1"), "if"),
                (None, " "),
                (class("st0"), "\"a\""),
                (None, " "),
                (class("co1"), "// x"),
                (None, "\n"),
                (class("coMULTI"), "/* y */"),
            ]
        );
    }

    #[test]
    fn test_escape_inside_string() {
        let lang = create_test_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, r#""a\"b""#);
        assert_eq!(
            summary(&tokens),
            vec![
                (class("st0"), "\"a"),
                (class("es0"), "\\\""),
                (class("st0"), "b\""),
            ]
        );
    }

    #[test]
    fn test_escaped_newline_not_in_escape_token() {
        let lang = create_test_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, "'a\\\nb'");
        assert_eq!(
            summary(&tokens),
            vec![
                (class("st0"), "'a"),
                (class("es0"), "\\"),
                (class("st0"), "\nb'"),
            ]
        );
    }

    #[test]
    fn test_escape_disabled_still_protects_quote() {
        let lang = create_test_language();
        let options = ScanOptions {
            enabled: EnabledCategories::all().without(Category::Escape),
            ..ScanOptions::default()
        };
        let tokens = scan_tokens(&lang, &options, r#""a\"b" c"#);
        assert_eq!(summary(&tokens), vec![(class("st0"), r#""a\"b""#), (None, " c")]);
    }

    #[test]
    fn test_other_quote_does_not_close() {
        let lang = create_test_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, r#"'say "hi"' x"#);
        assert_eq!(tokens[0].text, r#"'say "hi"'"#);
        assert_eq!(tokens[0].category, Some(Category::String));
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let lang = create_test_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, "a 'b");
        assert_eq!(summary(&tokens), vec![(None, "a "), (class("st0"), "'b")]);
    }

    fn create_hard_quote_language() -> LanguageDefinition {
        let mut lang = create_test_language();
        lang.set_hard_quote("@\"", "\"", &["\"\""]);
        lang
    }

    #[test]
    fn test_hard_quote_ignores_escape_char() {
        let lang = create_hard_quote_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, r#"@"a\" b"#);
        assert_eq!(summary(&tokens), vec![(class("st0"), r#"@"a\""#), (None, " b")]);
    }

    #[test]
    fn test_hard_escape_inside_hard_quote() {
        let lang = create_hard_quote_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, r#"@"a""b" x"#);
        assert_eq!(
            summary(&tokens),
            vec![
                (class("st0"), "@\"a"),
                (class("es0"), "\"\""),
                (class("st0"), "b\""),
                (None, " x"),
            ]
        );

        let options = ScanOptions {
            enabled: EnabledCategories::all().without(Category::Escape),
            ..ScanOptions::default()
        };
        let tokens = scan_tokens(&lang, &options, r#"@"a""b" x"#);
        assert_eq!(summary(&tokens), vec![(class("st0"), r#"@"a""b""#), (None, " x")]);
    }

    #[test]
    fn test_unterminated_hard_quote_runs_to_end() {
        let lang = create_hard_quote_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, "x @\"never\\ closed\nif");
        assert_eq!(
            summary(&tokens),
            vec![(None, "x "), (class("st0"), "@\"never\\ closed\nif")]
        );
    }

    #[test]
    fn test_plain_quote_still_escapes_with_hard_quotes() {
        let lang = create_hard_quote_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, r#""a\"b""#);
        assert_eq!(
            summary(&tokens),
            vec![
                (class("st0"), "\"a"),
                (class("es0"), "\\\""),
                (class("st0"), "b\""),
            ]
        );
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let lang = create_test_language();
        let options = ScanOptions::default();
        let tokens = scan_tokens(&lang, &options, "x /* never closed\nif");
        assert_eq!(
            summary(&tokens),
            vec![(None, "x "), (class("coMULTI"), "/* never closed\nif")]
        );
    }

    #[test]
    fn test_comment_marker_case() {
        let mut lang = create_test_language();
        let options = ScanOptions {
            case: CaseConversion::Upper,
            ..ScanOptions::default()
        };

        // Case-sensitive markers: "REM" is not a comment
        let tokens = scan_tokens(&lang, &options, "REM x");
        assert!(tokens.iter().all(|t| t.category != Some(Category::Comment(2))));

        lang.comment_case_sensitive = false;
        let tokens = scan_tokens(&lang, &options, "Rem x\ny");
        assert_eq!(tokens[0].text, "REM x");
        assert_eq!(tokens[0].category, Some(Category::Comment(2)));
    }

    #[test]
    fn test_disabled_categories_are_unstyled() {
        let lang = create_test_language();
        let options = ScanOptions {
            enabled: EnabledCategories::all()
                .without(Category::CommentMulti)
                .without(Category::String),
            ..ScanOptions::default()
        };
        let tokens = scan_tokens(&lang, &options, "/* if */ \"if\"");
        assert_eq!(tokens[0], Token::plain("/* if */"));
        // Strings off: the text is decorated like any other code
        assert!(tokens
            .iter()
            .any(|t| t.category == Some(Category::Keyword(1)) && t.text == "if"));
        assert!(tokens.iter().all(|t| t.category != Some(Category::String)));
    }

    #[test]
    fn test_text_is_preserved() {
        let lang = create_test_language();
        let options = ScanOptions::default();
        let source = "if 'x\\'y' /* a\nb */ // c\n\"\\";
        let tokens = scan_tokens(&lang, &options, source);
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn test_strict_partition() {
        let mut lang = create_test_language();
        lang.add_script_delimiter(ScriptDelimiter::new(0, "<?", "?>"), "background: #eee;");
        lang.add_script_delimiter(
            ScriptDelimiter::new(1, "<!", "!>").highlighted(false),
            "",
        );
        let options = ScanOptions {
            strict: true,
            ..ScanOptions::default()
        };
        let blocks = Scanner::new(&lang, &options).scan("a<? if ?>b<! if !>c<? open");

        let shape: Vec<(Option<usize>, String)> =
            blocks.iter().map(|b| (b.script, b.text())).collect();
        assert_eq!(
            shape,
            vec![
                (None, "a".to_string()),
                (Some(0), "<? if ?>".to_string()),
                (None, "b".to_string()),
                (Some(1), "<! if !>".to_string()),
                (None, "c".to_string()),
                (Some(0), "<? open".to_string()),
            ]
        );
        assert!(blocks[1]
            .tokens
            .iter()
            .any(|t| t.category == Some(Category::Keyword(1))));
        assert!(blocks[3].tokens.iter().all(|t| t.is_plain()));
    }

    #[test]
    fn test_empty_source() {
        let lang = create_test_language();
        let options = ScanOptions::default();
        let blocks = Scanner::new(&lang, &options).scan("");
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].tokens.is_empty());
    }
}
