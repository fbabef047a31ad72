//! Decoration of plain text runs
//!
//! The scanner hands every run of text that is neither a string nor a
//! comment to the [`Decorator`], which splits it into tokens with a fixed
//! pass order:
//!
//! 1. regexp rules, in definition order
//! 2. numeric literals
//! 3. keywords, group by group and word by word
//! 4. object member accesses
//! 5. brackets and symbols
//!
//! A run is held as a list of free and claimed pieces. Each pass only looks
//! at free pieces, so text claimed by an earlier pass is never decorated
//! again. Regexps run before keywords, so a regexp match wins any overlap.

use std::sync::OnceLock;

use regex::Regex;

use super::language::LanguageDefinition;
use super::rules::{KeywordGroup, RegexpRule};
use super::scanner::ScanOptions;
use super::tokens::{Category, Token};

/// Characters always treated as brackets
const BRACKETS: [char; 6] = ['(', ')', '[', ']', '{', '}'];

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[-+]?\b(?:[0-9]*\.)?[0-9]+\b").expect("number pattern is valid")
    })
}

/// A piece of a plain run during decoration
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    /// Text still open to later passes
    Free(String),
    /// Text claimed by a pass
    Claimed(Token),
}

impl Piece {
    fn into_token(self) -> Token {
        match self {
            Piece::Free(text) => Token::plain(text),
            Piece::Claimed(token) => token,
        }
    }
}

/// Whether the edges of a free piece are the edges of the whole run
///
/// An edge that touches a claimed piece is not a word boundary; an edge of
/// the run is.
#[derive(Debug, Clone, Copy)]
struct Edges {
    run_start: bool,
    run_end: bool,
}

/// Merge adjacent free pieces and drop empty ones
fn coalesce(pieces: Vec<Piece>) -> Vec<Piece> {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match &piece {
            Piece::Free(text) => {
                if text.is_empty() {
                    continue;
                }
                if let Some(Piece::Free(prev)) = out.last_mut() {
                    prev.push_str(text);
                    continue;
                }
            }
            Piece::Claimed(token) => {
                if token.text.is_empty() {
                    continue;
                }
            }
        }
        out.push(piece);
    }
    out
}

/// Rewrite every free piece with `f`, keeping claimed pieces as they are
fn map_free<F>(pieces: Vec<Piece>, mut f: F) -> Vec<Piece>
where
    F: FnMut(&str, Edges) -> Vec<Piece>,
{
    let count = pieces.len();
    let mut out = Vec::with_capacity(count);
    for (i, piece) in pieces.into_iter().enumerate() {
        match piece {
            Piece::Free(text) => {
                let edges = Edges {
                    run_start: i == 0,
                    run_end: i + 1 == count,
                };
                out.extend(f(&text, edges));
            }
            claimed => out.push(claimed),
        }
    }
    coalesce(out)
}

/// Claim every non-empty match of `pattern` as `category`
fn claim_matches(pattern: &Regex, text: &str, category: Category) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        if m.is_empty() {
            continue;
        }
        out.push(Piece::Free(text[last..m.start()].to_string()));
        out.push(Piece::Claimed(Token::styled(category, m.as_str())));
        last = m.end();
    }
    out.push(Piece::Free(text[last..].to_string()));
    out
}

fn is_boundary_before(text: &str, start: usize, run_start: bool) -> bool {
    match text[..start].chars().next_back() {
        None => run_start,
        Some(c) => !(c.is_alphanumeric() || matches!(c, '$' | '_' | '#')),
    }
}

fn is_boundary_after(text: &str, end: usize, run_end: bool) -> bool {
    match text[end..].chars().next() {
        None => run_end,
        Some(c) => !(c.is_alphanumeric() || matches!(c, '_' | '%' | '-')),
    }
}

/// Find whole-word occurrences of `word` in `text`
///
/// Case-insensitive matching folds ASCII letters only, which keeps byte
/// offsets identical between the folded and original text.
fn find_word(text: &str, word: &str, case_sensitive: bool, edges: Edges) -> Vec<(usize, usize)> {
    let folded;
    let (haystack, needle) = if case_sensitive {
        (text, word.to_string())
    } else {
        folded = text.to_ascii_lowercase();
        (folded.as_str(), word.to_ascii_lowercase())
    };

    let mut found = Vec::new();
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle.as_str()) {
        let start = from + offset;
        let end = start + needle.len();
        if is_boundary_before(text, start, edges.run_start)
            && is_boundary_after(text, end, edges.run_end)
        {
            found.push((start, end));
            from = end;
        } else {
            from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
        if from >= haystack.len() {
            break;
        }
    }
    found
}

/// Second-pass decorator for one language and one call
pub struct Decorator<'a> {
    lang: &'a LanguageDefinition,
    options: &'a ScanOptions,
}

impl<'a> Decorator<'a> {
    /// Create a decorator
    pub fn new(lang: &'a LanguageDefinition, options: &'a ScanOptions) -> Self {
        Self { lang, options }
    }

    fn enabled(&self, category: Category) -> bool {
        self.options.enabled.is_enabled(category)
    }

    /// Decorate a plain run into tokens
    pub fn decorate(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }

        let pieces = vec![Piece::Free(text.to_string())];
        let pieces = self.apply_regexps(pieces);
        let pieces = self.apply_numbers(pieces);
        let pieces = self.apply_keywords(pieces);
        let pieces = self.apply_methods(pieces);
        let pieces = self.apply_symbols(pieces);

        pieces.into_iter().map(Piece::into_token).collect()
    }

    fn apply_regexps(&self, mut pieces: Vec<Piece>) -> Vec<Piece> {
        for rule in &self.lang.regexps {
            if !self.enabled(Category::Regexp(rule.id)) {
                continue;
            }
            pieces = map_free(pieces, |text, _| split_regexp(rule, text));
        }
        pieces
    }

    fn apply_numbers(&self, pieces: Vec<Piece>) -> Vec<Piece> {
        if !self.enabled(Category::Number) {
            return pieces;
        }
        map_free(pieces, |text, _| {
            if !text.bytes().any(|b| b.is_ascii_digit()) {
                return vec![Piece::Free(text.to_string())];
            }
            claim_matches(number_pattern(), text, Category::Number)
        })
    }

    fn apply_keywords(&self, mut pieces: Vec<Piece>) -> Vec<Piece> {
        for group in &self.lang.keyword_groups {
            if !self.enabled(Category::Keyword(group.id)) {
                continue;
            }
            for word in group.words.iter().filter(|w| !w.is_empty()) {
                pieces = map_free(pieces, |text, edges| self.split_keyword(group, word, text, edges));
            }
        }
        pieces
    }

    fn split_keyword(&self, group: &KeywordGroup, word: &str, text: &str, edges: Edges) -> Vec<Piece> {
        let matches = find_word(text, word, group.case_sensitive, edges);
        if matches.is_empty() {
            return vec![Piece::Free(text.to_string())];
        }

        let mut out = Vec::with_capacity(matches.len() * 2 + 1);
        let mut last = 0;
        for (start, end) in matches {
            out.push(Piece::Free(text[last..start].to_string()));
            out.push(Piece::Claimed(self.keyword_token(group, &text[start..end])));
            last = end;
        }
        out.push(Piece::Free(text[last..].to_string()));
        out
    }

    fn keyword_token(&self, group: &KeywordGroup, matched: &str) -> Token {
        let token = Token::styled(Category::Keyword(group.id), self.options.case.apply(matched));
        match self.keyword_link(group, matched) {
            Some(href) => token.with_link(href),
            None => token,
        }
    }

    /// Build the link for a matched keyword
    ///
    /// `{FNAME}` takes the group's own spelling of the word, not the
    /// matched variant.
    fn keyword_link(&self, group: &KeywordGroup, matched: &str) -> Option<String> {
        if !self.options.keyword_links {
            return None;
        }
        let template = group.url.as_deref()?;
        let word = group.canonical(matched).unwrap_or(matched);
        let word = word.strip_prefix('<').unwrap_or(word);
        let word = word.strip_suffix('>').unwrap_or(word);
        if word.is_empty() {
            return None;
        }
        Some(template.replace("{FNAME}", word))
    }

    fn apply_methods(&self, mut pieces: Vec<Piece>) -> Vec<Piece> {
        if !self.lang.oo_lang {
            return pieces;
        }
        for splitter in &self.lang.object_splitters {
            let category = Category::Method(splitter.id);
            if !self.enabled(category) {
                continue;
            }
            pieces = map_free(pieces, |text, _| {
                if !text.contains(splitter.token.as_str()) {
                    return vec![Piece::Free(text.to_string())];
                }
                let mut out = Vec::new();
                let mut last = 0;
                for caps in splitter.pattern.captures_iter(text) {
                    let (Some(lead), Some(name)) = (caps.get(1), caps.get(2)) else {
                        continue;
                    };
                    out.push(Piece::Free(text[last..lead.end()].to_string()));
                    out.push(Piece::Claimed(Token::styled(category, name.as_str())));
                    last = name.end();
                }
                out.push(Piece::Free(text[last..].to_string()));
                out
            });
        }
        pieces
    }

    /// Split brackets and symbols into one token per character
    pub(crate) fn apply_symbols(&self, pieces: Vec<Piece>) -> Vec<Piece> {
        let brackets = self.enabled(Category::Bracket);
        let symbols = self.enabled(Category::Symbol);
        if !brackets && !symbols {
            return pieces;
        }

        map_free(pieces, |text, _| {
            let mut out = Vec::new();
            let mut run = String::new();
            for ch in text.chars() {
                let category = if BRACKETS.contains(&ch) {
                    brackets.then_some(Category::Bracket)
                } else if self.lang.symbols.contains(&ch) {
                    symbols.then_some(Category::Symbol)
                } else {
                    None
                };
                match category {
                    Some(category) => {
                        out.push(Piece::Free(std::mem::take(&mut run)));
                        out.push(Piece::Claimed(Token::styled(category, ch.to_string())));
                    }
                    None => run.push(ch),
                }
            }
            out.push(Piece::Free(run));
            out
        })
    }
}

/// Apply one regexp rule to a free piece
fn split_regexp(rule: &RegexpRule, text: &str) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in rule.pattern.captures_iter(text) {
        let Some(m) = caps.get(0) else {
            continue;
        };
        if m.is_empty() {
            continue;
        }
        out.push(Piece::Free(text[last..m.start()].to_string()));
        out.push(Piece::Free(RegexpRule::expand(&caps, &rule.before)));
        out.push(Piece::Claimed(Token::styled(
            Category::Regexp(rule.id),
            RegexpRule::expand(&caps, &rule.replace),
        )));
        out.push(Piece::Free(RegexpRule::expand(&caps, &rule.after)));
        last = m.end();
    }
    out.push(Piece::Free(text[last..].to_string()));
    out
}
