//! Markup rendering
//!
//! Turns scanned blocks into HTML. Rendering runs in two stages:
//!
//! 1. token markup: every styled token becomes one `<span>` per line piece,
//!    so no span ever crosses a newline
//! 2. finalising: whitespace preservation (outside `<pre>`), empty span
//!    removal, line segmentation with optional numbering, then the
//!    container header and footer
//!
//! Styles resolve here and nowhere else: a category maps to a class name
//! when the config uses classes, otherwise to its (possibly overridden)
//! inline style.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use unicode_width::UnicodeWidthChar;

use crate::config::{HeaderKind, LineNumbers, RenderConfig};
use crate::syntax::{Block, Category, LanguageDefinition, Token};

/// Escape text for HTML (`&`, `"`, `<`, `>`)
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap every non-empty line piece of `text` in `open`/`close`
fn wrap_lines(text: &str, open: &str, close: &str) -> String {
    text.split('\n')
        .map(|piece| {
            if piece.is_empty() {
                String::new()
            } else {
                format!("{}{}{}", open, piece, close)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn empty_span_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<span[^>]+>(\s*)</span>").expect("span pattern is valid"))
}

fn empty_div_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<div[^>]+>(\s*)</div>").expect("div pattern is valid"))
}

/// Remove styled elements that hold only whitespace
fn purge_empty(code: &str) -> String {
    let code = empty_span_pattern().replace_all(code, "$1");
    empty_div_pattern().replace_all(&code, "$1").into_owned()
}

/// Expand tabs and protect runs of spaces in one line of markup
///
/// Columns are counted on visible text only: tags take no room, an entity
/// takes one column and other characters take their display width. Tabs
/// become alternating `&nbsp;` and spaces up to the next tab stop. A space
/// at the start of the line, or following another plain space, becomes
/// `&nbsp;`.
fn expand_line(line: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    let mut in_tag = false;
    let mut at_line_start = true;
    let mut prev_space = false;

    let mut chars = line.char_indices();
    while let Some((i, c)) = chars.next() {
        if in_tag {
            out.push(c);
            if c == '>' {
                in_tag = false;
            }
            continue;
        }

        match c {
            '<' => {
                in_tag = true;
                out.push(c);
            }
            '&' => {
                let entity_len = line[i..]
                    .char_indices()
                    .take(10)
                    .find(|(_, ch)| *ch == ';')
                    .map(|(j, _)| j + 1);
                match entity_len {
                    Some(len) => {
                        out.push_str(&line[i..i + len]);
                        // skip the rest of the entity
                        for _ in 1..line[i..i + len].chars().count() {
                            chars.next();
                        }
                    }
                    None => out.push('&'),
                }
                column += 1;
                at_line_start = false;
                prev_space = false;
            }
            '\t' => {
                let width = tab_width - column % tab_width;
                for k in 0..width {
                    out.push_str(if k % 2 == 0 { "&nbsp;" } else { " " });
                }
                column += width;
                prev_space = width % 2 == 0;
                at_line_start = false;
            }
            ' ' => {
                if at_line_start || prev_space {
                    out.push_str("&nbsp;");
                    prev_space = false;
                } else {
                    out.push(' ');
                    prev_space = true;
                }
                column += 1;
                at_line_start = false;
            }
            _ => {
                out.push(c);
                column += c.width().unwrap_or(0);
                at_line_start = false;
                prev_space = false;
            }
        }
    }
    out
}

fn trim_trailing(code: &str) -> &str {
    code.trim_end_matches([' ', '\t', '\n', '\r', '\0', '\x0B'])
}

/// Renders blocks of tokens for one language and one config
pub struct Renderer<'a> {
    lang: &'a LanguageDefinition,
    config: &'a RenderConfig,
}

impl<'a> Renderer<'a> {
    /// Create a renderer
    pub fn new(lang: &'a LanguageDefinition, config: &'a RenderConfig) -> Self {
        Self { lang, config }
    }

    /// Render scanned blocks into the final markup
    pub fn render(&self, blocks: &[Block], elapsed: Duration) -> String {
        self.finalise(&self.blocks_markup(blocks), elapsed)
    }

    /// Render source that is only escaped, never highlighted
    pub fn render_plain(&self, source: &str, elapsed: Duration) -> String {
        self.finalise(&escape_html(source), elapsed)
    }

    /// The effective tab width
    pub fn tab_width(&self) -> usize {
        self.config.tab_width.unwrap_or(self.lang.tab_width).max(1)
    }

    /// The style text of a category, after config overrides
    pub fn style_for(&self, category: Category) -> &str {
        self.config
            .style_override(&self.lang.class_name(category))
            .unwrap_or_else(|| self.lang.styles.get(category))
    }

    fn category_attr(&self, category: Category) -> String {
        if self.config.use_classes {
            format!(" class=\"{}\"", self.lang.class_name(category))
        } else {
            format!(" style=\"{}\"", self.style_for(category))
        }
    }

    fn blocks_markup(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        for block in blocks {
            let markup: String = block.tokens.iter().map(|t| self.token_markup(t)).collect();
            match block.script {
                Some(id) if self.script_wrapped(id) => {
                    let open = format!("<span{}>", self.category_attr(Category::Script(id)));
                    out.push_str(&wrap_lines(&markup, &open, "</span>"));
                }
                _ => out.push_str(&markup),
            }
        }
        out
    }

    fn script_wrapped(&self, id: usize) -> bool {
        let category = Category::Script(id);
        self.config.disabled.is_enabled(category) && !self.style_for(category).is_empty()
    }

    fn token_markup(&self, token: &Token) -> String {
        let Some(category) = token.category else {
            return escape_html(&token.text);
        };

        let inner = match category {
            Category::Bracket | Category::Symbol => token
                .text
                .chars()
                .map(|c| format!("&#{};", u32::from(c)))
                .collect(),
            _ => escape_html(&token.text),
        };
        let open = format!("<span{}>", self.category_attr(category));
        let styled = wrap_lines(&inner, &open, "</span>");

        match &token.link {
            Some(href) => self.link_markup(href, &styled),
            None => styled,
        }
    }

    fn link_markup(&self, href: &str, inner: &str) -> String {
        let mut open = format!("<a href=\"{}\"", escape_html(href));
        if let Some(target) = self.config.link_target.as_deref().filter(|t| !t.is_empty()) {
            open.push_str(&format!(" target=\"{}\"", escape_html(target)));
        }
        let style = &self.config.link_styles.link;
        if !self.config.use_classes && !style.is_empty() {
            open.push_str(&format!(" style=\"{}\"", style));
        }
        format!("{}>{}</a>", open, inner)
    }

    /// Preserve whitespace for containers other than `<pre>`
    fn indent(&self, code: &str) -> String {
        let tab_width = self.tab_width();
        let newline = if self.config.line_numbers.is_enabled() {
            "\n"
        } else {
            "<br />\n"
        };
        code.split('\n')
            .map(|line| expand_line(line, tab_width))
            .collect::<Vec<_>>()
            .join(newline)
    }

    fn finalise(&self, code: &str, elapsed: Duration) -> String {
        let code = if self.config.header == HeaderKind::Pre {
            code.to_string()
        } else {
            self.indent(code)
        };
        let code = purge_empty(&code);

        let body = if self.config.line_numbers.is_enabled() {
            self.numbered_lines(&code)
        } else {
            self.plain_lines(&code)
        };

        format!(
            "{}{}{}",
            self.header(elapsed),
            trim_trailing(&body),
            self.footer(elapsed)
        )
    }

    /// Id prefix for line ids
    fn line_id_prefix(&self) -> &str {
        self.config.overall_id.as_deref().unwrap_or(&self.lang.id)
    }

    fn numbered_lines(&self, code: &str) -> String {
        let config = self.config;
        let separator = if config.header == HeaderKind::Pre { "" } else { "\n" };
        let mut out = String::with_capacity(code.len() * 2);

        for (i, line) in code.split('\n').enumerate() {
            let number = i + 1;
            let line = if line.trim().is_empty() { "&nbsp;" } else { line };
            let fancy = matches!(config.line_numbers, LineNumbers::Fancy(nth) if i % nth == nth - 1);

            let mut classes: Vec<&str> = Vec::new();
            let mut styles: Vec<&str> = Vec::new();
            let code_attr = match (fancy, config.use_classes) {
                (true, true) => {
                    classes.push("li2");
                    " class=\"de2\"".to_string()
                }
                (false, true) => {
                    classes.push("li1");
                    " class=\"de1\"".to_string()
                }
                (true, false) => {
                    styles.push(&config.fancy_line_style);
                    format!(" style=\"{}\"", config.code_style)
                }
                (false, false) => {
                    styles.push(&config.line_style);
                    format!(" style=\"{}\"", config.code_style)
                }
            };

            if config.extra_lines.contains(&number) {
                if config.use_classes {
                    classes.push("ln-xtra");
                } else {
                    styles.push(&config.extra_line_style);
                }
            }

            let mut attrs = String::new();
            if !classes.is_empty() {
                attrs.push_str(&format!(" class=\"{}\"", classes.join(" ")));
            }
            if !styles.is_empty() {
                attrs.push_str(&format!(" style=\"{}\"", styles.join(" ")));
            }
            if config.line_ids {
                attrs.push_str(&format!(" id=\"{}-{}\"", self.line_id_prefix(), number));
            }

            out.push_str(&format!(
                "<li{}><div{}>{}</div></li>{}",
                attrs, code_attr, line, separator
            ));
        }
        out
    }

    fn plain_lines(&self, code: &str) -> String {
        let config = self.config;
        let mut out = String::with_capacity(code.len());

        for (i, line) in code.split('\n').enumerate() {
            let line = if line.trim().is_empty() { "&nbsp;" } else { line };
            if config.extra_lines.contains(&(i + 1)) {
                if config.use_classes {
                    out.push_str("<div class=\"ln-xtra\">");
                } else {
                    out.push_str(&format!("<div style=\"{}\">", config.extra_line_style));
                }
                out.push_str(line);
                out.push_str("</div>");
            } else {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    fn container_attributes(&self) -> String {
        let config = self.config;
        let mut attrs = String::new();
        let class = config.overall_class.as_deref().unwrap_or(&self.lang.id);
        if !class.is_empty() {
            attrs.push_str(&format!(" class=\"{}\"", class));
        }
        if let Some(id) = config.overall_id.as_deref().filter(|id| !id.is_empty()) {
            attrs.push_str(&format!(" id=\"{}\"", id));
        }
        let style = config.effective_overall_style();
        if !style.is_empty() {
            attrs.push_str(&format!(" style=\"{}\"", style));
        }
        attrs
    }

    /// Substitute `{TIME}`, `{LANGUAGE}` and `{VERSION}` (or `<...>`)
    fn replace_keywords(&self, content: &str, elapsed: Duration) -> String {
        let time = format!("{:.3}", elapsed.as_secs_f64());
        let version = env!("CARGO_PKG_VERSION");
        content
            .replace("<TIME>", &time)
            .replace("{TIME}", &time)
            .replace("<LANGUAGE>", &self.lang.id)
            .replace("{LANGUAGE}", &self.lang.id)
            .replace("<VERSION>", version)
            .replace("{VERSION}", version)
    }

    fn format_content(&self, content: &str, class: &str, style: &str, elapsed: Duration) -> String {
        if content.is_empty() {
            return String::new();
        }
        let content = if self.config.header == HeaderKind::Pre {
            content.replace('\n', "")
        } else {
            content.to_string()
        };
        let content = self.replace_keywords(&content, elapsed);
        if self.config.use_classes {
            format!("<div class=\"{}\">{}</div>", class, content)
        } else {
            format!("<div style=\"{}\">{}</div>", style, content)
        }
    }

    fn header(&self, elapsed: Duration) -> String {
        let config = self.config;
        let content =
            self.format_content(&config.header_content, "head", &config.header_style, elapsed);
        let ol = if config.start_line != 1 {
            format!("<ol start=\"{}\">", config.start_line)
        } else {
            "<ol>".to_string()
        };
        let inner = if config.line_numbers.is_enabled() {
            ol
        } else if config.force_code_block {
            "<div>".to_string()
        } else {
            String::new()
        };

        match config.header {
            HeaderKind::None => format!("{}{}", content, inner),
            HeaderKind::Div => format!("<div{}>{}{}", self.container_attributes(), content, inner),
            HeaderKind::Pre => format!("<pre{}>{}{}", self.container_attributes(), content, inner),
        }
    }

    fn footer(&self, elapsed: Duration) -> String {
        let config = self.config;
        let content =
            self.format_content(&config.footer_content, "foot", &config.footer_style, elapsed);
        let inner = if config.line_numbers.is_enabled() {
            "</ol>"
        } else if config.force_code_block {
            "</div>"
        } else {
            ""
        };

        match config.header {
            HeaderKind::None => format!("{}{}", inner, content),
            HeaderKind::Div => format!("{}{}</div>", inner, content),
            HeaderKind::Pre => format!("{}{}</pre>", inner, content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_language() -> LanguageDefinition {
        let mut lang = LanguageDefinition::new("test", "Test");
        lang.set_style(Category::Keyword(1), "color: blue;");
        lang.set_style(Category::String, "color: red;");
        lang.set_style(Category::Bracket, "color: green;");
        lang
    }

    fn block(tokens: Vec<Token>) -> Vec<Block> {
        vec![Block {
            script: None,
            tokens,
        }]
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && \"c\" > 'd'"), "a &lt; b &amp;&amp; &quot;c&quot; &gt; 'd'");
    }

    #[test]
    fn test_wrap_lines() {
        assert_eq!(wrap_lines("a\n\nb", "<s>", "</s>"), "<s>a</s>\n\n<s>b</s>");
    }

    #[test]
    fn test_purge_empty() {
        assert_eq!(
            purge_empty("<span style=\"x\"> </span>a<div class=\"y\"></div>"),
            " a"
        );
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_line("\tx", 4), "&nbsp; &nbsp;x");
        assert_eq!(expand_line("ab\tx", 4), "ab&nbsp; x");
        // tags take no columns, entities take one
        assert_eq!(expand_line("<b>a</b>\tx", 4), "<b>a</b>&nbsp; &nbsp;x");
        assert_eq!(expand_line("&lt;\tx", 4), "&lt;&nbsp; &nbsp;x");
    }

    #[test]
    fn test_expand_spaces() {
        assert_eq!(expand_line(" a", 8), "&nbsp;a");
        assert_eq!(expand_line("a  b", 8), "a &nbsp;b");
        assert_eq!(expand_line("a b", 8), "a b");
        assert_eq!(expand_line("   a", 8), "&nbsp; &nbsp;a");
        assert_eq!(expand_line("<span class=\"x y\">a</span>", 8), "<span class=\"x y\">a</span>");
    }

    #[test]
    fn test_expand_wide_chars() {
        // a CJK character is two columns wide
        assert_eq!(expand_line("\u{4e2d}\tx", 4), "\u{4e2d}&nbsp; x");
    }

    #[test]
    fn test_inline_styles() {
        let lang = create_test_language();
        let config = RenderConfig::default();
        let renderer = Renderer::new(&lang, &config);
        let blocks = block(vec![
            Token::styled(Category::Keyword(1), "if"),
            Token::plain(" "),
            Token::styled(Category::Bracket, "("),
        ]);
        assert_eq!(
            renderer.render(&blocks, Duration::ZERO),
            "<pre class=\"test\"><span style=\"color: blue;\">if</span> \
             <span style=\"color: green;\">&#40;</span></pre>"
        );
    }

    #[test]
    fn test_classes_and_overrides() {
        let lang = create_test_language();
        let mut config = RenderConfig {
            use_classes: true,
            ..RenderConfig::default()
        };
        let renderer = Renderer::new(&lang, &config);
        let blocks = block(vec![Token::styled(Category::String, "\"<x>\"")]);
        assert_eq!(
            renderer.render(&blocks, Duration::ZERO),
            "<pre class=\"test\"><span class=\"st0\">&quot;&lt;x&gt;&quot;</span></pre>"
        );

        config.use_classes = false;
        config.styles.insert("st0".to_string(), "color: purple;".to_string());
        let renderer = Renderer::new(&lang, &config);
        assert_eq!(renderer.style_for(Category::String), "color: purple;");
        assert_eq!(renderer.style_for(Category::Keyword(1)), "color: blue;");
        assert_eq!(renderer.style_for(Category::Number), "");
    }

    #[test]
    fn test_span_never_crosses_newline() {
        let lang = create_test_language();
        let config = RenderConfig::default();
        let renderer = Renderer::new(&lang, &config);
        let blocks = block(vec![Token::styled(Category::String, "'a\nb'")]);
        assert_eq!(
            renderer.render(&blocks, Duration::ZERO),
            "<pre class=\"test\"><span style=\"color: red;\">'a</span>\n\
             <span style=\"color: red;\">b'</span></pre>"
        );
    }

    #[test]
    fn test_keyword_link() {
        let lang = create_test_language();
        let config = RenderConfig {
            use_classes: true,
            link_target: Some("_blank".to_string()),
            ..RenderConfig::default()
        };
        let renderer = Renderer::new(&lang, &config);
        let token = Token::styled(Category::Keyword(1), "if").with_link("http://x/if");
        assert_eq!(
            renderer.token_markup(&token),
            "<a href=\"http://x/if\" target=\"_blank\"><span class=\"kw1\">if</span></a>"
        );
    }

    #[test]
    fn test_link_attributes_are_escaped() {
        let lang = create_test_language();
        let config = RenderConfig {
            use_classes: true,
            link_target: Some("a\"b".to_string()),
            ..RenderConfig::default()
        };
        let renderer = Renderer::new(&lang, &config);
        let token = Token::styled(Category::Keyword(1), "if").with_link("http://x/?q=\"if\"&v=<1>");
        assert_eq!(
            renderer.token_markup(&token),
            "<a href=\"http://x/?q=&quot;if&quot;&amp;v=&lt;1&gt;\" target=\"a&quot;b\">\
             <span class=\"kw1\">if</span></a>"
        );
    }

    #[test]
    fn test_numbered_lines_with_classes() {
        let lang = create_test_language();
        let config = RenderConfig {
            use_classes: true,
            line_numbers: LineNumbers::Fancy(2),
            header: HeaderKind::Div,
            start_line: 5,
            extra_lines: [3].into_iter().collect(),
            line_ids: true,
            ..RenderConfig::default()
        };
        let renderer = Renderer::new(&lang, &config);
        let blocks = block(vec![Token::plain("a\nb\n\nc")]);
        assert_eq!(
            renderer.render(&blocks, Duration::ZERO),
            "<div class=\"test\" style=\"font-family: monospace;\"><ol start=\"5\">\
             <li class=\"li1\" id=\"test-1\"><div class=\"de1\">a</div></li>\n\
             <li class=\"li2\" id=\"test-2\"><div class=\"de2\">b</div></li>\n\
             <li class=\"li1 ln-xtra\" id=\"test-3\"><div class=\"de1\">&nbsp;</div></li>\n\
             <li class=\"li2\" id=\"test-4\"><div class=\"de2\">c</div></li></ol></div>"
        );
    }

    #[test]
    fn test_numbered_lines_inline() {
        let lang = create_test_language();
        let config = RenderConfig {
            line_numbers: LineNumbers::Normal,
            line_style: "L".to_string(),
            code_style: "C".to_string(),
            extra_line_style: "X".to_string(),
            extra_lines: [2].into_iter().collect(),
            ..RenderConfig::default()
        };
        let renderer = Renderer::new(&lang, &config);
        let blocks = block(vec![Token::plain("a\nb")]);
        assert_eq!(
            renderer.render(&blocks, Duration::ZERO),
            "<pre class=\"test\"><ol>\
             <li style=\"L\"><div style=\"C\">a</div></li>\
             <li style=\"L X\"><div style=\"C\">b</div></li></ol></pre>"
        );
    }

    #[test]
    fn test_div_header_without_numbers() {
        let lang = create_test_language();
        let config = RenderConfig {
            header: HeaderKind::Div,
            overall_style: "margin: 0;".to_string(),
            ..RenderConfig::default()
        };
        let renderer = Renderer::new(&lang, &config);
        let blocks = block(vec![Token::plain("a\n\tb  c\n")]);
        assert_eq!(
            renderer.render(&blocks, Duration::ZERO),
            "<div class=\"test\" style=\"margin: 0;\">a<br />\n\
             &nbsp; &nbsp; &nbsp; &nbsp; b &nbsp;c<br />\n\
             &nbsp;</div>"
        );
    }

    #[test]
    fn test_extra_line_without_numbers() {
        let lang = create_test_language();
        let config = RenderConfig {
            use_classes: true,
            extra_lines: [1].into_iter().collect(),
            ..RenderConfig::default()
        };
        let renderer = Renderer::new(&lang, &config);
        let blocks = block(vec![Token::plain("a\nb")]);
        assert_eq!(
            renderer.render(&blocks, Duration::ZERO),
            "<pre class=\"test\"><div class=\"ln-xtra\">a</div>b</pre>"
        );
    }

    #[test]
    fn test_header_none_and_code_block() {
        let lang = create_test_language();
        let config = RenderConfig {
            header: HeaderKind::None,
            force_code_block: true,
            ..RenderConfig::default()
        };
        let renderer = Renderer::new(&lang, &config);
        assert_eq!(renderer.render_plain("x", Duration::ZERO), "<div>x</div>");
    }

    #[test]
    fn test_header_footer_content() {
        let lang = create_test_language();
        let config = RenderConfig {
            use_classes: true,
            overall_class: Some("code".to_string()),
            overall_id: Some("s1".to_string()),
            header_content: "{LANGUAGE}\n<TIME>".to_string(),
            footer_content: "v{VERSION}".to_string(),
            ..RenderConfig::default()
        };
        let renderer = Renderer::new(&lang, &config);
        assert_eq!(
            renderer.render_plain("x", Duration::from_millis(1500)),
            format!(
                "<pre class=\"code\" id=\"s1\"><div class=\"head\">test1.500</div>x\
                 <div class=\"foot\">v{}</div></pre>",
                env!("CARGO_PKG_VERSION")
            )
        );
    }

    #[test]
    fn test_script_block_wrapping() {
        let mut lang = create_test_language();
        lang.set_style(Category::Script(0), "background: #eee;");
        let config = RenderConfig::default();
        let renderer = Renderer::new(&lang, &config);
        let blocks = vec![
            Block {
                script: None,
                tokens: vec![Token::plain("<b>")],
            },
            Block {
                script: Some(0),
                tokens: vec![Token::plain("<?\nx ?>")],
            },
        ];
        assert_eq!(
            renderer.render(&blocks, Duration::ZERO),
            "<pre class=\"test\">&lt;b&gt;<span style=\"background: #eee;\">&lt;?</span>\n\
             <span style=\"background: #eee;\">x ?&gt;</span></pre>"
        );
    }
}
