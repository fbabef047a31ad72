//! Stylesheet generation
//!
//! Projects a language definition and a render configuration into CSS
//! matching the class names the renderer emits under `use-classes`.

use std::collections::HashSet;
use std::fmt::Write;

use crate::config::{LineNumbers, RenderConfig};
use crate::syntax::LanguageDefinition;

/// Generate the stylesheet for a language
///
/// In economy mode only rules that can affect the output are emitted: line
/// rules only with line numbers, `.ln-xtra` only with extra lines, and
/// category rules only for enabled categories with a non-empty style.
pub fn generate(lang: &LanguageDefinition, config: &RenderConfig, economy: bool) -> String {
    let full = !economy;
    let selector = match config.overall_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => format!("#{} ", id),
        None => format!(".{} ", config.overall_class.as_deref().unwrap_or(&lang.id)),
    };

    let mut css = String::new();
    if full {
        let _ = write!(
            css,
            "/**\n * hilite stylesheet for {} ({})\n * Selector: {}\n */\n",
            lang.name,
            lang.id,
            selector.trim_end()
        );
    } else {
        let _ = writeln!(css, "/* hilite economy stylesheet for {} */", lang.id);
    }

    let mut rule = |suffix: &str, style: &str, emit: bool| {
        if emit {
            let _ = writeln!(css, "{}{} {{{}}}", selector, suffix, style);
        }
    };

    let numbered = config.line_numbers.is_enabled();
    let code_lines = format!(".de1, {}.de2", selector);
    rule(&code_lines, config.code_style.as_str(), full || numbered);
    rule("", config.effective_overall_style(), full || !config.effective_overall_style().is_empty());

    let links = &config.link_styles;
    for (suffix, style) in [
        ("a:link", links.link.as_str()),
        ("a:hover", links.hover.as_str()),
        ("a:active", links.active.as_str()),
        ("a:visited", links.visited.as_str()),
    ] {
        rule(suffix, style, full || !style.is_empty());
    }

    rule(".head", config.header_style.as_str(), full || !config.header_style.is_empty());
    rule(".foot", config.footer_style.as_str(), full || !config.footer_style.is_empty());
    rule(".ln-xtra", config.extra_line_style.as_str(), full || !config.extra_lines.is_empty());
    rule("li", config.line_style.as_str(), full || (numbered && !config.line_style.is_empty()));
    rule(
        "li.li2",
        config.fancy_line_style.as_str(),
        full || (matches!(config.line_numbers, LineNumbers::Fancy(_))
            && !config.fancy_line_style.is_empty()),
    );

    let mut seen = HashSet::new();
    for category in lang.categories() {
        if !seen.insert(category) {
            continue;
        }
        let class = lang.class_name(category);
        let style = config
            .style_override(&class)
            .unwrap_or_else(|| lang.styles.get(category));
        let in_use = config.disabled.is_enabled(category) && !style.is_empty();
        rule(&format!(".{}", class), style, full || in_use);
    }

    css
}
