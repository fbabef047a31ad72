//! Highlighting entry points
//!
//! A [`Highlighter`] ties the pieces together for one call: it resolves the
//! language in a registry, scans and decorates the source, then renders the
//! tokens with the caller's [`RenderConfig`].

use std::time::{Duration, Instant};

use crate::config::RenderConfig;
use crate::error::{HighlightError, Result};
use crate::render::Renderer;
use crate::stylesheet;
use crate::syntax::{normalize_identifier, LanguageDefinition, LanguageRegistry, ScanOptions, Scanner};

/// Output of one highlight call
#[derive(Debug)]
pub struct HighlightResult {
    /// The rendered markup
    pub markup: String,
    /// Time spent scanning and decorating
    pub elapsed: Duration,
    /// Normalized identifier of the requested language
    pub language: String,
    /// Recoverable error, set when the language is unknown
    pub error: Option<HighlightError>,
}

impl HighlightResult {
    /// Check if the source was highlighted with its language
    pub fn is_highlighted(&self) -> bool {
        self.error.is_none()
    }
}

/// Highlights source text with the languages of a registry
pub struct Highlighter<'a> {
    registry: &'a LanguageRegistry,
}

impl<'a> Highlighter<'a> {
    /// Create a highlighter over a registry
    pub fn new(registry: &'a LanguageRegistry) -> Self {
        Self { registry }
    }

    /// Highlight `source` as `language`
    ///
    /// An unknown language is not fatal: the result holds the escaped source
    /// in the configured container and the error is reported in
    /// [`HighlightResult::error`]. Invalid configuration and oversized input
    /// fail before any scanning.
    pub fn highlight(
        &self,
        source: &str,
        language: &str,
        config: &RenderConfig,
    ) -> Result<HighlightResult> {
        config.validate()?;
        if let Some(limit) = config.max_input_bytes {
            if source.len() > limit {
                return Err(HighlightError::InputTooLarge {
                    len: source.len(),
                    limit,
                });
            }
        }

        let source = normalize_newlines(source);
        let id = normalize_identifier(language);

        let Some(lang) = self.registry.get(&id) else {
            tracing::warn!(language = %language, "unknown language, output is not highlighted");
            let start = Instant::now();
            let plain = LanguageDefinition::new(&id, &id);
            let markup = Renderer::new(&plain, config).render_plain(&source, start.elapsed());
            return Ok(HighlightResult {
                markup,
                elapsed: start.elapsed(),
                language: id,
                error: Some(HighlightError::UnknownLanguage(language.to_string())),
            });
        };

        let options = ScanOptions {
            enabled: config.disabled.clone(),
            case: config.case_keywords.unwrap_or(lang.case_keywords),
            keyword_links: config.keyword_links,
            strict: lang.strict_for(config.strict),
        };

        let start = Instant::now();
        let blocks = Scanner::new(&lang, &options).scan(&source);
        let elapsed = start.elapsed();
        tracing::debug!(
            language = %id,
            bytes = source.len(),
            blocks = blocks.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "scanned source"
        );

        let markup = Renderer::new(&lang, config).render(&blocks, elapsed);
        Ok(HighlightResult {
            markup,
            elapsed,
            language: id,
            error: None,
        })
    }

    /// Generate the stylesheet for `language`
    pub fn stylesheet(&self, language: &str, config: &RenderConfig, economy: bool) -> Result<String> {
        config.validate()?;
        let lang = self
            .registry
            .get(language)
            .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;
        Ok(stylesheet::generate(&lang, config, economy))
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`
fn normalize_newlines(source: &str) -> String {
    if source.contains('\r') {
        source.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        source.to_string()
    }
}
