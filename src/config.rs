//! Render configuration
//!
//! A [`RenderConfig`] holds every presentation setting for one highlight
//! call. It is plain data owned by the caller; nothing in the crate mutates
//! it. Settings can also be loaded from `~/.hilite.toml`
//! (or `%USERPROFILE%\.hilite.toml` on Windows).
//!
//! Format: TOML with kebab-case keys, all optional.
//!
//! Example:
//! ```toml
//! # hilite configuration
//! header = "div"
//! line-numbers = { fancy = 5 }
//! use-classes = true
//! tab-width = 4
//! extra-lines = [3, 4]
//! disabled = ["nu0"]
//!
//! [styles]
//! kw1 = "color: #0000ff;"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{HighlightError, Result};
use crate::syntax::{CaseConversion, EnabledCategories};

/// Container element wrapped around the highlighted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum HeaderKind {
    /// No container
    None,
    /// `<div>`; whitespace is preserved with entities
    Div,
    /// `<pre>`; whitespace is preserved by the browser
    #[default]
    Pre,
}

impl FromStr for HeaderKind {
    type Err = HighlightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(HeaderKind::None),
            "div" => Ok(HeaderKind::Div),
            "pre" => Ok(HeaderKind::Pre),
            other => Err(HighlightError::InvalidRenderConfig(format!(
                "unknown header kind `{}`",
                other
            ))),
        }
    }
}

impl TryFrom<String> for HeaderKind {
    type Error = HighlightError;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

/// Line numbering mode
///
/// In TOML either a name (`"normal"`, `"fancy:3"`) or `{ fancy = 3 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "LineNumbersRepr")]
pub enum LineNumbers {
    /// No line numbers
    #[default]
    Off,
    /// Every line numbered alike
    Normal,
    /// Every Nth line styled differently
    Fancy(usize),
}

impl LineNumbers {
    /// Check if line numbers are shown
    pub fn is_enabled(&self) -> bool {
        !matches!(self, LineNumbers::Off)
    }
}

impl FromStr for LineNumbers {
    type Err = HighlightError;

    /// Parse `off`, `normal`, `fancy` (every 5th line) or `fancy:N`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.to_lowercase();
        match s.split_once(':') {
            None if s == "off" || s == "none" => Ok(LineNumbers::Off),
            None if s == "normal" => Ok(LineNumbers::Normal),
            None if s == "fancy" => Ok(LineNumbers::Fancy(5)),
            Some(("fancy", n)) => n.trim().parse().map(LineNumbers::Fancy).map_err(|_| {
                HighlightError::InvalidRenderConfig(format!("invalid fancy interval `{}`", n))
            }),
            _ => Err(HighlightError::InvalidRenderConfig(format!(
                "unknown line number mode `{}`",
                s
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LineNumbersRepr {
    Name(String),
    Fancy { fancy: usize },
}

impl TryFrom<LineNumbersRepr> for LineNumbers {
    type Error = HighlightError;

    fn try_from(repr: LineNumbersRepr) -> Result<Self> {
        match repr {
            LineNumbersRepr::Name(name) => name.parse(),
            LineNumbersRepr::Fancy { fancy } => Ok(LineNumbers::Fancy(fancy)),
        }
    }
}

/// Styles for keyword link states
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkStyles {
    pub link: String,
    pub hover: String,
    pub active: String,
    pub visited: String,
}

/// Presentation settings for one highlight call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenderConfig {
    /// Container element
    pub header: HeaderKind,
    /// Line numbering mode
    pub line_numbers: LineNumbers,
    /// Number of the first line
    pub start_line: usize,
    /// Emit CSS classes instead of inline styles
    pub use_classes: bool,
    /// Tab stop width; the language's suggestion when unset
    pub tab_width: Option<usize>,
    /// Lines (1-based) to highlight extra
    pub extra_lines: BTreeSet<usize>,
    /// `target` attribute of keyword links
    pub link_target: Option<String>,
    /// Turn keywords with a URL template into links
    pub keyword_links: bool,
    /// Keyword case policy; the language's default when unset
    pub case_keywords: Option<CaseConversion>,
    /// Strict mode for languages where it is optional
    pub strict: Option<bool>,
    /// Categories not to highlight, by class name
    pub disabled: EnabledCategories,
    /// Style overrides by class name (e.g. `kw1`, `st0`, a custom regexp class)
    pub styles: BTreeMap<String, String>,
    /// Content placed before the code
    pub header_content: String,
    /// Inline style of the header content
    pub header_style: String,
    /// Content placed after the code
    pub footer_content: String,
    /// Inline style of the footer content
    pub footer_style: String,
    /// Class of the container; the language id when unset
    pub overall_class: Option<String>,
    /// Id of the container
    pub overall_id: Option<String>,
    /// Inline style of the container
    pub overall_style: String,
    /// Style of the code inside numbered lines
    pub code_style: String,
    /// Style of numbered lines
    pub line_style: String,
    /// Style of every Nth line under fancy numbering
    pub fancy_line_style: String,
    /// Style of extra-highlighted lines
    pub extra_line_style: String,
    /// Styles of keyword links
    pub link_styles: LinkStyles,
    /// Give every numbered line an id
    pub line_ids: bool,
    /// Wrap unnumbered code in an inner `<div>`
    pub force_code_block: bool,
    /// Reject input larger than this many bytes
    pub max_input_bytes: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            header: HeaderKind::Pre,
            line_numbers: LineNumbers::Off,
            start_line: 1,
            use_classes: false,
            tab_width: None,
            extra_lines: BTreeSet::new(),
            link_target: None,
            keyword_links: true,
            case_keywords: None,
            strict: None,
            disabled: EnabledCategories::all(),
            styles: BTreeMap::new(),
            header_content: String::new(),
            header_style: String::new(),
            footer_content: String::new(),
            footer_style: String::new(),
            overall_class: None,
            overall_id: None,
            overall_style: String::new(),
            code_style: "font-family: 'Courier New', Courier, monospace; font-weight: normal;"
                .to_string(),
            line_style: "font-family: 'Courier New', Courier, monospace; color: black; \
                         font-weight: normal; font-style: normal;"
                .to_string(),
            fancy_line_style: "font-weight: bold;".to_string(),
            extra_line_style: "color: #cc0; background-color: #ffc;".to_string(),
            link_styles: LinkStyles::default(),
            line_ids: false,
            force_code_block: false,
            max_input_bytes: None,
        }
    }
}

impl RenderConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".hilite.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".hilite.toml"))
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let table: toml::Table = contents.parse()?;
        check_mode_names(&table)?;
        let config: RenderConfig = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load the user's configuration file, or the defaults if there is none
    pub fn load_default() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading render config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Check settings that would make rendering meaningless
    pub fn validate(&self) -> Result<()> {
        let invalid =
            |reason: &str| -> Result<()> { Err(HighlightError::InvalidRenderConfig(reason.to_string())) };

        if self.start_line == 0 {
            return invalid("start line must be at least 1");
        }
        if self.line_numbers == LineNumbers::Fancy(0) {
            return invalid("fancy line number interval must be at least 1");
        }
        if self.tab_width == Some(0) {
            return invalid("tab width must be at least 1");
        }
        if self.extra_lines.contains(&0) {
            return invalid("extra lines are numbered from 1");
        }
        Ok(())
    }

    /// Container style, defaulting to a monospace font under a `<div>` header
    pub fn effective_overall_style(&self) -> &str {
        if self.overall_style.is_empty() && self.header == HeaderKind::Div {
            "font-family: monospace;"
        } else {
            &self.overall_style
        }
    }

    /// The style override for a class name, if any
    pub fn style_override(&self, class: &str) -> Option<&str> {
        self.styles.get(class).map(|s| s.as_str())
    }
}

/// Report unknown header and line number names as invalid settings
fn check_mode_names(table: &toml::Table) -> Result<()> {
    if let Some(name) = table.get("header").and_then(|v| v.as_str()) {
        name.parse::<HeaderKind>()?;
    }
    if let Some(name) = table.get("line-numbers").and_then(|v| v.as_str()) {
        name.parse::<LineNumbers>()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Category;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
header = "div"
line-numbers = { fancy = 3 }
start-line = 10
use-classes = true
tab-width = 4
extra-lines = [2, 5]
case-keywords = "upper"
disabled = ["nu0", "kw2"]
overall-id = "snippet"

[styles]
kw1 = "color: red;"

[link-styles]
hover = "text-decoration: underline;"
        "#;

        let config = RenderConfig::from_toml_str(contents).unwrap();
        assert_eq!(config.header, HeaderKind::Div);
        assert_eq!(config.line_numbers, LineNumbers::Fancy(3));
        assert_eq!(config.start_line, 10);
        assert!(config.use_classes);
        assert_eq!(config.tab_width, Some(4));
        assert!(config.extra_lines.contains(&5));
        assert_eq!(config.case_keywords, Some(CaseConversion::Upper));
        assert!(!config.disabled.is_enabled(Category::Number));
        assert!(!config.disabled.is_enabled(Category::Keyword(2)));
        assert_eq!(config.overall_id.as_deref(), Some("snippet"));
        assert_eq!(config.style_override("kw1"), Some("color: red;"));
        assert_eq!(config.link_styles.hover, "text-decoration: underline;");
        // Unlisted keys keep their defaults
        assert!(config.keyword_links);
        assert_eq!(config.fancy_line_style, "font-weight: bold;");
    }

    #[test]
    fn test_line_numbers_string_form() {
        let config = RenderConfig::from_toml_str("line-numbers = \"normal\"").unwrap();
        assert_eq!(config.line_numbers, LineNumbers::Normal);
    }

    #[test]
    fn test_mode_names_in_toml() {
        let config = RenderConfig::from_toml_str("header = \"DIV\"\nline-numbers = \"fancy:3\"").unwrap();
        assert_eq!(config.header, HeaderKind::Div);
        assert_eq!(config.line_numbers, LineNumbers::Fancy(3));

        for case in ["header = \"span\"", "line-numbers = \"sometimes\""] {
            assert!(
                matches!(
                    RenderConfig::from_toml_str(case),
                    Err(HighlightError::InvalidRenderConfig(_))
                ),
                "{} should be an invalid render config",
                case
            );
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            RenderConfig::from_toml_str("colour = true"),
            Err(HighlightError::Config(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(RenderConfig::default().validate().is_ok());

        let cases = [
            "start-line = 0",
            "line-numbers = { fancy = 0 }",
            "tab-width = 0",
            "extra-lines = [0]",
        ];
        for case in cases {
            assert!(
                matches!(
                    RenderConfig::from_toml_str(case),
                    Err(HighlightError::InvalidRenderConfig(_))
                ),
                "{} should be rejected",
                case
            );
        }
    }

    #[test]
    fn test_parse_header_kind() {
        assert_eq!("DIV".parse::<HeaderKind>().unwrap(), HeaderKind::Div);
        assert_eq!("none".parse::<HeaderKind>().unwrap(), HeaderKind::None);
        assert!("span".parse::<HeaderKind>().is_err());
    }

    #[test]
    fn test_parse_line_numbers() {
        assert_eq!("off".parse::<LineNumbers>().unwrap(), LineNumbers::Off);
        assert_eq!("normal".parse::<LineNumbers>().unwrap(), LineNumbers::Normal);
        assert_eq!("fancy".parse::<LineNumbers>().unwrap(), LineNumbers::Fancy(5));
        assert_eq!("fancy:2".parse::<LineNumbers>().unwrap(), LineNumbers::Fancy(2));
        assert!("fancy:x".parse::<LineNumbers>().is_err());
        assert!("sometimes".parse::<LineNumbers>().is_err());
    }

    #[test]
    fn test_div_header_default_style() {
        let mut config = RenderConfig {
            header: HeaderKind::Div,
            ..RenderConfig::default()
        };
        assert_eq!(config.effective_overall_style(), "font-family: monospace;");

        config.header = HeaderKind::Pre;
        assert_eq!(config.effective_overall_style(), "");
    }
}
