//! hilite - highlight source code as HTML
//!
//! Reads a file (or stdin) and writes the highlighted markup to stdout.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hilite::syntax::CaseConversion;
use hilite::{
    HeaderKind, HighlightError, Highlighter, LanguageRegistry, LineNumbers, RenderConfig, Result,
};

#[derive(Parser)]
#[command(name = "hilite")]
#[command(about = "Generic syntax highlighter producing HTML")]
#[command(version)]
struct Cli {
    /// Source file to highlight (stdin when omitted)
    path: Option<PathBuf>,

    /// Language identifier (detected from the file extension when omitted)
    #[arg(short, long)]
    language: Option<String>,

    /// Render config file (defaults to ~/.hilite.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra language definition files to load
    #[arg(long = "lang-file")]
    lang_files: Vec<PathBuf>,

    /// Container element: pre, div or none
    #[arg(long)]
    header: Option<HeaderKind>,

    /// Line numbers: off, normal, fancy or fancy:N
    #[arg(short = 'n', long)]
    line_numbers: Option<LineNumbers>,

    /// Emit CSS classes instead of inline styles
    #[arg(long)]
    classes: bool,

    /// Keyword case: none, upper or lower
    #[arg(long, value_parser = parse_case)]
    case: Option<CaseConversion>,

    /// Only highlight code inside script delimiters (e.g. `<?php ... ?>`)
    #[arg(long)]
    strict: bool,

    /// Lines to highlight, comma separated
    #[arg(long, value_delimiter = ',')]
    extra_lines: Vec<usize>,

    /// Print the stylesheet for the language instead of highlighting
    #[arg(long)]
    stylesheet: bool,

    /// Only emit stylesheet rules that are in use
    #[arg(long, requires = "stylesheet")]
    economy: bool,

    /// List the available languages
    #[arg(long)]
    list: bool,
}

fn main() {
    init_logging();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings only by default)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hilite=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut registry = LanguageRegistry::with_builtins();
    for path in &cli.lang_files {
        registry.load_file(path)?;
    }

    if cli.list {
        for id in registry.list_languages() {
            println!("{}", id);
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::load_default()?,
    };
    if let Some(header) = cli.header {
        config.header = header;
    }
    if let Some(line_numbers) = cli.line_numbers {
        config.line_numbers = line_numbers;
    }
    if cli.classes {
        config.use_classes = true;
    }
    if cli.case.is_some() {
        config.case_keywords = cli.case;
    }
    if cli.strict {
        config.strict = Some(true);
    }
    config.extra_lines.extend(cli.extra_lines.iter().copied());

    let language = resolve_language(&registry, cli.language.as_deref(), cli.path.as_deref())?;
    let highlighter = Highlighter::new(&registry);

    if cli.stylesheet {
        print!("{}", highlighter.stylesheet(&language, &config, cli.economy)?);
        return Ok(());
    }

    let source = match &cli.path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };

    let result = highlighter.highlight(&source, &language, &config)?;
    if let Some(err) = &result.error {
        tracing::warn!("{}", err);
    }
    println!("{}", result.markup);
    Ok(())
}

fn parse_case(name: &str) -> std::result::Result<CaseConversion, String> {
    CaseConversion::from_name(name).ok_or_else(|| format!("unknown keyword case `{}`", name))
}

fn resolve_language(
    registry: &LanguageRegistry,
    language: Option<&str>,
    path: Option<&Path>,
) -> Result<String> {
    if let Some(language) = language {
        return Ok(language.to_string());
    }
    path.and_then(|p| registry.detect_language(p))
        .map(str::to_string)
        .ok_or_else(|| {
            HighlightError::UnknownLanguage(
                path.map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<stdin>".to_string()),
            )
        })
}
