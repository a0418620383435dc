//! Dump the documentation data of annotated SCSS files as JSON.
//!
//! Two modes:
//!
//! - **stdin mode**: `scssdoc < _helpers.scss`
//! - **file mode**: `scssdoc -o docs/data sass/ sass/**/_*.scss`

use anyhow::{Context, Result};
use clap::Parser;
use scssdoc::{builtin, AnnotationRegistry, ParseResult, ScssCommentParser};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "scssdoc",
    about = "Extract documentation data from annotated SCSS source files"
)]
struct Cli {
    /// Input files, directories, or glob patterns. If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory, one NAME.json per input file. Without it, JSON goes to stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Do not register the standard annotations
    #[arg(long)]
    no_builtin: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let registry = if cli.no_builtin {
        AnnotationRegistry::new()
    } else {
        builtin::registry()
    };
    let parser = ScssCommentParser::new(registry);

    if cli.files.is_empty() {
        return stdin_mode(&cli, &parser);
    }

    file_mode(&cli, &parser)
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet { "scssdoc=error" } else { "scssdoc=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(io::stderr().is_terminal())
                .with_writer(io::stderr),
        )
        .init();
}

/// stdin mode: parse stdin, write its JSON to stdout.
fn stdin_mode(cli: &Cli, parser: &ScssCommentParser) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let result = parse_source(parser, "<stdin>", &input);
    println!("{}", to_json(&result, cli.compact)?);
    Ok(())
}

/// file mode: parse every input, write one JSON file each or a single
/// object keyed by path to stdout.
fn file_mode(cli: &Cli, parser: &ScssCommentParser) -> Result<()> {
    let input_files = expand_globs(&cli.files)?;

    if let Some(output_dir) = cli.output.as_deref() {
        fs::create_dir_all(output_dir).with_context(|| {
            format!("failed to create output directory: {}", output_dir.display())
        })?;
    }

    let mut combined = Map::new();
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let source = path.to_string_lossy().to_string();
        let result = parse_source(parser, &source, &content);

        match cli.output.as_deref() {
            Some(output_dir) => {
                let out_path = output_dir.join(format!("{}.json", derive_output_name(&source)));
                fs::write(&out_path, to_json(&result, cli.compact)? + "\n")
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
                tracing::info!(file = %source, output = %out_path.display(), records = result.len(), "wrote documentation data");
            }
            None => {
                combined.insert(source, serde_json::to_value(&result)?);
            }
        }
    }

    if cli.output.is_none() {
        println!("{}", to_json(&Value::Object(combined), cli.compact)?);
    }

    Ok(())
}

/// Parse one buffer, logging its warnings against the source name.
fn parse_source(parser: &ScssCommentParser, source: &str, content: &str) -> ParseResult {
    let parsed = parser.parse(content);
    for warning in &parsed.warnings {
        tracing::warn!(file = %source, "{}", warning);
    }
    parsed.result
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

/// File extensions recognized as source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["scss", "sass"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directory: supported extensions only, non-recursive
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Derive the output file name (without extension) from a source path.
/// "sass/helpers/_math.scss" → "_math"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit(['/', '\\']).next().unwrap_or(source);
    filename
        .strip_suffix(".scss")
        .or_else(|| filename.strip_suffix(".sass"))
        .unwrap_or(filename)
        .to_string()
}
