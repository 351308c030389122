//! docgen — build API documentation from tagged `/** ... */` comment blocks.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `docgen < lib.js` prints the rendered tree to stdout
//! - **file mode**: `docgen -o docs -f html src/*.js` writes the page and a
//!   `search.json` index into the output directory

mod render;
mod search;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docblock_syntax::{parse_file, parse_str, DocTree, DuplicatePolicy};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docgen",
    about = "Generate API documentation from tagged comment blocks"
)]
struct Cli {
    /// Input files, directories or glob patterns. If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: json (default), html
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Project name used in the page title and menu id
    #[arg(short = 'n', long, default_value = "API")]
    name: String,

    /// HTML template with {{NAME}}, {{NAME_SIMPLIFIED}}, {{API_MENU}},
    /// {{API_CONTENT}} and {{SEARCH_LIST}} placeholders
    #[arg(short = 't', long)]
    template: Option<PathBuf>,

    /// What to do when two blocks resolve to the same path
    #[arg(long, value_enum, default_value_t = OnDuplicate::Last)]
    on_duplicate: OnDuplicate,

    /// Include @private and @ignore blocks in output
    #[arg(long)]
    show_private: bool,

    /// Skip files that fail to parse instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Log debug information to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OnDuplicate {
    /// Later blocks replace earlier ones
    Last,
    /// Earlier blocks are kept
    First,
    /// Duplicates are a parse failure
    Error,
}

impl From<OnDuplicate> for DuplicatePolicy {
    fn from(value: OnDuplicate) -> Self {
        match value {
            OnDuplicate::Last => DuplicatePolicy::LastWins,
            OnDuplicate::First => DuplicatePolicy::FirstWins,
            OnDuplicate::Error => DuplicatePolicy::Reject,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("DOCGEN_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn render_context(cli: &Cli) -> Result<render::RenderContext> {
    let template = match cli.template {
        Some(ref path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read template: {}", path.display()))?,
        ),
        None => None,
    };
    Ok(render::RenderContext {
        name: cli.name.clone(),
        template,
        show_private: cli.show_private,
    })
}

/// stdin mode: parse stdin as a single source, write the rendering to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let renderer = render::create_renderer(&cli.format)?;
    let ctx = render_context(cli)?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let mut tree = DocTree::with_policy(cli.on_duplicate.into());
    let blocks = parse_str("<stdin>", &input).context("failed to parse stdin")?;
    tree.insert_all(blocks).context("failed to parse stdin")?;

    print!("{}", renderer.render(&tree, &ctx)?);
    Ok(())
}

/// file mode: parse every input into one tree and write the rendering plus
/// the search index to the output directory.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    let renderer = render::create_renderer(&cli.format)?;
    let ctx = render_context(cli)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;

    let mut tree = DocTree::with_policy(cli.on_duplicate.into());
    for path in &input_files {
        let parsed = parse_file(path).and_then(|blocks| tree.insert_all(blocks));
        match parsed {
            Ok(()) => debug!(file = %path.display(), "merged into tree"),
            Err(e) if cli.keep_going => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to parse {}", path.display()));
            }
        }
    }

    let out_path = output_dir.join(renderer.file_name());
    fs::write(&out_path, renderer.render(&tree, &ctx)?)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    let index_path = output_dir.join("search.json");
    let index = serde_json::to_string(&search::build_index(&tree, &ctx))?;
    fs::write(&index_path, index)
        .with_context(|| format!("failed to write {}", index_path.display()))?;

    Ok(())
}

/// File extensions recognized as source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts"];

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

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
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && is_supported(&p) {
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
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}
