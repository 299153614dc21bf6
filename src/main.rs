//! snippet — list and check annotated code snippets.
//!
//! - **list mode** (default): `snippet -d ~/snippets [NAME...]`
//! - **check mode**: `snippet -d ~/snippets --check NAME...`

use anyhow::{bail, Context, Result};
use clap::Parser;
use snippet::{valid_parts, Cache, Category, Diagnostics, FormatConfig, ListConfig};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "snippet",
    about = "List annotated code snippets and check their dependencies"
)]
struct Cli {
    /// Snippet names, sub-directories or absolute paths to show.
    /// If omitted, every snippet is listed.
    names: Vec<String>,

    /// Snippet directory to search (repeatable, searched in order)
    #[arg(short = 'd', long = "dir", env = "SNIPPET_DIRS", value_delimiter = ':')]
    dirs: Vec<PathBuf>,

    /// Parts of each snippet to show (repeatable, comma-separated).
    /// See --list-parts.
    #[arg(short = 'p', long = "part", value_delimiter = ',')]
    parts: Vec<String>,

    /// Tags of each snippet to show (repeatable, comma-separated)
    #[arg(short = 't', long = "tag", value_delimiter = ',')]
    tags: Vec<String>,

    /// Show bare values without part labels
    #[arg(long)]
    hide_intro: bool,

    /// Load the named snippets directly and check that everything they
    /// expect was loaded too
    #[arg(long)]
    check: bool,

    /// Print the valid part names and exit
    #[arg(long)]
    list_parts: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_parts {
        for (name, desc) in valid_parts() {
            println!("{:<8} {}", name, desc);
        }
        return Ok(());
    }

    let format = FormatConfig::new()
        .with_parts(&cli.parts)
        .context("bad --part")?
        .with_tags(cli.tags.iter().cloned())
        .hide_intro(cli.hide_intro);

    let mut diags = Diagnostics::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.check {
        check_mode(&cli, &format, &mut out, &mut diags)?;
    } else {
        ListConfig::new(&cli.dirs)
            .with_constraints(cli.names.iter().cloned())
            .with_format(format)
            .list(&mut out, &mut diags)
            .context("failed to write snippet listing")?;
    }
    out.flush()?;

    if !diags.is_empty() {
        diags
            .report(&mut io::stderr().lock(), "Snippet errors")
            .context("failed to write error report")?;
        bail!("{} problem(s) found", diags.len());
    }
    Ok(())
}

/// check mode: load each name through the cache, render it, then verify
/// the loaded set is self-consistent.
fn check_mode<W: Write>(
    cli: &Cli,
    format: &FormatConfig,
    out: &mut W,
    diags: &mut Diagnostics,
) -> Result<()> {
    if cli.names.is_empty() {
        bail!("--check needs at least one snippet name");
    }

    let mut cache = Cache::new();
    for name in &cli.names {
        match cache.add(&cli.dirs, name) {
            Ok(s) => out.write_all(format.render(s).as_bytes())?,
            Err(e) => diags.add(Category::BadSnippet, e),
        }
    }
    for e in cache.check() {
        diags.add(Category::MissingSnippet, e);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_and_tags_split_on_commas() {
        let cli = Cli::try_parse_from(["snippet", "-p", "name,text", "-p", "path", "-t", "A,B"])
            .unwrap();
        assert_eq!(cli.parts, ["name", "text", "path"]);
        assert_eq!(cli.tags, ["A", "B"]);
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["snippet", "-vv", "x"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.names, ["x"]);
    }
}
