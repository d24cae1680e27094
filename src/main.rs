use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::LevelFilter;

use md_bundler::config::PackConfig;
use md_bundler::{PackBuilder, PackSummary};

/// Copy every image a markdown document references into a sibling folder and zip the result.
#[derive(Debug, Parser)]
#[command(name = "md_bundler", version, about)]
struct Cli {
    /// Markdown document to bundle; prompted for when omitted.
    document: Option<PathBuf>,

    /// JSON configuration file (defaults to md_bundler.config.json next to the document).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Folder name for copied images inside the bundle.
    #[arg(long)]
    images_dir: Option<String>,

    /// Skip writing the zip archive.
    #[arg(long)]
    no_archive: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let document = match cli.document.clone() {
        Some(path) => path,
        None => prompt_for_document()?,
    };

    let mut config = match &cli.config {
        Some(path) => PackConfig::load(path)?,
        None => PackConfig::discover(document_dir(&document)),
    };
    if let Some(images_dir) = &cli.images_dir {
        config.images_dir = images_dir.clone();
    }
    if cli.no_archive {
        config.create_archive = false;
    }
    config.validate()?;

    let artifacts = PackBuilder::for_document(&document, config)?.build()?;
    let summary = artifacts.summary();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn prompt_for_document() -> Result<PathBuf> {
    print!("Path to the markdown document: ");
    io::stdout().flush().context("failed to flush prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read document path")?;

    let path = answer.trim().trim_matches('"');
    if path.is_empty() {
        bail!("no document path given");
    }
    Ok(PathBuf::from(path))
}

fn document_dir(document: &Path) -> &Path {
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn print_summary(summary: &PackSummary) {
    println!("Done");
    println!("Output directory: {}", summary.output_dir.display());
    match &summary.archive {
        Some(archive) => println!("Archive: {}", archive.display()),
        None => println!("Archive: skipped"),
    }
    if !summary.missing.is_empty() {
        println!(
            "{} image(s) could not be found and were left unchanged",
            summary.missing.len()
        );
    }
    println!(
        "Open {} from the output directory to view it with its images.",
        summary.document.display()
    );
}
