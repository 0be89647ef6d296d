//! Application driver: wires the CLI onto the scan and list pipelines.
//!
//! The scan pipeline is strictly sequential: enumerate documents, then for
//! each one check the sink's skip logic, parse, extract fonts, persist,
//! and print a sorted summary at the end. A failing document is logged and
//! the loop moves on; the run ends with the partial-success exit code when
//! anything failed.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, ListArgs, ListFormat, ScanArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::logging;
use crate::progress::Progress;
use crate::psd::{self, Document};
use crate::scanner::{FileEntry, Walker, WalkerConfig};
use crate::signal;
use crate::store::{Database, FontSink, SqliteSink, TextFileSink};

/// Output file used when neither `--output` nor `--database` is given and
/// the config has no default.
pub const DEFAULT_OUTPUT_FILE: &str = "found_fonts.txt";

/// Run the application with parsed CLI arguments.
///
/// Returns the exit code the process should end with; `Err` is reserved
/// for failures before or outside the per-document loop.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Scan(args) => run_scan(&args, cli.quiet),
        Commands::List(args) => run_list(&args),
    }
}

/// The scan subcommand: walk, parse, extract, persist.
fn run_scan(args: &ScanArgs, quiet: bool) -> Result<ExitCode> {
    let config = Config::load();
    let allow_duplicates = args.allow_duplicates || config.allow_duplicates;

    let mut sink = open_sink(args, &config, allow_duplicates)?;
    log::info!("Recording fonts to {}", sink.describe());

    let handler = signal::install_handler()?;

    let walker_config = WalkerConfig::new(args.recursive, args.follow_symlinks);
    let walker =
        Walker::new(&args.root, walker_config).with_shutdown_flag(handler.get_flag());
    walker
        .validate_root()
        .with_context(|| format!("Cannot scan {}", args.root.display()))?;

    let mut walk_errors = 0usize;
    let documents: Vec<FileEntry> = walker
        .walk()
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("{}", e);
                walk_errors += 1;
                None
            }
        })
        .collect();

    if handler.is_shutdown_requested() {
        return Ok(ExitCode::Interrupted);
    }

    log::info!(
        "Found {} documents under {}",
        documents.len(),
        args.root.display()
    );

    let progress = Progress::new(documents.len() as u64, quiet);
    let total = documents.len();

    let mut found: Vec<String> = Vec::new();
    let mut recorded = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for (idx, entry) in documents.iter().enumerate() {
        if handler.is_shutdown_requested() {
            progress.finish();
            return Ok(ExitCode::Interrupted);
        }

        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.on_document(&name);
        log::debug!(
            "Processing document {} of {}: {}",
            idx + 1,
            total,
            entry.path.display()
        );

        match process_document(sink.as_mut(), entry) {
            Ok(Some((fonts, new))) => {
                recorded += new;
                for font in fonts {
                    if !found.contains(&font) {
                        found.push(font);
                    }
                }
            }
            Ok(None) => {
                log::debug!("Already recorded, skipping: {}", entry.path.display());
                skipped += 1;
            }
            Err(e) => {
                log::warn!("Error processing {}: {:#}", entry.path.display(), e);
                failed += 1;
            }
        }
    }

    progress.finish();

    log::info!(
        "Done: {} fonts found, {} newly recorded, {} documents skipped, {} failed",
        found.len(),
        recorded,
        skipped,
        failed
    );

    if !quiet {
        print_summary(&found);
    }

    if failed > 0 || walk_errors > 0 {
        Ok(ExitCode::PartialSuccess)
    } else if found.is_empty() && skipped == 0 {
        Ok(ExitCode::NoFonts)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Select the sink: database when `--database` is given, text file
/// otherwise (CLI path, then config default, then [`DEFAULT_OUTPUT_FILE`]).
fn open_sink(
    args: &ScanArgs,
    config: &Config,
    allow_duplicates: bool,
) -> Result<Box<dyn FontSink>> {
    match &args.database {
        Some(path) => Ok(Box::new(SqliteSink::new(path, allow_duplicates)?)),
        None => {
            let path = args
                .output
                .clone()
                .or_else(|| config.default_output.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));
            Ok(Box::new(TextFileSink::new(&path, allow_duplicates)?))
        }
    }
}

/// Process one document through the sink.
///
/// Returns `None` when the sink skipped the document, otherwise the fonts
/// found in it together with the number of newly recorded names.
fn process_document(
    sink: &mut dyn FontSink,
    entry: &FileEntry,
) -> Result<Option<(Vec<String>, usize)>> {
    if sink.should_skip(entry)? {
        return Ok(None);
    }

    let document = Document::open(&entry.path)?;
    let fonts = psd::fonts_in_document(&document)?;

    // Record even when empty, so the database variant remembers the file
    // was processed.
    let new = sink.record(entry, &fonts)?;

    Ok(Some((fonts, new)))
}

/// Print the fonts found this run, sorted, matching the scan's console
/// contract.
fn print_summary(found: &[String]) {
    if found.is_empty() {
        println!("\nNo fonts found.");
        return;
    }

    let mut sorted: Vec<&String> = found.iter().collect();
    sorted.sort();

    println!("\nFonts found:");
    for font in sorted {
        println!("{font}");
    }
}

/// The list subcommand: dump what a database has recorded.
fn run_list(args: &ListArgs) -> Result<ExitCode> {
    // Opening would create an empty database; a read-only subcommand
    // must not leave files behind.
    if !args.database.exists() {
        anyhow::bail!("Database not found: {}", args.database.display());
    }

    let db = Database::open(&args.database)
        .with_context(|| format!("Cannot open database {}", args.database.display()))?;

    let fonts = if args.with_files {
        db.fonts_with_files()?
    } else {
        db.fonts()?
    };

    match args.format {
        ListFormat::Text => {
            for font in &fonts {
                println!("{}", font.name);
                if let Some(files) = &font.files {
                    for path in files {
                        println!("    {path}");
                    }
                }
            }
        }
        ListFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&fonts)?);
        }
    }

    if fonts.is_empty() {
        Ok(ExitCode::NoFonts)
    } else {
        Ok(ExitCode::Success)
    }
}
