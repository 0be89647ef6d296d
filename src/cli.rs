//! Command-line interface definitions for psdfonts.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color) and
//! subcommands for different operations.
//!
//! # Example
//!
//! ```bash
//! # Collect fonts from PSDs in a directory into a text file
//! psdfonts scan ~/artwork --output found_fonts.txt
//!
//! # Recurse into subdirectories and record into a SQLite database
//! psdfonts scan ~/artwork --recursive --database fonts.db
//!
//! # List everything recorded so far
//! psdfonts list --database fonts.db --with-files
//!
//! # Verbose mode for debugging
//! psdfonts -v scan ~/artwork
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Font usage finder for PSD/PSB documents.
///
/// psdfonts walks a directory for Photoshop documents, extracts the font
/// names referenced by their text layers, and records them to a flat text
/// file or a SQLite database, skipping work already done on previous runs.
#[derive(Debug, Parser)]
#[command(name = "psdfonts")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Emit errors as JSON on stderr (for scripting)
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for psdfonts.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for fonts used in PSD/PSB documents
    Scan(ScanArgs),
    /// List fonts recorded in a database
    List(ListArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory containing PSD/PSB documents
    #[arg(value_name = "DIR")]
    pub root: PathBuf,

    /// Text file to append found fonts to (one name per line)
    ///
    /// Defaults to `found_fonts.txt` unless --database is given.
    #[arg(short, long, value_name = "FILE", conflicts_with = "database")]
    pub output: Option<PathBuf>,

    /// SQLite database to record files and fonts in
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Search subdirectories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Record fonts even when they were already recorded
    ///
    /// For the text output this appends repeated names; for the database
    /// it re-processes files that already have a row.
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Follow symbolic links during the walk
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,
}

/// Arguments for the list subcommand.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// SQLite database to read
    #[arg(short, long, value_name = "FILE")]
    pub database: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ListFormat,

    /// Include the documents each font was seen in
    #[arg(long)]
    pub with_files: bool,
}

/// Output format for the list subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Plain text, one font per line
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for ListFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListFormat::Text => write!(f, "text"),
            ListFormat::Json => write!(f, "json"),
        }
    }
}
