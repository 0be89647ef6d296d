//! Persistence for found fonts.
//!
//! Two sinks implement the [`FontSink`] seam:
//!
//! * [`textfile::TextFileSink`]: flat text output, one font name per line,
//!   deduplicated against the file's current contents.
//! * [`database::SqliteSink`]: relational output with `files`, `fonts`,
//!   and a many-to-many `file_fonts` join table; files already recorded
//!   are skipped entirely on later runs.

pub mod database;
pub mod textfile;

use std::path::PathBuf;

use crate::scanner::FileEntry;

pub use database::{Database, FileRecord, FontRecord, SqliteSink};
pub use textfile::TextFileSink;

/// Destination for font names found during a scan.
pub trait FontSink {
    /// Whether this document can be skipped without parsing, because its
    /// results were already recorded by an earlier run.
    fn should_skip(&mut self, entry: &FileEntry) -> Result<bool, StoreError>;

    /// Record the fonts found in one document. Returns the number of
    /// newly recorded names.
    fn record(&mut self, entry: &FileEntry, fonts: &[String]) -> Result<usize, StoreError>;

    /// Human-readable description of the destination, for the summary line.
    fn describe(&self) -> String;
}

/// Errors from the persistence layer.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// An I/O error while reading or writing the output file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A database error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
