//! Scanner module for directory traversal and document discovery.
//!
//! The scanner walks a directory tree and yields PSD/PSB documents with the
//! metadata the persistence layer needs (path, size, timestamps). Traversal
//! is sequential and blocking; per-entry I/O errors are yielded as values so
//! a bad entry never aborts the walk.

pub mod walker;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub use walker::Walker;

/// Extensions recognised as layered image documents (case-insensitive).
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["psd", "psb"];

/// Metadata for a discovered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Creation time, where the filesystem records one
    pub created: Option<SystemTime>,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileEntry {
    /// Create a new `FileEntry`.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            created: None,
            modified,
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Descend into subdirectories. When false, only the immediate
    /// directory is read.
    pub recursive: bool,

    /// Follow symbolic links during traversal.
    /// Warning: May cause infinite loops with symlink cycles.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    #[must_use]
    pub fn new(recursive: bool, follow_symlinks: bool) -> Self {
        Self {
            recursive,
            follow_symlinks,
        }
    }
}

/// Check whether a path looks like a PSD/PSB document by extension.
#[must_use]
pub fn is_document(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return false,
    };

    DOCUMENT_EXTENSIONS.contains(&ext.as_str())
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified root was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Traversal failed without a usable path (e.g. a symlink loop).
    #[error("Walk error: {0}")]
    Walk(String),
}
