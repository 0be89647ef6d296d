//! Directory walker for PSD/PSB discovery.
//!
//! Single-threaded traversal built on [`walkdir`]. Entries are sorted by
//! file name so repeated runs process documents in a deterministic order.
//! Non-recursive mode restricts the walk to the immediate directory.
//!
//! # Example
//!
//! ```no_run
//! use psdfonts::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/artwork"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(doc) => println!("{}: {} bytes", doc.path.display(), doc.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{is_document, FileEntry, ScanError, WalkerConfig};

/// Directory walker for sequential document discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops iteration as soon
    /// as possible. This allows for clean Ctrl+C handling.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Validate that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] or [`ScanError::NotADirectory`].
    pub fn validate_root(&self) -> Result<(), ScanError> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScanError::NotFound(self.root.clone())
            } else {
                ScanError::Io {
                    path: self.root.clone(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        Ok(())
    }

    /// Walk the directory, yielding document entries.
    ///
    /// Returns an iterator over [`FileEntry`] results. Errors are yielded
    /// as [`ScanError`] values rather than stopping iteration. Files whose
    /// extension is not `.psd`/`.psb` are filtered out silently.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let max_depth = if self.config.recursive {
            usize::MAX
        } else {
            1
        };

        WalkDir::new(&self.root)
            .max_depth(max_depth)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: shutdown requested, stopping iteration");
                    return None;
                }

                let entry = match entry_result {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(walkdir_error_to_scan_error(e))),
                };

                if !entry.file_type().is_file() {
                    return None;
                }

                let path = entry.path();
                if !is_document(path) {
                    log::trace!("Skipping non-document: {}", path.display());
                    return None;
                }

                Some(self.make_entry(path))
            })
    }

    /// Build a [`FileEntry`] for a discovered document, resolving the path
    /// and collecting the metadata the persistence layer records.
    fn make_entry(&self, path: &Path) -> Result<FileEntry, ScanError> {
        let io_err = |source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        };

        let resolved = path.canonicalize().map_err(io_err)?;
        let metadata = std::fs::metadata(&resolved).map_err(io_err)?;
        let modified = metadata.modified().map_err(io_err)?;

        Ok(FileEntry {
            path: resolved,
            size: metadata.len(),
            // Not every filesystem records a birth time; treat it as optional.
            created: metadata.created().ok(),
            modified,
        })
    }
}

/// Map a walkdir error onto [`ScanError`], keeping the path when one is known.
fn walkdir_error_to_scan_error(e: walkdir::Error) -> ScanError {
    let path = e.path().map(Path::to_path_buf);
    let message = e.to_string();
    match (path, e.into_io_error()) {
        (Some(path), Some(source)) => ScanError::Io { path, source },
        _ => ScanError::Walk(message),
    }
}
