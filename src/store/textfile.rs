//! Flat text file sink: one font name per line.
//!
//! Before each append the file's current contents are re-read into a set,
//! so concurrent runs against the same output file stay reasonably
//! honest and a re-run never doubles up names (unless duplicates were
//! asked for). The file is created on first use.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scanner::FileEntry;

use super::{FontSink, StoreError};

/// Text file destination for font names.
#[derive(Debug)]
pub struct TextFileSink {
    path: PathBuf,
    allow_duplicates: bool,
}

impl TextFileSink {
    /// Create a sink for the given output file, creating the file if it
    /// does not exist yet.
    pub fn new(path: &Path, allow_duplicates: bool) -> Result<Self, StoreError> {
        if !path.exists() {
            File::create(path).map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            allow_duplicates,
        })
    }

    /// Read the set of font names already present in the output file.
    pub fn known_fonts(&self) -> Result<HashSet<String>, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        Ok(content.lines().map(str::to_string).collect())
    }

    fn append(&self, names: &[&String]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;

        for name in names {
            writeln!(file, "{name}").map_err(io_err)?;
        }
        Ok(())
    }
}

impl FontSink for TextFileSink {
    fn should_skip(&mut self, _entry: &FileEntry) -> Result<bool, StoreError> {
        // The text format records nothing per file, so every document has
        // to be parsed; dedup happens per font name instead.
        Ok(false)
    }

    fn record(&mut self, _entry: &FileEntry, fonts: &[String]) -> Result<usize, StoreError> {
        let to_write: Vec<&String> = if self.allow_duplicates {
            fonts.iter().collect()
        } else {
            let known = self.known_fonts()?;
            fonts.iter().filter(|f| !known.contains(*f)).collect()
        };

        if to_write.is_empty() {
            return Ok(0);
        }

        self.append(&to_write)?;
        Ok(to_write.len())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
