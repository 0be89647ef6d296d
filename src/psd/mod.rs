//! Scoped PSD/PSB reader for font extraction.
//!
//! Photoshop documents store the fonts a text layer uses inside the
//! "type tool object setting" (`TySh`) block of the layer record, as a
//! descriptor carrying a PostScript-flavoured `EngineData` blob. This module
//! parses exactly that path and nothing else: headers, layer records,
//! additional layer information, descriptors, and engine data. Channel
//! data, masks, and compositing are skipped by their declared lengths.
//!
//! # Submodules
//!
//! - [`reader`]: big-endian cursor over the raw bytes
//! - [`document`]: header and layer-record traversal
//! - [`descriptor`]: Photoshop descriptor structures
//! - [`engine_data`]: the text engine's dictionary serialization
//! - [`fonts`]: font-name extraction from parsed engine data

pub mod descriptor;
pub mod document;
pub mod engine_data;
pub mod fonts;
pub mod reader;

use std::path::PathBuf;

pub use document::{Document, Header, TextLayer, Version};
pub use fonts::fonts_in_document;

/// Errors produced while reading a PSD/PSB document.
#[derive(thiserror::Error, Debug)]
pub enum PsdError {
    /// The document could not be read from disk.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The bytes ran out before a read completed.
    #[error("Unexpected end of data at offset {offset} (wanted {wanted} bytes)")]
    UnexpectedEof {
        /// Offset where the read started
        offset: usize,
        /// Number of bytes the read needed
        wanted: usize,
    },

    /// The file does not begin with the `8BPS` signature.
    #[error("Not a PSD/PSB document (bad signature {0:?})")]
    BadSignature([u8; 4]),

    /// The header version is neither 1 (PSD) nor 2 (PSB).
    #[error("Unsupported document version {0}")]
    UnsupportedVersion(u16),

    /// A header field is outside the documented limits.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A block signature did not match what the format requires.
    #[error("Expected block signature {expected:?}, found {found:?} at offset {offset}")]
    BadBlockSignature {
        /// The signature the format requires here
        expected: &'static str,
        /// The bytes actually present
        found: [u8; 4],
        /// Offset of the signature
        offset: usize,
    },

    /// A descriptor item used an OSType this reader does not handle.
    #[error("Unsupported descriptor type {0:?}")]
    UnsupportedDescriptorType([u8; 4]),

    /// A `TySh` block had an unexpected version marker.
    #[error("Unsupported type tool data (version {0})")]
    UnsupportedTypeTool(u16),

    /// Engine data failed to tokenize or parse.
    #[error("Malformed engine data: {0}")]
    MalformedEngineData(String),

    /// Engine data parsed, but the font tables are missing or inconsistent.
    #[error("Malformed text data: {0}")]
    MalformedTextData(String),
}
