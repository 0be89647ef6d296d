//! Document header and layer-record traversal.
//!
//! Parses the file header, skips the color mode and image resources
//! sections by their declared lengths, then walks the layer records of the
//! layer and mask information section collecting every type tool (`TySh`)
//! block. Channel data is never touched; each layer record carries its
//! channel lengths, so the records can be read without it.

use std::path::Path;

use super::descriptor::{self, DescriptorValue};
use super::engine_data::{self, Value};
use super::reader::Reader;
use super::PsdError;

/// Maximum dimension of a PSD file.
const PSD_MAX_DIMENSION: u32 = 30_000;
/// Maximum dimension of a PSB file.
const PSB_MAX_DIMENSION: u32 = 300_000;

/// Additional layer information keys whose length field widens to 64 bits
/// in PSB files.
const PSB_WIDE_KEYS: [&[u8; 4]; 13] = [
    b"LMsk", b"Lr16", b"Lr32", b"Layr", b"Mt16", b"Mt32", b"Mtrn", b"Alph", b"FMsk", b"lnk2",
    b"FEid", b"FXid", b"PxSD",
];

/// Document format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Version 1: classic PSD, 32-bit section lengths
    Psd,
    /// Version 2: big document (PSB), 64-bit section lengths
    Psb,
}

impl Version {
    /// Whether section lengths are 64-bit.
    #[must_use]
    pub fn is_wide(self) -> bool {
        matches!(self, Self::Psb)
    }

    fn max_dimension(self) -> u32 {
        match self {
            Self::Psd => PSD_MAX_DIMENSION,
            Self::Psb => PSB_MAX_DIMENSION,
        }
    }
}

/// Parsed file header.
#[derive(Debug, Clone)]
pub struct Header {
    /// Format version
    pub version: Version,
    /// Number of channels, including alpha
    pub channels: u16,
    /// Height in pixels
    pub height: u32,
    /// Width in pixels
    pub width: u32,
    /// Bits per channel
    pub depth: u16,
    /// Color mode code (3 = RGB, 4 = CMYK, ...)
    pub color_mode: u16,
}

/// A text layer with its parsed engine data.
#[derive(Debug, Clone)]
pub struct TextLayer {
    /// Layer name (the `luni` Unicode name when present, otherwise the
    /// Pascal-string name from the record)
    pub name: String,
    /// Parsed engine data dictionary
    pub engine_data: Value,
}

/// A parsed document: header plus the text layers found in its records.
#[derive(Debug)]
pub struct Document {
    /// File header
    pub header: Header,
    /// Total number of layer records
    pub layer_count: usize,
    /// The type tool layers, in record order
    pub text_layers: Vec<TextLayer>,
}

impl Document {
    /// Read and parse a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PsdError::Io`] when the file cannot be read, or any parse
    /// error from [`Document::parse`].
    pub fn open(path: &Path) -> Result<Self, PsdError> {
        let bytes = std::fs::read(path).map_err(|source| PsdError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&bytes)
    }

    /// Parse a document from raw bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, PsdError> {
        let mut reader = Reader::new(bytes);

        let header = parse_header(&mut reader)?;
        let wide = header.version.is_wide();

        // Color mode data and image resources: length-prefixed, skipped.
        let color_mode_len = reader.read_u32()? as usize;
        reader.skip(color_mode_len)?;
        let resources_len = reader.read_u32()? as usize;
        reader.skip(resources_len)?;

        let section_len = reader.read_len(wide)? as usize;
        if section_len == 0 {
            return Ok(Self {
                header,
                layer_count: 0,
                text_layers: Vec::new(),
            });
        }

        let mut section = reader.sub_reader(section_len)?;
        let (layer_count, text_layers) = parse_layer_info(&mut section, wide)?;

        Ok(Self {
            header,
            layer_count,
            text_layers,
        })
    }
}

/// Parse and validate the 26-byte file header.
fn parse_header(reader: &mut Reader<'_>) -> Result<Header, PsdError> {
    let signature = reader.read_tag()?;
    if &signature != b"8BPS" {
        return Err(PsdError::BadSignature(signature));
    }

    let version = match reader.read_u16()? {
        1 => Version::Psd,
        2 => Version::Psb,
        other => return Err(PsdError::UnsupportedVersion(other)),
    };

    reader.skip(6)?; // reserved

    let channels = reader.read_u16()?;
    let height = reader.read_u32()?;
    let width = reader.read_u32()?;
    let depth = reader.read_u16()?;
    let color_mode = reader.read_u16()?;

    if !(1..=56).contains(&channels) {
        return Err(PsdError::InvalidHeader(format!(
            "channel count {channels} out of range"
        )));
    }
    let max = version.max_dimension();
    if height == 0 || height > max || width == 0 || width > max {
        return Err(PsdError::InvalidHeader(format!(
            "dimensions {width}x{height} out of range (max {max})"
        )));
    }
    if !matches!(depth, 1 | 8 | 16 | 32) {
        return Err(PsdError::InvalidHeader(format!("bit depth {depth}")));
    }

    Ok(Header {
        version,
        channels,
        height,
        width,
        depth,
        color_mode,
    })
}

/// Parse the layer info block: the signed layer count followed by one
/// record per layer. Channel image data follows the records and is left
/// unread.
fn parse_layer_info(
    section: &mut Reader<'_>,
    wide: bool,
) -> Result<(usize, Vec<TextLayer>), PsdError> {
    let layer_info_len = section.read_len(wide)? as usize;
    if layer_info_len == 0 {
        return Ok((0, Vec::new()));
    }

    let mut info = section.sub_reader(layer_info_len)?;

    // A negative count flags that the first alpha channel holds the merged
    // transparency; only the magnitude matters here.
    let layer_count = info.read_i16()?.unsigned_abs() as usize;

    let mut text_layers = Vec::new();
    for _ in 0..layer_count {
        if let Some(layer) = parse_layer_record(&mut info, wide)? {
            text_layers.push(layer);
        }
    }

    Ok((layer_count, text_layers))
}

/// Parse one layer record, returning a [`TextLayer`] when the record
/// carries a type tool block.
fn parse_layer_record(
    info: &mut Reader<'_>,
    wide: bool,
) -> Result<Option<TextLayer>, PsdError> {
    info.skip(16)?; // bounds: top, left, bottom, right

    let channel_count = info.read_u16()?;
    for _ in 0..channel_count {
        info.skip(2)?; // channel id
        info.read_len(wide)?; // channel data length (data itself comes later)
    }

    info.expect_tag("8BIM")?;
    info.skip(4)?; // blend mode key
    info.skip(4)?; // opacity, clipping, flags, filler

    let extra_len = info.read_u32()? as usize;
    let mut extra = info.sub_reader(extra_len)?;

    let mask_len = extra.read_u32()? as usize;
    extra.skip(mask_len)?;
    let ranges_len = extra.read_u32()? as usize;
    extra.skip(ranges_len)?;

    let mut name = extra.read_pascal_string(4)?;
    let mut engine_data = None;

    // Additional layer information blocks fill the rest of the extra data.
    while extra.remaining() >= 12 {
        let offset = extra.offset();
        let signature = extra.read_tag()?;
        if &signature != b"8BIM" && &signature != b"8B64" {
            return Err(PsdError::BadBlockSignature {
                expected: "8BIM",
                found: signature,
                offset,
            });
        }

        let key = extra.read_tag()?;
        let wide_block = wide && PSB_WIDE_KEYS.contains(&&key);
        let block_len = extra.read_len(wide_block)? as usize;
        let mut block = extra.sub_reader(block_len)?;

        // Block data is padded to an even length.
        if block_len % 2 == 1 && extra.remaining() > 0 {
            extra.skip(1)?;
        }

        match &key {
            b"TySh" => engine_data = Some(parse_type_tool(&mut block)?),
            b"luni" => name = block.read_unicode_string()?,
            _ => {
                log::trace!(
                    "Skipping additional layer info block {:?} ({} bytes)",
                    String::from_utf8_lossy(&key),
                    block_len
                );
            }
        }
    }

    Ok(engine_data.map(|engine_data| TextLayer { name, engine_data }))
}

/// Parse a type tool object setting block down to its engine data.
fn parse_type_tool(block: &mut Reader<'_>) -> Result<Value, PsdError> {
    let version = block.read_u16()?;
    if version != 1 {
        return Err(PsdError::UnsupportedTypeTool(version));
    }

    block.skip(48)?; // 2x3 transform, six doubles

    let text_version = block.read_u16()?;
    if text_version != 50 {
        return Err(PsdError::UnsupportedTypeTool(text_version));
    }
    block.skip(4)?; // descriptor version (16)

    let text = descriptor::parse(block)?;
    let raw = text
        .get("EngineData")
        .and_then(DescriptorValue::as_raw_data)
        .ok_or_else(|| {
            PsdError::MalformedTextData("type tool descriptor has no EngineData".to_string())
        })?;

    // Warp descriptor and bounds follow; nothing there names fonts.
    engine_data::parse(raw)
}
