//! Photoshop descriptor structures.
//!
//! Descriptors are the keyed, recursively nested value containers Photoshop
//! uses inside additional layer information blocks. The type tool block
//! stores its text settings as one, with the engine data attached as a raw
//! data (`tdta`) item under the `EngineData` key.
//!
//! Keys and class IDs are length-prefixed; a zero length means a fixed
//! 4-byte key. Item values are tagged with a 4-byte OSType.

use super::reader::Reader;
use super::PsdError;

/// A parsed descriptor: class name, class ID, and keyed items in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Unicode class name (often empty)
    pub name: String,
    /// Class ID
    pub class_id: String,
    /// Items in the order they appear in the file
    pub items: Vec<(String, DescriptorValue)>,
}

impl Descriptor {
    /// Look up an item by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DescriptorValue> {
        self.items.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// A single descriptor item value.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorValue {
    /// Nested descriptor (`Objc` / `GlbO`)
    Descriptor(Descriptor),
    /// List of values (`VlLs`)
    List(Vec<DescriptorValue>),
    /// IEEE double (`doub`)
    Double(f64),
    /// Double with a unit tag (`UntF`)
    UnitFloat {
        /// Four-character unit code (`#Pnt`, `#Prc`, ...)
        unit: [u8; 4],
        /// The value
        value: f64,
    },
    /// Unicode string (`TEXT`)
    String(String),
    /// Enumerated value (`enum`)
    Enum {
        /// Enumeration type ID
        type_id: String,
        /// Enumeration value ID
        value: String,
    },
    /// 32-bit integer (`long`)
    Integer(i32),
    /// 64-bit integer (`comp`)
    LargeInteger(i64),
    /// Boolean (`bool`)
    Bool(bool),
    /// Class reference (`type` / `GlbC`)
    Class {
        /// Unicode class name
        name: String,
        /// Class ID
        class_id: String,
    },
    /// Opaque alias record (`alis`)
    Alias(Vec<u8>),
    /// Raw data (`tdta`) - this is where engine data lives
    RawData(Vec<u8>),
}

impl DescriptorValue {
    /// Raw bytes, when this is a `tdta` item.
    #[must_use]
    pub fn as_raw_data(&self) -> Option<&[u8]> {
        match self {
            Self::RawData(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Parse a descriptor from the reader.
///
/// The caller is expected to have consumed the 32-bit descriptor version
/// (16) that precedes descriptors in layer info blocks.
pub fn parse(reader: &mut Reader<'_>) -> Result<Descriptor, PsdError> {
    let name = reader.read_unicode_string()?;
    let class_id = read_id(reader)?;
    let count = reader.read_u32()? as usize;

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let key = read_id(reader)?;
        let value = parse_value(reader)?;
        items.push((key, value));
    }

    Ok(Descriptor {
        name,
        class_id,
        items,
    })
}

/// Read a key or class ID: 32-bit length, or a fixed 4-byte code when zero.
fn read_id(reader: &mut Reader<'_>) -> Result<String, PsdError> {
    let len = reader.read_u32()? as usize;
    let bytes = if len == 0 {
        reader.take(4)?
    } else {
        reader.take(len)?
    };
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Parse one OSType-tagged value.
fn parse_value(reader: &mut Reader<'_>) -> Result<DescriptorValue, PsdError> {
    let os_type = reader.read_tag()?;

    match &os_type {
        b"Objc" | b"GlbO" => Ok(DescriptorValue::Descriptor(parse(reader)?)),
        b"VlLs" => {
            let count = reader.read_u32()? as usize;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(parse_value(reader)?);
            }
            Ok(DescriptorValue::List(values))
        }
        b"doub" => Ok(DescriptorValue::Double(reader.read_f64()?)),
        b"UntF" => {
            let unit = reader.read_tag()?;
            let value = reader.read_f64()?;
            Ok(DescriptorValue::UnitFloat { unit, value })
        }
        b"TEXT" => Ok(DescriptorValue::String(reader.read_unicode_string()?)),
        b"enum" => {
            let type_id = read_id(reader)?;
            let value = read_id(reader)?;
            Ok(DescriptorValue::Enum { type_id, value })
        }
        b"long" => Ok(DescriptorValue::Integer(reader.read_i32()?)),
        b"comp" => Ok(DescriptorValue::LargeInteger(reader.read_i64()?)),
        b"bool" => Ok(DescriptorValue::Bool(reader.read_u8()? != 0)),
        b"type" | b"GlbC" => {
            let name = reader.read_unicode_string()?;
            let class_id = read_id(reader)?;
            Ok(DescriptorValue::Class { name, class_id })
        }
        b"alis" => {
            let len = reader.read_u32()? as usize;
            Ok(DescriptorValue::Alias(reader.take(len)?.to_vec()))
        }
        b"tdta" => {
            let len = reader.read_u32()? as usize;
            Ok(DescriptorValue::RawData(reader.take(len)?.to_vec()))
        }
        _ => Err(PsdError::UnsupportedDescriptorType(os_type)),
    }
}
