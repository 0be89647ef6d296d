//! Parser for the text engine's `EngineData` serialization.
//!
//! Engine data is a PostScript-flavoured dump of nested dictionaries:
//!
//! ```text
//! <<
//!   /EngineDict
//!   <<
//!     /StyleRun
//!     <<
//!       /RunArray [ << /StyleSheet << /StyleSheetData << /Font 0 >> >> >> ]
//!       /RunLengthArray [ 5 ]
//!     >>
//!   >>
//!   /ResourceDict
//!   << /FontSet [ << /Name (þÿ...) /Script 0 >> ] >>
//! >>
//! ```
//!
//! Tokens are dicts (`<< >>`), arrays (`[ ]`), names (`/Key`), numbers,
//! booleans, and parenthesized strings. String bytes are UTF-16BE when they
//! carry a BOM; `(`, `)` and `\` are backslash-escaped.

use std::collections::HashMap;

use super::PsdError;

/// A parsed engine data value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Dictionary
    Dict(HashMap<String, Value>),
    /// Array
    Array(Vec<Value>),
    /// String (decoded from UTF-16BE or Latin-1)
    String(String),
    /// Integer number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// A bare name used in value position (`/nil` and friends)
    Name(String),
}

impl Value {
    /// Dictionary lookup; `None` when this is not a dict or the key is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Dict(map) => map.get(key),
            _ => None,
        }
    }

    /// The elements, when this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// The string contents, when this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value; floats with an integral value convert.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }
}

/// Parse an engine data blob into its top-level dictionary.
pub fn parse(bytes: &[u8]) -> Result<Value, PsdError> {
    let mut parser = Parser { bytes, pos: 0 };
    parser.skip_whitespace();

    let value = parser.parse_value()?;
    if !matches!(value, Value::Dict(_)) {
        return Err(PsdError::MalformedEngineData(
            "top-level value is not a dictionary".to_string(),
        ));
    }

    parser.skip_whitespace();
    if !parser.is_empty() {
        return Err(PsdError::MalformedEngineData(format!(
            "trailing bytes at offset {}",
            parser.pos
        )));
    }

    Ok(value)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n' | b'\0')) {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> PsdError {
        PsdError::MalformedEngineData(format!("{} at offset {}", message.into(), self.pos))
    }

    fn starts_with(&self, token: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(token)
    }

    fn parse_value(&mut self) -> Result<Value, PsdError> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(self.error("unexpected end of engine data")),
            Some(b'<') if self.starts_with(b"<<") => self.parse_dict(),
            Some(b'[') => self.parse_array(),
            Some(b'(') => self.parse_string(),
            Some(b'/') => {
                let name = self.parse_name()?;
                Ok(Value::Name(name))
            }
            Some(b't') if self.starts_with(b"true") => {
                self.pos += 4;
                Ok(Value::Bool(true))
            }
            Some(b'f') if self.starts_with(b"false") => {
                self.pos += 5;
                Ok(Value::Bool(false))
            }
            Some(b) if b == b'-' || b == b'.' || b.is_ascii_digit() => self.parse_number(),
            Some(b) => Err(self.error(format!("unexpected byte 0x{b:02x}"))),
        }
    }

    fn parse_dict(&mut self) -> Result<Value, PsdError> {
        self.pos += 2; // <<
        let mut map = HashMap::new();

        loop {
            self.skip_whitespace();
            if self.starts_with(b">>") {
                self.pos += 2;
                return Ok(Value::Dict(map));
            }

            if self.peek() != Some(b'/') {
                return Err(self.error("expected /key in dictionary"));
            }
            let key = self.parse_name()?;
            let value = self.parse_value()?;
            map.insert(key, value);
        }
    }

    fn parse_array(&mut self) -> Result<Value, PsdError> {
        self.pos += 1; // [
        let mut values = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::Array(values));
                }
                None => return Err(self.error("unterminated array")),
                _ => values.push(self.parse_value()?),
            }
        }
    }

    fn parse_name(&mut self) -> Result<String, PsdError> {
        self.pos += 1; // /
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace()
                || matches!(b, b'/' | b'(' | b')' | b'[' | b']' | b'<' | b'>')
            {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("empty name"));
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    /// Strings are raw bytes between parens, with `\` escaping `(`, `)` and
    /// `\`. A leading UTF-16BE BOM selects UTF-16 decoding; otherwise the
    /// bytes are treated as Latin-1.
    fn parse_string(&mut self) -> Result<Value, PsdError> {
        self.pos += 1; // (
        let mut raw = Vec::new();

        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(b'\\') => match self.bump() {
                    None => return Err(self.error("unterminated escape")),
                    Some(b) => raw.push(b),
                },
                Some(b')') => break,
                Some(b) => raw.push(b),
            }
        }

        Ok(Value::String(decode_string_bytes(&raw)))
    }

    fn parse_number(&mut self) -> Result<Value, PsdError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let mut saw_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !saw_dot => {
                    saw_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| self.error("invalid number"))?;

        if saw_dot {
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.error(format!("invalid number '{text}'")))
        } else {
            text.parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| self.error(format!("invalid number '{text}'")))
        }
    }
}

fn decode_string_bytes(raw: &[u8]) -> String {
    if let Some(utf16) = raw.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks(2)
            .map(|c| {
                if c.len() == 2 {
                    u16::from_be_bytes([c[0], c[1]])
                } else {
                    u16::from(c[0])
                }
            })
            .collect();
        char::decode_utf16(units.into_iter())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    } else {
        // No BOM: Latin-1, where every byte maps to the same code point.
        raw.iter().map(|&b| char::from(b)).collect()
    }
}
