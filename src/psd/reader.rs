//! Big-endian cursor over a byte slice.
//!
//! Every multi-byte integer in a PSD is big-endian. The cursor keeps an
//! absolute offset so error messages point at the failing position even
//! when reading inside a nested sub-slice.

use byteorder::{BigEndian, ByteOrder};

use super::PsdError;

/// Cursor over document bytes with big-endian primitive reads.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Offset of `buf[0]` within the whole document, for error reporting.
    base: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the full document.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, base: 0 }
    }

    /// Absolute offset of the next byte to be read.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether all bytes have been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take `n` bytes, advancing the cursor.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], PsdError> {
        if self.remaining() < n {
            return Err(PsdError::UnexpectedEof {
                offset: self.offset(),
                wanted: n,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), PsdError> {
        self.take(n).map(|_| ())
    }

    /// Take `n` bytes as a nested reader that reports absolute offsets.
    pub fn sub_reader(&mut self, n: usize) -> Result<Reader<'a>, PsdError> {
        let base = self.offset();
        let slice = self.take(n)?;
        Ok(Reader {
            buf: slice,
            pos: 0,
            base,
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, PsdError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, PsdError> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, PsdError> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, PsdError> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, PsdError> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, PsdError> {
        Ok(BigEndian::read_u64(self.take(8)?))
    }

    pub fn read_i64(&mut self) -> Result<i64, PsdError> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, PsdError> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    /// Read a section length: 32-bit in PSD files, 64-bit in PSB files.
    pub fn read_len(&mut self, wide: bool) -> Result<u64, PsdError> {
        if wide {
            self.read_u64()
        } else {
            Ok(u64::from(self.read_u32()?))
        }
    }

    /// Read a 4-byte tag (signature or key).
    pub fn read_tag(&mut self) -> Result<[u8; 4], PsdError> {
        let bytes = self.take(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Read a 4-byte signature and require it to match.
    pub fn expect_tag(&mut self, expected: &'static str) -> Result<(), PsdError> {
        let offset = self.offset();
        let found = self.read_tag()?;
        if found != expected.as_bytes() {
            return Err(PsdError::BadBlockSignature {
                expected,
                found,
                offset,
            });
        }
        Ok(())
    }

    /// Read a Pascal string (length byte + bytes), padded so that the total
    /// consumed is a multiple of `pad`.
    pub fn read_pascal_string(&mut self, pad: usize) -> Result<String, PsdError> {
        let len = self.read_u8()? as usize;
        let bytes = self.take(len)?;
        let consumed = 1 + len;
        let padding = (pad - consumed % pad) % pad;
        self.skip(padding)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a Unicode string: a 32-bit code-unit count followed by UTF-16BE
    /// code units. A trailing NUL, which Photoshop usually writes, is trimmed.
    pub fn read_unicode_string(&mut self) -> Result<String, PsdError> {
        let count = self.read_u32()? as usize;
        let bytes = self.take(count * 2)?;

        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();

        let mut s: String = char::decode_utf16(units.into_iter())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();

        if s.ends_with('\0') {
            s.pop();
        }
        Ok(s)
    }
}
