//! Opaque record payloads (NULL, unknown types).

use crate::error::Result;
use crate::wire::{WireReader, WireWriter};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// NULL record (RFC 1035).
///
/// An experimental record whose RDATA is anything up to 65535 bytes.
/// Mostly seen in hand-rolled tooling and some legacy probes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NULL {
    /// The opaque payload.
    data: Vec<u8>,
}

impl NULL {
    /// Creates a new NULL record.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// Returns the payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parses a NULL record: the whole remaining region.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            data: reader.read_to_end().to_vec(),
        })
    }

    /// Returns the wire format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.data.len()
    }

    /// Writes the NULL record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_bytes(&self.data)
    }
}

impl fmt::Display for NULL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\# {} {}", self.data.len(), HEXLOWER.encode(&self.data))
    }
}

/// Unknown record type - preserves raw RDATA.
///
/// Record types without explicit parsing support are captured with their
/// type code and raw bytes, and serialize back to identical wire format.
///
/// Per RFC 3597, unknown record types render as `\# <length> <hex-data>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unknown {
    /// The record type code.
    type_code: u16,
    /// The raw RDATA bytes.
    data: Vec<u8>,
}

impl Unknown {
    /// Creates a new unknown record payload.
    pub fn new(type_code: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            type_code,
            data: data.into(),
        }
    }

    /// Returns the record type code.
    #[inline]
    pub const fn type_code(&self) -> u16 {
        self.type_code
    }

    /// Returns the raw RDATA.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the RDATA as a hex string.
    pub fn data_hex(&self) -> String {
        HEXLOWER.encode(&self.data)
    }

    /// Returns the wire format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.data.len()
    }

    /// Writes the raw RDATA in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_bytes(&self.data)
    }
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\# {} {}", self.data.len(), self.data_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_roundtrip() {
        let wire = [0xCA, 0xFE, 0xBA, 0xBE];
        let mut reader = WireReader::new(&wire);
        let null = NULL::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(null.data(), wire);

        let mut writer = WireWriter::new(8);
        null.write_to(&mut writer).unwrap();
        assert_eq!(writer.as_bytes(), wire);
    }

    #[test]
    fn test_unknown_record() {
        let unknown = Unknown::new(65412, vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(unknown.type_code(), 65412);
        assert_eq!(unknown.data(), &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(unknown.data_hex(), "01020304");
    }

    #[test]
    fn test_unknown_display() {
        let unknown = Unknown::new(65534, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(unknown.to_string(), "\\# 4 deadbeef");
    }
}
