//! Text record types (TXT, HINFO).
//!
//! Both types are built from DNS character-strings: a length byte followed
//! by up to 255 bytes of data.

use crate::error::{Error, Result};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reads one character-string (length byte + data).
fn read_character_string<'a>(reader: &mut WireReader<'a>) -> Result<&'a [u8]> {
    let len = reader.read_u8()? as usize;
    reader.read_bytes(len)
}

/// Writes one character-string, rejecting data over 255 bytes.
fn write_character_string(buf: &mut WireWriter, data: &[u8]) -> Result<()> {
    if data.len() > 255 {
        return Err(Error::invalid_rdata(
            "TXT",
            format!("character-string of {} bytes exceeds 255", data.len()),
        ));
    }
    buf.write_u8(data.len() as u8)?;
    buf.write_bytes(data)
}

/// TXT record - Text strings (RFC 1035).
///
/// A TXT record carries one or more character-strings. The strings are
/// opaque bytes; SPF, DKIM and friends layer their own syntax on top.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TXT {
    /// The character-strings.
    strings: Vec<Vec<u8>>,
}

impl TXT {
    /// Creates a TXT record from character-strings.
    pub fn new(strings: Vec<Vec<u8>>) -> Self {
        Self { strings }
    }

    /// Creates a TXT record with a single character-string.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            strings: vec![data.into()],
        }
    }

    /// Returns the character-strings.
    pub fn strings(&self) -> &[Vec<u8>] {
        &self.strings
    }

    /// Returns all strings concatenated and lossily decoded.
    pub fn joined(&self) -> String {
        self.strings
            .iter()
            .map(|s| String::from_utf8_lossy(s))
            .collect()
    }

    /// Parses a TXT record: character-strings until the region ends.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let mut strings = Vec::new();
        while !reader.is_empty() {
            strings.push(read_character_string(reader)?.to_vec());
        }
        Ok(Self { strings })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        self.strings.iter().map(|s| 1 + s.len()).sum()
    }

    /// Writes the TXT record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        for string in &self.strings {
            write_character_string(buf, string)?;
        }
        Ok(())
    }
}

impl fmt::Display for TXT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, string) in self.strings.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "\"{}\"", String::from_utf8_lossy(string))?;
        }
        Ok(())
    }
}

/// HINFO record - Host information (RFC 1035).
///
/// Also returned in place of ANY answers per RFC 8482.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HINFO {
    /// CPU type.
    cpu: Vec<u8>,
    /// Operating system.
    os: Vec<u8>,
}

impl HINFO {
    /// Creates a new HINFO record.
    pub fn new(cpu: impl Into<Vec<u8>>, os: impl Into<Vec<u8>>) -> Self {
        Self {
            cpu: cpu.into(),
            os: os.into(),
        }
    }

    /// Returns the CPU type string.
    pub fn cpu(&self) -> &[u8] {
        &self.cpu
    }

    /// Returns the operating system string.
    pub fn os(&self) -> &[u8] {
        &self.os
    }

    /// Parses an HINFO record: two character-strings.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let cpu = read_character_string(reader)?.to_vec();
        let os = read_character_string(reader)?.to_vec();
        Ok(Self { cpu, os })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        2 + self.cpu.len() + self.os.len()
    }

    /// Writes the HINFO record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        write_character_string(buf, &self.cpu)?;
        write_character_string(buf, &self.os)
    }
}

impl fmt::Display for HINFO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" \"{}\"",
            String::from_utf8_lossy(&self.cpu),
            String::from_utf8_lossy(&self.os)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_roundtrip() {
        let txt = TXT::new(vec![b"v=spf1 -all".to_vec(), b"second".to_vec()]);

        let mut writer = WireWriter::new(64);
        txt.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), txt.wire_len());

        let mut reader = WireReader::new(&wire);
        let parsed = TXT::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, txt);
        assert_eq!(parsed.joined(), "v=spf1 -allsecond");
    }

    #[test]
    fn test_txt_truncated_string() {
        // Length byte promises 10 bytes, only 3 present.
        let wire = [10, b'a', b'b', b'c'];
        let mut reader = WireReader::new(&wire);
        assert!(matches!(
            TXT::parse(&mut reader),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_txt_oversized_string_rejected_on_write() {
        let txt = TXT::from_bytes(vec![0u8; 256]);
        let mut writer = WireWriter::new(512);
        assert!(matches!(
            txt.write_to(&mut writer),
            Err(Error::InvalidRData { .. })
        ));
    }

    #[test]
    fn test_hinfo_roundtrip() {
        let hinfo = HINFO::new(&b"RFC8482"[..], &b""[..]);

        let mut writer = WireWriter::new(16);
        hinfo.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), hinfo.wire_len());

        let mut reader = WireReader::new(&wire);
        let parsed = HINFO::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, hinfo);
        assert_eq!(parsed.to_string(), "\"RFC8482\" \"\"");
    }
}
