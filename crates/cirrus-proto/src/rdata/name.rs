//! Name-based record types (NS, CNAME, PTR, MX).

use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reads an embedded name at the reader's position, honoring compression
/// pointers into earlier message bytes.
fn parse_embedded_name(reader: &mut WireReader<'_>) -> Result<Name> {
    let parser = NameParser::new(reader.data());
    let (name, consumed) = parser.parse_name(reader.position())?;
    reader.advance(consumed)?;
    Ok(name)
}

/// NS record - Name server (RFC 1035).
///
/// The NS record specifies an authoritative name server for the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NS {
    /// The name server domain name.
    nsdname: Name,
}

impl NS {
    /// Creates a new NS record.
    #[inline]
    pub fn new(nsdname: Name) -> Self {
        Self { nsdname }
    }

    /// Returns the name server name.
    #[inline]
    pub fn nsdname(&self) -> &Name {
        &self.nsdname
    }

    /// Parses an NS record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            nsdname: parse_embedded_name(reader)?,
        })
    }

    /// Returns the wire format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.nsdname.wire_len()
    }

    /// Writes the NS record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        self.nsdname.write_wire(buf)
    }
}

impl fmt::Display for NS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nsdname)
    }
}

/// CNAME record - Canonical name (RFC 1035).
///
/// The CNAME record specifies that the domain name is an alias for another
/// name. A resolver encountering a CNAME restarts the query with the
/// canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CNAME {
    /// The canonical domain name.
    cname: Name,
}

impl CNAME {
    /// Creates a new CNAME record.
    #[inline]
    pub fn new(cname: Name) -> Self {
        Self { cname }
    }

    /// Returns the canonical name (target).
    #[inline]
    pub fn target(&self) -> &Name {
        &self.cname
    }

    /// Parses a CNAME record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            cname: parse_embedded_name(reader)?,
        })
    }

    /// Returns the wire format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.cname.wire_len()
    }

    /// Writes the CNAME record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        self.cname.write_wire(buf)
    }
}

impl fmt::Display for CNAME {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cname)
    }
}

/// PTR record - Pointer (RFC 1035).
///
/// The PTR record is used for reverse DNS lookups, mapping an IP address
/// back to a domain name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PTR {
    /// The pointed-to domain name.
    ptrdname: Name,
}

impl PTR {
    /// Creates a new PTR record.
    #[inline]
    pub fn new(ptrdname: Name) -> Self {
        Self { ptrdname }
    }

    /// Returns the pointed-to domain name.
    #[inline]
    pub fn ptrdname(&self) -> &Name {
        &self.ptrdname
    }

    /// Parses a PTR record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            ptrdname: parse_embedded_name(reader)?,
        })
    }

    /// Returns the wire format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.ptrdname.wire_len()
    }

    /// Writes the PTR record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        self.ptrdname.write_wire(buf)
    }
}

impl fmt::Display for PTR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ptrdname)
    }
}

/// MX record - Mail exchange (RFC 1035).
///
/// The MX record names a mail server for the domain along with a
/// preference value; lower preference values are tried first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MX {
    /// Preference (lower is preferred).
    preference: u16,
    /// The mail exchange host.
    exchange: Name,
}

impl MX {
    /// Creates a new MX record.
    #[inline]
    pub fn new(preference: u16, exchange: Name) -> Self {
        Self {
            preference,
            exchange,
        }
    }

    /// Returns the preference value.
    #[inline]
    pub const fn preference(&self) -> u16 {
        self.preference
    }

    /// Returns the mail exchange host name.
    #[inline]
    pub fn exchange(&self) -> &Name {
        &self.exchange
    }

    /// Parses an MX record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let preference = reader.read_u16()?;
        let exchange = parse_embedded_name(reader)?;
        Ok(Self {
            preference,
            exchange,
        })
    }

    /// Returns the wire format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        2 + self.exchange.wire_len()
    }

    /// Writes the MX record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u16(self.preference)?;
        self.exchange.write_wire(buf)
    }
}

impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_cname_roundtrip() {
        let cname = CNAME::new(Name::from_str("github.com.").unwrap());

        let mut writer = WireWriter::new(32);
        cname.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), cname.wire_len());

        let mut reader = WireReader::new(&wire);
        let parsed = CNAME::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, cname);
        assert_eq!(parsed.target().to_string(), "github.com.");
    }

    #[test]
    fn test_mx_roundtrip() {
        let mx = MX::new(10, Name::from_str("in1-smtp.messagingengine.com.").unwrap());

        let mut writer = WireWriter::new(64);
        mx.write_to(&mut writer).unwrap();
        let wire = writer.freeze();

        let mut reader = WireReader::new(&wire);
        let parsed = MX::parse(&mut reader).unwrap();
        assert_eq!(parsed.preference(), 10);
        assert_eq!(parsed, mx);
    }

    #[test]
    fn test_compressed_target() {
        // Owner name at offset 0, then an NS rdata that points back at it.
        let mut wire = Vec::new();
        wire.extend_from_slice(&[3, b'n', b's', b'1', 7]);
        wire.extend_from_slice(b"example");
        wire.extend_from_slice(&[3, b'c', b'o', b'm', 0]);
        let rdata_start = wire.len();
        wire.extend_from_slice(&[0xC0, 0x04]); // pointer to "example.com."

        let mut reader = WireReader::new(&wire);
        reader.set_position(rdata_start);
        let ns = NS::parse(&mut reader).unwrap();
        assert_eq!(ns.nsdname().to_string(), "example.com.");
        assert!(reader.is_empty());
    }
}
