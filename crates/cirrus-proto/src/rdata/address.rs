//! Address record types (A, AAAA).

use crate::error::Result;
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A record - IPv4 address (RFC 1035).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A {
    /// The IPv4 address.
    address: Ipv4Addr,
}

impl A {
    /// Creates a new A record.
    #[inline]
    pub const fn new(address: Ipv4Addr) -> Self {
        Self { address }
    }

    /// Returns the address.
    #[inline]
    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Parses an A record: exactly 4 address bytes.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let octets: [u8; 4] = reader.read_bytes(4)?.try_into().unwrap();
        Ok(Self {
            address: Ipv4Addr::from(octets),
        })
    }

    /// Returns the wire format length.
    #[inline]
    pub const fn wire_len(&self) -> usize {
        4
    }

    /// Writes the A record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_bytes(&self.address.octets())
    }
}

impl From<Ipv4Addr> for A {
    fn from(address: Ipv4Addr) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// AAAA record - IPv6 address (RFC 3596).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AAAA {
    /// The IPv6 address.
    address: Ipv6Addr,
}

impl AAAA {
    /// Creates a new AAAA record.
    #[inline]
    pub const fn new(address: Ipv6Addr) -> Self {
        Self { address }
    }

    /// Returns the address.
    #[inline]
    pub const fn address(&self) -> Ipv6Addr {
        self.address
    }

    /// Parses an AAAA record: exactly 16 address bytes.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let octets: [u8; 16] = reader.read_bytes(16)?.try_into().unwrap();
        Ok(Self {
            address: Ipv6Addr::from(octets),
        })
    }

    /// Returns the wire format length.
    #[inline]
    pub const fn wire_len(&self) -> usize {
        16
    }

    /// Writes the AAAA record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_bytes(&self.address.octets())
    }
}

impl From<Ipv6Addr> for AAAA {
    fn from(address: Ipv6Addr) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for AAAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_roundtrip() {
        let a = A::new(Ipv4Addr::new(93, 184, 216, 34));

        let mut writer = WireWriter::new(4);
        a.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.as_ref(), &[93, 184, 216, 34]);

        let parsed = A::parse(&mut WireReader::new(&wire)).unwrap();
        assert_eq!(parsed, a);
        assert_eq!(parsed.to_string(), "93.184.216.34");
    }

    #[test]
    fn test_aaaa_roundtrip() {
        let aaaa = AAAA::new("2606:2800:220:1::248:1893".parse().unwrap());

        let mut writer = WireWriter::new(16);
        aaaa.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), 16);

        let parsed = AAAA::parse(&mut WireReader::new(&wire)).unwrap();
        assert_eq!(parsed, aaaa);
    }

    #[test]
    fn test_short_input() {
        assert!(A::parse(&mut WireReader::new(&[1, 2, 3])).is_err());
        assert!(AAAA::parse(&mut WireReader::new(&[0; 15])).is_err());
    }
}
