//! Authority record types (SOA).

use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SOA record - Start of authority (RFC 1035).
///
/// The SOA record marks the start of a zone of authority and carries the
/// zone's administrative parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SOA {
    /// Primary name server for the zone.
    mname: Name,
    /// Mailbox of the person responsible for the zone.
    rname: Name,
    /// Version serial number of the zone.
    serial: u32,
    /// Refresh interval in seconds.
    refresh: u32,
    /// Retry interval in seconds.
    retry: u32,
    /// Expiration limit in seconds.
    expire: u32,
    /// Minimum TTL / negative caching TTL (RFC 2308).
    minimum: u32,
}

impl SOA {
    /// Creates a new SOA record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    ) -> Self {
        Self {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        }
    }

    /// Returns the primary name server.
    #[inline]
    pub fn mname(&self) -> &Name {
        &self.mname
    }

    /// Returns the responsible mailbox name.
    #[inline]
    pub fn rname(&self) -> &Name {
        &self.rname
    }

    /// Returns the zone serial number.
    #[inline]
    pub const fn serial(&self) -> u32 {
        self.serial
    }

    /// Returns the refresh interval.
    #[inline]
    pub const fn refresh(&self) -> u32 {
        self.refresh
    }

    /// Returns the retry interval.
    #[inline]
    pub const fn retry(&self) -> u32 {
        self.retry
    }

    /// Returns the expiration limit.
    #[inline]
    pub const fn expire(&self) -> u32 {
        self.expire
    }

    /// Returns the minimum / negative caching TTL.
    #[inline]
    pub const fn minimum(&self) -> u32 {
        self.minimum
    }

    /// Parses an SOA record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let parser = NameParser::new(reader.data());

        let (mname, consumed) = parser.parse_name(reader.position())?;
        reader.advance(consumed)?;
        let (rname, consumed) = parser.parse_name(reader.position())?;
        reader.advance(consumed)?;

        Ok(Self {
            mname,
            rname,
            serial: reader.read_u32()?,
            refresh: reader.read_u32()?,
            retry: reader.read_u32()?,
            expire: reader.read_u32()?,
            minimum: reader.read_u32()?,
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        self.mname.wire_len() + self.rname.wire_len() + 20
    }

    /// Writes the SOA record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        self.mname.write_wire(buf)?;
        self.rname.write_wire(buf)?;
        buf.write_u32(self.serial)?;
        buf.write_u32(self.refresh)?;
        buf.write_u32(self.retry)?;
        buf.write_u32(self.expire)?;
        buf.write_u32(self.minimum)
    }
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname, self.rname, self.serial, self.refresh, self.retry, self.expire,
            self.minimum
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_soa_roundtrip() {
        let soa = SOA::new(
            Name::from_str("ns.example.com.").unwrap(),
            Name::from_str("hostmaster.example.com.").unwrap(),
            2024_01_01,
            7200,
            3600,
            1_209_600,
            300,
        );

        let mut writer = WireWriter::new(128);
        soa.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), soa.wire_len());

        let mut reader = WireReader::new(&wire);
        let parsed = SOA::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, soa);
        assert_eq!(parsed.serial(), 2024_01_01);
    }

    #[test]
    fn test_soa_truncated() {
        let mut writer = WireWriter::new(64);
        Name::from_str("ns.example.com.")
            .unwrap()
            .write_wire(&mut writer)
            .unwrap();
        let wire = writer.freeze();

        // Only one name and no fixed fields.
        let mut reader = WireReader::new(&wire);
        assert!(SOA::parse(&mut reader).is_err());
    }
}
