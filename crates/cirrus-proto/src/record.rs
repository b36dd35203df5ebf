//! DNS resource records.
//!
//! A resource record (RR) is the fundamental unit of DNS data,
//! containing a name, type, class, TTL, and record-specific data.

use crate::class::{Class, RecordClass};
use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::rdata::RData;
use crate::rtype::{RecordType, Type};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A DNS resource record.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                      NAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     CLASS                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TTL                      |
/// |                                               |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                   RDLENGTH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RDATA                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// The domain name this record is for.
    name: Name,
    /// The record type.
    rtype: Type,
    /// The record class.
    rclass: Class,
    /// Time to live in seconds.
    ttl: u32,
    /// The record data.
    rdata: RData,
}

impl ResourceRecord {
    /// Creates a new resource record.
    pub fn new(name: Name, rtype: Type, rclass: Class, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        }
    }

    /// Creates a new resource record with known type and class.
    pub fn new_known(
        name: Name,
        rtype: RecordType,
        rclass: RecordClass,
        ttl: u32,
        rdata: RData,
    ) -> Self {
        Self::new(name, Type::Known(rtype), Class::Known(rclass), ttl, rdata)
    }

    /// Creates an A record.
    pub fn a(name: Name, ttl: u32, addr: std::net::Ipv4Addr) -> Self {
        Self::new_known(
            name,
            RecordType::A,
            RecordClass::IN,
            ttl,
            RData::A(crate::rdata::A::new(addr)),
        )
    }

    /// Creates an AAAA record.
    pub fn aaaa(name: Name, ttl: u32, addr: std::net::Ipv6Addr) -> Self {
        Self::new_known(
            name,
            RecordType::AAAA,
            RecordClass::IN,
            ttl,
            RData::AAAA(crate::rdata::AAAA::new(addr)),
        )
    }

    /// Creates a CNAME record.
    pub fn cname(name: Name, ttl: u32, target: Name) -> Self {
        Self::new_known(
            name,
            RecordType::CNAME,
            RecordClass::IN,
            ttl,
            RData::CNAME(crate::rdata::CNAME::new(target)),
        )
    }

    /// Creates an MX record.
    pub fn mx(name: Name, ttl: u32, preference: u16, exchange: Name) -> Self {
        Self::new_known(
            name,
            RecordType::MX,
            RecordClass::IN,
            ttl,
            RData::MX(crate::rdata::MX::new(preference, exchange)),
        )
    }

    /// Creates a TXT record with a single character-string.
    pub fn txt(name: Name, ttl: u32, text: impl Into<Vec<u8>>) -> Self {
        Self::new_known(
            name,
            RecordType::TXT,
            RecordClass::IN,
            ttl,
            RData::TXT(crate::rdata::TXT::from_bytes(text)),
        )
    }

    /// Returns the record name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the record type.
    #[inline]
    pub fn rtype(&self) -> Type {
        self.rtype
    }

    /// Returns the record type if known.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.rtype.as_known()
    }

    /// Returns the record class.
    #[inline]
    pub fn rclass(&self) -> Class {
        self.rclass
    }

    /// Returns the record class if known.
    #[inline]
    pub fn record_class(&self) -> Option<RecordClass> {
        self.rclass.as_known()
    }

    /// Returns the TTL in seconds.
    #[inline]
    pub const fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the TTL as a Duration.
    #[inline]
    pub fn ttl_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl))
    }

    /// Returns the record data.
    #[inline]
    pub fn rdata(&self) -> &RData {
        &self.rdata
    }

    /// Returns a copy with a different TTL.
    pub fn with_ttl(&self, ttl: u32) -> Self {
        let mut record = self.clone();
        record.ttl = ttl;
        record
    }

    /// Parses a resource record at the reader's position.
    ///
    /// The RDATA is parsed through a sub-cursor truncated at the declared
    /// RDATA end, and the variant must consume exactly that region; under-
    /// or over-consumption is reported as a length mismatch.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let parser = NameParser::new(reader.data());
        let (name, name_len) = parser.parse_name(reader.position())?;
        reader.advance(name_len)?;

        let rtype = Type::from_u16(reader.read_u16()?);
        let rclass = Class::from_u16(reader.read_u16()?);
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()?;

        let rdata_start = reader.position();
        let rdata_end = rdata_start + rdlength as usize;
        let mut rdata_reader = reader.bounded(rdata_end)?;

        let rdata = RData::parse(rtype, &mut rdata_reader)?;
        if rdata_reader.position() != rdata_end {
            return Err(Error::rdata_length_mismatch(
                rtype.to_string(),
                rdlength as usize,
                rdata_reader.position() - rdata_start,
            ));
        }
        reader.set_position(rdata_end);

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        self.name.wire_len() + 10 + self.rdata.wire_len()
    }

    /// Writes the resource record in wire format.
    ///
    /// RDLENGTH is back-patched from what the RDATA actually wrote.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        self.name.write_wire(buf)?;
        buf.write_u16(self.rtype.to_u16())?;
        buf.write_u16(self.rclass.to_u16())?;
        buf.write_u32(self.ttl)?;

        let rdlength = buf.begin_length()?;
        self.rdata.write_to(buf)?;
        buf.end_length(rdlength)
    }

    /// Converts the record to wire format bytes.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut buf = WireWriter::new(self.wire_len());
        self.write_to(&mut buf)?;
        Ok(buf.as_bytes().to_vec())
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.rclass, self.rtype, self.rdata
        )
    }
}

/// Parser for resource record sections.
#[derive(Debug)]
pub struct RecordParser<'a, 'r> {
    /// The message reader.
    reader: &'r mut WireReader<'a>,
    /// Number of records remaining.
    remaining: u16,
}

impl<'a, 'r> RecordParser<'a, 'r> {
    /// Creates a new record parser.
    #[inline]
    pub fn new(reader: &'r mut WireReader<'a>, count: u16) -> Self {
        Self {
            reader,
            remaining: count,
        }
    }

    /// Returns the number of remaining records.
    #[inline]
    pub const fn remaining(&self) -> u16 {
        self.remaining
    }

    /// Parses the next record, or returns `None` when the declared count
    /// is exhausted.
    pub fn next(&mut self) -> Result<Option<ResourceRecord>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let record = ResourceRecord::parse(self.reader)?;
        self.remaining -= 1;
        Ok(Some(record))
    }
}
