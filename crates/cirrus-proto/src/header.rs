//! DNS message header.
//!
//! The DNS header is a fixed 12-byte structure at the start of every DNS
//! message. It contains control information and counts of the sections
//! that follow.

use crate::error::{Error, Result};
use crate::opcode::OpCode;
use crate::rcode::ResponseCode;
use crate::wire::{WireReader, WireWriter};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the DNS header in bytes.
pub const HEADER_SIZE: usize = 12;

bitflags! {
    /// DNS header flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct HeaderFlags: u16 {
        /// Query/Response flag: 0 = query, 1 = response
        const QR = 0x8000;

        /// Authoritative Answer: server is authoritative for the domain
        const AA = 0x0400;

        /// Truncation: message was truncated
        const TC = 0x0200;

        /// Recursion Desired: client wants recursive resolution
        const RD = 0x0100;

        /// Recursion Available: server supports recursion
        const RA = 0x0080;

        /// Reserved for future use (must be zero)
        const Z = 0x0040;

        /// Authentic Data: response data is authenticated (DNSSEC)
        const AD = 0x0020;

        /// Checking Disabled: disable DNSSEC validation
        const CD = 0x0010;
    }
}

impl Default for HeaderFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// DNS message header.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    QDCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ANCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    NSCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ARCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Message identifier for matching requests to responses.
    pub id: u16,

    /// Query/Response flag and other flags.
    pub flags: HeaderFlags,

    /// Operation code.
    pub opcode: OpCode,

    /// Response code (4-bit, extended with EDNS0).
    pub rcode: ResponseCode,

    /// Number of questions.
    pub qd_count: u16,

    /// Number of answer records.
    pub an_count: u16,

    /// Number of authority records.
    pub ns_count: u16,

    /// Number of additional records.
    pub ar_count: u16,
}

impl Header {
    /// Creates a new header with the given message ID.
    #[inline]
    pub const fn new(id: u16) -> Self {
        Self {
            id,
            flags: HeaderFlags::empty(),
            opcode: OpCode::Query,
            rcode: ResponseCode::NoError,
            qd_count: 0,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Creates a new query header with a random ID and recursion requested.
    pub fn query() -> Self {
        Self {
            id: rand::random(),
            flags: HeaderFlags::RD,
            opcode: OpCode::Query,
            rcode: ResponseCode::NoError,
            qd_count: 1,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Creates a response header from a query header.
    pub fn response_from(query: &Header) -> Self {
        Self {
            id: query.id,
            flags: HeaderFlags::QR | (query.flags & HeaderFlags::RD),
            opcode: query.opcode,
            rcode: ResponseCode::NoError,
            qd_count: query.qd_count,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Returns true if this is a query.
    #[inline]
    pub fn is_query(&self) -> bool {
        !self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if the response is from an authoritative server.
    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.flags.contains(HeaderFlags::AA)
    }

    /// Returns true if the message was truncated.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.flags.contains(HeaderFlags::TC)
    }

    /// Returns true if recursion was requested.
    #[inline]
    pub fn recursion_desired(&self) -> bool {
        self.flags.contains(HeaderFlags::RD)
    }

    /// Returns true if recursion is available.
    #[inline]
    pub fn recursion_available(&self) -> bool {
        self.flags.contains(HeaderFlags::RA)
    }

    /// Returns true if the response data is authenticated (DNSSEC).
    #[inline]
    pub fn is_authentic_data(&self) -> bool {
        self.flags.contains(HeaderFlags::AD)
    }

    /// Returns true if DNSSEC checking is disabled.
    #[inline]
    pub fn checking_disabled(&self) -> bool {
        self.flags.contains(HeaderFlags::CD)
    }

    /// Sets the QR flag (marks as response).
    #[inline]
    pub fn set_response(&mut self, response: bool) {
        self.flags.set(HeaderFlags::QR, response);
    }

    /// Sets the AA flag.
    #[inline]
    pub fn set_authoritative(&mut self, aa: bool) {
        self.flags.set(HeaderFlags::AA, aa);
    }

    /// Sets the TC flag.
    #[inline]
    pub fn set_truncated(&mut self, tc: bool) {
        self.flags.set(HeaderFlags::TC, tc);
    }

    /// Sets the RD flag.
    #[inline]
    pub fn set_recursion_desired(&mut self, rd: bool) {
        self.flags.set(HeaderFlags::RD, rd);
    }

    /// Sets the RA flag.
    #[inline]
    pub fn set_recursion_available(&mut self, ra: bool) {
        self.flags.set(HeaderFlags::RA, ra);
    }

    /// Sets the AD flag.
    #[inline]
    pub fn set_authentic_data(&mut self, ad: bool) {
        self.flags.set(HeaderFlags::AD, ad);
    }

    /// Sets the CD flag.
    #[inline]
    pub fn set_checking_disabled(&mut self, cd: bool) {
        self.flags.set(HeaderFlags::CD, cd);
    }

    /// Returns the total record count across the record sections.
    #[inline]
    pub fn total_record_count(&self) -> usize {
        self.an_count as usize + self.ns_count as usize + self.ar_count as usize
    }

    /// Parses a header from the reader.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        if reader.remaining() < HEADER_SIZE {
            return Err(Error::buffer_too_short(
                reader.position() + HEADER_SIZE,
                reader.data().len(),
            ));
        }

        let id = reader.read_u16()?;
        let flags_raw = reader.read_u16()?;

        // Opcode sits in bits 11-14.
        let opcode_value = ((flags_raw >> 11) & 0x0F) as u8;
        let opcode = OpCode::from_u8(opcode_value).ok_or(Error::InvalidOpCode {
            value: opcode_value,
        })?;

        // The 4-bit header rcode; extended bits come later from EDNS.
        let rcode_value = (flags_raw & 0x0F) as u8;
        let rcode = ResponseCode::from_header(rcode_value).ok_or(Error::InvalidResponseCode {
            value: u16::from(rcode_value),
        })?;

        let flags = HeaderFlags::from_bits_truncate(flags_raw);

        let qd_count = reader.read_u16()?;
        let an_count = reader.read_u16()?;
        let ns_count = reader.read_u16()?;
        let ar_count = reader.read_u16()?;

        Ok(Self {
            id,
            flags,
            opcode,
            rcode,
            qd_count,
            an_count,
            ns_count,
            ar_count,
        })
    }

    /// Writes the header in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u16(self.id)?;

        let mut flags_raw = self.flags.bits();
        flags_raw |= u16::from(self.opcode.to_u8()) << 11;
        flags_raw |= u16::from(self.rcode.header_rcode());
        buf.write_u16(flags_raw)?;

        buf.write_u16(self.qd_count)?;
        buf.write_u16(self.an_count)?;
        buf.write_u16(self.ns_count)?;
        buf.write_u16(self.ar_count)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID:{:04X} {} {}",
            self.id, self.opcode, self.rcode
        )?;

        if self.is_response() {
            write!(f, " QR")?;
        }
        if self.is_authoritative() {
            write!(f, " AA")?;
        }
        if self.is_truncated() {
            write!(f, " TC")?;
        }
        if self.recursion_desired() {
            write!(f, " RD")?;
        }
        if self.recursion_available() {
            write!(f, " RA")?;
        }
        if self.is_authentic_data() {
            write!(f, " AD")?;
        }
        if self.checking_disabled() {
            write!(f, " CD")?;
        }

        write!(
            f,
            " QD:{} AN:{} NS:{} AR:{}",
            self.qd_count, self.an_count, self.ns_count, self.ar_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_wire(header: &Header) -> Vec<u8> {
        let mut writer = WireWriter::new(HEADER_SIZE);
        header.write_to(&mut writer).unwrap();
        writer.as_bytes().to_vec()
    }

    #[test]
    fn test_header_roundtrip() {
        let mut header = Header::query();
        header.id = 0x1234;
        header.set_recursion_desired(true);
        header.qd_count = 1;

        let wire = to_wire(&header);
        let parsed = Header::parse(&mut WireReader::new(&wire)).unwrap();

        assert_eq!(header.id, parsed.id);
        assert_eq!(header.opcode, parsed.opcode);
        assert_eq!(header.recursion_desired(), parsed.recursion_desired());
        assert_eq!(header.qd_count, parsed.qd_count);
    }

    #[test]
    fn test_header_flags() {
        let mut header = Header::new(0);

        header.set_response(true);
        assert!(header.is_response());
        assert!(!header.is_query());

        header.set_authoritative(true);
        assert!(header.is_authoritative());

        header.set_truncated(true);
        assert!(header.is_truncated());

        header.set_authentic_data(true);
        assert!(header.is_authentic_data());
    }

    #[test]
    fn test_header_parse_too_short() {
        let result = Header::parse(&mut WireReader::new(&[0; 10]));
        assert!(matches!(result, Err(Error::BufferTooShort { .. })));
    }

    #[test]
    fn test_response_from_query() {
        let query = Header::query();
        let response = Header::response_from(&query);

        assert_eq!(query.id, response.id);
        assert!(query.is_query());
        assert!(response.is_response());
        assert_eq!(query.recursion_desired(), response.recursion_desired());
    }

    #[test]
    fn test_flag_bit_positions() {
        let mut header = Header::new(0xABCD);
        header.set_response(true);
        header.set_recursion_desired(true);
        header.rcode = ResponseCode::NXDomain;

        let wire = to_wire(&header);
        // QR (0x80) in the upper flag byte, RD (0x01) low bit of it,
        // RCODE 3 in the lower nibble of the second flag byte.
        assert_eq!(wire[2], 0x81);
        assert_eq!(wire[3], 0x03);
    }
}
