//! CSYNC record (RFC 7477).

use crate::error::Result;
use crate::type_set::RecordTypeSet;
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// CSYNC record - Child-to-parent synchronization (RFC 7477).
///
/// Lets a child zone indicate which of its records the parental agent
/// should copy upward.
///
/// # Wire Format
///
/// ```text
///                       1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |                          SOA Serial                           |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |       Flags                   |            Type Bit Map       /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  /                     Type Bit Map (continued)                  /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CSYNC {
    /// SOA serial of the child zone this record corresponds to.
    soa_serial: u32,
    /// "immediate" flag (bit 0): process without waiting for the serial.
    immediate: bool,
    /// "soaminimum" flag (bit 1): require the serial to be current.
    soa_minimum: bool,
    /// The remaining 14 reserved flag bits, preserved verbatim.
    reserved_flags: u16,
    /// Types the parental agent should synchronize.
    type_bit_maps: RecordTypeSet,
}

impl CSYNC {
    const FLAG_IMMEDIATE: u16 = 0b0000_0001;
    const FLAG_SOA_MINIMUM: u16 = 0b0000_0010;
    const RESERVED_MASK: u16 = !(Self::FLAG_IMMEDIATE | Self::FLAG_SOA_MINIMUM);

    /// Creates a new CSYNC record.
    pub fn new(
        soa_serial: u32,
        immediate: bool,
        soa_minimum: bool,
        reserved_flags: u16,
        type_bit_maps: RecordTypeSet,
    ) -> Self {
        Self {
            soa_serial,
            immediate,
            soa_minimum,
            reserved_flags: reserved_flags & Self::RESERVED_MASK,
            type_bit_maps,
        }
    }

    /// Returns the SOA serial.
    #[inline]
    pub const fn soa_serial(&self) -> u32 {
        self.soa_serial
    }

    /// Returns the immediate flag.
    #[inline]
    pub const fn immediate(&self) -> bool {
        self.immediate
    }

    /// Returns the soaminimum flag.
    #[inline]
    pub const fn soa_minimum(&self) -> bool {
        self.soa_minimum
    }

    /// Returns the reserved flag bits.
    #[inline]
    pub const fn reserved_flags(&self) -> u16 {
        self.reserved_flags
    }

    /// Returns the combined 16-bit flags field.
    pub const fn flags(&self) -> u16 {
        let mut flags = self.reserved_flags;
        if self.immediate {
            flags |= Self::FLAG_IMMEDIATE;
        }
        if self.soa_minimum {
            flags |= Self::FLAG_SOA_MINIMUM;
        }
        flags
    }

    /// Returns the type bitmap set.
    pub fn type_bit_maps(&self) -> &RecordTypeSet {
        &self.type_bit_maps
    }

    /// Parses a CSYNC record: serial, flags, then the bitmap to the
    /// region end.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let soa_serial = reader.read_u32()?;
        let flags = reader.read_u16()?;
        let type_bit_maps = RecordTypeSet::parse(reader)?;

        Ok(Self {
            soa_serial,
            immediate: flags & Self::FLAG_IMMEDIATE != 0,
            soa_minimum: flags & Self::FLAG_SOA_MINIMUM != 0,
            reserved_flags: flags & Self::RESERVED_MASK,
            type_bit_maps,
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        6 + self.type_bit_maps.wire_len()
    }

    /// Writes the CSYNC record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u32(self.soa_serial)?;
        buf.write_u16(self.flags())?;
        self.type_bit_maps.write_to(buf)
    }
}

impl fmt::Display for CSYNC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.soa_serial, self.flags())?;
        if !self.type_bit_maps.is_empty() {
            write!(f, " {}", self.type_bit_maps)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtype::RecordType;

    #[test]
    fn test_flags_split_and_recombine() {
        // Flag pattern 0b0000_0011 with an empty bitmap: both low flags
        // set, no reserved bits.
        let wire = [0x00, 0x00, 0x00, 0x01, 0x00, 0b0000_0011];
        let mut reader = WireReader::new(&wire);
        let csync = CSYNC::parse(&mut reader).unwrap();

        assert!(reader.is_empty());
        assert_eq!(csync.soa_serial(), 1);
        assert!(csync.immediate());
        assert!(csync.soa_minimum());
        assert_eq!(csync.reserved_flags(), 0);
        assert!(csync.type_bit_maps().is_empty());

        // Re-encodes to the identical 6 bytes with zero bitmap windows.
        let mut writer = WireWriter::new(16);
        csync.write_to(&mut writer).unwrap();
        assert_eq!(writer.as_bytes(), wire);
        assert_eq!(csync.wire_len(), 6);
    }

    #[test]
    fn test_reserved_flags_preserved() {
        let wire = [0x12, 0x34, 0x56, 0x78, 0b1010_0000, 0b0000_0101];
        let mut reader = WireReader::new(&wire);
        let csync = CSYNC::parse(&mut reader).unwrap();

        assert_eq!(csync.soa_serial(), 0x1234_5678);
        assert!(csync.immediate());
        assert!(!csync.soa_minimum());
        assert_eq!(csync.reserved_flags(), 0b1010_0000_0000_0100);
        assert_eq!(csync.flags(), 0b1010_0000_0000_0101);

        let mut writer = WireWriter::new(16);
        csync.write_to(&mut writer).unwrap();
        assert_eq!(writer.as_bytes(), wire);
    }

    #[test]
    fn test_roundtrip_with_bitmap() {
        let csync = CSYNC::new(
            66,
            true,
            false,
            0,
            RecordTypeSet::from_types([RecordType::A, RecordType::NS, RecordType::AAAA]),
        );

        let mut writer = WireWriter::new(32);
        csync.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), csync.wire_len());

        let mut reader = WireReader::new(&wire);
        let parsed = CSYNC::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, csync);
        assert!(parsed.type_bit_maps().contains_type(RecordType::NS));
    }

    #[test]
    fn test_too_short() {
        let mut reader = WireReader::new(&[0x00, 0x00, 0x00, 0x01, 0x00]);
        assert!(CSYNC::parse(&mut reader).is_err());
    }
}
