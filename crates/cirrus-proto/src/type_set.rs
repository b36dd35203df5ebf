//! Record-type bitmap sets (RFC 4034 Section 4.1.2).
//!
//! NSEC-family records (and CSYNC) carry the set of record types present
//! at a name as a windowed bitmap: the 16-bit type space is split into 256
//! windows of 256 types, and each non-empty window is encoded as
//! `(window number, bitmap length, bitmap bytes)` with trailing all-zero
//! bitmap bytes trimmed.

use crate::error::{Error, Result};
use crate::rtype::RecordType;
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A set of 16-bit record-type codes in windowed bitmap encoding.
///
/// The set stores raw type codes so values outside the modeled
/// [`RecordType`] roster round-trip unchanged. Iteration is always in
/// ascending code order, which is also the emission order of the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RecordTypeSet {
    /// Member type codes, kept sorted.
    codes: BTreeSet<u16>,
}

impl RecordTypeSet {
    /// Creates an empty set.
    #[inline]
    pub fn new() -> Self {
        Self {
            codes: BTreeSet::new(),
        }
    }

    /// Creates a set from raw type codes.
    pub fn from_codes(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    /// Creates a set from record types.
    pub fn from_types(types: impl IntoIterator<Item = RecordType>) -> Self {
        Self::from_codes(types.into_iter().map(RecordType::to_u16))
    }

    /// Inserts a type code. Returns true if it was not already present.
    #[inline]
    pub fn insert(&mut self, code: u16) -> bool {
        self.codes.insert(code)
    }

    /// Returns true if the given type code is a member.
    #[inline]
    pub fn contains(&self, code: u16) -> bool {
        self.codes.contains(&code)
    }

    /// Returns true if the given record type is a member.
    #[inline]
    pub fn contains_type(&self, rtype: RecordType) -> bool {
        self.contains(rtype.to_u16())
    }

    /// Returns the number of member codes.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterates over the member codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.codes.iter().copied()
    }

    /// Parses a bitmap set from the remainder of the reader's region.
    ///
    /// The caller bounds the reader at the outer (RDATA) end; windows are
    /// read until that boundary is reached. Windows must strictly increase
    /// and each bitmap must be 1 to 32 bytes long.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let mut codes = BTreeSet::new();
        let mut previous_window: Option<u8> = None;

        while !reader.is_empty() {
            let window = reader.read_u8()?;
            let bitmap_len = reader.read_u8()? as usize;

            if let Some(prev) = previous_window {
                if window <= prev {
                    return Err(Error::InvalidTypeBitmap {
                        message: format!("window {window} does not increase after {prev}"),
                    });
                }
            }
            previous_window = Some(window);

            if bitmap_len == 0 || bitmap_len > 32 {
                return Err(Error::InvalidTypeBitmap {
                    message: format!("bitmap length {bitmap_len} outside 1..=32"),
                });
            }

            let bitmap = reader.read_bytes(bitmap_len)?;
            for (byte_idx, &byte) in bitmap.iter().enumerate() {
                for bit in 0..8u16 {
                    if byte & (0x80 >> bit) != 0 {
                        let code =
                            u16::from(window) << 8 | (byte_idx as u16) << 3 | bit;
                        codes.insert(code);
                    }
                }
            }
        }

        Ok(Self { codes })
    }

    /// Returns the encoded length in bytes.
    ///
    /// Each window costs 2 header bytes plus a bitmap sized by its highest
    /// set bit (codes are sorted, so the last code per window decides).
    pub fn wire_len(&self) -> usize {
        let mut total = 0;
        let mut iter = self.codes.iter().peekable();

        while let Some(&&first) = iter.peek() {
            let window = first >> 8;
            let mut last_low = 0u16;
            while let Some(&&code) = iter.peek() {
                if code >> 8 != window {
                    break;
                }
                last_low = code & 0xFF;
                iter.next();
            }
            total += 2 + (last_low / 8 + 1) as usize;
        }
        total
    }

    /// Writes the bitmap set in wire format.
    ///
    /// Windows are emitted in ascending order; an empty set writes nothing.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        let mut iter = self.codes.iter().peekable();

        while let Some(&&first) = iter.peek() {
            let window = first >> 8;
            let mut bitmap = [0u8; 32];
            let mut highest_byte = 0usize;

            while let Some(&&code) = iter.peek() {
                if code >> 8 != window {
                    break;
                }
                let low = code & 0xFF;
                let byte_idx = (low / 8) as usize;
                bitmap[byte_idx] |= 0x80 >> (low % 8);
                highest_byte = byte_idx;
                iter.next();
            }

            buf.write_u8(window as u8)?;
            buf.write_u8((highest_byte + 1) as u8)?;
            buf.write_bytes(&bitmap[..=highest_byte])?;
        }

        Ok(())
    }
}

impl FromIterator<u16> for RecordTypeSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self::from_codes(iter)
    }
}

impl fmt::Display for RecordTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match RecordType::from_u16(code) {
                Some(rtype) => write!(f, "{rtype}")?,
                None => write!(f, "TYPE{code}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(set: &RecordTypeSet) -> RecordTypeSet {
        let mut writer = WireWriter::new(64);
        set.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), set.wire_len());

        let mut reader = WireReader::new(&wire);
        let parsed = RecordTypeSet::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        parsed
    }

    #[test]
    fn test_empty_set_encodes_to_nothing() {
        let set = RecordTypeSet::new();
        assert_eq!(set.wire_len(), 0);

        let mut writer = WireWriter::new(8);
        set.write_to(&mut writer).unwrap();
        assert!(writer.is_empty());

        assert_eq!(roundtrip(&set), set);
    }

    #[test]
    fn test_single_window_roundtrip() {
        let set = RecordTypeSet::from_types([
            RecordType::A,
            RecordType::NS,
            RecordType::SOA,
            RecordType::MX,
            RecordType::AAAA,
        ]);
        let parsed = roundtrip(&set);
        assert_eq!(parsed, set);
        assert!(parsed.contains_type(RecordType::AAAA));
        assert!(!parsed.contains_type(RecordType::TXT));
    }

    #[test]
    fn test_multi_window_ascending() {
        // A (window 0), CAA (window 1, code 257), and a high private-use
        // code in window 0xFF.
        let set = RecordTypeSet::from_codes([1, 257, 0xFF00 | 0x42]);

        let mut writer = WireWriter::new(64);
        set.write_to(&mut writer).unwrap();
        let wire = writer.freeze();

        // Window bytes appear in ascending order: 0, 1, 255.
        assert_eq!(wire[0], 0);
        let second_window = 2 + wire[1] as usize;
        assert_eq!(wire[second_window], 1);

        assert_eq!(roundtrip(&set), set);
    }

    #[test]
    fn test_no_trailing_zero_bytes() {
        // Code 1 (A) sets bit 1 of byte 0: the bitmap must be exactly one
        // byte even though the window could span 32.
        let set = RecordTypeSet::from_codes([1]);

        let mut writer = WireWriter::new(8);
        set.write_to(&mut writer).unwrap();
        let wire = writer.freeze();

        assert_eq!(wire.as_ref(), &[0x00, 0x01, 0x40]);
    }

    #[test]
    fn test_reject_oversized_bitmap() {
        let wire = [0x00, 33];
        let mut reader = WireReader::new(&wire);
        assert!(matches!(
            RecordTypeSet::parse(&mut reader),
            Err(Error::InvalidTypeBitmap { .. })
        ));

        let wire = [0x00, 0];
        let mut reader = WireReader::new(&wire);
        assert!(matches!(
            RecordTypeSet::parse(&mut reader),
            Err(Error::InvalidTypeBitmap { .. })
        ));
    }

    #[test]
    fn test_reject_non_increasing_windows() {
        // Two windows with the same number.
        let wire = [0x00, 0x01, 0x40, 0x00, 0x01, 0x40];
        let mut reader = WireReader::new(&wire);
        assert!(matches!(
            RecordTypeSet::parse(&mut reader),
            Err(Error::InvalidTypeBitmap { .. })
        ));

        // Decreasing windows.
        let wire = [0x01, 0x01, 0x40, 0x00, 0x01, 0x40];
        let mut reader = WireReader::new(&wire);
        assert!(matches!(
            RecordTypeSet::parse(&mut reader),
            Err(Error::InvalidTypeBitmap { .. })
        ));
    }

    #[test]
    fn test_truncated_bitmap() {
        let wire = [0x00, 0x04, 0x40];
        let mut reader = WireReader::new(&wire);
        assert!(matches!(
            RecordTypeSet::parse(&mut reader),
            Err(Error::UnexpectedEof { .. })
        ));
    }
}
