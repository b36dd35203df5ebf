//! DNS name parsing from wire format with compression support.
//!
//! This module handles parsing domain names from DNS wire format,
//! including support for name compression (RFC 1035 Section 4.1.4).

use super::Name;
use crate::MAX_NAME_LENGTH;
use crate::error::{Error, Result};
use smallvec::SmallVec;

/// Maximum number of compression pointer jumps before giving up.
///
/// A legal 255-byte name can contain at most 127 two-byte pointers, so any
/// chain longer than this is a loop.
const MAX_COMPRESSION_JUMPS: usize = 128;

/// Parser for reading domain names from DNS wire format.
///
/// This parser handles both uncompressed names and names using compression
/// pointers. It holds the complete message buffer so pointer targets can be
/// resolved.
#[derive(Debug, Clone)]
pub struct NameParser<'a> {
    /// The complete message buffer (for compression pointer resolution).
    message: &'a [u8],
}

impl<'a> NameParser<'a> {
    /// Creates a new name parser with the given message buffer.
    #[inline]
    pub const fn new(message: &'a [u8]) -> Self {
        Self { message }
    }

    /// Parses a domain name starting at the given offset.
    ///
    /// Returns the parsed name and the number of bytes consumed from the
    /// starting position. After a compression pointer the outer position
    /// resumes immediately behind the 2-byte pointer, so the consumed count
    /// never follows a jump.
    pub fn parse_name(&self, offset: usize) -> Result<(Name, usize)> {
        let mut data = SmallVec::<[u8; 32]>::new();
        let mut borders = SmallVec::<[u8; 8]>::new();
        let mut consumed = 0;
        let mut pos = offset;
        let mut jumps = 0;
        let mut followed_pointer = false;

        loop {
            if pos >= self.message.len() {
                return Err(Error::UnexpectedEof { offset: pos });
            }

            let len_byte = self.message[pos];

            // Compression pointer: top 2 bits = 11
            if len_byte >= 0xC0 {
                if pos + 1 >= self.message.len() {
                    return Err(Error::UnexpectedEof { offset: pos + 1 });
                }

                let target =
                    usize::from(u16::from_be_bytes([len_byte & 0x3F, self.message[pos + 1]]));

                // Pointers may only reference earlier message bytes; a
                // self- or forward-reference can never terminate.
                if target >= pos {
                    return Err(Error::InvalidCompressionPointer {
                        offset: pos,
                        target,
                    });
                }

                if !followed_pointer {
                    consumed = pos - offset + 2;
                    followed_pointer = true;
                }

                jumps += 1;
                if jumps > MAX_COMPRESSION_JUMPS {
                    return Err(Error::TooManyCompressionJumps {
                        max_jumps: MAX_COMPRESSION_JUMPS,
                    });
                }

                pos = target;
                continue;
            }

            // Reserved label types: top 2 bits = 01 or 10
            if len_byte >= 0x40 {
                return Err(Error::InvalidLabelType {
                    value: len_byte,
                    offset: pos,
                });
            }

            let len = len_byte as usize;

            // Root label terminates the name.
            if len == 0 {
                if !followed_pointer {
                    consumed = pos - offset + 1;
                }
                break;
            }

            if pos + 1 + len > self.message.len() {
                return Err(Error::UnexpectedEof {
                    offset: pos + 1 + len,
                });
            }

            // Running wire length: length bytes + label bytes + root byte.
            let wire_len = data.len() + borders.len() + 1 + 1 + len;
            if wire_len > MAX_NAME_LENGTH {
                return Err(Error::NameTooLong { length: wire_len });
            }

            data.extend_from_slice(&self.message[pos + 1..pos + 1 + len]);
            borders.push(data.len() as u8);

            pos += 1 + len;
        }

        Ok((
            Name {
                data,
                borders,
                fqdn: true,
            },
            consumed,
        ))
    }

    /// Parses a name and returns only the name (ignoring consumed bytes).
    #[inline]
    pub fn parse(&self, offset: usize) -> Result<Name> {
        self.parse_name(offset).map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_name() {
        // google.com in wire format
        let wire = [
            0x06, 0x67, 0x6f, 0x6f, 0x67, 0x6c, 0x65, 0x03, 0x63, 0x6f, 0x6d, 0x00,
        ];

        let parser = NameParser::new(&wire);
        let (name, consumed) = parser.parse_name(0).unwrap();

        assert_eq!(name.to_string(), "google.com.");
        assert!(name.is_fqdn());
        assert_eq!(name.label_count(), 2);
        assert_eq!(name.label_bytes(0), Some(&b"google"[..]));
        assert_eq!(name.label_bytes(1), Some(&b"com"[..]));
        assert_eq!(consumed, wire.len());
    }

    #[test]
    fn test_parse_compressed_name() {
        // Message with compression:
        // At offset 0: example.com.
        // At offset 13: www.<pointer to 0>
        let wire = [
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm',
            0, // example.com.
            3, b'w', b'w', b'w', 0xC0, 0x00, // www.<ptr to 0>
        ];

        let parser = NameParser::new(&wire);

        let (name1, consumed1) = parser.parse_name(0).unwrap();
        assert_eq!(name1.to_string(), "example.com.");
        assert_eq!(consumed1, 13);

        let (name2, consumed2) = parser.parse_name(13).unwrap();
        assert_eq!(name2.to_string(), "www.example.com.");
        assert_eq!(consumed2, 6); // "www" label + 2-byte pointer
    }

    #[test]
    fn test_self_referencing_pointer() {
        let wire = [0xC0, 0x00];

        let parser = NameParser::new(&wire);
        assert!(matches!(
            parser.parse_name(0),
            Err(Error::InvalidCompressionPointer { offset: 0, target: 0 })
        ));
    }

    #[test]
    fn test_forward_pointer() {
        // Pointer at offset 0 targeting offset 4 (forward).
        let wire = [0xC0, 0x04, 0x00, 0x00, 0x03, b'w', b'w', b'w', 0x00];

        let parser = NameParser::new(&wire);
        assert!(matches!(
            parser.parse_name(0),
            Err(Error::InvalidCompressionPointer { target: 4, .. })
        ));
    }

    #[test]
    fn test_pointer_chain_is_bounded() {
        // A ladder of pointers, each pointing 2 bytes back. Every jump is
        // strictly backward, so only the hop counter stops the walk.
        let mut wire = vec![0u8; 2 * (MAX_COMPRESSION_JUMPS + 2)];
        wire[0] = 0xC0;
        wire[1] = 0x00;
        for i in 1..MAX_COMPRESSION_JUMPS + 2 {
            let target = ((i - 1) * 2) as u16;
            wire[i * 2] = 0xC0 | (target >> 8) as u8;
            wire[i * 2 + 1] = (target & 0xFF) as u8;
        }

        let parser = NameParser::new(&wire);
        let result = parser.parse_name((MAX_COMPRESSION_JUMPS + 1) * 2);
        assert!(matches!(
            result,
            Err(Error::InvalidCompressionPointer { .. })
                | Err(Error::TooManyCompressionJumps { .. })
        ));
    }

    #[test]
    fn test_reserved_label_type() {
        let wire = [0x40, b'x', 0x00];

        let parser = NameParser::new(&wire);
        assert!(matches!(
            parser.parse_name(0),
            Err(Error::InvalidLabelType { value: 0x40, offset: 0 })
        ));
    }

    #[test]
    fn test_truncated_label() {
        let wire = [0x05, b'a', b'b'];

        let parser = NameParser::new(&wire);
        assert!(matches!(
            parser.parse_name(0),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_name_too_long() {
        // Five 63-byte labels never fit in a 255-byte name.
        let mut wire = Vec::new();
        for _ in 0..5 {
            wire.push(63);
            wire.extend(std::iter::repeat(b'a').take(63));
        }
        wire.push(0);

        let parser = NameParser::new(&wire);
        assert!(matches!(
            parser.parse_name(0),
            Err(Error::NameTooLong { .. })
        ));
    }
}
