//! Wire format cursors.
//!
//! Every codec component reads and writes through the two cursors in this
//! module. The reader checks bounds once per access and never reads past
//! the end of the buffer; the writer tracks an optional size cap and knows
//! how to back-patch the length fields DNS scatters through a message
//! (RDLENGTH, EDNS option lengths, header section counts). All integer
//! I/O is network byte order (big-endian).

use crate::error::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// A cursor for reading DNS wire format data.
///
/// The position can be repositioned absolutely (within bounds) to support
/// compression pointer jumps, and a reader can be re-bracketed at an
/// earlier end offset to confine an RDATA parse to its declared length.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    /// The underlying data.
    data: &'a [u8],
    /// Current position.
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a new wire reader.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the underlying data.
    #[inline]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the current position.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the remaining bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns true if there are no remaining bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Sets the position.
    ///
    /// The position may move backward or forward but never past the end
    /// of the underlying data.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    /// Fails with an underrun error unless `n` more bytes are available.
    #[inline]
    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos + n > self.data.len() {
            return Err(Error::unexpected_eof(self.pos + n));
        }
        Ok(())
    }

    /// Reads a fixed-size array with a single bounds check.
    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let array = self.data[self.pos..self.pos + N].try_into().unwrap();
        self.pos += N;
        Ok(array)
    }

    /// Advances the position by the given amount.
    #[inline]
    pub fn advance(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a big-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian u64.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Reads a slice of bytes of an explicit length.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Consumes and returns all remaining bytes.
    ///
    /// Used by record types whose payload is "the rest of the declared
    /// region" (OPENPGPKEY, NULL, opaque fallback).
    #[inline]
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }

    /// Peeks at a single byte without advancing.
    #[inline]
    pub fn peek_u8(&self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.data[self.pos])
    }

    /// Returns a reader over the same data truncated at `end`.
    ///
    /// The returned reader starts at the current position. Earlier message
    /// bytes stay visible so compression pointers keep resolving, while any
    /// read past `end` fails with an underrun error.
    pub fn bounded(&self, end: usize) -> Result<WireReader<'a>> {
        if end > self.data.len() {
            return Err(Error::buffer_too_short(end, self.data.len()));
        }
        let mut reader = WireReader::new(&self.data[..end]);
        reader.set_position(self.pos);
        Ok(reader)
    }
}

/// A reserved 16-bit length field awaiting back-patch.
///
/// Returned by [`WireWriter::begin_length`]; hand it back to
/// [`WireWriter::end_length`] once the payload it covers is written.
#[derive(Debug, Clone, Copy)]
#[must_use = "a reserved length field stays zero until end_length fills it"]
pub struct LengthSlot {
    /// Offset of the 2-byte length field within the buffer.
    offset: usize,
}

/// A writer for DNS wire format data.
///
/// Wraps a `BytesMut` with an optional maximum size (for UDP payload
/// limits). Length fields that precede data of not-yet-known size
/// (RDLENGTH, EDNS option lengths) are reserved with [`begin_length`] and
/// filled by [`end_length`]; header section counts are fixed up afterward
/// with [`patch_u16`].
///
/// [`begin_length`]: Self::begin_length
/// [`end_length`]: Self::end_length
/// [`patch_u16`]: Self::patch_u16
#[derive(Debug)]
pub struct WireWriter {
    /// The underlying buffer.
    buf: BytesMut,
    /// Maximum size (for truncation).
    max_size: Option<usize>,
}

impl WireWriter {
    /// Creates a new wire writer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            max_size: None,
        }
    }

    /// Creates a wire writer with a maximum size limit.
    pub fn with_max_size(capacity: usize, max_size: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity.min(max_size)),
            max_size: Some(max_size),
        }
    }

    /// Returns the current length.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the remaining capacity before the size cap.
    pub fn remaining(&self) -> usize {
        self.max_size
            .map(|max| max.saturating_sub(self.buf.len()))
            .unwrap_or(usize::MAX)
    }

    /// Fails with an overflow error if writing `n` bytes would pass the cap.
    #[inline]
    fn ensure_room(&self, n: usize) -> Result<()> {
        match self.max_size {
            Some(max) if self.buf.len() + n > max => {
                Err(Error::buffer_overflow(n, max.saturating_sub(self.buf.len())))
            }
            _ => Ok(()),
        }
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.ensure_room(1)?;
        self.buf.put_u8(value);
        Ok(())
    }

    /// Writes a big-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.ensure_room(2)?;
        self.buf.put_u16(value);
        Ok(())
    }

    /// Writes a big-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.ensure_room(4)?;
        self.buf.put_u32(value);
        Ok(())
    }

    /// Writes a big-endian u64.
    #[inline]
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.ensure_room(8)?;
        self.buf.put_u64(value);
        Ok(())
    }

    /// Writes a slice of bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_room(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Reserves a 16-bit length field and returns a slot for it.
    ///
    /// The field is written as zero; [`end_length`](Self::end_length)
    /// fills in the number of bytes written between the two calls. Slots
    /// nest: an RDLENGTH slot can enclose option-length slots.
    pub fn begin_length(&mut self) -> Result<LengthSlot> {
        let offset = self.buf.len();
        self.write_u16(0)?;
        Ok(LengthSlot { offset })
    }

    /// Fills a reserved length field with the payload size written since
    /// [`begin_length`](Self::begin_length).
    pub fn end_length(&mut self, slot: LengthSlot) -> Result<()> {
        let payload = self.buf.len() - slot.offset - 2;
        if payload > usize::from(u16::MAX) {
            return Err(Error::MessageTooLarge {
                size: payload,
                max_size: usize::from(u16::MAX),
            });
        }
        self.patch_u16(slot.offset, payload as u16)
    }

    /// Overwrites a previously written 16-bit field.
    ///
    /// Used for fixing up header section counts once the sections are
    /// actually written. Patching beyond the written bytes is an error.
    pub fn patch_u16(&mut self, offset: usize, value: u16) -> Result<()> {
        let written = self.buf.len();
        let Some(field) = self.buf.get_mut(offset..offset + 2) else {
            return Err(Error::buffer_too_short(offset + 2, written));
        };
        field.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Returns the underlying buffer.
    #[inline]
    pub fn into_bytes(self) -> BytesMut {
        self.buf
    }

    /// Returns the data as frozen bytes.
    #[inline]
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Returns a reference to the written bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_reader() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A];
        let mut reader = WireReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x12);
        assert_eq!(reader.read_u16().unwrap(), 0x3456);
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.read_bytes(2).unwrap(), &[0x78, 0x9A]);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_wire_reader_bounds() {
        let data = [0x12, 0x34];
        let mut reader = WireReader::new(&data);

        assert!(reader.read_u32().is_err());
        assert!(reader.read_u64().is_err());
        assert!(reader.read_bytes(3).is_err());
        assert!(reader.advance(3).is_err());
    }

    #[test]
    fn test_wire_reader_reposition() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = WireReader::new(&data);

        assert_eq!(reader.read_u16().unwrap(), 0x0102);
        reader.set_position(0);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        reader.set_position(3);
        assert_eq!(reader.read_to_end(), &[0x04]);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_wire_reader_bounded() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut reader = WireReader::new(&data);
        reader.advance(1).unwrap();

        let mut sub = reader.bounded(3).unwrap();
        assert_eq!(sub.position(), 1);
        assert_eq!(sub.read_u16().unwrap(), 0x0203);
        assert!(sub.read_u8().is_err());

        assert!(reader.bounded(6).is_err());
    }

    #[test]
    fn test_wire_writer() {
        let mut writer = WireWriter::new(16);

        writer.write_u8(0x12).unwrap();
        writer.write_u16(0x3456).unwrap();
        writer.write_u32(0x789A_BCDE).unwrap();

        assert_eq!(writer.len(), 7);
        assert_eq!(
            writer.as_bytes(),
            &[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE]
        );
    }

    #[test]
    fn test_wire_writer_max_size() {
        let mut writer = WireWriter::with_max_size(100, 4);

        writer.write_u16(0x1234).unwrap();
        assert!(writer.write_u32(0x1234_5678).is_err());
    }

    #[test]
    fn test_length_slot() {
        let mut writer = WireWriter::new(16);
        writer.write_u8(0xAA).unwrap();

        let slot = writer.begin_length().unwrap();
        writer.write_bytes(&[1, 2, 3]).unwrap();
        writer.end_length(slot).unwrap();

        assert_eq!(writer.as_bytes(), &[0xAA, 0x00, 0x03, 1, 2, 3]);
    }

    #[test]
    fn test_nested_length_slots() {
        // An outer RDLENGTH-style slot enclosing an inner option-length
        // slot, as the OPT pseudo-record writes them.
        let mut writer = WireWriter::new(16);

        let outer = writer.begin_length().unwrap();
        writer.write_u16(0x000A).unwrap();
        let inner = writer.begin_length().unwrap();
        writer.write_bytes(&[0xEE]).unwrap();
        writer.end_length(inner).unwrap();
        writer.end_length(outer).unwrap();

        assert_eq!(writer.as_bytes(), &[0x00, 0x05, 0x00, 0x0A, 0x00, 0x01, 0xEE]);
    }

    #[test]
    fn test_patch_u16() {
        let mut writer = WireWriter::new(8);
        writer.write_u32(0).unwrap();

        writer.patch_u16(2, 0xBEEF).unwrap();
        assert_eq!(writer.as_bytes(), &[0x00, 0x00, 0xBE, 0xEF]);

        // Patching past the written bytes is refused.
        assert!(writer.patch_u16(3, 0).is_err());
    }
}
