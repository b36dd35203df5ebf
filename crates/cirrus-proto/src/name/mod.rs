//! DNS domain name representation and operations.
//!
//! This module provides an implementation of DNS domain names following
//! RFC 1035 and RFC 2181. It supports:
//!
//! - Compact storage of label bytes with a precomputed border index
//! - Wire format parsing with compression pointer handling
//! - Textual parsing with `\X` and `\DDD` escape sequences
//! - Case-insensitive comparison per DNS semantics, original casing kept
//! - Relative vs. fully-qualified name tracking

mod label;
mod parse;

pub use label::{Label, LabelIter};
pub use parse::NameParser;

use crate::error::{Error, Result};
use crate::wire::WireWriter;
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A DNS domain name.
///
/// Domain names in DNS are sequences of labels separated by dots. Each label
/// can be up to 63 bytes, and the entire name (in wire format) can be up to
/// 255 bytes including length bytes and the root label.
///
/// # Storage
///
/// The label bytes are stored concatenated, without length prefixes, next to
/// a `borders` array holding the end offset of each label. The borders make
/// label access and suffix comparisons cheap without re-walking length
/// bytes; they are computed at construction time and never change.
///
/// # Wire Format
///
/// In wire format, a domain name is encoded as a sequence of labels, each
/// prefixed by a length byte, terminated by a zero-length label (the root).
/// For example, `www.example.com.` is encoded as:
///
/// ```text
/// 03 'w' 'w' 'w' 07 'e' 'x' 'a' 'm' 'p' 'l' 'e' 03 'c' 'o' 'm' 00
/// ```
///
/// DNS also supports name compression using pointers. A pointer is a two-byte
/// sequence where the first two bits are `11`, and the remaining 14 bits
/// specify an offset into the message where the rest of the name can be
/// found. Compression is handled on decode only; this library always writes
/// names uncompressed.
///
/// # Comparison Semantics
///
/// DNS names are compared case-insensitively per RFC 1035, while the casing
/// a name was constructed with is preserved for display and re-encoding.
/// Two names are equal iff their label sequences match case-insensitively
/// and both are relative or both fully qualified.
///
/// # Example
///
/// ```rust
/// use cirrus_proto::name::Name;
/// use std::str::FromStr;
///
/// let name = Name::from_str("www.example.com.").unwrap();
/// assert_eq!(name.label_count(), 3);
/// assert!(name.is_fqdn());
///
/// // Case-insensitive comparison
/// assert_eq!(Name::from_str("WWW.EXAMPLE.COM.").unwrap(), name);
///
/// // A relative name is a different name
/// assert_ne!(Name::from_str("www.example.com").unwrap(), name);
/// ```
#[derive(Clone)]
pub struct Name {
    /// Concatenated label bytes, original casing preserved.
    data: SmallVec<[u8; 32]>,
    /// Cumulative end offset of each label within `data`.
    borders: SmallVec<[u8; 8]>,
    /// Whether the name carries an explicit trailing root.
    fqdn: bool,
}

impl Name {
    /// The root domain name (no labels, fully qualified).
    pub const ROOT: Self = Self {
        data: SmallVec::new_const(),
        borders: SmallVec::new_const(),
        fqdn: true,
    };

    /// Creates the root domain name.
    #[inline]
    pub const fn root() -> Self {
        Self {
            data: SmallVec::new_const(),
            borders: SmallVec::new_const(),
            fqdn: true,
        }
    }

    /// Appends one label, enforcing the label and name length bounds.
    fn push_label(&mut self, label: &[u8]) -> Result<()> {
        if label.is_empty() {
            return Err(Error::EmptyLabel {
                position: self.label_count(),
            });
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(Error::label_too_long(label.len()));
        }

        let wire_len = self.wire_len() + 1 + label.len();
        if wire_len > MAX_NAME_LENGTH {
            return Err(Error::name_too_long(wire_len));
        }

        self.data.extend_from_slice(label);
        self.borders.push(self.data.len() as u8);
        Ok(())
    }

    /// Returns the number of labels (excluding the root).
    #[inline]
    pub fn label_count(&self) -> usize {
        self.borders.len()
    }

    /// Returns true if this is the root domain.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.borders.is_empty() && self.fqdn
    }

    /// Returns true if this is a fully-qualified domain name.
    #[inline]
    pub const fn is_fqdn(&self) -> bool {
        self.fqdn
    }

    /// Marks the name as fully qualified (or relative).
    #[inline]
    pub fn set_fqdn(&mut self, fqdn: bool) {
        self.fqdn = fqdn;
    }

    /// Returns the concatenated label bytes (no length prefixes).
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the label border offsets.
    #[inline]
    pub fn borders(&self) -> &[u8] {
        &self.borders
    }

    /// Returns the bytes of the label at the given index (0 = leftmost).
    pub fn label_bytes(&self, index: usize) -> Option<&[u8]> {
        let end = *self.borders.get(index)? as usize;
        let start = if index == 0 {
            0
        } else {
            self.borders[index - 1] as usize
        };
        Some(&self.data[start..end])
    }

    /// Returns the label at the given index (0 = leftmost label).
    pub fn label(&self, index: usize) -> Option<Label<'_>> {
        self.label_bytes(index).map(Label::from_bytes)
    }

    /// Returns an iterator over the labels in the name.
    #[inline]
    pub fn labels(&self) -> LabelIter<'_> {
        LabelIter::new(self)
    }

    /// Returns the wire format length (length bytes + labels + root byte).
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.data.len() + self.borders.len() + 1
    }

    /// Returns the parent domain (removes the leftmost label).
    ///
    /// Returns `None` if there is no label to remove.
    pub fn parent(&self) -> Option<Self> {
        let first_end = *self.borders.first()? as usize;

        let data = SmallVec::from_slice(&self.data[first_end..]);
        let borders = self.borders[1..]
            .iter()
            .map(|&b| b - first_end as u8)
            .collect();

        Some(Self {
            data,
            borders,
            fqdn: self.fqdn,
        })
    }

    /// Returns the subdomain formed by prepending a label.
    pub fn prepend_label(&self, label: &str) -> Result<Self> {
        let mut name = Self {
            data: SmallVec::new(),
            borders: SmallVec::new(),
            fqdn: self.fqdn,
        };
        name.push_label(label.as_bytes())?;
        for existing in self.labels() {
            name.push_label(existing.as_bytes())?;
        }
        Ok(name)
    }

    /// Returns true if this name is a subdomain of (or equal to) the given
    /// name, comparing labels case-insensitively from the root side.
    pub fn is_subdomain_of(&self, other: &Name) -> bool {
        if self.label_count() < other.label_count() {
            return false;
        }

        let skip = self.label_count() - other.label_count();
        (0..other.label_count()).all(|i| {
            let ours = self.label_bytes(skip + i).unwrap_or(&[]);
            let theirs = other.label_bytes(i).unwrap_or(&[]);
            ours.eq_ignore_ascii_case(theirs)
        })
    }

    /// Converts to the dotted presentation form.
    ///
    /// Bytes outside printable ASCII and the separator characters are
    /// escaped; a fully-qualified name gets a trailing dot.
    pub fn to_string_representation(&self) -> CompactString {
        if self.borders.is_empty() {
            return CompactString::new(".");
        }

        let mut result = CompactString::new("");
        for (i, label) in self.labels().enumerate() {
            if i > 0 {
                result.push('.');
            }
            for &byte in label.as_bytes() {
                if byte == b'.' || byte == b'\\' {
                    result.push('\\');
                    result.push(byte as char);
                } else if byte.is_ascii_graphic() || byte == b' ' {
                    result.push(byte as char);
                } else {
                    result.push('\\');
                    let mut digits = [0u8; 3];
                    digits[0] = b'0' + byte / 100;
                    digits[1] = b'0' + (byte / 10) % 10;
                    digits[2] = b'0' + byte % 10;
                    for d in digits {
                        result.push(d as char);
                    }
                }
            }
        }

        if self.fqdn {
            result.push('.');
        }

        result
    }

    /// Returns a lowercased copy of the name.
    #[must_use]
    pub fn lowercased(&self) -> Self {
        let mut copy = self.clone();
        for byte in copy.data.iter_mut() {
            *byte = byte.to_ascii_lowercase();
        }
        copy
    }

    /// Writes the name in uncompressed wire format.
    pub fn write_wire(&self, buf: &mut WireWriter) -> Result<()> {
        for label in self.labels() {
            let bytes = label.as_bytes();
            if bytes.len() > MAX_LABEL_LENGTH {
                return Err(Error::label_too_long(bytes.len()));
            }
            buf.write_u8(bytes.len() as u8)?;
            buf.write_bytes(bytes)?;
        }
        buf.write_u8(0)
    }
}

impl FromStr for Name {
    type Err = Error;

    /// Parses a domain name from its dotted textual form.
    ///
    /// A single trailing unescaped dot marks the name fully qualified. The
    /// escape forms `\X` (literal character, including `\.` which does not
    /// split a label) and `\DDD` (three-digit decimal byte value) are
    /// supported. An empty label anywhere but the end is an error.
    fn from_str(s: &str) -> Result<Self> {
        if s == "." {
            return Ok(Self::root());
        }

        let mut name = Self {
            data: SmallVec::new(),
            borders: SmallVec::new(),
            fqdn: false,
        };
        if s.is_empty() {
            return Ok(name);
        }

        let bytes = s.as_bytes();
        let mut label = SmallVec::<[u8; 24]>::new();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    let Some(&next) = bytes.get(i + 1) else {
                        return Err(Error::BadEscape { position: i });
                    };
                    if next.is_ascii_digit() {
                        if i + 3 >= bytes.len()
                            || !bytes[i + 2].is_ascii_digit()
                            || !bytes[i + 3].is_ascii_digit()
                        {
                            return Err(Error::BadEscape { position: i });
                        }
                        let value = u32::from(next - b'0') * 100
                            + u32::from(bytes[i + 2] - b'0') * 10
                            + u32::from(bytes[i + 3] - b'0');
                        if value > 255 {
                            return Err(Error::BadEscape { position: i });
                        }
                        label.push(value as u8);
                        i += 4;
                    } else {
                        label.push(next);
                        i += 2;
                    }
                }
                b'.' => {
                    if label.is_empty() {
                        return Err(Error::EmptyLabel { position: i });
                    }
                    name.push_label(&label)?;
                    label.clear();
                    i += 1;
                }
                byte if byte.is_ascii_graphic() || byte == b' ' => {
                    label.push(byte);
                    i += 1;
                }
                byte => {
                    return Err(Error::invalid_data(
                        i,
                        format!("unescaped byte 0x{byte:02X} in textual name"),
                    ));
                }
            }
        }

        if label.is_empty() {
            // The loop ended right after an unescaped dot.
            name.fqdn = true;
        } else {
            name.push_label(&label)?;
        }

        Ok(name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_representation())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(\"{}\")", self)
    }
}

impl PartialEq for Name {
    /// Case-insensitive comparison per DNS semantics; relative and fully
    /// qualified forms of the same labels are distinct.
    fn eq(&self, other: &Self) -> bool {
        self.fqdn == other.fqdn
            && self.borders == other.borders
            && self.data.eq_ignore_ascii_case(&other.data)
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fqdn.hash(state);
        self.borders.hash(state);
        for &byte in &self.data {
            byte.to_ascii_lowercase().hash(state);
        }
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    /// Canonical DNS name ordering per RFC 4034: labels compared from the
    /// root side, case-insensitively.
    fn cmp(&self, other: &Self) -> Ordering {
        let pairs = self
            .labels()
            .rev()
            .zip(other.labels().rev());
        for (a, b) in pairs {
            match a.cmp_canonical(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        self.label_count()
            .cmp(&other.label_count())
            .then(self.fqdn.cmp(&other.fqdn))
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::root()
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string_representation())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
