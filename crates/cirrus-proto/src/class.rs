//! DNS record classes.
//!
//! The class field identifies the protocol family of the resource record.
//! While multiple classes were envisioned, IN (Internet) is used almost
//! exclusively.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record class.
///
/// See RFC 1035 Section 3.2.4 and RFC 6895 for the registry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordClass {
    /// Internet - RFC 1035
    IN = 1,

    /// CHAOS - RFC 1035
    ///
    /// Also used by some servers for special queries like `version.bind`.
    CH = 3,

    /// Hesiod - RFC 1035
    HS = 4,

    /// Query class: NONE - RFC 2136 (dynamic updates)
    NONE = 254,

    /// Query class: ANY - RFC 1035
    ///
    /// Matches any class. Only valid in queries, not in resource records.
    ANY = 255,
}

impl RecordClass {
    /// Returns the numeric value of the class.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Creates a class from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Returns true if this is a query-only class (NONE or ANY).
    #[inline]
    pub const fn is_query_class(self) -> bool {
        matches!(self, Self::NONE | Self::ANY)
    }

    /// Returns the mnemonic of the class.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IN => "IN",
            Self::CH => "CH",
            Self::HS => "HS",
            Self::NONE => "NONE",
            Self::ANY => "ANY",
        }
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for RecordClass {
    fn default() -> Self {
        Self::IN
    }
}

/// A class value that can represent both known classes and unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    /// A known record class.
    Known(RecordClass),
    /// An unknown class value (CLASS#### per RFC 3597).
    Unknown(u16),
}

impl Class {
    /// Creates a class from a u16 value.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        RecordClass::from_u16(value)
            .map(Self::Known)
            .unwrap_or(Self::Unknown(value))
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(c) => c.to_u16(),
            Self::Unknown(v) => v,
        }
    }

    /// Returns the known class if recognized.
    #[inline]
    pub const fn as_known(self) -> Option<RecordClass> {
        match self {
            Self::Known(c) => Some(c),
            Self::Unknown(_) => None,
        }
    }
}

impl From<RecordClass> for Class {
    fn from(c: RecordClass) -> Self {
        Self::Known(c)
    }
}

impl From<u16> for Class {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(c) => write!(f, "{c}"),
            Self::Unknown(v) => write!(f, "CLASS{v}"),
        }
    }
}

impl Default for Class {
    fn default() -> Self {
        Self::Known(RecordClass::IN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_values() {
        assert_eq!(RecordClass::IN.to_u16(), 1);
        assert_eq!(RecordClass::CH.to_u16(), 3);
        assert_eq!(RecordClass::ANY.to_u16(), 255);
    }

    #[test]
    fn test_query_classes() {
        assert!(RecordClass::NONE.is_query_class());
        assert!(RecordClass::ANY.is_query_class());
        assert!(!RecordClass::IN.is_query_class());
    }

    #[test]
    fn test_generic_class() {
        assert_eq!(Class::from_u16(1), Class::Known(RecordClass::IN));
        let unknown = Class::from_u16(42);
        assert_eq!(unknown.as_known(), None);
        assert_eq!(unknown.to_string(), "CLASS42");
    }
}
