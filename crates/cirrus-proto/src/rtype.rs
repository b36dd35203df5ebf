//! DNS record types.
//!
//! This module defines the record types this codec models, using the IANA
//! DNS parameter registry numbering. Values outside this roster stay
//! representable through [`Type::Unknown`] (RFC 3597).

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type.
///
/// The numeric values are the IANA registry assignments and form a fixed
/// external contract. See RFC 1035, RFC 3596, RFC 9460, RFC 7477, etc.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordType {
    /// IPv4 address - RFC 1035
    A = 1,

    /// Authoritative name server - RFC 1035
    NS = 2,

    /// Canonical name (alias) - RFC 1035
    CNAME = 5,

    /// Start of authority - RFC 1035
    SOA = 6,

    /// Null record (experimental, opaque payload) - RFC 1035
    NULL = 10,

    /// Domain name pointer - RFC 1035
    PTR = 12,

    /// Host information - RFC 1035
    HINFO = 13,

    /// Mail exchange - RFC 1035
    MX = 15,

    /// Text strings - RFC 1035
    TXT = 16,

    /// Transaction signature, SIG(0) - RFC 2931
    SIG = 24,

    /// IPv6 address - RFC 3596
    AAAA = 28,

    /// Server selection - RFC 2782
    SRV = 33,

    /// Naming authority pointer - RFC 2915, RFC 3403
    NAPTR = 35,

    /// Certificate - RFC 4398
    CERT = 37,

    /// EDNS(0) option pseudo-record - RFC 6891
    OPT = 41,

    /// Delegation signer - RFC 4034
    DS = 43,

    /// SSH key fingerprint - RFC 4255
    SSHFP = 44,

    /// TLS certificate association - RFC 6698
    TLSA = 52,

    /// OpenPGP public key - RFC 7929
    OPENPGPKEY = 61,

    /// Child-to-parent synchronization - RFC 7477
    CSYNC = 62,

    /// Service binding - RFC 9460
    SVCB = 64,

    /// HTTPS service binding - RFC 9460
    HTTPS = 65,

    /// Transaction signature - RFC 8945
    TSIG = 250,

    /// Incremental zone transfer - RFC 1995
    IXFR = 251,

    /// Full zone transfer - RFC 5936
    AXFR = 252,

    /// Any record type - RFC 1035, RFC 8482
    ANY = 255,

    /// Certification authority authorization - RFC 8659
    CAA = 257,
}

impl RecordType {
    /// Returns the numeric value of the record type.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Creates a record type from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Returns true if this is a query-only type (QTYPE).
    #[inline]
    pub const fn is_query_type(self) -> bool {
        matches!(self, Self::AXFR | Self::IXFR | Self::ANY)
    }

    /// Returns true if this is a pseudo-record type carried outside the
    /// ordinary sections (OPT) or appended as a transaction signature.
    #[inline]
    pub const fn is_pseudo_record(self) -> bool {
        matches!(self, Self::OPT | Self::TSIG | Self::SIG)
    }

    /// Returns true if this type carries a transaction signature.
    #[inline]
    pub const fn is_signature(self) -> bool {
        matches!(self, Self::TSIG | Self::SIG)
    }

    /// Returns true if this type's RDATA embeds a domain name.
    #[inline]
    pub const fn has_embedded_name(self) -> bool {
        matches!(
            self,
            Self::NS
                | Self::CNAME
                | Self::SOA
                | Self::PTR
                | Self::MX
                | Self::SRV
                | Self::NAPTR
                | Self::SVCB
                | Self::HTTPS
        )
    }

    /// Returns the fixed RDATA length for types that have one.
    #[inline]
    pub const fn fixed_rdata_length(self) -> Option<usize> {
        match self {
            Self::A => Some(4),
            Self::AAAA => Some(16),
            _ => None,
        }
    }

    /// Returns the mnemonic of the record type.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::NULL => "NULL",
            Self::PTR => "PTR",
            Self::HINFO => "HINFO",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::SIG => "SIG",
            Self::AAAA => "AAAA",
            Self::SRV => "SRV",
            Self::NAPTR => "NAPTR",
            Self::CERT => "CERT",
            Self::OPT => "OPT",
            Self::DS => "DS",
            Self::SSHFP => "SSHFP",
            Self::TLSA => "TLSA",
            Self::OPENPGPKEY => "OPENPGPKEY",
            Self::CSYNC => "CSYNC",
            Self::SVCB => "SVCB",
            Self::HTTPS => "HTTPS",
            Self::TSIG => "TSIG",
            Self::IXFR => "IXFR",
            Self::AXFR => "AXFR",
            Self::ANY => "ANY",
            Self::CAA => "CAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for RecordType {
    fn default() -> Self {
        Self::A
    }
}

/// A type value that can represent both modeled types and unknown values.
///
/// Registry values this crate does not model still travel through the
/// codec; per RFC 3597 they display as `TYPE####`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
    /// A modeled record type.
    Known(RecordType),
    /// An unassigned or unmodeled type value.
    Unknown(u16),
}

impl Type {
    /// Creates a type from a u16 value.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        RecordType::from_u16(value)
            .map(Self::Known)
            .unwrap_or(Self::Unknown(value))
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(t) => t.to_u16(),
            Self::Unknown(v) => v,
        }
    }

    /// Returns the modeled type if known.
    #[inline]
    pub const fn as_known(self) -> Option<RecordType> {
        match self {
            Self::Known(t) => Some(t),
            Self::Unknown(_) => None,
        }
    }
}

impl From<RecordType> for Type {
    fn from(t: RecordType) -> Self {
        Self::Known(t)
    }
}

impl From<u16> for Type {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(t) => write!(f, "{t}"),
            Self::Unknown(v) => write!(f, "TYPE{v}"),
        }
    }
}

impl Default for Type {
    fn default() -> Self {
        Self::Known(RecordType::A)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_values() {
        assert_eq!(RecordType::A.to_u16(), 1);
        assert_eq!(RecordType::NS.to_u16(), 2);
        assert_eq!(RecordType::CNAME.to_u16(), 5);
        assert_eq!(RecordType::SOA.to_u16(), 6);
        assert_eq!(RecordType::PTR.to_u16(), 12);
        assert_eq!(RecordType::MX.to_u16(), 15);
        assert_eq!(RecordType::TXT.to_u16(), 16);
        assert_eq!(RecordType::AAAA.to_u16(), 28);
        assert_eq!(RecordType::SRV.to_u16(), 33);
        assert_eq!(RecordType::NAPTR.to_u16(), 35);
        assert_eq!(RecordType::OPT.to_u16(), 41);
        assert_eq!(RecordType::SSHFP.to_u16(), 44);
        assert_eq!(RecordType::OPENPGPKEY.to_u16(), 61);
        assert_eq!(RecordType::CSYNC.to_u16(), 62);
        assert_eq!(RecordType::SVCB.to_u16(), 64);
        assert_eq!(RecordType::HTTPS.to_u16(), 65);
        assert_eq!(RecordType::CAA.to_u16(), 257);
    }

    #[test]
    fn test_from_u16() {
        assert_eq!(RecordType::from_u16(1), Some(RecordType::A));
        assert_eq!(RecordType::from_u16(28), Some(RecordType::AAAA));
        assert_eq!(RecordType::from_u16(65412), None);
    }

    #[test]
    fn test_predicates() {
        assert!(RecordType::AXFR.is_query_type());
        assert!(RecordType::ANY.is_query_type());
        assert!(!RecordType::A.is_query_type());

        assert!(RecordType::OPT.is_pseudo_record());
        assert!(RecordType::TSIG.is_signature());
        assert!(RecordType::SIG.is_signature());
        assert!(!RecordType::A.is_pseudo_record());

        assert!(RecordType::CNAME.has_embedded_name());
        assert!(!RecordType::TXT.has_embedded_name());

        assert_eq!(RecordType::A.fixed_rdata_length(), Some(4));
        assert_eq!(RecordType::AAAA.fixed_rdata_length(), Some(16));
        assert_eq!(RecordType::TXT.fixed_rdata_length(), None);
    }

    #[test]
    fn test_generic_type() {
        let t = Type::from_u16(1);
        assert_eq!(t.as_known(), Some(RecordType::A));

        let t = Type::from_u16(65412);
        assert_eq!(t.as_known(), None);
        assert_eq!(t.to_u16(), 65412);
        assert_eq!(t.to_string(), "TYPE65412");
    }
}
