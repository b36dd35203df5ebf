//! DNS response codes (RCODEs).
//!
//! Response codes indicate the status of a DNS operation.
//! With EDNS0 the response code is 12 bits wide: 4 bits live in the
//! header and 8 more in the OPT pseudo-record TTL field.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS response code.
///
/// See RFC 1035, RFC 6895, and RFC 8914 for the registry.
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
pub enum ResponseCode {
    /// No error condition - RFC 1035
    NoError = 0,

    /// Format error: the server could not interpret the query - RFC 1035
    FormErr = 1,

    /// Server failure - RFC 1035
    ServFail = 2,

    /// Name error: the queried name does not exist - RFC 1035
    NXDomain = 3,

    /// Not implemented - RFC 1035
    NotImp = 4,

    /// Query refused for policy reasons - RFC 1035
    Refused = 5,

    /// Name exists when it should not - RFC 2136
    YXDomain = 6,

    /// RR set exists when it should not - RFC 2136
    YXRRSet = 7,

    /// RR set that should exist does not - RFC 2136
    NXRRSet = 8,

    /// Server not authoritative / not authorized - RFC 2136, RFC 8945
    NotAuth = 9,

    /// Name not contained in zone - RFC 2136
    NotZone = 10,

    /// DSO-TYPE not implemented - RFC 8490
    DsoTypeNI = 11,

    // Extended RCODEs (require EDNS0)
    /// Bad OPT version / TSIG signature failure - RFC 6891, RFC 8945
    BadVers = 16,

    /// Key not recognized - RFC 8945
    BadKey = 17,

    /// Signature out of time window - RFC 8945
    BadTime = 18,

    /// Bad TKEY mode - RFC 2930
    BadMode = 19,

    /// Duplicate key name - RFC 2930
    BadName = 20,

    /// Algorithm not supported - RFC 2930
    BadAlg = 21,

    /// Bad truncation - RFC 8945
    BadTrunc = 22,

    /// Bad or missing server cookie - RFC 7873
    BadCookie = 23,
}

impl ResponseCode {
    /// Returns the numeric value of the response code.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Returns the 4-bit value for the header RCODE field.
    #[inline]
    pub const fn header_rcode(self) -> u8 {
        (self as u16 & 0x0F) as u8
    }

    /// Returns the 8-bit extended RCODE for the OPT record.
    #[inline]
    pub const fn extended_rcode(self) -> u8 {
        ((self as u16) >> 4) as u8
    }

    /// Combines header RCODE and extended RCODE into a full response code.
    #[inline]
    pub fn from_parts(header_rcode: u8, extended_rcode: u8) -> Option<Self> {
        let value = u16::from(extended_rcode) << 4 | u16::from(header_rcode & 0x0F);
        Self::try_from(value).ok()
    }

    /// Creates a response code from the 4-bit header field alone.
    #[inline]
    pub fn from_header(value: u8) -> Option<Self> {
        Self::try_from(u16::from(value & 0x0F)).ok()
    }

    /// Returns true if this code requires EDNS0 to transmit.
    #[inline]
    pub const fn is_extended(self) -> bool {
        self as u16 > 0x0F
    }

    /// Returns true if this is NOERROR.
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::NoError)
    }

    /// Returns true if this is NXDOMAIN.
    #[inline]
    pub const fn is_nxdomain(self) -> bool {
        matches!(self, Self::NXDomain)
    }

    /// Returns true if this is SERVFAIL.
    #[inline]
    pub const fn is_server_error(self) -> bool {
        matches!(self, Self::ServFail)
    }

    /// Returns the mnemonic of the response code.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoError => "NOERROR",
            Self::FormErr => "FORMERR",
            Self::ServFail => "SERVFAIL",
            Self::NXDomain => "NXDOMAIN",
            Self::NotImp => "NOTIMP",
            Self::Refused => "REFUSED",
            Self::YXDomain => "YXDOMAIN",
            Self::YXRRSet => "YXRRSET",
            Self::NXRRSet => "NXRRSET",
            Self::NotAuth => "NOTAUTH",
            Self::NotZone => "NOTZONE",
            Self::DsoTypeNI => "DSOTYPENI",
            Self::BadVers => "BADVERS",
            Self::BadKey => "BADKEY",
            Self::BadTime => "BADTIME",
            Self::BadMode => "BADMODE",
            Self::BadName => "BADNAME",
            Self::BadAlg => "BADALG",
            Self::BadTrunc => "BADTRUNC",
            Self::BadCookie => "BADCOOKIE",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for ResponseCode {
    fn default() -> Self {
        Self::NoError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rcode_values() {
        assert_eq!(ResponseCode::NoError.to_u16(), 0);
        assert_eq!(ResponseCode::NXDomain.to_u16(), 3);
        assert_eq!(ResponseCode::BadCookie.to_u16(), 23);
    }

    #[test]
    fn test_split_and_recombine() {
        let rcode = ResponseCode::BadCookie;
        assert!(rcode.is_extended());
        assert_eq!(rcode.header_rcode(), 7);
        assert_eq!(rcode.extended_rcode(), 1);
        assert_eq!(
            ResponseCode::from_parts(rcode.header_rcode(), rcode.extended_rcode()),
            Some(rcode)
        );

        let rcode = ResponseCode::NXDomain;
        assert!(!rcode.is_extended());
        assert_eq!(rcode.header_rcode(), 3);
        assert_eq!(rcode.extended_rcode(), 0);
    }

    #[test]
    fn test_from_header() {
        assert_eq!(ResponseCode::from_header(0), Some(ResponseCode::NoError));
        assert_eq!(ResponseCode::from_header(5), Some(ResponseCode::Refused));
        assert_eq!(ResponseCode::from_header(12), None);
    }
}
