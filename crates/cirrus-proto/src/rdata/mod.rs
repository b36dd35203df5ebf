//! DNS record data (RDATA) types.
//!
//! This module contains codecs for the record types this library models,
//! organized by category:
//!
//! - **Address records**: A, AAAA
//! - **Name records**: NS, CNAME, PTR, MX
//! - **Authority records**: SOA
//! - **Text records**: TXT, HINFO
//! - **Service records**: SRV, NAPTR, SVCB, HTTPS, CAA
//! - **Certificate records**: SSHFP, TLSA, CERT, OPENPGPKEY
//! - **Zone maintenance**: CSYNC
//! - **Opaque records**: NULL, unknown types (RFC 3597)
//!
//! Every parser runs against a cursor bracketed at the declared RDATA end;
//! the record layer verifies that exactly the declared length is consumed.

pub mod address;
pub mod authority;
pub mod cert;
pub mod csync;
pub mod name;
pub mod service;
pub mod text;
pub mod unknown;

pub use address::{A, AAAA};
pub use authority::SOA;
pub use cert::{CERT, OPENPGPKEY, SSHFP, TLSA};
pub use csync::CSYNC;
pub use name::{CNAME, MX, NS, PTR};
pub use service::{CAA, HTTPS, NAPTR, SRV, SVCB};
pub use text::{HINFO, TXT};
pub use unknown::{NULL, Unknown};

use crate::error::Result;
use crate::name::Name;
use crate::rtype::{RecordType, Type};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// DNS record data.
///
/// This enum represents the parsed data for all supported DNS record types.
/// Unknown or unmodeled record types are preserved as opaque byte sequences
/// and re-encode to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RData {
    /// IPv4 address (A record)
    A(A),

    /// IPv6 address (AAAA record)
    AAAA(AAAA),

    /// Name server (NS record)
    NS(NS),

    /// Canonical name (CNAME record)
    CNAME(CNAME),

    /// Pointer (PTR record)
    PTR(PTR),

    /// Mail exchange (MX record)
    MX(MX),

    /// Start of authority (SOA record)
    SOA(SOA),

    /// Text (TXT record)
    TXT(TXT),

    /// Host information (HINFO record)
    HINFO(HINFO),

    /// Service location (SRV record)
    SRV(SRV),

    /// Naming authority pointer (NAPTR record)
    NAPTR(NAPTR),

    /// Service binding (SVCB record)
    SVCB(SVCB),

    /// HTTPS service binding (HTTPS record)
    HTTPS(HTTPS),

    /// Certification authority authorization (CAA record)
    CAA(CAA),

    /// TLSA certificate association
    TLSA(TLSA),

    /// SSH key fingerprint (SSHFP record)
    SSHFP(SSHFP),

    /// Certificate (CERT record)
    CERT(CERT),

    /// OpenPGP public key
    OPENPGPKEY(OPENPGPKEY),

    /// Child-to-parent synchronization (CSYNC record)
    CSYNC(CSYNC),

    /// Null record (opaque experimental payload)
    NULL(NULL),

    /// Unknown or unsupported record type (preserved as raw bytes)
    Unknown(Unknown),
}

impl RData {
    /// Parses RDATA from a cursor bracketed at the declared RDATA end.
    ///
    /// Unrecognized type codes are captured opaquely rather than rejected.
    /// OPT and transaction-signature RDATA are also kept opaque here; the
    /// message layer gives them their special treatment.
    pub fn parse(rtype: Type, reader: &mut WireReader<'_>) -> Result<Self> {
        let Some(known) = rtype.as_known() else {
            return Ok(RData::Unknown(Unknown::new(
                rtype.to_u16(),
                reader.read_to_end(),
            )));
        };

        match known {
            RecordType::A => Ok(RData::A(A::parse(reader)?)),
            RecordType::AAAA => Ok(RData::AAAA(AAAA::parse(reader)?)),
            RecordType::NS => Ok(RData::NS(NS::parse(reader)?)),
            RecordType::CNAME => Ok(RData::CNAME(CNAME::parse(reader)?)),
            RecordType::PTR => Ok(RData::PTR(PTR::parse(reader)?)),
            RecordType::MX => Ok(RData::MX(MX::parse(reader)?)),
            RecordType::SOA => Ok(RData::SOA(SOA::parse(reader)?)),
            RecordType::TXT => Ok(RData::TXT(TXT::parse(reader)?)),
            RecordType::HINFO => Ok(RData::HINFO(HINFO::parse(reader)?)),
            RecordType::SRV => Ok(RData::SRV(SRV::parse(reader)?)),
            RecordType::NAPTR => Ok(RData::NAPTR(NAPTR::parse(reader)?)),
            RecordType::SVCB => Ok(RData::SVCB(SVCB::parse(reader)?)),
            RecordType::HTTPS => Ok(RData::HTTPS(HTTPS::parse(reader)?)),
            RecordType::CAA => Ok(RData::CAA(CAA::parse(reader)?)),
            RecordType::TLSA => Ok(RData::TLSA(TLSA::parse(reader)?)),
            RecordType::SSHFP => Ok(RData::SSHFP(SSHFP::parse(reader)?)),
            RecordType::CERT => Ok(RData::CERT(CERT::parse(reader)?)),
            RecordType::OPENPGPKEY => Ok(RData::OPENPGPKEY(OPENPGPKEY::parse(reader)?)),
            RecordType::CSYNC => Ok(RData::CSYNC(CSYNC::parse(reader)?)),
            RecordType::NULL => Ok(RData::NULL(NULL::parse(reader)?)),
            other => Ok(RData::Unknown(Unknown::new(
                other.to_u16(),
                reader.read_to_end(),
            ))),
        }
    }

    /// Returns the type value for this RDATA.
    pub fn rtype(&self) -> Type {
        match self {
            RData::A(_) => Type::Known(RecordType::A),
            RData::AAAA(_) => Type::Known(RecordType::AAAA),
            RData::NS(_) => Type::Known(RecordType::NS),
            RData::CNAME(_) => Type::Known(RecordType::CNAME),
            RData::PTR(_) => Type::Known(RecordType::PTR),
            RData::MX(_) => Type::Known(RecordType::MX),
            RData::SOA(_) => Type::Known(RecordType::SOA),
            RData::TXT(_) => Type::Known(RecordType::TXT),
            RData::HINFO(_) => Type::Known(RecordType::HINFO),
            RData::SRV(_) => Type::Known(RecordType::SRV),
            RData::NAPTR(_) => Type::Known(RecordType::NAPTR),
            RData::SVCB(_) => Type::Known(RecordType::SVCB),
            RData::HTTPS(_) => Type::Known(RecordType::HTTPS),
            RData::CAA(_) => Type::Known(RecordType::CAA),
            RData::TLSA(_) => Type::Known(RecordType::TLSA),
            RData::SSHFP(_) => Type::Known(RecordType::SSHFP),
            RData::CERT(_) => Type::Known(RecordType::CERT),
            RData::OPENPGPKEY(_) => Type::Known(RecordType::OPENPGPKEY),
            RData::CSYNC(_) => Type::Known(RecordType::CSYNC),
            RData::NULL(_) => Type::Known(RecordType::NULL),
            RData::Unknown(u) => Type::from_u16(u.type_code()),
        }
    }

    /// Returns the wire format length of this RDATA.
    pub fn wire_len(&self) -> usize {
        match self {
            RData::A(r) => r.wire_len(),
            RData::AAAA(r) => r.wire_len(),
            RData::NS(r) => r.wire_len(),
            RData::CNAME(r) => r.wire_len(),
            RData::PTR(r) => r.wire_len(),
            RData::MX(r) => r.wire_len(),
            RData::SOA(r) => r.wire_len(),
            RData::TXT(r) => r.wire_len(),
            RData::HINFO(r) => r.wire_len(),
            RData::SRV(r) => r.wire_len(),
            RData::NAPTR(r) => r.wire_len(),
            RData::SVCB(r) => r.wire_len(),
            RData::HTTPS(r) => r.wire_len(),
            RData::CAA(r) => r.wire_len(),
            RData::TLSA(r) => r.wire_len(),
            RData::SSHFP(r) => r.wire_len(),
            RData::CERT(r) => r.wire_len(),
            RData::OPENPGPKEY(r) => r.wire_len(),
            RData::CSYNC(r) => r.wire_len(),
            RData::NULL(r) => r.wire_len(),
            RData::Unknown(r) => r.wire_len(),
        }
    }

    /// Writes this RDATA in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        match self {
            RData::A(r) => r.write_to(buf),
            RData::AAAA(r) => r.write_to(buf),
            RData::NS(r) => r.write_to(buf),
            RData::CNAME(r) => r.write_to(buf),
            RData::PTR(r) => r.write_to(buf),
            RData::MX(r) => r.write_to(buf),
            RData::SOA(r) => r.write_to(buf),
            RData::TXT(r) => r.write_to(buf),
            RData::HINFO(r) => r.write_to(buf),
            RData::SRV(r) => r.write_to(buf),
            RData::NAPTR(r) => r.write_to(buf),
            RData::SVCB(r) => r.write_to(buf),
            RData::HTTPS(r) => r.write_to(buf),
            RData::CAA(r) => r.write_to(buf),
            RData::TLSA(r) => r.write_to(buf),
            RData::SSHFP(r) => r.write_to(buf),
            RData::CERT(r) => r.write_to(buf),
            RData::OPENPGPKEY(r) => r.write_to(buf),
            RData::CSYNC(r) => r.write_to(buf),
            RData::NULL(r) => r.write_to(buf),
            RData::Unknown(r) => r.write_to(buf),
        }
    }

    /// Returns the IPv4 address if this is an A record.
    pub fn as_a(&self) -> Option<Ipv4Addr> {
        match self {
            RData::A(a) => Some(a.address()),
            _ => None,
        }
    }

    /// Returns the IPv6 address if this is an AAAA record.
    pub fn as_aaaa(&self) -> Option<Ipv6Addr> {
        match self {
            RData::AAAA(aaaa) => Some(aaaa.address()),
            _ => None,
        }
    }

    /// Returns the target name if this is a CNAME record.
    pub fn as_cname(&self) -> Option<&Name> {
        match self {
            RData::CNAME(cname) => Some(cname.target()),
            _ => None,
        }
    }

    /// Returns true if this RDATA redirects resolution to another name.
    pub fn is_alias(&self) -> bool {
        matches!(self, RData::CNAME(_))
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(r) => write!(f, "{r}"),
            RData::AAAA(r) => write!(f, "{r}"),
            RData::NS(r) => write!(f, "{r}"),
            RData::CNAME(r) => write!(f, "{r}"),
            RData::PTR(r) => write!(f, "{r}"),
            RData::MX(r) => write!(f, "{r}"),
            RData::SOA(r) => write!(f, "{r}"),
            RData::TXT(r) => write!(f, "{r}"),
            RData::HINFO(r) => write!(f, "{r}"),
            RData::SRV(r) => write!(f, "{r}"),
            RData::NAPTR(r) => write!(f, "{r}"),
            RData::SVCB(r) => write!(f, "{r}"),
            RData::HTTPS(r) => write!(f, "{r}"),
            RData::CAA(r) => write!(f, "{r}"),
            RData::TLSA(r) => write!(f, "{r}"),
            RData::SSHFP(r) => write!(f, "{r}"),
            RData::CERT(r) => write!(f, "{r}"),
            RData::OPENPGPKEY(r) => write!(f, "{r}"),
            RData::CSYNC(r) => write!(f, "{r}"),
            RData::NULL(r) => write!(f, "{r}"),
            RData::Unknown(r) => write!(f, "{r}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_rdata(rtype: Type, bytes: &[u8]) -> Result<RData> {
        let mut reader = WireReader::new(bytes);
        let rdata = RData::parse(rtype, &mut reader)?;
        assert!(reader.is_empty(), "parser left bytes behind");
        Ok(rdata)
    }

    #[test]
    fn test_unknown_type_roundtrips_verbatim() {
        let payload = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x42];
        let rdata = parse_rdata(Type::from_u16(65412), &payload).unwrap();

        assert_eq!(rdata.rtype().to_u16(), 65412);
        match &rdata {
            RData::Unknown(u) => assert_eq!(u.data(), payload),
            other => panic!("expected Unknown, got {other:?}"),
        }

        let mut writer = WireWriter::new(16);
        rdata.write_to(&mut writer).unwrap();
        assert_eq!(writer.as_bytes(), payload);
        assert_eq!(rdata.wire_len(), payload.len());
    }

    #[test]
    fn test_dispatch_consumes_region() {
        let rdata = parse_rdata(Type::Known(RecordType::A), &[192, 0, 2, 7]).unwrap();
        assert_eq!(rdata.as_a(), Some(Ipv4Addr::new(192, 0, 2, 7)));
    }
}
