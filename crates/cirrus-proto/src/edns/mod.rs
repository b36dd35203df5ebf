//! EDNS(0) support (RFC 6891).
//!
//! EDNS(0) - Extension Mechanisms for DNS - allows larger UDP payloads and
//! additional functionality through the OPT pseudo-RR. The OPT record
//! abuses the class field for the UDP payload size and the TTL field for
//! extended rcode bits, the version, and the flag word.

use crate::error::{Error, Result};
use crate::rtype::RecordType;
use crate::wire::WireWriter;
use crate::DEFAULT_EDNS_UDP_SIZE;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// EDNS option codes this library recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum EdnsOptionCode {
    /// Name Server Identifier (RFC 5001)
    Nsid = 3,
    /// Client Subnet (RFC 7871)
    ClientSubnet = 8,
    /// EDNS Expire (RFC 7314)
    Expire = 9,
    /// DNS Cookie (RFC 7873)
    Cookie = 10,
    /// TCP Keepalive (RFC 7828)
    TcpKeepalive = 11,
    /// Padding (RFC 7830)
    Padding = 12,
    /// Key Tag (RFC 8145)
    KeyTag = 14,
    /// Extended DNS Error (RFC 8914)
    ExtendedDnsError = 15,
}

impl EdnsOptionCode {
    /// Creates from u16 value.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            3 => Some(Self::Nsid),
            8 => Some(Self::ClientSubnet),
            9 => Some(Self::Expire),
            10 => Some(Self::Cookie),
            11 => Some(Self::TcpKeepalive),
            12 => Some(Self::Padding),
            14 => Some(Self::KeyTag),
            15 => Some(Self::ExtendedDnsError),
            _ => None,
        }
    }
}

/// EDNS option value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdnsOption {
    /// Name Server Identifier.
    Nsid(Vec<u8>),

    /// Client subnet information.
    ClientSubnet {
        /// Address family (1=IPv4, 2=IPv6).
        family: u16,
        /// Source prefix length.
        source_prefix: u8,
        /// Scope prefix length.
        scope_prefix: u8,
        /// Address bytes.
        address: Vec<u8>,
    },

    /// DNS Cookie.
    Cookie {
        /// Client cookie (8 bytes).
        client: [u8; 8],
        /// Server cookie (8-32 bytes, optional).
        server: Option<Vec<u8>>,
    },

    /// TCP Keepalive timeout.
    TcpKeepalive(Option<u16>),

    /// Padding bytes.
    Padding(Vec<u8>),

    /// EDNS Expire timer.
    Expire(Option<u32>),

    /// Extended DNS Error.
    ExtendedDnsError {
        /// Info code.
        code: u16,
        /// Extra text (optional).
        text: String,
    },

    /// Key tags for trust anchor signaling.
    KeyTag(Vec<u16>),

    /// Unknown option.
    Unknown {
        /// Option code.
        code: u16,
        /// Option data.
        data: Vec<u8>,
    },
}

impl EdnsOption {
    /// Returns the option code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Nsid(_) => EdnsOptionCode::Nsid as u16,
            Self::ClientSubnet { .. } => EdnsOptionCode::ClientSubnet as u16,
            Self::Expire(_) => EdnsOptionCode::Expire as u16,
            Self::Cookie { .. } => EdnsOptionCode::Cookie as u16,
            Self::TcpKeepalive(_) => EdnsOptionCode::TcpKeepalive as u16,
            Self::Padding(_) => EdnsOptionCode::Padding as u16,
            Self::KeyTag(_) => EdnsOptionCode::KeyTag as u16,
            Self::ExtendedDnsError { .. } => EdnsOptionCode::ExtendedDnsError as u16,
            Self::Unknown { code, .. } => *code,
        }
    }

    /// Returns the wire format length (including the 4-byte option header).
    pub fn wire_len(&self) -> usize {
        4 + match self {
            Self::Nsid(data) => data.len(),
            Self::ClientSubnet { address, .. } => 4 + address.len(),
            Self::Cookie { server, .. } => 8 + server.as_ref().map_or(0, Vec::len),
            Self::TcpKeepalive(timeout) => {
                if timeout.is_some() {
                    2
                } else {
                    0
                }
            }
            Self::Padding(data) => data.len(),
            Self::Expire(value) => {
                if value.is_some() {
                    4
                } else {
                    0
                }
            }
            Self::ExtendedDnsError { text, .. } => 2 + text.len(),
            Self::KeyTag(tags) => tags.len() * 2,
            Self::Unknown { data, .. } => data.len(),
        }
    }

    /// Writes the option in wire format.
    ///
    /// The option length is back-patched from the payload actually
    /// written.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u16(self.code())?;
        let length = buf.begin_length()?;

        match self {
            Self::Nsid(data) => buf.write_bytes(data)?,
            Self::ClientSubnet {
                family,
                source_prefix,
                scope_prefix,
                address,
            } => {
                buf.write_u16(*family)?;
                buf.write_u8(*source_prefix)?;
                buf.write_u8(*scope_prefix)?;
                buf.write_bytes(address)?;
            }
            Self::Cookie { client, server } => {
                buf.write_bytes(client)?;
                if let Some(s) = server {
                    buf.write_bytes(s)?;
                }
            }
            Self::TcpKeepalive(timeout) => {
                if let Some(t) = timeout {
                    buf.write_u16(*t)?;
                }
            }
            Self::Padding(data) => buf.write_bytes(data)?,
            Self::Expire(value) => {
                if let Some(v) = value {
                    buf.write_u32(*v)?;
                }
            }
            Self::ExtendedDnsError { code, text } => {
                buf.write_u16(*code)?;
                buf.write_bytes(text.as_bytes())?;
            }
            Self::KeyTag(tags) => {
                for tag in tags {
                    buf.write_u16(*tag)?;
                }
            }
            Self::Unknown { data, .. } => buf.write_bytes(data)?,
        }

        buf.end_length(length)
    }

    /// Parses an option from wire format, returning it and the bytes
    /// consumed.
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < 4 {
            return Err(Error::buffer_too_short(4, data.len()));
        }

        let code = u16::from_be_bytes([data[0], data[1]]);
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;

        if 4 + length > data.len() {
            return Err(Error::buffer_too_short(4 + length, data.len()));
        }

        let option_data = &data[4..4 + length];

        let option = match EdnsOptionCode::from_u16(code) {
            Some(EdnsOptionCode::Nsid) => Self::Nsid(option_data.to_vec()),
            Some(EdnsOptionCode::ClientSubnet) if length >= 4 => {
                let family = u16::from_be_bytes([option_data[0], option_data[1]]);
                Self::ClientSubnet {
                    family,
                    source_prefix: option_data[2],
                    scope_prefix: option_data[3],
                    address: option_data[4..].to_vec(),
                }
            }
            Some(EdnsOptionCode::Cookie) if length >= 8 => {
                let mut client = [0u8; 8];
                client.copy_from_slice(&option_data[..8]);
                let server = if length > 8 {
                    Some(option_data[8..].to_vec())
                } else {
                    None
                };
                Self::Cookie { client, server }
            }
            Some(EdnsOptionCode::TcpKeepalive) => {
                let timeout = if length >= 2 {
                    Some(u16::from_be_bytes([option_data[0], option_data[1]]))
                } else {
                    None
                };
                Self::TcpKeepalive(timeout)
            }
            Some(EdnsOptionCode::Padding) => Self::Padding(option_data.to_vec()),
            Some(EdnsOptionCode::Expire) => {
                let value = if length >= 4 {
                    Some(u32::from_be_bytes(option_data[..4].try_into().unwrap()))
                } else {
                    None
                };
                Self::Expire(value)
            }
            Some(EdnsOptionCode::ExtendedDnsError) if length >= 2 => {
                let error_code = u16::from_be_bytes([option_data[0], option_data[1]]);
                Self::ExtendedDnsError {
                    code: error_code,
                    text: String::from_utf8_lossy(&option_data[2..]).into_owned(),
                }
            }
            Some(EdnsOptionCode::KeyTag) => {
                let tags = option_data
                    .chunks_exact(2)
                    .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                    .collect();
                Self::KeyTag(tags)
            }
            _ => Self::Unknown {
                code,
                data: option_data.to_vec(),
            },
        };

        Ok((option, 4 + length))
    }
}

impl fmt::Display for EdnsOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nsid(data) => {
                write!(f, "NSID: {}", String::from_utf8_lossy(data))
            }
            Self::ClientSubnet {
                family,
                source_prefix,
                scope_prefix,
                address,
            } => {
                let addr_str = match *family {
                    1 if address.len() >= 4 => {
                        Ipv4Addr::new(address[0], address[1], address[2], address[3]).to_string()
                    }
                    2 if address.len() >= 16 => {
                        let octets: [u8; 16] = address[..16].try_into().unwrap_or([0; 16]);
                        Ipv6Addr::from(octets).to_string()
                    }
                    _ => format!("{address:?}"),
                };
                write!(
                    f,
                    "CLIENT-SUBNET: {addr_str}/{source_prefix}/{scope_prefix}"
                )
            }
            Self::Cookie { client, server } => {
                write!(
                    f,
                    "COOKIE: client={}, server={:?}",
                    data_encoding::HEXLOWER.encode(client),
                    server.as_ref().map(|s| data_encoding::HEXLOWER.encode(s))
                )
            }
            Self::TcpKeepalive(timeout) => {
                write!(f, "TCP-KEEPALIVE: {timeout:?}")
            }
            Self::Padding(data) => {
                write!(f, "PADDING: {} bytes", data.len())
            }
            Self::Expire(value) => {
                write!(f, "EXPIRE: {value:?}")
            }
            Self::ExtendedDnsError { code, text } => {
                write!(f, "EDE: {code} {text}")
            }
            Self::KeyTag(tags) => {
                write!(f, "KEY-TAG: {tags:?}")
            }
            Self::Unknown { code, data } => {
                write!(f, "UNKNOWN({code}): {} bytes", data.len())
            }
        }
    }
}

/// EDNS(0) OPT pseudo-RR data.
///
/// The OPT record lives in the additional section and carries the EDNS
/// version, flags, payload size, and options. The message layer folds it
/// out of the additional records on decode and back in on encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edns {
    /// EDNS version (must be 0).
    version: u8,
    /// UDP payload size.
    udp_size: u16,
    /// Extended RCODE (upper 8 bits).
    extended_rcode: u8,
    /// DNSSEC OK flag.
    dnssec_ok: bool,
    /// EDNS options.
    options: SmallVec<[EdnsOption; 2]>,
}

impl Edns {
    /// Creates a new EDNS with default settings.
    pub fn new() -> Self {
        Self {
            version: 0,
            udp_size: DEFAULT_EDNS_UDP_SIZE,
            extended_rcode: 0,
            dnssec_ok: false,
            options: SmallVec::new(),
        }
    }

    /// Creates EDNS with the DNSSEC OK flag set.
    pub fn with_dnssec() -> Self {
        Self {
            dnssec_ok: true,
            ..Self::new()
        }
    }

    /// Returns the EDNS version.
    #[inline]
    pub const fn version(&self) -> u8 {
        self.version
    }

    /// Returns the advertised UDP payload size.
    #[inline]
    pub const fn udp_size(&self) -> u16 {
        self.udp_size
    }

    /// Sets the UDP payload size.
    pub fn set_udp_size(&mut self, size: u16) {
        self.udp_size = size;
    }

    /// Returns the extended RCODE bits.
    #[inline]
    pub const fn extended_rcode(&self) -> u8 {
        self.extended_rcode
    }

    /// Sets the extended RCODE bits.
    pub fn set_extended_rcode(&mut self, rcode: u8) {
        self.extended_rcode = rcode;
    }

    /// Returns true if the DNSSEC OK flag is set.
    #[inline]
    pub const fn dnssec_ok(&self) -> bool {
        self.dnssec_ok
    }

    /// Sets the DNSSEC OK flag.
    pub fn set_dnssec_ok(&mut self, ok: bool) {
        self.dnssec_ok = ok;
    }

    /// Returns the EDNS options.
    pub fn options(&self) -> &[EdnsOption] {
        &self.options
    }

    /// Adds an option.
    pub fn add_option(&mut self, option: EdnsOption) {
        self.options.push(option);
    }

    /// Returns the client cookie if present.
    pub fn cookie(&self) -> Option<&[u8; 8]> {
        self.options.iter().find_map(|o| match o {
            EdnsOption::Cookie { client, .. } => Some(client),
            _ => None,
        })
    }

    /// Returns the Extended DNS Error if present.
    pub fn ede(&self) -> Option<(u16, &str)> {
        self.options.iter().find_map(|o| match o {
            EdnsOption::ExtendedDnsError { code, text } => Some((*code, text.as_str())),
            _ => None,
        })
    }

    /// Parses EDNS from an OPT record's class, TTL, and RDATA.
    pub fn parse(class: u16, ttl: u32, rdata: &[u8]) -> Result<Self> {
        let udp_size = class;
        let extended_rcode = (ttl >> 24) as u8;
        let version = ((ttl >> 16) & 0xFF) as u8;
        let flags = (ttl & 0xFFFF) as u16;
        let dnssec_ok = flags & 0x8000 != 0;

        if version != 0 {
            return Err(Error::invalid_edns_option(
                0,
                format!("unsupported EDNS version {version}"),
            ));
        }

        let mut options = SmallVec::new();
        let mut offset = 0;

        while offset < rdata.len() {
            let (option, consumed) = EdnsOption::parse(&rdata[offset..])?;
            options.push(option);
            offset += consumed;
        }

        Ok(Self {
            version,
            udp_size,
            extended_rcode,
            dnssec_ok,
            options,
        })
    }

    /// Returns the wire format length of the OPT RDATA.
    pub fn rdata_len(&self) -> usize {
        self.options.iter().map(EdnsOption::wire_len).sum()
    }

    /// Returns the full wire format length of the OPT pseudo-RR.
    pub fn wire_len(&self) -> usize {
        // root name (1) + TYPE (2) + CLASS (2) + TTL (4) + RDLENGTH (2)
        11 + self.rdata_len()
    }

    /// Writes the OPT pseudo-RR in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        // Root owner name.
        buf.write_u8(0)?;
        buf.write_u16(RecordType::OPT.to_u16())?;
        // CLASS carries the UDP payload size.
        buf.write_u16(self.udp_size)?;

        // TTL carries extended RCODE, version, and flags.
        let flags: u16 = if self.dnssec_ok { 0x8000 } else { 0 };
        let ttl = u32::from(self.extended_rcode) << 24
            | u32::from(self.version) << 16
            | u32::from(flags);
        buf.write_u32(ttl)?;

        let rdlength = buf.begin_length()?;
        for option in &self.options {
            option.write_to(buf)?;
        }
        buf.end_length(rdlength)
    }
}

impl Default for Edns {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Edns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EDNS(version={}, udp={}, dnssec_ok={})",
            self.version, self.udp_size, self.dnssec_ok
        )?;

        for option in &self.options {
            write!(f, " [{option}]")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edns_new() {
        let edns = Edns::new();
        assert_eq!(edns.version(), 0);
        assert_eq!(edns.udp_size(), 4096);
        assert!(!edns.dnssec_ok());
    }

    #[test]
    fn test_edns_with_dnssec() {
        let edns = Edns::with_dnssec();
        assert!(edns.dnssec_ok());
    }

    #[test]
    fn test_edns_roundtrip() {
        let mut original = Edns::new();
        original.set_dnssec_ok(true);
        original.add_option(EdnsOption::Nsid(b"test-server".to_vec()));

        let mut buf = WireWriter::new(64);
        original.write_to(&mut buf).unwrap();
        let buf = buf.freeze();
        assert_eq!(buf.len(), original.wire_len());

        // Skip name (1) and type (2); extract class, ttl, rdlength.
        let class = u16::from_be_bytes([buf[3], buf[4]]);
        let ttl = u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]);
        let rdlength = u16::from_be_bytes([buf[9], buf[10]]);
        let rdata = &buf[11..11 + rdlength as usize];

        let parsed = Edns::parse(class, ttl, rdata).unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn test_unsupported_version() {
        let ttl = 1u32 << 16; // version 1
        assert!(matches!(
            Edns::parse(4096, ttl, &[]),
            Err(Error::InvalidEdnsOption { .. })
        ));
    }

    #[test]
    fn test_cookie_option() {
        let mut edns = Edns::new();
        edns.add_option(EdnsOption::Cookie {
            client: [1, 2, 3, 4, 5, 6, 7, 8],
            server: Some(vec![9, 10, 11, 12]),
        });

        assert_eq!(edns.cookie(), Some(&[1, 2, 3, 4, 5, 6, 7, 8]));
    }

    #[test]
    fn test_extended_dns_error() {
        let mut edns = Edns::new();
        edns.add_option(EdnsOption::ExtendedDnsError {
            code: 23,
            text: "network error".to_string(),
        });

        assert_eq!(edns.ede(), Some((23, "network error")));
    }

    #[test]
    fn test_truncated_option() {
        // Option header claims 6 data bytes, only 2 present.
        let rdata = [0x00, 0x03, 0x00, 0x06, 0xAA, 0xBB];
        assert!(matches!(
            Edns::parse(4096, 0, &rdata),
            Err(Error::BufferTooShort { .. })
        ));
    }
}
