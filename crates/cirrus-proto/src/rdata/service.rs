//! Service record types (SRV, NAPTR, SVCB, HTTPS, CAA).

use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// SRV record - Server selection (RFC 2782).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SRV {
    /// Priority (lower is tried first).
    priority: u16,
    /// Weight for entries of equal priority.
    weight: u16,
    /// Port of the service.
    port: u16,
    /// Host providing the service.
    target: Name,
}

impl SRV {
    /// Creates a new SRV record.
    pub fn new(priority: u16, weight: u16, port: u16, target: Name) -> Self {
        Self {
            priority,
            weight,
            port,
            target,
        }
    }

    /// Returns the priority.
    #[inline]
    pub const fn priority(&self) -> u16 {
        self.priority
    }

    /// Returns the weight.
    #[inline]
    pub const fn weight(&self) -> u16 {
        self.weight
    }

    /// Returns the port.
    #[inline]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the target host.
    #[inline]
    pub fn target(&self) -> &Name {
        &self.target
    }

    /// Parses an SRV record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let priority = reader.read_u16()?;
        let weight = reader.read_u16()?;
        let port = reader.read_u16()?;

        let parser = NameParser::new(reader.data());
        let (target, consumed) = parser.parse_name(reader.position())?;
        reader.advance(consumed)?;

        Ok(Self {
            priority,
            weight,
            port,
            target,
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        6 + self.target.wire_len()
    }

    /// Writes the SRV record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u16(self.priority)?;
        buf.write_u16(self.weight)?;
        buf.write_u16(self.port)?;
        self.target.write_wire(buf)
    }
}

impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}

/// NAPTR record - Naming authority pointer (RFC 3403).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NAPTR {
    /// Processing order (lower first).
    order: u16,
    /// Preference among equal-order entries.
    preference: u16,
    /// Flags controlling rewriting ("S", "A", "U", "P").
    flags: Vec<u8>,
    /// Service parameters.
    services: Vec<u8>,
    /// Substitution expression.
    regexp: Vec<u8>,
    /// Replacement domain name.
    replacement: Name,
}

impl NAPTR {
    /// Creates a new NAPTR record.
    pub fn new(
        order: u16,
        preference: u16,
        flags: impl Into<Vec<u8>>,
        services: impl Into<Vec<u8>>,
        regexp: impl Into<Vec<u8>>,
        replacement: Name,
    ) -> Self {
        Self {
            order,
            preference,
            flags: flags.into(),
            services: services.into(),
            regexp: regexp.into(),
            replacement,
        }
    }

    /// Returns the order.
    #[inline]
    pub const fn order(&self) -> u16 {
        self.order
    }

    /// Returns the preference.
    #[inline]
    pub const fn preference(&self) -> u16 {
        self.preference
    }

    /// Returns the flags string.
    pub fn flags(&self) -> &[u8] {
        &self.flags
    }

    /// Returns the services string.
    pub fn services(&self) -> &[u8] {
        &self.services
    }

    /// Returns the substitution expression.
    pub fn regexp(&self) -> &[u8] {
        &self.regexp
    }

    /// Returns the replacement name.
    pub fn replacement(&self) -> &Name {
        &self.replacement
    }

    fn read_string(reader: &mut WireReader<'_>) -> Result<Vec<u8>> {
        let len = reader.read_u8()? as usize;
        Ok(reader.read_bytes(len)?.to_vec())
    }

    fn write_string(buf: &mut WireWriter, data: &[u8]) -> Result<()> {
        if data.len() > 255 {
            return Err(Error::invalid_rdata(
                "NAPTR",
                format!("string of {} bytes exceeds 255", data.len()),
            ));
        }
        buf.write_u8(data.len() as u8)?;
        buf.write_bytes(data)
    }

    /// Parses a NAPTR record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let order = reader.read_u16()?;
        let preference = reader.read_u16()?;
        let flags = Self::read_string(reader)?;
        let services = Self::read_string(reader)?;
        let regexp = Self::read_string(reader)?;

        let parser = NameParser::new(reader.data());
        let (replacement, consumed) = parser.parse_name(reader.position())?;
        reader.advance(consumed)?;

        Ok(Self {
            order,
            preference,
            flags,
            services,
            regexp,
            replacement,
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        4 + 3
            + self.flags.len()
            + self.services.len()
            + self.regexp.len()
            + self.replacement.wire_len()
    }

    /// Writes the NAPTR record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u16(self.order)?;
        buf.write_u16(self.preference)?;
        Self::write_string(buf, &self.flags)?;
        Self::write_string(buf, &self.services)?;
        Self::write_string(buf, &self.regexp)?;
        self.replacement.write_wire(buf)
    }
}

impl fmt::Display for NAPTR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} \"{}\" \"{}\" \"{}\" {}",
            self.order,
            self.preference,
            String::from_utf8_lossy(&self.flags),
            String::from_utf8_lossy(&self.services),
            String::from_utf8_lossy(&self.regexp),
            self.replacement
        )
    }
}

/// Service parameter keys for SVCB/HTTPS (RFC 9460).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum SvcParamKey {
    /// Mandatory parameters.
    Mandatory = 0,
    /// Application Layer Protocol Negotiation.
    Alpn = 1,
    /// No default ALPN.
    NoDefaultAlpn = 2,
    /// Port number.
    Port = 3,
    /// IPv4 address hints.
    Ipv4Hint = 4,
    /// Encrypted ClientHello config.
    Ech = 5,
    /// IPv6 address hints.
    Ipv6Hint = 6,
    /// DoH path template (DDR).
    Dohpath = 7,
}

impl SvcParamKey {
    /// Creates from u16 value.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Mandatory),
            1 => Some(Self::Alpn),
            2 => Some(Self::NoDefaultAlpn),
            3 => Some(Self::Port),
            4 => Some(Self::Ipv4Hint),
            5 => Some(Self::Ech),
            6 => Some(Self::Ipv6Hint),
            7 => Some(Self::Dohpath),
            _ => None,
        }
    }
}

/// Service parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SvcParamValue {
    /// Mandatory keys.
    Mandatory(Vec<u16>),
    /// ALPN protocol IDs.
    Alpn(Vec<String>),
    /// No default ALPN (no value).
    NoDefaultAlpn,
    /// Port number.
    Port(u16),
    /// IPv4 address hints.
    Ipv4Hint(Vec<Ipv4Addr>),
    /// Encrypted ClientHello config.
    Ech(Vec<u8>),
    /// IPv6 address hints.
    Ipv6Hint(Vec<Ipv6Addr>),
    /// DoH path template.
    DohPath(String),
    /// Unknown parameter.
    Unknown(u16, Vec<u8>),
}

/// SVCB record - Service Binding (RFC 9460).
///
/// The SVCB record provides information for connection establishment.
/// Priority 0 is alias mode; anything else is service mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SVCB {
    /// Priority (0 = alias mode, >0 = service mode).
    priority: u16,
    /// Target name.
    target: Name,
    /// Service parameters, keyed by parameter number.
    params: BTreeMap<u16, SvcParamValue>,
}

impl SVCB {
    /// Creates a new SVCB record.
    pub fn new(priority: u16, target: Name, params: BTreeMap<u16, SvcParamValue>) -> Self {
        Self {
            priority,
            target,
            params,
        }
    }

    /// Creates an alias mode record (priority 0).
    pub fn alias(target: Name) -> Self {
        Self::new(0, target, BTreeMap::new())
    }

    /// Returns the priority.
    #[inline]
    pub const fn priority(&self) -> u16 {
        self.priority
    }

    /// Returns true if this is alias mode.
    #[inline]
    pub const fn is_alias(&self) -> bool {
        self.priority == 0
    }

    /// Returns the target name.
    #[inline]
    pub fn target(&self) -> &Name {
        &self.target
    }

    /// Returns the service parameters.
    pub fn params(&self) -> &BTreeMap<u16, SvcParamValue> {
        &self.params
    }

    /// Returns the port if specified.
    pub fn port(&self) -> Option<u16> {
        match self.params.get(&(SvcParamKey::Port as u16)) {
            Some(SvcParamValue::Port(p)) => Some(*p),
            _ => None,
        }
    }

    /// Returns the ALPN protocols if specified.
    pub fn alpn(&self) -> Option<&[String]> {
        match self.params.get(&(SvcParamKey::Alpn as u16)) {
            Some(SvcParamValue::Alpn(a)) => Some(a),
            _ => None,
        }
    }

    /// Parses an SVCB record: priority, target, then parameters until the
    /// region ends.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let priority = reader.read_u16()?;

        let parser = NameParser::new(reader.data());
        let (target, consumed) = parser.parse_name(reader.position())?;
        reader.advance(consumed)?;

        let mut params = BTreeMap::new();
        while !reader.is_empty() {
            let key = reader.read_u16()?;
            let value_len = reader.read_u16()? as usize;
            let value_data = reader.read_bytes(value_len)?;

            let value = Self::parse_param(key, value_data);
            params.insert(key, value);
        }

        Ok(Self {
            priority,
            target,
            params,
        })
    }

    fn parse_param(key: u16, value_data: &[u8]) -> SvcParamValue {
        match SvcParamKey::from_u16(key) {
            Some(SvcParamKey::Mandatory) => {
                let keys = value_data
                    .chunks_exact(2)
                    .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                    .collect();
                SvcParamValue::Mandatory(keys)
            }
            Some(SvcParamKey::Alpn) => {
                let mut alpns = Vec::new();
                let mut p = 0;
                while p < value_data.len() {
                    let len = value_data[p] as usize;
                    p += 1;
                    if p + len <= value_data.len() {
                        alpns.push(String::from_utf8_lossy(&value_data[p..p + len]).into_owned());
                    }
                    p += len;
                }
                SvcParamValue::Alpn(alpns)
            }
            Some(SvcParamKey::NoDefaultAlpn) => SvcParamValue::NoDefaultAlpn,
            Some(SvcParamKey::Port) if value_data.len() >= 2 => {
                SvcParamValue::Port(u16::from_be_bytes([value_data[0], value_data[1]]))
            }
            Some(SvcParamKey::Ipv4Hint) => {
                let addrs = value_data
                    .chunks_exact(4)
                    .map(|chunk| Ipv4Addr::new(chunk[0], chunk[1], chunk[2], chunk[3]))
                    .collect();
                SvcParamValue::Ipv4Hint(addrs)
            }
            Some(SvcParamKey::Ech) => SvcParamValue::Ech(value_data.to_vec()),
            Some(SvcParamKey::Ipv6Hint) => {
                let addrs = value_data
                    .chunks_exact(16)
                    .map(|chunk| {
                        let octets: [u8; 16] = chunk.try_into().unwrap();
                        Ipv6Addr::from(octets)
                    })
                    .collect();
                SvcParamValue::Ipv6Hint(addrs)
            }
            Some(SvcParamKey::Dohpath) => {
                SvcParamValue::DohPath(String::from_utf8_lossy(value_data).into_owned())
            }
            _ => SvcParamValue::Unknown(key, value_data.to_vec()),
        }
    }

    fn param_value_len(value: &SvcParamValue) -> usize {
        match value {
            SvcParamValue::Mandatory(keys) => keys.len() * 2,
            SvcParamValue::Alpn(alpns) => alpns.iter().map(|a| 1 + a.len()).sum(),
            SvcParamValue::NoDefaultAlpn => 0,
            SvcParamValue::Port(_) => 2,
            SvcParamValue::Ipv4Hint(addrs) => addrs.len() * 4,
            SvcParamValue::Ech(data) => data.len(),
            SvcParamValue::Ipv6Hint(addrs) => addrs.len() * 16,
            SvcParamValue::DohPath(path) => path.len(),
            SvcParamValue::Unknown(_, data) => data.len(),
        }
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        2 + self.target.wire_len()
            + self
                .params
                .values()
                .map(|v| 4 + Self::param_value_len(v))
                .sum::<usize>()
    }

    /// Writes the SVCB record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u16(self.priority)?;
        self.target.write_wire(buf)?;

        for (&key, value) in &self.params {
            buf.write_u16(key)?;
            buf.write_u16(Self::param_value_len(value) as u16)?;

            match value {
                SvcParamValue::Mandatory(keys) => {
                    for k in keys {
                        buf.write_u16(*k)?;
                    }
                }
                SvcParamValue::Alpn(alpns) => {
                    for a in alpns {
                        buf.write_u8(a.len() as u8)?;
                        buf.write_bytes(a.as_bytes())?;
                    }
                }
                SvcParamValue::NoDefaultAlpn => {}
                SvcParamValue::Port(p) => buf.write_u16(*p)?,
                SvcParamValue::Ipv4Hint(addrs) => {
                    for a in addrs {
                        buf.write_bytes(&a.octets())?;
                    }
                }
                SvcParamValue::Ech(data) => buf.write_bytes(data)?,
                SvcParamValue::Ipv6Hint(addrs) => {
                    for a in addrs {
                        buf.write_bytes(&a.octets())?;
                    }
                }
                SvcParamValue::DohPath(path) => buf.write_bytes(path.as_bytes())?,
                SvcParamValue::Unknown(_, data) => buf.write_bytes(data)?,
            }
        }

        Ok(())
    }
}

impl fmt::Display for SVCB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.priority, self.target)?;
        for (key, value) in &self.params {
            match value {
                SvcParamValue::Port(p) => write!(f, " port={p}")?,
                SvcParamValue::Alpn(alpns) => write!(f, " alpn={}", alpns.join(","))?,
                SvcParamValue::NoDefaultAlpn => write!(f, " no-default-alpn")?,
                SvcParamValue::Ipv4Hint(addrs) => {
                    let joined = addrs
                        .iter()
                        .map(|a| a.to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    write!(f, " ipv4hint={joined}")?;
                }
                SvcParamValue::Ipv6Hint(addrs) => {
                    let joined = addrs
                        .iter()
                        .map(|a| a.to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    write!(f, " ipv6hint={joined}")?;
                }
                SvcParamValue::DohPath(path) => write!(f, " dohpath={path}")?,
                _ => write!(f, " key{key}")?,
            }
        }
        Ok(())
    }
}

/// HTTPS record - HTTPS Service Binding (RFC 9460).
///
/// HTTPS is a derivation of SVCB specialized for HTTPS origins; the wire
/// format is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HTTPS(SVCB);

impl HTTPS {
    /// Creates a new HTTPS record.
    pub fn new(priority: u16, target: Name, params: BTreeMap<u16, SvcParamValue>) -> Self {
        Self(SVCB::new(priority, target, params))
    }

    /// Creates an alias mode record.
    pub fn alias(target: Name) -> Self {
        Self(SVCB::alias(target))
    }

    /// Returns the inner SVCB record.
    pub fn svcb(&self) -> &SVCB {
        &self.0
    }

    /// Returns the priority.
    #[inline]
    pub const fn priority(&self) -> u16 {
        self.0.priority()
    }

    /// Returns true if this is alias mode.
    #[inline]
    pub const fn is_alias(&self) -> bool {
        self.0.is_alias()
    }

    /// Returns the target name.
    #[inline]
    pub fn target(&self) -> &Name {
        self.0.target()
    }

    /// Returns the service parameters.
    pub fn params(&self) -> &BTreeMap<u16, SvcParamValue> {
        self.0.params()
    }

    /// Parses an HTTPS record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self(SVCB::parse(reader)?))
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        self.0.wire_len()
    }

    /// Writes the HTTPS record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        self.0.write_to(buf)
    }
}

impl From<SVCB> for HTTPS {
    fn from(svcb: SVCB) -> Self {
        Self(svcb)
    }
}

impl fmt::Display for HTTPS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// CAA record - Certification Authority Authorization (RFC 8659).
///
/// The CAA record specifies which certificate authorities may issue
/// certificates for the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CAA {
    /// Critical flag (bit 7 of the flags byte).
    critical: bool,
    /// Property tag ("issue", "issuewild", "iodef", ...).
    tag: String,
    /// Property value.
    value: Vec<u8>,
}

impl CAA {
    /// Flag bit marking the property critical.
    const FLAG_CRITICAL: u8 = 0x80;

    /// Creates a new CAA record.
    pub fn new(critical: bool, tag: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            critical,
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// Creates an "issue" CAA record.
    pub fn issue(issuer: impl Into<String>) -> Self {
        Self::new(false, "issue", issuer.into().into_bytes())
    }

    /// Returns true if the critical flag is set.
    #[inline]
    pub const fn critical(&self) -> bool {
        self.critical
    }

    /// Returns the property tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the property value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Parses a CAA record: flags, tag, then the value to the region end.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let flags = reader.read_u8()?;
        let tag_len = reader.read_u8()? as usize;
        if tag_len == 0 {
            return Err(Error::invalid_rdata("CAA", "empty tag"));
        }
        let tag_bytes = reader.read_bytes(tag_len)?;
        let tag = String::from_utf8_lossy(tag_bytes).into_owned();
        let value = reader.read_to_end().to_vec();

        Ok(Self {
            critical: flags & Self::FLAG_CRITICAL != 0,
            tag,
            value,
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        2 + self.tag.len() + self.value.len()
    }

    /// Writes the CAA record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        let flags = if self.critical {
            Self::FLAG_CRITICAL
        } else {
            0
        };
        buf.write_u8(flags)?;
        buf.write_u8(self.tag.len() as u8)?;
        buf.write_bytes(self.tag.as_bytes())?;
        buf.write_bytes(&self.value)
    }
}

impl fmt::Display for CAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} \"{}\"",
            u8::from(self.critical),
            self.tag,
            String::from_utf8_lossy(&self.value)
        )
    }
}
