//! Certificate-related record types (SSHFP, TLSA, CERT, OPENPGPKEY).

use crate::error::Result;
use crate::wire::{WireReader, WireWriter};
use data_encoding::{BASE64, HEXLOWER};
use serde::{Deserialize, Serialize};
use std::fmt;

/// TLSA record - TLS Certificate Association (RFC 6698).
///
/// Used for DANE to associate certificates or public keys with domain
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TLSA {
    /// Certificate usage (0-3).
    usage: u8,
    /// Selector (0-1).
    selector: u8,
    /// Matching type (0-2).
    matching_type: u8,
    /// Certificate association data.
    data: Vec<u8>,
}

impl TLSA {
    /// Creates a new TLSA record.
    pub fn new(usage: u8, selector: u8, matching_type: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            usage,
            selector,
            matching_type,
            data: data.into(),
        }
    }

    /// Returns the certificate usage.
    #[inline]
    pub const fn usage(&self) -> u8 {
        self.usage
    }

    /// Returns the selector.
    #[inline]
    pub const fn selector(&self) -> u8 {
        self.selector
    }

    /// Returns the matching type.
    #[inline]
    pub const fn matching_type(&self) -> u8 {
        self.matching_type
    }

    /// Returns the certificate association data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parses a TLSA record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            usage: reader.read_u8()?,
            selector: reader.read_u8()?,
            matching_type: reader.read_u8()?,
            data: reader.read_to_end().to_vec(),
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        3 + self.data.len()
    }

    /// Writes the TLSA record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u8(self.usage)?;
        buf.write_u8(self.selector)?;
        buf.write_u8(self.matching_type)?;
        buf.write_bytes(&self.data)
    }
}

impl fmt::Display for TLSA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.usage,
            self.selector,
            self.matching_type,
            HEXLOWER.encode(&self.data)
        )
    }
}

/// SSHFP record - SSH Fingerprint (RFC 4255).
///
/// Publishes SSH host key fingerprints in DNS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SSHFP {
    /// Public key algorithm (1=RSA, 2=DSA, 3=ECDSA, 4=Ed25519, 6=Ed448).
    algorithm: u8,
    /// Fingerprint type (1=SHA-1, 2=SHA-256).
    fp_type: u8,
    /// Fingerprint data.
    fingerprint: Vec<u8>,
}

impl SSHFP {
    /// Creates a new SSHFP record.
    pub fn new(algorithm: u8, fp_type: u8, fingerprint: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            fp_type,
            fingerprint: fingerprint.into(),
        }
    }

    /// Returns the algorithm number.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the fingerprint type.
    #[inline]
    pub const fn fp_type(&self) -> u8 {
        self.fp_type
    }

    /// Returns the fingerprint data.
    pub fn fingerprint(&self) -> &[u8] {
        &self.fingerprint
    }

    /// Parses an SSHFP record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            algorithm: reader.read_u8()?,
            fp_type: reader.read_u8()?,
            fingerprint: reader.read_to_end().to_vec(),
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        2 + self.fingerprint.len()
    }

    /// Writes the SSHFP record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u8(self.algorithm)?;
        buf.write_u8(self.fp_type)?;
        buf.write_bytes(&self.fingerprint)
    }
}

impl fmt::Display for SSHFP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.algorithm,
            self.fp_type,
            HEXLOWER.encode(&self.fingerprint)
        )
    }
}

/// CERT record - Certificate (RFC 4398).
///
/// Stores certificates and related revocation lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CERT {
    /// Certificate type (1=PKIX, 2=SPKI, 3=PGP, ...).
    cert_type: u16,
    /// Key tag.
    key_tag: u16,
    /// Algorithm.
    algorithm: u8,
    /// Certificate data.
    certificate: Vec<u8>,
}

impl CERT {
    /// Creates a new CERT record.
    pub fn new(
        cert_type: u16,
        key_tag: u16,
        algorithm: u8,
        certificate: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            cert_type,
            key_tag,
            algorithm,
            certificate: certificate.into(),
        }
    }

    /// Returns the certificate type.
    #[inline]
    pub const fn cert_type(&self) -> u16 {
        self.cert_type
    }

    /// Returns the key tag.
    #[inline]
    pub const fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Returns the algorithm.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the certificate data.
    pub fn certificate(&self) -> &[u8] {
        &self.certificate
    }

    /// Parses a CERT record.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            cert_type: reader.read_u16()?,
            key_tag: reader.read_u16()?,
            algorithm: reader.read_u8()?,
            certificate: reader.read_to_end().to_vec(),
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        5 + self.certificate.len()
    }

    /// Writes the CERT record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_u16(self.cert_type)?;
        buf.write_u16(self.key_tag)?;
        buf.write_u8(self.algorithm)?;
        buf.write_bytes(&self.certificate)
    }
}

impl fmt::Display for CERT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.cert_type,
            self.key_tag,
            self.algorithm,
            BASE64.encode(&self.certificate)
        )
    }
}

/// OPENPGPKEY record - OpenPGP public key (RFC 7929).
///
/// The RDATA is a single transferable public key; it occupies the whole
/// declared region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OPENPGPKEY {
    /// The transferable public key (RFC 4880 format).
    public_key: Vec<u8>,
}

impl OPENPGPKEY {
    /// Creates a new OPENPGPKEY record.
    pub fn new(public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            public_key: public_key.into(),
        }
    }

    /// Returns the public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Parses an OPENPGPKEY record: the whole remaining region.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            public_key: reader.read_to_end().to_vec(),
        })
    }

    /// Returns the wire format length.
    pub fn wire_len(&self) -> usize {
        self.public_key.len()
    }

    /// Writes the OPENPGPKEY record in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        buf.write_bytes(&self.public_key)
    }
}

impl fmt::Display for OPENPGPKEY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BASE64.encode(&self.public_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tlsa_roundtrip() {
        let tlsa = TLSA::new(3, 1, 1, vec![0xAB; 32]);

        let mut writer = WireWriter::new(64);
        tlsa.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), tlsa.wire_len());

        let mut reader = WireReader::new(&wire);
        let parsed = TLSA::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, tlsa);
    }

    #[test]
    fn test_sshfp_roundtrip() {
        let sshfp = SSHFP::new(4, 2, vec![0x12; 32]);

        let mut writer = WireWriter::new(64);
        sshfp.write_to(&mut writer).unwrap();
        let wire = writer.freeze();

        let mut reader = WireReader::new(&wire);
        let parsed = SSHFP::parse(&mut reader).unwrap();
        assert_eq!(parsed, sshfp);
        assert_eq!(parsed.algorithm(), 4);
        assert_eq!(parsed.fp_type(), 2);
    }

    #[test]
    fn test_cert_roundtrip() {
        let cert = CERT::new(1, 12345, 8, b"LJA4V2LkVQZlLzZkHmAuOwL1".to_vec());

        let mut writer = WireWriter::new(64);
        cert.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), cert.wire_len());

        let mut reader = WireReader::new(&wire);
        let parsed = CERT::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, cert);
        assert_eq!(parsed.key_tag(), 12345);
    }

    #[test]
    fn test_openpgpkey_consumes_declared_region() {
        // A 44-byte payload in a 44-byte region: all of it is the key,
        // no matter what bytes follow in the enclosing message.
        let payload: Vec<u8> = (0..44).collect();
        let mut reader = WireReader::new(&payload);

        let parsed = OPENPGPKEY::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed.public_key().len(), 44);
        assert_eq!(parsed.wire_len(), 44);
        assert_eq!(parsed.public_key(), payload.as_slice());
    }

    #[test]
    fn test_cert_too_short() {
        let mut reader = WireReader::new(&[0x00, 0x01, 0x02]);
        assert!(CERT::parse(&mut reader).is_err());
    }
}
