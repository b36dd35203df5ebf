//! # Cirrus DNS Protocol Library
//!
//! This crate provides DNS protocol types and the wire format codec
//! following RFC 1035 and its extensions.
//!
//! ## Features
//!
//! - **RFC 1035 message codec** with compression pointer decoding
//! - **EDNS0 support** (RFC 6891) with the OPT pseudo-RR
//! - **Typed RDATA** for the common record types, including HTTPS/SVCB
//!   (RFC 9460) and CSYNC (RFC 7477)
//! - **Opaque round-tripping** of unknown record types (RFC 3597)
//! - **Strict bounds checking** on every parse path; malformed input
//!   yields a typed error, never a panic
//!
//! ## Example
//!
//! ```rust,ignore
//! use cirrus_proto::{Message, Question, Name, RecordType, RecordClass};
//!
//! // Parse a DNS message from wire format
//! let bytes: &[u8] = &[/* DNS message bytes */];
//! let message = Message::parse(bytes)?;
//!
//! // Build a DNS query
//! let query = Message::query(
//!     Question::new(Name::from_str("example.com.")?, RecordType::A, RecordClass::IN)
//! );
//!
//! // Serialize to wire format
//! let wire_bytes = query.to_wire()?;
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod class;
pub mod edns;
pub mod error;
pub mod header;
pub mod message;
pub mod name;
pub mod opcode;
pub mod question;
pub mod rcode;
pub mod rdata;
pub mod record;
pub mod rtype;
pub mod type_set;
pub mod wire;

// Re-exports for convenience
pub use class::{Class, RecordClass};
pub use edns::{Edns, EdnsOption};
pub use error::{Error, Result};
pub use header::Header;
pub use message::Message;
pub use name::Name;
pub use opcode::OpCode;
pub use question::Question;
pub use rcode::ResponseCode;
pub use rdata::RData;
pub use record::ResourceRecord;
pub use rtype::{RecordType, Type};
pub use type_set::RecordTypeSet;
pub use wire::{WireReader, WireWriter};

/// Maximum length of a DNS label (63 bytes per RFC 1035)
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a domain name in wire format (255 bytes per RFC 1035)
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum size of a UDP DNS message without EDNS0 (512 bytes per RFC 1035)
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

/// Default EDNS0 UDP payload size (4096 bytes)
pub const DEFAULT_EDNS_UDP_SIZE: u16 = 4096;

/// DNS port (53)
pub const DNS_PORT: u16 = 53;
