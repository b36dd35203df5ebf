//! DNS question section.
//!
//! The question section contains queries for information.
//! Each question has a domain name, query type, and query class.

use crate::class::{Class, RecordClass};
use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::rtype::{RecordType, Type};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DNS question.
///
/// Questions specify what information is being requested from the DNS.
/// A typical query has one question, though the protocol allows multiple.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     QNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     QTYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     QCLASS                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    /// The domain name being queried.
    pub qname: Name,

    /// The type of record being requested.
    pub qtype: Type,

    /// The class of the query (usually IN for Internet).
    pub qclass: Class,
}

impl Question {
    /// Creates a new question.
    #[inline]
    pub fn new(qname: Name, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            qname,
            qtype: Type::Known(qtype),
            qclass: Class::Known(qclass),
        }
    }

    /// Creates a new question with generic type and class.
    #[inline]
    pub fn new_generic(qname: Name, qtype: Type, qclass: Class) -> Self {
        Self {
            qname,
            qtype,
            qclass,
        }
    }

    /// Creates a question for an A record lookup.
    #[inline]
    pub fn a(name: Name) -> Self {
        Self::new(name, RecordType::A, RecordClass::IN)
    }

    /// Creates a question for an AAAA record lookup.
    #[inline]
    pub fn aaaa(name: Name) -> Self {
        Self::new(name, RecordType::AAAA, RecordClass::IN)
    }

    /// Creates a question for an MX record lookup.
    #[inline]
    pub fn mx(name: Name) -> Self {
        Self::new(name, RecordType::MX, RecordClass::IN)
    }

    /// Creates a question for a TXT record lookup.
    #[inline]
    pub fn txt(name: Name) -> Self {
        Self::new(name, RecordType::TXT, RecordClass::IN)
    }

    /// Creates a question for a PTR (reverse DNS) lookup.
    #[inline]
    pub fn ptr(name: Name) -> Self {
        Self::new(name, RecordType::PTR, RecordClass::IN)
    }

    /// Creates a question for an ANY record lookup.
    #[inline]
    pub fn any(name: Name) -> Self {
        Self::new(name, RecordType::ANY, RecordClass::IN)
    }

    /// Returns the record type if known.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.qtype.as_known()
    }

    /// Returns the record class if known.
    #[inline]
    pub fn record_class(&self) -> Option<RecordClass> {
        self.qclass.as_known()
    }

    /// Parses a question at the reader's position.
    pub fn parse(reader: &mut WireReader<'_>) -> Result<Self> {
        let parser = NameParser::new(reader.data());
        let (qname, name_len) = parser.parse_name(reader.position())?;
        reader.advance(name_len)?;

        let qtype = Type::from_u16(reader.read_u16()?);
        let qclass = Class::from_u16(reader.read_u16()?);

        Ok(Self {
            qname,
            qtype,
            qclass,
        })
    }

    /// Returns the wire format length of this question.
    pub fn wire_len(&self) -> usize {
        self.qname.wire_len() + 4 // name + 2 bytes type + 2 bytes class
    }

    /// Writes the question in wire format.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<()> {
        self.qname.write_wire(buf)?;
        buf.write_u16(self.qtype.to_u16())?;
        buf.write_u16(self.qclass.to_u16())
    }

    /// Returns true if this question matches a response question.
    ///
    /// The name compares case-insensitively; type and class are exact.
    pub fn matches(&self, other: &Question) -> bool {
        self.qname == other.qname && self.qtype == other.qtype && self.qclass == other.qclass
    }

    /// Returns true if a record with the given key would answer this question.
    pub fn is_answered_by(&self, name: &Name, rtype: Type, rclass: Class) -> bool {
        if &self.qname != name {
            return false;
        }

        if self.qclass.to_u16() != rclass.to_u16()
            && !matches!(self.qclass, Class::Known(RecordClass::ANY))
        {
            return false;
        }

        self.qtype.to_u16() == rtype.to_u16()
            || matches!(self.qtype, Type::Known(RecordType::ANY))
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.qname, self.qclass, self.qtype)
    }
}

/// Parser for the question section.
#[derive(Debug)]
pub struct QuestionParser<'a, 'r> {
    /// The message reader.
    reader: &'r mut WireReader<'a>,
    /// Number of questions remaining.
    remaining: u16,
}

impl<'a, 'r> QuestionParser<'a, 'r> {
    /// Creates a new question parser.
    #[inline]
    pub fn new(reader: &'r mut WireReader<'a>, count: u16) -> Self {
        Self {
            reader,
            remaining: count,
        }
    }

    /// Parses the next question, or returns `None` when the declared count
    /// is exhausted.
    pub fn next(&mut self) -> Result<Option<Question>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let question = Question::parse(self.reader)?;
        self.remaining -= 1;
        Ok(Some(question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_question_roundtrip() {
        let question = Question::a(Name::from_str("example.com.").unwrap());

        let mut writer = WireWriter::new(32);
        question.write_to(&mut writer).unwrap();
        let wire = writer.freeze();
        assert_eq!(wire.len(), question.wire_len());

        let mut reader = WireReader::new(&wire);
        let parsed = Question::parse(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, question);
    }

    #[test]
    fn test_question_matching() {
        let q = Question::a(Name::from_str("example.com.").unwrap());
        let upper = Question::a(Name::from_str("EXAMPLE.COM.").unwrap());
        let other = Question::aaaa(Name::from_str("example.com.").unwrap());

        assert!(q.matches(&upper));
        assert!(!q.matches(&other));
    }

    #[test]
    fn test_is_answered_by() {
        let q = Question::any(Name::from_str("example.com.").unwrap());
        let name = Name::from_str("example.com.").unwrap();

        assert!(q.is_answered_by(
            &name,
            Type::Known(RecordType::A),
            Class::Known(RecordClass::IN)
        ));
        assert!(q.is_answered_by(
            &name,
            Type::Known(RecordType::TXT),
            Class::Known(RecordClass::IN)
        ));

        let q = Question::a(Name::from_str("example.com.").unwrap());
        assert!(!q.is_answered_by(
            &name,
            Type::Known(RecordType::TXT),
            Class::Known(RecordClass::IN)
        ));
    }

    #[test]
    fn test_truncated_question() {
        let wire = [3, b'c', b'o', b'm', 0, 0x00]; // name + half a qtype
        let mut reader = WireReader::new(&wire);
        assert!(Question::parse(&mut reader).is_err());
    }
}
