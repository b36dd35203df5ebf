//! DNS message representation.
//!
//! A DNS message consists of a header, a question section, and record
//! sections for answers, authority, and additional data. This library
//! additionally folds the EDNS OPT pseudo-record and trailing transaction
//! signatures (TSIG/SIG) out of the additional section.

use crate::edns::Edns;
use crate::error::{Error, Result};
use crate::header::{HEADER_SIZE, Header};
use crate::name::Name;
use crate::opcode::OpCode;
use crate::question::{Question, QuestionParser};
use crate::rcode::ResponseCode;
use crate::record::{RecordParser, ResourceRecord};
use crate::rtype::RecordType;
use crate::wire::{WireReader, WireWriter};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete DNS message.
///
/// DNS messages consist of:
/// - A fixed 12-byte header
/// - A question section (queries)
/// - An answer section (responses to queries)
/// - An authority section (NS/SOA records for referrals)
/// - An additional section (related records)
///
/// The OPT pseudo-record is surfaced as [`Edns`] instead of an ordinary
/// additional record, and transaction-signature records (TSIG/SIG) are
/// surfaced as the signature section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The message header.
    header: Header,
    /// The question section.
    questions: Vec<Question>,
    /// The answer section.
    answers: Vec<ResourceRecord>,
    /// The authority section.
    authority: Vec<ResourceRecord>,
    /// The additional section (excluding OPT and signatures).
    additional: Vec<ResourceRecord>,
    /// Transaction signature records (TSIG/SIG), written last on the wire.
    signature: Vec<ResourceRecord>,
    /// EDNS(0) options (from the OPT pseudo-RR).
    edns: Option<Edns>,
}

impl Message {
    /// Creates a new empty message with the given header.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            questions: Vec::new(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
            signature: Vec::new(),
            edns: None,
        }
    }

    /// Creates a query message with EDNS enabled.
    pub fn query(question: Question) -> Self {
        let mut header = Header::query();
        header.qd_count = 1;

        let mut msg = Self {
            header,
            questions: vec![question],
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
            signature: Vec::new(),
            edns: Some(Edns::new()),
        };
        msg.update_ar_count();
        msg
    }

    /// Creates a query message with DNSSEC requested.
    pub fn query_dnssec(question: Question) -> Self {
        let mut msg = Self::query(question);
        msg.edns = Some(Edns::with_dnssec());
        msg
    }

    /// Creates a response message from a query.
    pub fn response_from(query: &Message) -> Self {
        let mut header = Header::response_from(&query.header);
        header.qd_count = query.questions.len() as u16;

        let mut msg = Self {
            header,
            questions: query.questions.clone(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
            signature: Vec::new(),
            edns: query.edns.clone(),
        };
        msg.update_ar_count();
        msg
    }

    // =========================================================================
    // Header accessors
    // =========================================================================

    /// Returns the message header.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns a mutable reference to the header.
    #[inline]
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Returns the message ID.
    #[inline]
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Sets the message ID.
    #[inline]
    pub fn set_id(&mut self, id: u16) {
        self.header.id = id;
    }

    /// Returns the opcode.
    #[inline]
    pub fn opcode(&self) -> OpCode {
        self.header.opcode
    }

    /// Returns the response code.
    #[inline]
    pub fn rcode(&self) -> ResponseCode {
        self.header.rcode
    }

    /// Sets the response code, updating EDNS extended bits when needed.
    pub fn set_rcode(&mut self, rcode: ResponseCode) {
        self.header.rcode = rcode;
        if rcode.is_extended() {
            if let Some(edns) = &mut self.edns {
                edns.set_extended_rcode(rcode.extended_rcode());
            }
        }
    }

    /// Returns true if this is a query.
    #[inline]
    pub fn is_query(&self) -> bool {
        self.header.is_query()
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.header.is_response()
    }

    /// Returns true if the message was truncated.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.header.is_truncated()
    }

    // =========================================================================
    // Section accessors
    // =========================================================================

    /// Returns the question section.
    #[inline]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Returns the first question if present.
    #[inline]
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Returns the answer section.
    #[inline]
    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    /// Returns the authority section.
    #[inline]
    pub fn authority(&self) -> &[ResourceRecord] {
        &self.authority
    }

    /// Returns the additional section (excluding OPT and signatures).
    #[inline]
    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional
    }

    /// Returns the transaction signature records.
    #[inline]
    pub fn signature(&self) -> &[ResourceRecord] {
        &self.signature
    }

    /// Returns the EDNS information if present.
    #[inline]
    pub fn edns(&self) -> Option<&Edns> {
        self.edns.as_ref()
    }

    /// Returns a mutable reference to EDNS.
    #[inline]
    pub fn edns_mut(&mut self) -> Option<&mut Edns> {
        self.edns.as_mut()
    }

    /// Sets the EDNS information.
    pub fn set_edns(&mut self, edns: Option<Edns>) {
        self.edns = edns;
        self.update_ar_count();
    }

    /// Returns true if EDNS is present with DNSSEC OK.
    pub fn wants_dnssec(&self) -> bool {
        self.edns.as_ref().is_some_and(Edns::dnssec_ok)
    }

    // =========================================================================
    // Section mutators
    // =========================================================================

    /// Adds a question.
    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
        self.header.qd_count = self.questions.len() as u16;
    }

    /// Adds an answer record.
    pub fn add_answer(&mut self, record: ResourceRecord) {
        self.answers.push(record);
        self.header.an_count = self.answers.len() as u16;
    }

    /// Adds an authority record.
    pub fn add_authority(&mut self, record: ResourceRecord) {
        self.authority.push(record);
        self.header.ns_count = self.authority.len() as u16;
    }

    /// Adds an additional record.
    pub fn add_additional(&mut self, record: ResourceRecord) {
        self.additional.push(record);
        self.update_ar_count();
    }

    /// Adds a transaction signature record.
    pub fn add_signature(&mut self, record: ResourceRecord) {
        self.signature.push(record);
        self.update_ar_count();
    }

    fn update_ar_count(&mut self) {
        let edns_count = usize::from(self.edns.is_some());
        self.header.ar_count =
            (self.additional.len() + self.signature.len() + edns_count) as u16;
    }

    /// Clears all answer records.
    pub fn clear_answers(&mut self) {
        self.answers.clear();
        self.header.an_count = 0;
    }

    // =========================================================================
    // Response helpers
    // =========================================================================

    /// Returns true if this response indicates success with answers.
    pub fn is_success(&self) -> bool {
        self.rcode().is_success() && !self.answers.is_empty()
    }

    /// Returns true if this is an NXDOMAIN response.
    pub fn is_nxdomain(&self) -> bool {
        self.rcode().is_nxdomain()
    }

    /// Returns true if this is a NOERROR response without answers.
    pub fn is_nodata(&self) -> bool {
        self.rcode().is_success() && self.answers.is_empty()
    }

    /// Returns true if this response is a referral (NS in authority, no
    /// answers).
    pub fn is_referral(&self) -> bool {
        self.answers.is_empty()
            && self
                .authority
                .iter()
                .any(|r| r.record_type() == Some(RecordType::NS))
    }

    /// Returns answer records of a specific type.
    pub fn answers_of_type(&self, rtype: RecordType) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .filter(move |r| r.record_type() == Some(rtype))
    }

    /// Returns the first CNAME target in the answers.
    pub fn cname_target(&self) -> Option<&Name> {
        self.answers.iter().find_map(|r| r.rdata().as_cname())
    }

    /// Returns A record addresses from the answers.
    pub fn a_records(&self) -> impl Iterator<Item = std::net::Ipv4Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_a())
    }

    /// Returns AAAA record addresses from the answers.
    pub fn aaaa_records(&self) -> impl Iterator<Item = std::net::Ipv6Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_aaaa())
    }

    // =========================================================================
    // Wire format
    // =========================================================================

    /// Parses a DNS message from wire format.
    ///
    /// Exactly the record counts declared in the header are consumed per
    /// section; a buffer that ends inside a declared record fails with an
    /// underrun error rather than yielding a partial message.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(data);
        let header = Header::parse(&mut reader)?;

        let mut questions = Vec::with_capacity(header.qd_count as usize);
        let mut answers = Vec::with_capacity(header.an_count as usize);
        let mut authority = Vec::with_capacity(header.ns_count as usize);
        let mut additional = Vec::new();
        let mut signature = Vec::new();
        let mut edns = None;

        let mut q_parser = QuestionParser::new(&mut reader, header.qd_count);
        while let Some(q) = q_parser.next()? {
            questions.push(q);
        }

        let mut an_parser = RecordParser::new(&mut reader, header.an_count);
        while let Some(r) = an_parser.next()? {
            if r.record_type() == Some(RecordType::OPT) {
                return Err(Error::OptInWrongSection {
                    section: "answer".to_string(),
                });
            }
            answers.push(r);
        }

        let mut ns_parser = RecordParser::new(&mut reader, header.ns_count);
        while let Some(r) = ns_parser.next()? {
            if r.record_type() == Some(RecordType::OPT) {
                return Err(Error::OptInWrongSection {
                    section: "authority".to_string(),
                });
            }
            authority.push(r);
        }

        let mut ar_parser = RecordParser::new(&mut reader, header.ar_count);
        while let Some(r) = ar_parser.next()? {
            match r.record_type() {
                Some(RecordType::OPT) => {
                    if edns.is_some() {
                        return Err(Error::MultipleOptRecords);
                    }
                    let mut rdata_buf = WireWriter::new(r.rdata().wire_len());
                    r.rdata().write_to(&mut rdata_buf)?;
                    edns = Some(Edns::parse(
                        r.rclass().to_u16(),
                        r.ttl(),
                        rdata_buf.as_bytes(),
                    )?);
                }
                Some(t) if t.is_signature() => signature.push(r),
                _ => additional.push(r),
            }
        }

        // Fold the EDNS extended RCODE bits back into the header rcode.
        let mut header = header;
        if let Some(ref e) = edns {
            if let Some(full_rcode) =
                ResponseCode::from_parts(header.rcode.header_rcode(), e.extended_rcode())
            {
                header.rcode = full_rcode;
            }
        }

        Ok(Self {
            header,
            questions,
            answers,
            authority,
            additional,
            signature,
            edns,
        })
    }

    /// Returns the wire format length of this message.
    pub fn wire_len(&self) -> usize {
        let mut len = HEADER_SIZE;

        for q in &self.questions {
            len += q.wire_len();
        }
        for r in self
            .answers
            .iter()
            .chain(&self.authority)
            .chain(&self.additional)
            .chain(&self.signature)
        {
            len += r.wire_len();
        }
        if let Some(edns) = &self.edns {
            len += edns.wire_len();
        }

        len
    }

    /// Checks that the header section counts match the actual sections.
    ///
    /// Parsing and encoding maintain the counts automatically; this is for
    /// messages whose header was mutated by hand.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("question", self.header.qd_count, self.questions.len()),
            ("answer", self.header.an_count, self.answers.len()),
            ("authority", self.header.ns_count, self.authority.len()),
            (
                "additional",
                self.header.ar_count,
                self.additional.len() + self.signature.len() + usize::from(self.edns.is_some()),
            ),
        ];

        for (section, declared, actual) in checks {
            if declared as usize != actual {
                return Err(Error::SectionCountMismatch {
                    section: section.to_string(),
                    declared,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Writes the message in wire format, returning the bytes appended.
    ///
    /// The OPT pseudo-record and any transaction signatures are written
    /// last. The header's section counts are back-patched from the
    /// sections actually written, never taken from the caller-supplied
    /// header.
    pub fn write_to(&self, buf: &mut WireWriter) -> Result<usize> {
        let start = buf.len();
        self.header.write_to(buf)?;

        for q in &self.questions {
            q.write_to(buf)?;
        }
        for r in &self.answers {
            r.write_to(buf)?;
        }
        for r in &self.authority {
            r.write_to(buf)?;
        }
        for r in &self.additional {
            r.write_to(buf)?;
        }
        if let Some(edns) = &self.edns {
            edns.write_to(buf)?;
        }
        for r in &self.signature {
            r.write_to(buf)?;
        }

        // Count fields sit at fixed offsets behind the 4-byte id+flags.
        let ar_count = self.additional.len()
            + self.signature.len()
            + usize::from(self.edns.is_some());
        buf.patch_u16(start + 4, self.questions.len() as u16)?;
        buf.patch_u16(start + 6, self.answers.len() as u16)?;
        buf.patch_u16(start + 8, self.authority.len() as u16)?;
        buf.patch_u16(start + 10, ar_count as u16)?;

        Ok(buf.len() - start)
    }

    /// Converts the message to wire format bytes.
    pub fn to_wire(&self) -> Result<Bytes> {
        let mut buf = WireWriter::new(self.wire_len());
        self.write_to(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Truncates the message to fit within the given size limit.
    ///
    /// Removes records from the additional, authority, then answer
    /// sections until the message fits, and sets the TC flag if anything
    /// was dropped.
    pub fn truncate_to(&mut self, max_size: usize) {
        let mut dropped = false;

        while self.wire_len() > max_size {
            if self.additional.pop().is_some()
                || self.authority.pop().is_some()
                || self.answers.pop().is_some()
            {
                dropped = true;
                continue;
            }
            break;
        }

        if dropped {
            self.header.set_truncated(true);
        }

        self.header.an_count = self.answers.len() as u16;
        self.header.ns_count = self.authority.len() as u16;
        self.update_ar_count();
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new(Header::default())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";; ->>HEADER<<- {}", self.header)?;

        if let Some(edns) = &self.edns {
            writeln!(f, ";; OPT: {edns}")?;
        }

        writeln!(f, "\n;; QUESTION SECTION:")?;
        for q in &self.questions {
            writeln!(f, ";{q}")?;
        }

        if !self.answers.is_empty() {
            writeln!(f, "\n;; ANSWER SECTION:")?;
            for r in &self.answers {
                writeln!(f, "{r}")?;
            }
        }

        if !self.authority.is_empty() {
            writeln!(f, "\n;; AUTHORITY SECTION:")?;
            for r in &self.authority {
                writeln!(f, "{r}")?;
            }
        }

        if !self.additional.is_empty() {
            writeln!(f, "\n;; ADDITIONAL SECTION:")?;
            for r in &self.additional {
                writeln!(f, "{r}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{Class, RecordClass};
    use crate::rdata::{RData, Unknown};
    use crate::rtype::Type;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    fn example_question() -> Question {
        Question::a(Name::from_str("example.com.").unwrap())
    }

    #[test]
    fn test_query_creation() {
        let msg = Message::query(example_question());

        assert!(msg.is_query());
        assert!(!msg.is_response());
        assert_eq!(msg.questions().len(), 1);
        assert!(msg.edns().is_some());
    }

    #[test]
    fn test_message_roundtrip_with_edns() {
        let mut original = Message::query(example_question());
        original.set_id(0x1234);

        let wire = original.to_wire().unwrap();
        let parsed = Message::parse(&wire).unwrap();

        assert_eq!(parsed.id(), 0x1234);
        assert_eq!(parsed.opcode(), original.opcode());
        assert_eq!(parsed.questions(), original.questions());
        // The OPT record is folded into Edns, not left as an additional.
        assert!(parsed.additional().is_empty());
        assert_eq!(parsed.edns(), original.edns());
        assert!(parsed.signature().is_empty());
    }

    #[test]
    fn test_response_roundtrip() {
        let query = Message::query(example_question());
        let mut response = Message::response_from(&query);
        response.add_answer(ResourceRecord::a(
            Name::from_str("example.com.").unwrap(),
            300,
            Ipv4Addr::new(192, 0, 2, 1),
        ));
        response.add_answer(ResourceRecord::cname(
            Name::from_str("www.example.com.").unwrap(),
            300,
            Name::from_str("example.com.").unwrap(),
        ));

        let wire = response.to_wire().unwrap();
        let parsed = Message::parse(&wire).unwrap();

        assert!(parsed.is_response());
        assert_eq!(parsed.id(), query.id());
        assert_eq!(parsed.answers(), response.answers());
        assert_eq!(
            parsed.a_records().collect::<Vec<_>>(),
            vec![Ipv4Addr::new(192, 0, 2, 1)]
        );
        assert_eq!(
            parsed.cname_target().map(ToString::to_string),
            Some("example.com.".to_string())
        );
    }

    #[test]
    fn test_declared_count_consumed_exactly() {
        let mut response = Message::response_from(&Message::query(example_question()));
        for i in 0..4u8 {
            response.add_answer(ResourceRecord::a(
                Name::from_str("example.com.").unwrap(),
                300,
                Ipv4Addr::new(192, 0, 2, i),
            ));
        }

        let wire = response.to_wire().unwrap();
        let parsed = Message::parse(&wire).unwrap();
        assert_eq!(parsed.answers().len(), 4);
    }

    #[test]
    fn test_truncated_final_record_is_an_error() {
        let mut response = Message::response_from(&Message::query(example_question()));
        response.set_edns(None);
        for i in 0..4u8 {
            response.add_answer(ResourceRecord::a(
                Name::from_str("example.com.").unwrap(),
                300,
                Ipv4Addr::new(192, 0, 2, i),
            ));
        }

        let wire = response.to_wire().unwrap();
        // Chop into the middle of the 4th answer record.
        let short = &wire[..wire.len() - 3];
        assert!(matches!(
            Message::parse(short),
            Err(Error::UnexpectedEof { .. }) | Err(Error::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_unknown_record_type_roundtrip() {
        let mut response = Message::response_from(&Message::query(example_question()));
        response.set_edns(None);
        response.add_answer(ResourceRecord::new(
            Name::from_str("example.com.").unwrap(),
            Type::Unknown(65412),
            Class::Known(RecordClass::IN),
            60,
            RData::Unknown(Unknown::new(65412, vec![0xDE, 0xAD, 0xBE, 0xEF])),
        ));

        let wire = response.to_wire().unwrap();
        let parsed = Message::parse(&wire).unwrap();

        assert_eq!(parsed.answers(), response.answers());
        assert_eq!(parsed.to_wire().unwrap(), wire);
    }

    #[test]
    fn test_multiple_opt_records_rejected() {
        let mut msg = Message::query(example_question());
        // Sneak a second OPT in as an ordinary additional record.
        msg.add_additional(ResourceRecord::new(
            Name::root(),
            Type::Known(RecordType::OPT),
            Class::Unknown(4096),
            0,
            RData::Unknown(Unknown::new(RecordType::OPT.to_u16(), Vec::new())),
        ));

        let wire = msg.to_wire().unwrap();
        assert!(matches!(
            Message::parse(&wire),
            Err(Error::MultipleOptRecords)
        ));
    }

    #[test]
    fn test_opt_in_answer_section_rejected() {
        let mut msg = Message::response_from(&Message::query(example_question()));
        msg.set_edns(None);
        msg.add_answer(ResourceRecord::new(
            Name::root(),
            Type::Known(RecordType::OPT),
            Class::Unknown(4096),
            0,
            RData::Unknown(Unknown::new(RecordType::OPT.to_u16(), Vec::new())),
        ));

        let wire = msg.to_wire().unwrap();
        assert!(matches!(
            Message::parse(&wire),
            Err(Error::OptInWrongSection { .. })
        ));
    }

    #[test]
    fn test_tsig_surfaced_as_signature() {
        let mut msg = Message::query(example_question());
        msg.add_signature(ResourceRecord::new(
            Name::from_str("key.example.").unwrap(),
            Type::Known(RecordType::TSIG),
            Class::Known(RecordClass::ANY),
            0,
            RData::Unknown(Unknown::new(
                RecordType::TSIG.to_u16(),
                vec![0x01, 0x02, 0x03],
            )),
        ));

        let wire = msg.to_wire().unwrap();
        let parsed = Message::parse(&wire).unwrap();

        assert_eq!(parsed.signature().len(), 1);
        assert!(parsed.additional().is_empty());
        assert_eq!(
            parsed.signature()[0].record_type(),
            Some(RecordType::TSIG)
        );
        // The signature still counts toward ARCOUNT on the wire.
        assert_eq!(parsed.header().ar_count, 2);
    }

    #[test]
    fn test_validate_detects_hand_mutated_counts() {
        let mut msg = Message::query(example_question());
        assert!(msg.validate().is_ok());

        msg.header_mut().an_count = 7;
        assert!(matches!(
            msg.validate(),
            Err(Error::SectionCountMismatch { declared: 7, .. })
        ));
    }

    #[test]
    fn test_response_helpers() {
        let mut msg = Message::response_from(&Message::query(example_question()));

        assert!(msg.is_nodata());
        assert!(!msg.is_success());

        msg.add_answer(ResourceRecord::a(
            Name::from_str("example.com.").unwrap(),
            300,
            Ipv4Addr::new(192, 0, 2, 1),
        ));
        assert!(msg.is_success());
        assert!(!msg.is_nodata());

        msg.clear_answers();
        msg.set_rcode(ResponseCode::NXDomain);
        assert!(msg.is_nxdomain());
    }

    #[test]
    fn test_truncation() {
        let mut msg = Message::response_from(&Message::query(example_question()));

        for i in 0..100u8 {
            msg.add_answer(ResourceRecord::a(
                Name::from_str(&format!("host{i}.example.com.")).unwrap(),
                300,
                Ipv4Addr::new(192, 0, 2, i),
            ));
        }

        msg.truncate_to(512);

        assert!(msg.wire_len() <= 512);
        assert!(msg.is_truncated());
        assert!(msg.answers().len() < 100);
    }

    #[test]
    fn test_dnssec_query() {
        let msg = Message::query_dnssec(example_question());
        assert!(msg.wants_dnssec());
    }
}
