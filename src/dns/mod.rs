pub mod constants;
pub mod enums;
pub mod header;
pub mod name;
pub mod question;
pub mod resource;
pub mod sections;


use tracing::{debug, trace};

use crate::common::PacketComponent;
use crate::cursor::{InputCursor, OutputCursor};
use crate::error::{PacketError, Result};
use constants::{HEADER_SIZE, QRType};
use header::DNSHeader;
use question::DNSQuestion;
use resource::DNSResource;
use sections::{RecordSections, Section};

/// A DNS message held in wire form.
///
/// Only the header is kept decoded. Questions and records stay packed in a
/// single buffer and are decoded on every accessor call, so the returned
/// values are snapshots, not views.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DNSPacket {
    header: DNSHeader,
    sections: RecordSections,
}

impl DNSPacket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a message from raw bytes.
    ///
    /// The header is decoded, then one pass over the body locates the four
    /// sections. Nothing beyond the offsets is materialized.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        trace!("Parsing DNS packet, size: {} bytes", buf.len());
        let mut cursor = InputCursor::new(buf);
        let header = DNSHeader::decode(&mut cursor)?;
        debug!(
            "Parsed DNS header: id={}, qr={}, opcode={}, questions={}, answers={}, authority={}, additional={}",
            header.id,
            header.qr,
            header.opcode,
            header.qdcount,
            header.ancount,
            header.nscount,
            header.arcount
        );

        let sections = RecordSections::scan(
            cursor.rest().to_vec(),
            [header.qdcount, header.ancount, header.nscount, header.arcount],
        )?;
        Ok(Self { header, sections })
    }

    /// Total wire size: the fixed header plus every section.
    pub fn header_size(&self) -> usize {
        HEADER_SIZE + self.sections.len()
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.header_size()];
        self.serialize_into(&mut buf)?;
        Ok(buf)
    }

    /// Writes the message into `buf`, returning the number of bytes written.
    pub fn serialize_into(&self, buf: &mut [u8]) -> Result<usize> {
        let mut out = OutputCursor::new(buf);
        self.header.encode(&mut out)?;
        out.write_bytes(self.sections.as_bytes())?;
        Ok(out.position())
    }

    /// True when `response` carries the same transaction id. Nothing past the
    /// header is compared.
    pub fn matches_response(&self, response: &[u8]) -> bool {
        if response.len() < HEADER_SIZE {
            return false;
        }
        u16::from_be_bytes([response[0], response[1]]) == self.header.id
    }

    pub fn header(&self) -> &DNSHeader {
        &self.header
    }

    /// Offsets of the answer, authority and additional sections within the
    /// body that follows the header.
    pub fn section_offsets(&self) -> [usize; 3] {
        self.sections.offsets()
    }

    // Header fields

    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn set_id(&mut self, id: u16) {
        self.header.id = id;
    }

    pub fn qr(&self) -> QRType {
        QRType::from(self.header.qr)
    }

    pub fn set_qr(&mut self, qr: QRType) {
        self.header.qr = qr == QRType::Response;
    }

    pub fn opcode(&self) -> u8 {
        self.header.opcode
    }

    /// Only the low four bits are kept.
    pub fn set_opcode(&mut self, opcode: u8) {
        self.header.opcode = opcode & 0x0F;
    }

    pub fn authoritative_answer(&self) -> bool {
        self.header.aa
    }

    pub fn set_authoritative_answer(&mut self, value: bool) {
        self.header.aa = value;
    }

    pub fn truncated(&self) -> bool {
        self.header.tc
    }

    pub fn set_truncated(&mut self, value: bool) {
        self.header.tc = value;
    }

    pub fn recursion_desired(&self) -> bool {
        self.header.rd
    }

    pub fn set_recursion_desired(&mut self, value: bool) {
        self.header.rd = value;
    }

    pub fn recursion_available(&self) -> bool {
        self.header.ra
    }

    pub fn set_recursion_available(&mut self, value: bool) {
        self.header.ra = value;
    }

    pub fn z(&self) -> bool {
        self.header.z
    }

    pub fn set_z(&mut self, value: bool) {
        self.header.z = value;
    }

    pub fn authenticated_data(&self) -> bool {
        self.header.ad
    }

    pub fn set_authenticated_data(&mut self, value: bool) {
        self.header.ad = value;
    }

    pub fn checking_disabled(&self) -> bool {
        self.header.cd
    }

    pub fn set_checking_disabled(&mut self, value: bool) {
        self.header.cd = value;
    }

    pub fn rcode(&self) -> u8 {
        self.header.rcode
    }

    /// Only the low four bits are kept.
    pub fn set_rcode(&mut self, rcode: u8) {
        self.header.rcode = rcode & 0x0F;
    }

    pub fn questions_count(&self) -> u16 {
        self.header.qdcount
    }

    pub fn answers_count(&self) -> u16 {
        self.header.ancount
    }

    pub fn authority_count(&self) -> u16 {
        self.header.nscount
    }

    pub fn additional_count(&self) -> u16 {
        self.header.arcount
    }

    // Mutation

    pub fn add_query(&mut self, query: &DNSQuestion) -> Result<()> {
        let encoded = query.encode()?;
        self.insert(Section::Questions, &encoded)
    }

    pub fn add_answer(&mut self, record: &DNSResource) -> Result<()> {
        let encoded = record.encode()?;
        self.insert(Section::Answers, &encoded)
    }

    pub fn add_authority(&mut self, record: &DNSResource) -> Result<()> {
        let encoded = record.encode()?;
        self.insert(Section::Authority, &encoded)
    }

    pub fn add_additional(&mut self, record: &DNSResource) -> Result<()> {
        let encoded = record.encode()?;
        self.insert(Section::Additional, &encoded)
    }

    fn insert(&mut self, section: Section, encoded: &[u8]) -> Result<()> {
        let count = match section {
            Section::Questions => &mut self.header.qdcount,
            Section::Answers => &mut self.header.ancount,
            Section::Authority => &mut self.header.nscount,
            Section::Additional => &mut self.header.arcount,
        };
        let updated = count.checked_add(1).ok_or(PacketError::SectionFull)?;
        self.sections.insert(section, encoded)?;
        *count = updated;
        Ok(())
    }

    // Section accessors

    pub fn queries(&self) -> Result<Vec<DNSQuestion>> {
        self.sections.questions()
    }

    pub fn answers(&self) -> Result<Vec<DNSResource>> {
        self.sections.records(Section::Answers)
    }

    pub fn authority(&self) -> Result<Vec<DNSResource>> {
        self.sections.records(Section::Authority)
    }

    pub fn additional(&self) -> Result<Vec<DNSResource>> {
        self.sections.records(Section::Additional)
    }
}
