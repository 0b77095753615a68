//! IPv6 fixed header and extension-header chain.

use std::net::Ipv6Addr;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use tracing::{debug, trace};

use crate::common::PacketComponent;
use crate::cursor::InputCursor;
use crate::error::{PacketError, Result};
use crate::payload::{self, IpProtocol, Payload};

pub const FIXED_HEADER_SIZE: usize = 40;

/// Largest extension header the 8-bit length field can describe.
const MAX_EXTENSION_SIZE: usize = 256 * 8;

/// Extension headers that carry a next-header byte and a length byte and
/// can therefore be walked. ESP and No Next Header end the chain.
pub fn is_extension_header(header_type: u8) -> bool {
    matches!(
        header_type,
        IpProtocol::HOP_BY_HOP
            | IpProtocol::ROUTING
            | IpProtocol::FRAGMENT
            | IpProtocol::AUTHENTICATION
            | IpProtocol::DESTINATION_OPTIONS
            | IpProtocol::MOBILITY
    )
}

/// The 40-byte fixed header.
///
/// The first word packs `version(4) traffic_class(8) flow_label(20)`, so
/// traffic class straddles the first two bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ipv6Header {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub src_addr: Ipv6Addr,
    pub dst_addr: Ipv6Addr,
}

impl Default for Ipv6Header {
    fn default() -> Self {
        Self {
            version: 0,
            traffic_class: 0,
            flow_label: 0,
            payload_length: 0,
            next_header: 0,
            hop_limit: 0,
            src_addr: Ipv6Addr::UNSPECIFIED,
            dst_addr: Ipv6Addr::UNSPECIFIED,
        }
    }
}

impl PacketComponent for Ipv6Header {
    type Order = BigEndian;

    const WIRE_SIZE: usize = FIXED_HEADER_SIZE;

    fn write(&self, writer: &mut BitWriter<&mut Vec<u8>, BigEndian>) -> Result<()> {
        writer.write_var::<u8>(4, self.version)?;
        writer.write_var::<u8>(8, self.traffic_class)?;
        writer.write_var::<u32>(20, self.flow_label)?;
        writer.write_var::<u16>(16, self.payload_length)?;
        writer.write_var::<u8>(8, self.next_header)?;
        writer.write_var::<u8>(8, self.hop_limit)?;
        writer.write_bytes(&self.src_addr.octets())?;
        writer.write_bytes(&self.dst_addr.octets())?;
        Ok(())
    }

    fn read(&mut self, reader: &mut BitReader<&[u8], BigEndian>) -> Result<()> {
        self.version = reader.read_var::<u8>(4)?;
        self.traffic_class = reader.read_var::<u8>(8)?;
        self.flow_label = reader.read_var::<u32>(20)?;
        self.payload_length = reader.read_var::<u16>(16)?;
        self.next_header = reader.read_var::<u8>(8)?;
        self.hop_limit = reader.read_var::<u8>(8)?;
        let mut addr = [0u8; 16];
        reader.read_bytes(&mut addr)?;
        self.src_addr = Ipv6Addr::from(addr);
        reader.read_bytes(&mut addr)?;
        self.dst_addr = Ipv6Addr::from(addr);
        Ok(())
    }
}

/// One extension header.
///
/// `next_header` is the type of whatever follows this header, exactly as on
/// the wire. The header's own type is the next-header value of its
/// predecessor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtensionHeader {
    pub next_header: u8,
    payload: Vec<u8>,
}

impl ExtensionHeader {
    /// `payload` excludes the two-byte next/length prefix, so its length must
    /// be `8k - 2`.
    pub fn new(next_header: u8, payload: Vec<u8>) -> Result<Self> {
        let total = payload.len() + 2;
        if total % 8 != 0 || total > MAX_EXTENSION_SIZE {
            return Err(PacketError::InvalidExtensionHeader(format!(
                "payload of {} bytes does not fill whole 8-byte units",
                payload.len()
            )));
        }
        Ok(Self {
            next_header,
            payload,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Wire size including the next/length prefix.
    pub fn size(&self) -> usize {
        self.payload.len() + 2
    }

    /// Value of the wire length field: size in 8-byte units, minus one.
    pub fn length_field(&self) -> u8 {
        (self.size() / 8 - 1) as u8
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ipv6Packet {
    header: Ipv6Header,
    ext_headers: Vec<ExtensionHeader>,
    ext_size: usize,
    payload: Option<Payload>,
}

impl Ipv6Packet {
    /// Version 6, hop limit 64, nothing following the header.
    pub fn new(dst_addr: Ipv6Addr, src_addr: Ipv6Addr) -> Self {
        Self {
            header: Ipv6Header {
                version: 6,
                next_header: IpProtocol::NO_NEXT_HEADER,
                hop_limit: 64,
                src_addr,
                dst_addr,
                ..Ipv6Header::default()
            },
            ..Self::default()
        }
    }

    /// Decodes a packet and its payload. Encapsulated IPv6 is unwrapped up to
    /// [`payload::MAX_NESTING_DEPTH`] levels; anything deeper is rejected as
    /// malformed.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        Self::parse_nested(buf, 0)
    }

    pub(crate) fn parse_nested(buf: &[u8], depth: usize) -> Result<Self> {
        if buf.len() < FIXED_HEADER_SIZE {
            return Err(PacketError::BufferTooSmall {
                what: "IPv6 header",
                need: FIXED_HEADER_SIZE,
                have: buf.len(),
            });
        }
        let mut cursor = InputCursor::new(buf);
        let header = Ipv6Header::decode(&mut cursor)?;
        let mut packet = Ipv6Packet {
            header,
            ..Self::default()
        };

        let mut current = packet.header.next_header;
        while !cursor.is_empty() && is_extension_header(current) {
            let next_header = cursor.read_u8()?;
            let size = (usize::from(cursor.read_u8()?) + 1) * 8;
            let payload = cursor.read_bytes(size - 2)?.to_vec();
            trace!(
                "Extension header type {}: {} bytes, next {}",
                current, size, next_header
            );
            packet.push_ext_header(ExtensionHeader {
                next_header,
                payload,
            });
            current = next_header;
        }

        if !cursor.is_empty() {
            packet.payload = Some(payload::dispatch(current, cursor.rest(), depth)?);
        }
        debug!(
            "Parsed IPv6 packet: {} -> {}, {} extension headers, payload protocol {}",
            packet.header.src_addr,
            packet.header.dst_addr,
            packet.ext_headers.len(),
            current
        );
        Ok(packet)
    }

    pub fn header(&self) -> &Ipv6Header {
        &self.header
    }

    pub fn version(&self) -> u8 {
        self.header.version
    }

    pub fn set_version(&mut self, version: u8) {
        self.header.version = version & 0x0F;
    }

    pub fn traffic_class(&self) -> u8 {
        self.header.traffic_class
    }

    pub fn set_traffic_class(&mut self, traffic_class: u8) {
        self.header.traffic_class = traffic_class;
    }

    pub fn flow_label(&self) -> u32 {
        self.header.flow_label
    }

    /// Only the low 20 bits are kept.
    pub fn set_flow_label(&mut self, flow_label: u32) {
        self.header.flow_label = flow_label & 0x000F_FFFF;
    }

    pub fn payload_length(&self) -> u16 {
        self.header.payload_length
    }

    pub fn set_payload_length(&mut self, payload_length: u16) {
        self.header.payload_length = payload_length;
    }

    pub fn next_header(&self) -> u8 {
        self.header.next_header
    }

    pub fn set_next_header(&mut self, next_header: u8) {
        self.header.next_header = next_header;
    }

    pub fn hop_limit(&self) -> u8 {
        self.header.hop_limit
    }

    pub fn set_hop_limit(&mut self, hop_limit: u8) {
        self.header.hop_limit = hop_limit;
    }

    pub fn src_addr(&self) -> Ipv6Addr {
        self.header.src_addr
    }

    pub fn set_src_addr(&mut self, addr: Ipv6Addr) {
        self.header.src_addr = addr;
    }

    pub fn dst_addr(&self) -> Ipv6Addr {
        self.header.dst_addr
    }

    pub fn set_dst_addr(&mut self, addr: Ipv6Addr) {
        self.header.dst_addr = addr;
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn set_payload(&mut self, payload: Payload) {
        self.payload = Some(payload);
    }

    pub fn ext_headers(&self) -> &[ExtensionHeader] {
        &self.ext_headers
    }

    fn push_ext_header(&mut self, header: ExtensionHeader) {
        self.ext_size += header.size();
        self.ext_headers.push(header);
    }

    /// Appends an extension header of type `header_type` to the chain.
    ///
    /// The previous end of the chain now points at the new header, and the
    /// new header inherits whatever that end pointed at before.
    pub fn add_ext_header(&mut self, header_type: u8, payload: Vec<u8>) -> Result<()> {
        let header = ExtensionHeader::new(self.last_next_header(), payload)?;
        self.set_last_next_header(header_type);
        self.push_ext_header(header);
        Ok(())
    }

    /// First extension header whose own type is `header_type`.
    pub fn search_header(&self, header_type: u8) -> Option<&ExtensionHeader> {
        let mut current = self.header.next_header;
        for header in &self.ext_headers {
            if current == header_type {
                return Some(header);
            }
            current = header.next_header;
        }
        None
    }

    fn last_next_header(&self) -> u8 {
        self.ext_headers
            .last()
            .map_or(self.header.next_header, |header| header.next_header)
    }

    /// Rewrites the next-header field that ends the chain: the fixed header's
    /// when there are no extension headers, the last extension header's
    /// otherwise.
    pub fn set_last_next_header(&mut self, value: u8) {
        match self.ext_headers.last_mut() {
            Some(header) => header.next_header = value,
            None => self.header.next_header = value,
        }
    }

    /// Fixed header plus the extension chain.
    pub fn header_size(&self) -> usize {
        FIXED_HEADER_SIZE + self.ext_size
    }

    pub fn size(&self) -> usize {
        self.header_size() + self.payload.as_ref().map_or(0, Payload::size)
    }

    /// Brings `payload_length` and the end of the chain in line with the
    /// attached payload.
    pub fn finalize(&mut self) -> Result<()> {
        if let Some(protocol) = self.payload.as_ref().and_then(Payload::protocol) {
            self.set_last_next_header(protocol);
        }
        let length = self.size() - FIXED_HEADER_SIZE;
        self.header.payload_length = u16::try_from(length).map_err(|_| {
            PacketError::MessageTooLarge(format!("IPv6 payload of {} bytes", length))
        })?;
        Ok(())
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut packet = self.clone();
        packet.finalize()?;
        packet.write()
    }

    fn write(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.size());
        buf.extend_from_slice(&self.header.to_bytes()?);
        for header in &self.ext_headers {
            buf.push(header.next_header);
            buf.push(header.length_field());
            buf.extend_from_slice(&header.payload);
        }
        if let Some(payload) = &self.payload {
            buf.extend_from_slice(&payload.serialize()?);
        }
        Ok(buf)
    }

    /// Whether `response` looks like a reply to this packet: addresses
    /// swapped (a query to an `ff02::/16` group accepts any responder), then
    /// the inner payload is asked after skipping the extension chain.
    pub fn matches_response(&self, response: &[u8]) -> bool {
        if response.len() < FIXED_HEADER_SIZE {
            return false;
        }
        let mut cursor = InputCursor::new(response);
        let Ok(theirs) = Ipv6Header::decode(&mut cursor) else {
            return false;
        };

        let multicast = self.header.dst_addr.octets()[..2] == [0xff, 0x02];
        if self.header.src_addr != theirs.dst_addr
            || (self.header.dst_addr != theirs.src_addr && !multicast)
        {
            return false;
        }
        let Some(payload) = &self.payload else {
            return true;
        };

        let mut current = theirs.next_header;
        let mut rest = cursor.rest();
        while rest.len() > 8 && is_extension_header(current) {
            let size = (usize::from(rest[1]) + 1) * 8;
            if size > rest.len() {
                return false;
            }
            current = rest[0];
            rest = &rest[size..];
        }
        !is_extension_header(current) && payload.matches_response(rest)
    }
}
