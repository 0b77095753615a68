//! IEEE 802.11 frames: MAC header, per-subtype fixed body, tagged options.

pub mod body;
pub mod header;
pub mod options;

use tracing::debug;

use crate::common::PacketComponent;
use crate::cursor::InputCursor;
use crate::error::{PacketError, Result};
use crate::payload::Payload;
use body::FrameBody;
use header::{
    ADDR4_SIZE, BASE_HEADER_SIZE, Dot11Header, FrameControl, FrameSubtype, FrameType, MacAddress,
};
use options::{TaggedOption, TaggedOptionSet, TaggedOptionType};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dot11Frame {
    header: Dot11Header,
    body: FrameBody,
    options: TaggedOptionSet,
    payload: Option<Payload>,
}

fn encode_rates(rates: &[f32]) -> Vec<u8> {
    rates
        .iter()
        .map(|rate| 0x80 | (rate * 2.0).ceil() as u8)
        .collect()
}

impl Dot11Frame {
    fn with_kind(frame_type: u8, subtype: u8, dst: MacAddress, src: MacAddress) -> Self {
        Self {
            header: Dot11Header {
                control: FrameControl::new(frame_type, subtype),
                addr1: dst,
                addr2: src,
                ..Dot11Header::default()
            },
            body: FrameBody::for_kind(frame_type, subtype),
            ..Self::default()
        }
    }

    pub fn beacon(dst: MacAddress, src: MacAddress) -> Self {
        Self::with_kind(FrameType::MANAGEMENT, FrameSubtype::BEACON, dst, src)
    }

    pub fn disassoc(dst: MacAddress, src: MacAddress) -> Self {
        Self::with_kind(FrameType::MANAGEMENT, FrameSubtype::DISASSOC, dst, src)
    }

    pub fn assoc_request(dst: MacAddress, src: MacAddress) -> Self {
        Self::with_kind(FrameType::MANAGEMENT, FrameSubtype::ASSOC_REQUEST, dst, src)
    }

    pub fn assoc_response(dst: MacAddress, src: MacAddress) -> Self {
        Self::with_kind(FrameType::MANAGEMENT, FrameSubtype::ASSOC_RESPONSE, dst, src)
    }

    pub fn qos_data(dst: MacAddress, src: MacAddress) -> Self {
        Self::with_kind(FrameType::DATA, FrameSubtype::QOS_DATA, dst, src)
    }

    /// Plain data frame carrying `payload` after the header.
    pub fn data(dst: MacAddress, src: MacAddress, payload: Payload) -> Self {
        let mut frame = Self::with_kind(FrameType::DATA, FrameSubtype::DATA, dst, src);
        frame.payload = Some(payload);
        frame
    }

    /// Decodes a frame, choosing the body variant from the frame-control
    /// type and subtype.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < FrameControl::WIRE_SIZE {
            return Err(PacketError::BufferTooSmall {
                what: "802.11 frame control",
                need: FrameControl::WIRE_SIZE,
                have: buf.len(),
            });
        }
        let control = FrameControl::decode(&mut InputCursor::new(buf))?;
        let mut body = FrameBody::for_kind(control.frame_type, control.subtype);
        let header_len = if control.has_addr4() {
            BASE_HEADER_SIZE + ADDR4_SIZE
        } else {
            BASE_HEADER_SIZE
        };
        let need = header_len + body.fixed_size();
        if buf.len() < need {
            return Err(PacketError::BufferTooSmall {
                what: "802.11 header and body",
                need,
                have: buf.len(),
            });
        }

        let mut cursor = InputCursor::new(buf);
        let header = Dot11Header::read_from(&mut cursor)?;
        body.decode_fields(&mut cursor)?;
        debug!(
            "Parsed 802.11 frame type={} subtype={} as {:?}",
            header.control.frame_type, header.control.subtype, body
        );

        let rest = cursor.rest();
        let (options, payload) = if body.carries_options() {
            (TaggedOptionSet::parse(rest), None)
        } else if rest.is_empty() {
            (TaggedOptionSet::new(), None)
        } else {
            (TaggedOptionSet::new(), Some(Payload::Raw(rest.to_vec())))
        };

        Ok(Self {
            header,
            body,
            options,
            payload,
        })
    }

    /// MAC header, fixed body and tagged options.
    pub fn header_size(&self) -> usize {
        self.header.size() + self.body.fixed_size() + self.options.total_size()
    }

    pub fn size(&self) -> usize {
        self.header_size() + self.payload.as_ref().map_or(0, Payload::size)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.size());
        self.header.write_to(&mut buf)?;
        self.body.write_to(&mut buf);
        self.options.write_to(&mut buf);
        if let Some(payload) = &self.payload {
            buf.extend_from_slice(&payload.serialize()?);
        }
        Ok(buf)
    }

    pub fn header(&self) -> &Dot11Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Dot11Header {
        &mut self.header
    }

    pub fn body(&self) -> &FrameBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut FrameBody {
        &mut self.body
    }

    pub fn options(&self) -> &TaggedOptionSet {
        &self.options
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn set_payload(&mut self, payload: Payload) {
        self.payload = Some(payload);
    }

    // Frame control

    pub fn frame_type(&self) -> u8 {
        self.header.control.frame_type
    }

    pub fn subtype(&self) -> u8 {
        self.header.control.subtype
    }

    pub fn set_protocol(&mut self, protocol: u8) {
        self.header.control.protocol = protocol & 0x03;
    }

    pub fn set_to_ds(&mut self, value: bool) {
        self.header.control.to_ds = value;
    }

    pub fn set_from_ds(&mut self, value: bool) {
        self.header.control.from_ds = value;
    }

    pub fn set_more_frag(&mut self, value: bool) {
        self.header.control.more_frag = value;
    }

    pub fn set_retry(&mut self, value: bool) {
        self.header.control.retry = value;
    }

    pub fn set_power_mgmt(&mut self, value: bool) {
        self.header.control.power_mgmt = value;
    }

    pub fn set_more_data(&mut self, value: bool) {
        self.header.control.more_data = value;
    }

    pub fn set_wep(&mut self, value: bool) {
        self.header.control.wep = value;
    }

    pub fn set_order(&mut self, value: bool) {
        self.header.control.order = value;
    }

    // Header fields

    pub fn set_duration_id(&mut self, value: u16) {
        self.header.duration_id = value;
    }

    pub fn set_addr1(&mut self, addr: MacAddress) {
        self.header.addr1 = addr;
    }

    pub fn set_addr2(&mut self, addr: MacAddress) {
        self.header.addr2 = addr;
    }

    pub fn set_addr3(&mut self, addr: MacAddress) {
        self.header.addr3 = addr;
    }

    /// Only serialized when both DS bits are set.
    pub fn set_addr4(&mut self, addr: MacAddress) {
        self.header.addr4 = addr;
    }

    pub fn set_frag_num(&mut self, frag_num: u8) {
        self.header.frag_num = frag_num & 0x0F;
    }

    pub fn set_seq_num(&mut self, seq_num: u16) {
        self.header.seq_num = seq_num & 0x0FFF;
    }

    // Tagged options

    pub fn add_tagged_option(&mut self, option: u8, value: &[u8]) -> Result<()> {
        if !self.body.carries_options() {
            return Err(PacketError::OptionsNotSupported);
        }
        self.options.add(TaggedOption::new(option, value.to_vec())?);
        Ok(())
    }

    pub fn add_ssid(&mut self, ssid: &str) -> Result<()> {
        self.add_tagged_option(TaggedOptionType::SSID, ssid.as_bytes())
    }

    /// The SSID element, if present. Non-UTF-8 bytes are replaced.
    pub fn essid(&self) -> Option<String> {
        self.options
            .find(TaggedOptionType::SSID)
            .map(|opt| String::from_utf8_lossy(opt.value()).into_owned())
    }

    /// Rates in Mbps. Each is sent in 500 kbps units with the basic-rate bit set.
    pub fn add_supported_rates(&mut self, rates: &[f32]) -> Result<()> {
        self.add_tagged_option(TaggedOptionType::SUPPORTED_RATES, &encode_rates(rates))
    }

    pub fn supported_rates(&self) -> Option<Vec<f32>> {
        self.options.find(TaggedOptionType::SUPPORTED_RATES).map(|opt| {
            opt.value()
                .iter()
                .map(|b| f32::from(b & 0x7f) / 2.0)
                .collect()
        })
    }

    pub fn add_extended_supported_rates(&mut self, rates: &[f32]) -> Result<()> {
        self.add_tagged_option(TaggedOptionType::EXT_SUPPORTED_RATES, &encode_rates(rates))
    }

    pub fn add_channel(&mut self, channel: u8) -> Result<()> {
        self.add_tagged_option(TaggedOptionType::DS_SET, &[channel])
    }

    pub fn channel(&self) -> Option<u8> {
        self.options
            .find(TaggedOptionType::DS_SET)
            .and_then(|opt| opt.value().first().copied())
    }

    pub fn add_qos_capabilities(&mut self, qos_info: u8) -> Result<()> {
        self.add_tagged_option(TaggedOptionType::QOS_CAPABILITY, &[qos_info])
    }

    pub fn add_power_capabilities(&mut self, min_power: u8, max_power: u8) -> Result<()> {
        self.add_tagged_option(TaggedOptionType::POWER_CAPABILITY, &[min_power, max_power])
    }

    /// Each entry is a first channel number and the number of channels.
    pub fn add_supported_channels(&mut self, channels: &[(u8, u8)]) -> Result<()> {
        let value: Vec<u8> = channels
            .iter()
            .flat_map(|&(first, count)| [first, count])
            .collect();
        self.add_tagged_option(TaggedOptionType::SUPPORTED_CHANNELS, &value)
    }

    /// QoS info byte, a reserved byte, then one record per access category.
    pub fn add_edca_parameter_set(&mut self, ac_be: u32, ac_bk: u32, ac_vi: u32, ac_vo: u32) -> Result<()> {
        let mut value = Vec::with_capacity(18);
        value.extend_from_slice(&[0, 0]);
        for record in [ac_be, ac_bk, ac_vi, ac_vo] {
            value.extend_from_slice(&record.to_le_bytes());
        }
        self.add_tagged_option(TaggedOptionType::EDCA, &value)
    }
}
