use std::fmt;

use bitstream_io::{BitRead, BitReader, BitWrite, BitWriter, LittleEndian};

use crate::common::PacketComponent;
use crate::cursor::InputCursor;
use crate::error::Result;

/// Size of the header up to and including sequence control.
pub const BASE_HEADER_SIZE: usize = 24;
pub const ADDR4_SIZE: usize = 6;

/// Frame type values carried in the frame-control type field.
pub struct FrameType;

impl FrameType {
    pub const MANAGEMENT: u8 = 0;
    pub const CONTROL: u8 = 1;
    pub const DATA: u8 = 2;
}

/// Subtype values for management and data frames.
pub struct FrameSubtype;

impl FrameSubtype {
    pub const ASSOC_REQUEST: u8 = 0;
    pub const ASSOC_RESPONSE: u8 = 1;
    pub const REASSOC_REQUEST: u8 = 2;
    pub const REASSOC_RESPONSE: u8 = 3;
    pub const PROBE_REQUEST: u8 = 4;
    pub const PROBE_RESPONSE: u8 = 5;
    pub const BEACON: u8 = 8;
    pub const ATIM: u8 = 9;
    pub const DISASSOC: u8 = 10;
    pub const AUTH: u8 = 11;
    pub const DEAUTH: u8 = 12;

    pub const DATA: u8 = 0;
    pub const QOS_DATA: u8 = 8;
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub const BROADCAST: MacAddress = MacAddress([0xff; 6]);

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        MacAddress(octets)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({self})")
    }
}

impl serde::Serialize for MacAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The 16-bit frame control field.
///
/// Packed least significant bit first:
/// `protocol(2) type(2) subtype(4) to_ds from_ds more_frag retry power_mgmt
/// more_data wep order`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameControl {
    pub protocol: u8,
    pub frame_type: u8,
    pub subtype: u8,
    pub to_ds: bool,
    pub from_ds: bool,
    pub more_frag: bool,
    pub retry: bool,
    pub power_mgmt: bool,
    pub more_data: bool,
    pub wep: bool,
    pub order: bool,
}

impl FrameControl {
    pub fn new(frame_type: u8, subtype: u8) -> Self {
        Self {
            frame_type,
            subtype,
            ..Self::default()
        }
    }

    /// A fourth address follows sequence control only when the frame travels
    /// between two distribution systems.
    pub fn has_addr4(&self) -> bool {
        self.to_ds && self.from_ds
    }
}

impl PacketComponent for FrameControl {
    type Order = LittleEndian;

    const WIRE_SIZE: usize = 2;

    fn write(&self, writer: &mut BitWriter<&mut Vec<u8>, LittleEndian>) -> Result<()> {
        writer.write_var::<u8>(2, self.protocol)?;
        writer.write_var::<u8>(2, self.frame_type)?;
        writer.write_var::<u8>(4, self.subtype)?;
        writer.write_bit(self.to_ds)?;
        writer.write_bit(self.from_ds)?;
        writer.write_bit(self.more_frag)?;
        writer.write_bit(self.retry)?;
        writer.write_bit(self.power_mgmt)?;
        writer.write_bit(self.more_data)?;
        writer.write_bit(self.wep)?;
        writer.write_bit(self.order)?;
        Ok(())
    }

    fn read(&mut self, reader: &mut BitReader<&[u8], LittleEndian>) -> Result<()> {
        self.protocol = reader.read_var::<u8>(2)?;
        self.frame_type = reader.read_var::<u8>(2)?;
        self.subtype = reader.read_var::<u8>(4)?;
        self.to_ds = reader.read_bit()?;
        self.from_ds = reader.read_bit()?;
        self.more_frag = reader.read_bit()?;
        self.retry = reader.read_bit()?;
        self.power_mgmt = reader.read_bit()?;
        self.more_data = reader.read_bit()?;
        self.wep = reader.read_bit()?;
        self.order = reader.read_bit()?;
        Ok(())
    }
}

/// The MAC header shared by every frame variant.
///
/// `addr4` is only on the wire when [`FrameControl::has_addr4`] holds; the
/// field is kept regardless so toggling the DS bits never loses it.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Dot11Header {
    pub control: FrameControl,
    pub duration_id: u16,
    pub addr1: MacAddress,
    pub addr2: MacAddress,
    pub addr3: MacAddress,
    pub frag_num: u8,
    pub seq_num: u16,
    pub addr4: MacAddress,
}

impl PacketComponent for Dot11Header {
    type Order = LittleEndian;

    const WIRE_SIZE: usize = BASE_HEADER_SIZE;

    fn write(&self, writer: &mut BitWriter<&mut Vec<u8>, LittleEndian>) -> Result<()> {
        self.control.write(writer)?;
        writer.write_var::<u16>(16, self.duration_id)?;
        writer.write_bytes(&self.addr1.0)?;
        writer.write_bytes(&self.addr2.0)?;
        writer.write_bytes(&self.addr3.0)?;
        writer.write_var::<u8>(4, self.frag_num)?;
        writer.write_var::<u16>(12, self.seq_num)?;
        Ok(())
    }

    fn read(&mut self, reader: &mut BitReader<&[u8], LittleEndian>) -> Result<()> {
        self.control.read(reader)?;
        self.duration_id = reader.read_var::<u16>(16)?;
        reader.read_bytes(&mut self.addr1.0)?;
        reader.read_bytes(&mut self.addr2.0)?;
        reader.read_bytes(&mut self.addr3.0)?;
        self.frag_num = reader.read_var::<u8>(4)?;
        self.seq_num = reader.read_var::<u16>(12)?;
        Ok(())
    }
}

impl Dot11Header {
    pub fn size(&self) -> usize {
        if self.control.has_addr4() {
            BASE_HEADER_SIZE + ADDR4_SIZE
        } else {
            BASE_HEADER_SIZE
        }
    }

    /// Reads the fixed part plus `addr4` when the DS bits call for it.
    pub(crate) fn read_from(cursor: &mut InputCursor<'_>) -> Result<Self> {
        let mut header = Self::decode(cursor)?;
        if header.control.has_addr4() {
            header.addr4 = MacAddress(cursor.read_array::<6>()?);
        }
        Ok(header)
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.extend_from_slice(&self.to_bytes()?);
        if self.control.has_addr4() {
            buf.extend_from_slice(&self.addr4.0);
        }
        Ok(())
    }
}
