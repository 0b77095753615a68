use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::common::PacketComponent;
use crate::error::Result;

/// The 12-byte DNS message header.
///
/// Flag layout of the second 16-bit word, most significant bit first:
/// `qr(1) opcode(4) aa(1) tc(1) rd(1) ra(1) z(1) ad(1) cd(1) rcode(4)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DNSHeader {
    pub id: u16,
    pub qr: bool,
    pub opcode: u8,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub z: bool,
    pub ad: bool,
    pub cd: bool,
    pub rcode: u8,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl PacketComponent for DNSHeader {
    type Order = BigEndian;

    const WIRE_SIZE: usize = 12;

    fn write(&self, writer: &mut BitWriter<&mut Vec<u8>, BigEndian>) -> Result<()> {
        writer.write_var::<u16>(16, self.id)?;
        writer.write_bit(self.qr)?;
        writer.write_var::<u8>(4, self.opcode)?;
        writer.write_bit(self.aa)?;
        writer.write_bit(self.tc)?;
        writer.write_bit(self.rd)?;
        writer.write_bit(self.ra)?;
        writer.write_bit(self.z)?;
        writer.write_bit(self.ad)?;
        writer.write_bit(self.cd)?;
        writer.write_var::<u8>(4, self.rcode)?;
        writer.write_var::<u16>(16, self.qdcount)?;
        writer.write_var::<u16>(16, self.ancount)?;
        writer.write_var::<u16>(16, self.nscount)?;
        writer.write_var::<u16>(16, self.arcount)?;
        Ok(())
    }

    fn read(&mut self, reader: &mut BitReader<&[u8], BigEndian>) -> Result<()> {
        self.id = reader.read_var::<u16>(16)?;
        self.qr = reader.read_bit()?;
        self.opcode = reader.read_var::<u8>(4)?;
        self.aa = reader.read_bit()?;
        self.tc = reader.read_bit()?;
        self.rd = reader.read_bit()?;
        self.ra = reader.read_bit()?;
        self.z = reader.read_bit()?;
        self.ad = reader.read_bit()?;
        self.cd = reader.read_bit()?;
        self.rcode = reader.read_var::<u8>(4)?;
        self.qdcount = reader.read_var::<u16>(16)?;
        self.ancount = reader.read_var::<u16>(16)?;
        self.nscount = reader.read_var::<u16>(16)?;
        self.arcount = reader.read_var::<u16>(16)?;
        Ok(())
    }
}
