use bitstream_io::{BitReader, BitWriter, Endianness};

use crate::cursor::{InputCursor, OutputCursor};
use crate::error::Result;

/// Fixed-size header whose fields are packed at bit granularity.
///
/// `Order` selects the bit and byte order of the packing: DNS and IPv6 are
/// big-endian, 802.11 is little-endian.
pub trait PacketComponent: Default {
    type Order: Endianness;

    const WIRE_SIZE: usize;

    fn write(&self, writer: &mut BitWriter<&mut Vec<u8>, Self::Order>) -> Result<()>;

    fn read(&mut self, reader: &mut BitReader<&[u8], Self::Order>) -> Result<()>;

    fn decode(cursor: &mut InputCursor<'_>) -> Result<Self> {
        let bytes = cursor.read_bytes(Self::WIRE_SIZE)?;
        let mut reader = BitReader::<_, Self::Order>::new(bytes);
        let mut component = Self::default();
        component.read(&mut reader)?;
        Ok(component)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::WIRE_SIZE);
        {
            let mut writer = BitWriter::<_, Self::Order>::new(&mut buf);
            self.write(&mut writer)?;
        }
        Ok(buf)
    }

    fn encode(&self, out: &mut OutputCursor<'_>) -> Result<()> {
        out.write_bytes(&self.to_bytes()?)
    }
}
