//! Bounds-checked readers and writers over fixed buffers.
//!
//! Every codec in the crate goes through these two types when it touches
//! untrusted bytes, so an out-of-range read or skip always surfaces as
//! [`PacketError::MalformedPacket`] instead of a panic.

use crate::error::{PacketError, Result};

/// Fixed-size integers that can be read from or written to the wire.
pub trait WireInt: Sized + Copy {
    const SIZE: usize;

    fn from_be_slice(bytes: &[u8]) -> Self;
    fn from_le_slice(bytes: &[u8]) -> Self;
    fn write_be_slice(self, out: &mut [u8]);
    fn write_le_slice(self, out: &mut [u8]);
}

macro_rules! impl_wire_int {
    ($($ty:ty),*) => {
        $(
            impl WireInt for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(raw)
                }

                #[inline]
                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }

                #[inline]
                fn write_be_slice(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_be_bytes());
                }

                #[inline]
                fn write_le_slice(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_wire_int!(u8, u16, u32, u64);

/// Read position over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct InputCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> InputCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor starting at `pos`. Fails if `pos` is past the end.
    pub fn at(data: &'a [u8], pos: usize) -> Result<Self> {
        if pos > data.len() {
            return Err(PacketError::MalformedPacket);
        }
        Ok(Self { data, pos })
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn can_read(&self, n: usize) -> bool {
        n <= self.remaining()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The whole underlying buffer, independent of the current position.
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    /// Bytes from the current position to the end, without consuming them.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        if !self.can_read(n) {
            return Err(PacketError::MalformedPacket);
        }
        self.pos += n;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if !self.can_read(n) {
            return Err(PacketError::MalformedPacket);
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn peek_u8(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(PacketError::MalformedPacket)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.peek_u8()?;
        self.pos += 1;
        Ok(value)
    }

    /// Reads a big-endian (network order) integer.
    pub fn read_be<T: WireInt>(&mut self) -> Result<T> {
        self.read_bytes(T::SIZE).map(T::from_be_slice)
    }

    /// Reads a little-endian integer.
    pub fn read_le<T: WireInt>(&mut self) -> Result<T> {
        self.read_bytes(T::SIZE).map(T::from_le_slice)
    }
}

/// Write position over a caller-provided buffer.
#[derive(Debug)]
pub struct OutputCursor<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> OutputCursor<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn reserve(&mut self, n: usize) -> Result<&mut [u8]> {
        if n > self.remaining() {
            return Err(PacketError::BufferTooSmall {
                what: "serialization",
                need: self.pos + n,
                have: self.data.len(),
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&mut self.data[start..start + n])
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.reserve(1)?[0] = value;
        Ok(())
    }

    pub fn write_be<T: WireInt>(&mut self, value: T) -> Result<()> {
        value.write_be_slice(self.reserve(T::SIZE)?);
        Ok(())
    }

    pub fn write_le<T: WireInt>(&mut self, value: T) -> Result<()> {
        value.write_le_slice(self.reserve(T::SIZE)?);
        Ok(())
    }

    /// Advances over `n` bytes, leaving them untouched.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.reserve(n).map(|_| ())
    }
}
