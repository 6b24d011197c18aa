//! PRC bit-stream reader.
//!
//! Mirrors every primitive of [`BitStream`](super::BitStream) so encoded
//! sections can be replayed, chiefly by the compressed NURBS decoder.

use byteorder::{BigEndian, ByteOrder};

use crate::util::{Error, Result};

use super::BitStream;

/// Cursor over a packed, MSB-first bit buffer.
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_len: u64,
    pos: u64,
}

impl<'a> BitReader<'a> {
    /// Read `bit_len` bits from `data`.
    pub fn new(data: &'a [u8], bit_len: u64) -> Self {
        let bit_len = bit_len.min(data.len() as u64 * 8);
        Self { data, bit_len, pos: 0 }
    }

    /// Read everything written to `stream`.
    pub fn from_stream(stream: &'a BitStream) -> Self {
        Self::new(stream.as_bytes(), stream.bit_len())
    }

    /// Current bit position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Bits left to read.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.bit_len - self.pos
    }

    /// Read one bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.pos >= self.bit_len {
            return Err(Error::UnexpectedEof(self.pos));
        }
        let byte = self.data[(self.pos / 8) as usize];
        let bit = byte & (0x80 >> (self.pos % 8)) != 0;
        self.pos += 1;
        Ok(bit)
    }

    /// Read a boolean (one bit).
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_bit()
    }

    /// Read a character byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut value = 0u8;
        for _ in 0..8 {
            value = (value << 1) | u8::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Read a chunked unsigned integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut value = 0u32;
        let mut shift = 0u32;
        while self.read_bit()? {
            if shift >= 32 {
                return Err(Error::stream("unsigned integer longer than 4 chunks"));
            }
            value |= u32::from(self.read_u8()?) << shift;
            shift += 8;
        }
        Ok(value)
    }

    /// Read a chunked signed integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        let mut value = 0u32;
        let mut shift = 0u32;
        let mut last = 0u8;
        while self.read_bit()? {
            if shift >= 32 {
                return Err(Error::stream("signed integer longer than 4 chunks"));
            }
            last = self.read_u8()?;
            value |= u32::from(last) << shift;
            shift += 8;
        }
        if last & 0x80 != 0 && shift < 32 {
            value |= u32::MAX << shift;
        }
        Ok(value as i32)
    }

    /// Read a 64-bit double.
    pub fn read_f64(&mut self) -> Result<f64> {
        let mut bytes = [0u8; 8];
        for b in &mut bytes {
            *b = self.read_u8()?;
        }
        Ok(BigEndian::read_f64(&bytes))
    }

    /// Read a string written by [`BitStream::write_str`].
    pub fn read_string(&mut self) -> Result<String> {
        if !self.read_bit()? {
            return Ok(String::new());
        }
        let len = self.read_u32()? as usize;
        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len {
            bytes.push(self.read_u8()?);
        }
        Ok(String::from_utf8(bytes)?)
    }

    /// Read an unsigned value of exactly `bits` bits.
    pub fn read_unsigned_bits(&mut self, bits: u32) -> Result<u32> {
        if bits > 32 {
            return Err(Error::stream(format!("field width {} exceeds 32 bits", bits)));
        }
        let mut value = 0u64;
        for _ in 0..bits {
            value = (value << 1) | u64::from(self.read_bit()?);
        }
        Ok(value as u32)
    }

    /// Read a sign bit and a `bits - 1` wide magnitude.
    pub fn read_signed_bits(&mut self, bits: u32) -> Result<i32> {
        if bits == 0 {
            return Err(Error::stream("signed field needs at least one bit"));
        }
        let negative = self.read_bit()?;
        let magnitude = self.read_unsigned_bits(bits - 1)? as i64;
        Ok(if negative { -magnitude } else { magnitude } as i32)
    }

    /// Read a 5-bit width, then an unsigned value of that width.
    pub fn read_number_of_bits_then_unsigned(&mut self) -> Result<u32> {
        let bits = self.read_unsigned_bits(5)?;
        self.read_unsigned_bits(bits)
    }
}
