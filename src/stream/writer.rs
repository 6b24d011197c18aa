//! PRC bit-stream writer.
//!
//! Every field is packed most-significant-bit first. The buffer only grows;
//! the final partial byte is zero padded when handed out.

use std::io::Write;

use byteorder::{BigEndian, ByteOrder};

use crate::util::{Error, Result};

/// Smallest width `b >= 1` such that `2^b > value`.
///
/// Doubling-threshold rule of the compressed encodings: the threshold starts
/// at 2 and doubles while `value` reaches it.
pub fn bits_for_unsigned(value: u32) -> u32 {
    let mut bits = 2u32;
    let mut threshold = 2u64;
    while u64::from(value) >= threshold {
        threshold *= 2;
        bits += 1;
    }
    bits - 1
}

/// Width of a signed value: magnitude width plus one sign bit.
#[inline]
pub fn bits_for_signed(value: i32) -> u32 {
    bits_for_unsigned(value.unsigned_abs()) + 1
}

/// Widest of the three signed widths.
#[inline]
pub fn bits_for_triple(values: [i32; 3]) -> u32 {
    values.iter().map(|&v| bits_for_signed(v)).max().unwrap_or(1)
}

/// Growing, order-preserving bit buffer.
#[derive(Clone, Default)]
pub struct BitStream {
    data: Vec<u8>,
    bit_len: u64,
}

impl BitStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `bytes` bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self { data: Vec::with_capacity(bytes), bit_len: 0 }
    }

    /// Number of bits written so far.
    #[inline]
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Number of bytes needed to hold the written bits.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Written bytes, last byte zero padded.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the stream and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Hand the padded buffer to an external byte sink.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        sink.write_all(&self.data)?;
        sink.flush()?;
        Ok(())
    }

    /// Append a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        let offset = (self.bit_len % 8) as u8;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            if let Some(last) = self.data.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bit_len += 1;
    }

    /// Append a boolean (one bit).
    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.write_bit(value);
    }

    /// Append a character byte, MSB first.
    pub fn write_u8(&mut self, value: u8) {
        for i in 0..8 {
            self.write_bit(value & (0x80 >> i) != 0);
        }
    }

    /// Append an unsigned integer as flagged low-byte chunks.
    pub fn write_u32(&mut self, value: u32) {
        let mut rest = value;
        while rest != 0 {
            self.write_bit(true);
            self.write_u8((rest & 0xFF) as u8);
            rest >>= 8;
        }
        self.write_bit(false);
    }

    /// Append a signed integer as flagged low-byte chunks.
    ///
    /// Chunks stop once the remaining value is pure sign extension of the
    /// last byte written.
    pub fn write_i32(&mut self, value: i32) {
        let mut rest = value;
        let mut last: u8 = 0;
        loop {
            let done = (rest == 0 && last & 0x80 == 0) || (rest == -1 && last & 0x80 != 0);
            if done {
                break;
            }
            self.write_bit(true);
            last = (rest & 0xFF) as u8;
            self.write_u8(last);
            rest >>= 8;
        }
        self.write_bit(false);
    }

    /// Append a double as 64 big-endian IEEE-754 bits.
    pub fn write_f64(&mut self, value: f64) {
        let mut bytes = [0u8; 8];
        BigEndian::write_f64(&mut bytes, value);
        for b in bytes {
            self.write_u8(b);
        }
    }

    /// Append a string: empty is a single 0 bit, otherwise 1, length, bytes.
    pub fn write_str(&mut self, value: &str) {
        if value.is_empty() {
            self.write_bit(false);
            return;
        }
        self.write_bit(true);
        self.write_u32(value.len() as u32);
        for &b in value.as_bytes() {
            self.write_u8(b);
        }
    }

    /// Append `value` using exactly `bits` bits.
    pub fn write_unsigned_bits(&mut self, value: u32, bits: u32) -> Result<()> {
        if bits < 32 && u64::from(value) >= 1u64 << bits {
            return Err(Error::BitWidthOverflow { value: value.into(), bits });
        }
        for i in (0..bits).rev() {
            let bit = i < 32 && (value >> i) & 1 == 1;
            self.write_bit(bit);
        }
        Ok(())
    }

    /// Append a sign bit, then the magnitude in `bits - 1` bits.
    pub fn write_signed_bits(&mut self, value: i32, bits: u32) -> Result<()> {
        let magnitude = value.unsigned_abs();
        let fits = bits > 0 && (bits - 1 >= 32 || u64::from(magnitude) < 1u64 << (bits - 1));
        if !fits {
            return Err(Error::BitWidthOverflow { value: magnitude.into(), bits });
        }
        self.write_bit(value < 0);
        self.write_unsigned_bits(magnitude, bits - 1)
    }

    /// Append the width of `value` in a 5-bit field, then `value` in that width.
    pub fn write_number_of_bits_then_unsigned(&mut self, value: u32) -> Result<()> {
        let bits = bits_for_unsigned(value);
        self.write_unsigned_bits(bits, 5)?;
        self.write_unsigned_bits(value, bits)
    }

    /// Append `value / step` truncated toward zero as a signed `bits`-wide field.
    pub fn write_quantized_f64(&mut self, value: f64, step: f64, bits: u32) -> Result<()> {
        let units = value / step;
        if !(units.abs() < i32::MAX as f64) {
            return Err(Error::invalid(format!("{} is not representable in steps of {}", value, step)));
        }
        self.write_signed_bits(units as i32, bits)
    }
}

impl std::fmt::Debug for BitStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitStream({} bits)", self.bit_len)
    }
}
