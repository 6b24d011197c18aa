//! Packed bit-stream primitives.
//!
//! [`BitStream`] is the only sink entities write to; [`BitReader`] replays it.

mod reader;
mod writer;

pub use reader::BitReader;
pub use writer::{bits_for_signed, bits_for_triple, bits_for_unsigned, BitStream};
