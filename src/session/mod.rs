//! Write session state.
//!
//! The [`Encoder`] is the single piece of mutable state threaded through every
//! entity write: the output bit-stream, both redundancy caches and the id
//! counters of the session. Write order through it is part of the format, so
//! it is strictly sequential.

mod cache;
mod config;
mod ids;

pub use cache::{GraphicsCache, NameCache};
pub use config::SessionConfig;
pub use ids::{IdAllocator, ReferenceIds};

use crate::context::TopoContext;
use crate::entity::Graphics;
use crate::stream::BitStream;
use crate::util::{Error, Result};

/// Output stream, caches and id counters of one write session.
#[derive(Debug, Default)]
pub struct Encoder {
    out: BitStream,
    names: NameCache,
    graphics: GraphicsCache,
    ids: IdAllocator,
    /// Body counts of the contexts body references resolve against.
    bound_bodies: Option<Vec<usize>>,
}

impl Encoder {
    /// Create an encoder with an empty stream and reset caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve representation-item body references against `contexts`.
    pub fn bind_contexts(&mut self, contexts: &[TopoContext]) {
        self.bound_bodies = Some(contexts.iter().map(|c| c.bodies().len()).collect());
    }

    /// Allocate an id triple unique within this session.
    pub fn allocate_ids(&mut self, cad_persistent_id: u32) -> ReferenceIds {
        self.ids.allocate(cad_persistent_id)
    }

    /// Restart id allocation. Only for a new independent session.
    pub fn reset_ids(&mut self) {
        self.ids.reset();
    }

    /// Reset both caches. Required before starting an independent output.
    ///
    /// Id counters are kept; see [`Encoder::reset_ids`].
    pub fn reset(&mut self) {
        self.names.reset();
        self.graphics.reset();
    }

    /// Borrow the output stream.
    #[inline]
    pub fn stream(&self) -> &BitStream {
        &self.out
    }

    /// Mutably borrow the output stream.
    #[inline]
    pub fn stream_mut(&mut self) -> &mut BitStream {
        &mut self.out
    }

    /// Take the output stream, leaving an empty one and reset caches behind.
    pub fn take_stream(&mut self) -> BitStream {
        self.reset();
        std::mem::take(&mut self.out)
    }

    /// Consume the encoder and return its stream.
    pub fn into_stream(self) -> BitStream {
        self.out
    }

    /// Name cache state.
    pub fn name_cache(&self) -> &NameCache {
        &self.names
    }

    /// Graphics cache state.
    pub fn graphics_cache(&self) -> &GraphicsCache {
        &self.graphics
    }

    // ========================================================================
    // Cached fields
    // ========================================================================

    /// Write a name through the name cache.
    pub fn write_name(&mut self, name: &str) {
        self.names.write(&mut self.out, name);
    }

    /// Write graphics through the graphics cache.
    pub fn write_graphics(&mut self, graphics: &Graphics) {
        self.graphics.write(&mut self.out, graphics);
    }

    /// Write the full graphics record and update the cache.
    pub fn write_graphics_forced(&mut self, graphics: &Graphics) {
        self.graphics.write_forced(&mut self.out, graphics);
    }

    /// Fail unless `body` of `context` exists in the bound contexts.
    ///
    /// Without bound contexts nothing can be checked and the reference passes.
    pub fn check_body_ref(&self, context: u32, body: u32) -> Result<()> {
        let Some(counts) = &self.bound_bodies else {
            return Ok(());
        };
        match counts.get(context as usize) {
            Some(&n) if (body as usize) < n => Ok(()),
            _ => Err(Error::DanglingReference { context, body }),
        }
    }

    // ========================================================================
    // Primitive forwarding
    // ========================================================================

    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.out.write_bool(value);
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.out.write_u8(value);
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.out.write_u32(value);
    }

    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.out.write_i32(value);
    }

    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        self.out.write_f64(value);
    }

    #[inline]
    pub fn write_str(&mut self, value: &str) {
        self.out.write_str(value);
    }

    /// Write a list length.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| Error::invalid(format!("list of {} entries is too long", len)))?;
        self.out.write_u32(len);
        Ok(())
    }

    /// Write an optional index as `index + 1`, absent as 0.
    #[inline]
    pub fn write_index(&mut self, index: Option<u32>) {
        self.out.write_u32(Graphics::index_plus_one(index));
    }

    /// Write an explicit-width unsigned field.
    #[inline]
    pub fn write_unsigned_bits(&mut self, value: u32, bits: u32) -> Result<()> {
        self.out.write_unsigned_bits(value, bits)
    }

    /// Write an explicit-width signed field.
    #[inline]
    pub fn write_signed_bits(&mut self, value: i32, bits: u32) -> Result<()> {
        self.out.write_signed_bits(value, bits)
    }

    /// Write a self-describing unsigned field.
    #[inline]
    pub fn write_number_of_bits_then_unsigned(&mut self, value: u32) -> Result<()> {
        self.out.write_number_of_bits_then_unsigned(value)
    }
}
