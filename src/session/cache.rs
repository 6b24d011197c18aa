//! Single-slot redundancy caches.
//!
//! Each cache holds exactly one "current" value for the whole write session.
//! A write compares against the slot, emits a one-bit "same as previous" flag,
//! and on mismatch emits the full value and replaces the slot. There is no
//! history: leaving a value and coming back to it writes it again.

use crate::entity::Graphics;
use crate::stream::BitStream;

/// Current-name register.
#[derive(Debug, Clone, Default)]
pub struct NameCache {
    current: String,
}

impl NameCache {
    /// Create a cache holding the empty name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the current name.
    pub fn reset(&mut self) {
        self.current.clear();
    }

    /// Name held in the slot.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Write `name` relative to the slot and update it.
    pub fn write(&mut self, out: &mut BitStream, name: &str) {
        let same = name == self.current;
        out.write_bool(same);
        if !same {
            out.write_str(name);
            self.current.clear();
            self.current.push_str(name);
        }
    }
}

/// Current graphics-attribute register.
#[derive(Debug, Clone, Default)]
pub struct GraphicsCache {
    current: Graphics,
}

impl GraphicsCache {
    /// Create a cache holding the default graphics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the slot to the default graphics.
    pub fn reset(&mut self) {
        self.current = Graphics::default();
    }

    /// Graphics held in the slot.
    pub fn current(&self) -> &Graphics {
        &self.current
    }

    /// Write `graphics` relative to the slot and update it.
    pub fn write(&mut self, out: &mut BitStream, graphics: &Graphics) {
        let graphics = graphics.normalized();
        if graphics == self.current {
            out.write_bool(true);
        } else {
            self.write_forced(out, &graphics);
        }
    }

    /// Write the full record regardless of the slot, then update it.
    pub fn write_forced(&mut self, out: &mut BitStream, graphics: &Graphics) {
        out.write_bool(false);
        out.write_u32(Graphics::index_plus_one(graphics.layer_index));
        out.write_u32(Graphics::index_plus_one(graphics.line_style_index));
        out.write_u8((graphics.behaviour & 0xFF) as u8);
        out.write_u8((graphics.behaviour >> 8) as u8);
        self.current = graphics.normalized();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::BitReader;

    #[test]
    fn test_name_cache_no_history() {
        let mut out = BitStream::new();
        let mut cache = NameCache::new();
        for name in ["A", "A", "B", "A"] {
            cache.write(&mut out, name);
        }

        let mut r = BitReader::from_stream(&out);
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_string().unwrap(), "A");
        assert!(r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_string().unwrap(), "B");
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_string().unwrap(), "A");
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_name_cache_starts_empty() {
        let mut out = BitStream::new();
        let mut cache = NameCache::new();
        cache.write(&mut out, "");
        assert_eq!(out.bit_len(), 1);
        assert_eq!(out.as_bytes(), &[0x80]);

        cache.write(&mut out, "x");
        cache.reset();
        assert_eq!(cache.current(), "");
    }

    #[test]
    fn test_graphics_cache_idempotent() {
        let g = Graphics::new(Some(2), Some(0), 1);
        let mut out = BitStream::new();
        let mut cache = GraphicsCache::new();
        for _ in 0..4 {
            cache.write(&mut out, &g);
        }

        let mut r = BitReader::from_stream(&out);
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 3);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u8().unwrap(), 0);
        for _ in 0..3 {
            assert!(r.read_bool().unwrap());
        }
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_graphics_cache_any_field_change() {
        let base = Graphics::new(Some(1), Some(1), 1);
        let changes = [
            Graphics::new(Some(2), Some(1), 1),
            Graphics::new(Some(1), None, 1),
            Graphics::new(Some(1), Some(1), 0x0102),
        ];
        for changed in changes {
            let mut out = BitStream::new();
            let mut cache = GraphicsCache::new();
            cache.write(&mut out, &base);
            let before = out.bit_len();
            cache.write(&mut out, &changed);
            assert!(out.bit_len() - before > 1);
            assert_eq!(*cache.current(), changed);
        }
    }

    #[test]
    fn test_max_index_is_same_as_absent() {
        let mut out = BitStream::new();
        let mut cache = GraphicsCache::new();
        let max_layer = Graphics::new(Some(u32::MAX), None, 1);
        cache.write(&mut out, &max_layer);
        assert_eq!(out.bit_len(), 1);
        assert_eq!(*cache.current(), Graphics::default());

        let styled = Graphics::new(Some(u32::MAX), Some(3), 1);
        cache.write(&mut out, &styled);
        cache.write(&mut out, &Graphics::new(None, Some(3), 1));

        let mut r = BitReader::from_stream(&out);
        assert!(r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), 4);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u8().unwrap(), 0);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_default_graphics_is_same() {
        let mut out = BitStream::new();
        let mut cache = GraphicsCache::new();
        cache.write(&mut out, &Graphics::default());
        assert_eq!(out.bit_len(), 1);

        cache.write_forced(&mut out, &Graphics::default());
        assert!(out.bit_len() > 2);
    }
}
