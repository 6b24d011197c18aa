//! Identifier allocation for referenceable entities.

/// Stable identifier triple of a referenceable entity.
///
/// Only produced by [`IdAllocator`]; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceIds {
    cad_id: u32,
    cad_persistent_id: u32,
    prc_id: u32,
}

impl ReferenceIds {
    /// Session-scoped CAD identifier.
    #[inline]
    pub fn cad_id(&self) -> u32 {
        self.cad_id
    }

    /// Caller-supplied persistent identifier.
    #[inline]
    pub fn cad_persistent_id(&self) -> u32 {
        self.cad_persistent_id
    }

    /// Format identifier.
    #[inline]
    pub fn prc_id(&self) -> u32 {
        self.prc_id
    }
}

/// Two independent monotonically increasing counters, one per id kind.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_cad_id: u32,
    next_prc_id: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next_cad_id: 1, next_prc_id: 1 }
    }
}

impl IdAllocator {
    /// Create counters starting at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next CAD identifier.
    pub fn make_cad_id(&mut self) -> u32 {
        let id = self.next_cad_id;
        self.next_cad_id += 1;
        id
    }

    /// Next PRC identifier.
    pub fn make_prc_id(&mut self) -> u32 {
        let id = self.next_prc_id;
        self.next_prc_id += 1;
        id
    }

    /// Allocate a fresh triple.
    pub fn allocate(&mut self, cad_persistent_id: u32) -> ReferenceIds {
        ReferenceIds {
            cad_id: self.make_cad_id(),
            cad_persistent_id,
            prc_id: self.make_prc_id(),
        }
    }

    /// Restart both counters at 1.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
