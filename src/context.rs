//! Topological context: the unit of body serialization.
//!
//! A [`TopoContext`] owns its configuration and an ordered body list. Ids of
//! referenceable headers come from the session [`Encoder`]. It produces three
//! records:
//!
//! - the full pass: context header, then every body
//! - the geometry summary: body types and compression tolerances
//! - the graphics summary: per-face graphics of B-rep bodies
//!
//! Body indices handed out by the `add_*` methods are what representation
//! items reference, so bodies are never removed or reordered.

use tracing::debug;

use crate::compress::CompressedBrepData;
use crate::entity::{Body, BrepData, ContentBase, Graphics, PrcWrite, SingleWireBody};
use crate::format::{is_compressed_type, PRC_TYPE_TOPO_CONTEXT, PRC_TYPE_TOPO_FACE};
use crate::session::{Encoder, GraphicsCache, ReferenceIds, SessionConfig};
use crate::stream::BitStream;
use crate::util::{Error, Result};

/// Context header plus its bodies.
#[derive(Debug, Clone, Default)]
pub struct TopoContext {
    pub content: ContentBase,
    pub config: SessionConfig,
    bodies: Vec<Body>,
}

impl TopoContext {
    /// Context with default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self { content: ContentBase::new(name), ..Default::default() }
    }

    /// Context with a validated configuration.
    pub fn with_config(name: impl Into<String>, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { content: ContentBase::new(name), config, ..Default::default() })
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    /// Append a body, returning its index.
    pub fn add_body(&mut self, body: impl Into<Body>) -> usize {
        self.bodies.push(body.into());
        self.bodies.len() - 1
    }

    pub fn add_brep_data(&mut self, brep: BrepData) -> usize {
        self.add_body(brep)
    }

    pub fn add_single_wire_body(&mut self, body: SingleWireBody) -> usize {
        self.add_body(body)
    }

    pub fn add_compressed_brep_data(&mut self, brep: CompressedBrepData) -> usize {
        self.add_body(brep)
    }

    /// Empty compressed body using the configured tolerance.
    pub fn new_compressed_brep(&self) -> CompressedBrepData {
        CompressedBrepData::new(self.config.compression_tolerance)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Make the context header referenceable with ids from
    /// [`Encoder::allocate_ids`].
    pub fn make_referenceable(&mut self, ids: ReferenceIds) {
        let name = std::mem::take(&mut self.content.name);
        let attributes = std::mem::take(&mut self.content.attributes);
        self.content = ContentBase::referenceable(name, ids);
        self.content.attributes = attributes;
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    fn write_header(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TOPO_CONTEXT);
        self.content.write(enc)?;
        enc.write_u8(self.config.behaviour);
        enc.write_f64(self.config.granularity);
        enc.write_f64(self.config.tolerance);
        enc.write_bool(self.config.smallest_face_thickness.is_some());
        if let Some(t) = self.config.smallest_face_thickness {
            enc.write_f64(t);
        }
        enc.write_bool(self.config.scale.is_some());
        if let Some(s) = self.config.scale {
            enc.write_f64(s);
        }
        Ok(())
    }

    /// Full pass: header, body count, then every body in order.
    #[tracing::instrument(skip_all, fields(name = %self.content.name, bodies = self.bodies.len()))]
    pub fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        self.write_header(enc)?;
        enc.write_len(self.bodies.len())?;
        for (index, body) in self.bodies.iter().enumerate() {
            let start = enc.stream().bit_len();
            body.write(enc)?;
            debug!(index, tag = body.serial_type(), bits = enc.stream().bit_len() - start, "body written");
        }
        Ok(())
    }

    /// Full pass into a fresh stream, with body references bound to this context.
    pub fn encode(&self) -> Result<BitStream> {
        let mut enc = Encoder::new();
        enc.bind_contexts(std::slice::from_ref(self));
        self.serialize(&mut enc)?;
        Ok(enc.into_stream())
    }

    /// Body count, then each body's type and, if compressed, its tolerance.
    #[tracing::instrument(skip_all, fields(bodies = self.bodies.len()))]
    pub fn serialize_geometry_summary(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_len(self.bodies.len())?;
        for body in &self.bodies {
            let tag = body.serial_type();
            enc.write_u32(tag);
            if is_compressed_type(tag) {
                enc.write_f64(body.serial_tolerance().unwrap_or_default());
            }
        }
        Ok(())
    }

    /// Per-face graphics of B-rep and compressed B-rep bodies.
    ///
    /// Written with a private graphics cache starting from the defaults; the
    /// encoder's own caches are left untouched.
    #[tracing::instrument(skip_all, fields(bodies = self.bodies.len()))]
    pub fn serialize_context_graphics(&self, enc: &mut Encoder) -> Result<()> {
        let mut faces: Vec<Graphics> = Vec::new();
        for body in &self.bodies {
            body.collect_face_graphics(&mut faces);
        }
        let any_graphics = faces.iter().any(Graphics::has_graphics);

        let out = enc.stream_mut();
        if !any_graphics {
            out.write_u32(0);
            return Ok(());
        }
        debug!(faces = faces.len(), "writing face graphics");

        let count = u32::try_from(faces.len())
            .map_err(|_| Error::invalid(format!("{} faces in one context", faces.len())))?;
        let mut cache = GraphicsCache::new();
        // one treat type: faces
        out.write_u32(1);
        out.write_u32(PRC_TYPE_TOPO_FACE);
        out.write_u32(count);
        for graphics in &faces {
            let has = graphics.has_graphics();
            out.write_bool(has);
            if has {
                cache.write(out, graphics);
            }
        }
        Ok(())
    }
}

/// Write several contexts in order, resolving body references across all of them.
pub fn serialize_contexts(contexts: &[TopoContext], enc: &mut Encoder) -> Result<()> {
    enc.bind_contexts(contexts);
    for context in contexts {
        context.serialize(enc)?;
    }
    Ok(())
}

/// Unit record: whether the unit comes from the CAD file, then the unit in mm.
pub fn write_unit(enc: &mut Encoder, from_cad: bool, unit: f64) {
    enc.write_bool(from_cad);
    enc.write_f64(unit);
}

/// Empty markup record: no linked items, leaders, markups or annotations.
pub fn write_empty_markups(enc: &mut Encoder) {
    for _ in 0..4 {
        enc.write_u32(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::CompressedFace;
    use crate::entity::{Connex, Face, Shell};
    use crate::format::{PRC_TYPE_TOPO_BREP_DATA, PRC_TYPE_TOPO_BREP_DATA_COMPRESS};
    use crate::stream::BitReader;
    use crate::util::DVec3;

    fn brep_with(graphics: &[Graphics]) -> BrepData {
        let mut shell = Shell::new(true);
        for g in graphics {
            shell.add_face(Face::default().with_graphics(*g), 1);
        }
        let mut connex = Connex::default();
        connex.add_shell(shell);
        let mut brep = BrepData::default();
        brep.add_connex(connex);
        brep
    }

    fn flat_face() -> CompressedFace {
        CompressedFace::new(1, vec![DVec3::ZERO, DVec3::Y, DVec3::X, DVec3::new(1.0, 1.0, 0.0)])
    }

    #[test]
    fn test_header_optional_fields() {
        let config = SessionConfig { scale: Some(2.0), ..Default::default() };
        let ctx = TopoContext::with_config("", config).unwrap();
        let stream = ctx.encode().unwrap();

        let mut r = BitReader::from_stream(&stream);
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_TOPO_CONTEXT);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_u8().unwrap(), 0);
        assert_eq!(r.read_f64().unwrap(), 0.0);
        assert_eq!(r.read_f64().unwrap(), 0.0);
        assert!(!r.read_bool().unwrap());
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_f64().unwrap(), 2.0);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_geometry_summary() {
        let mut ctx = TopoContext::new("ctx");
        ctx.add_brep_data(BrepData::default());
        let mut compressed = ctx.new_compressed_brep();
        compressed.add_face(flat_face());
        ctx.add_compressed_brep_data(compressed);

        let mut enc = Encoder::new();
        ctx.serialize_geometry_summary(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), 2);
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_TOPO_BREP_DATA);
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_TOPO_BREP_DATA_COMPRESS);
        assert_eq!(r.read_f64().unwrap(), 1e-4);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_graphics_summary_without_graphics() {
        let mut ctx = TopoContext::new("ctx");
        ctx.add_brep_data(brep_with(&[Graphics::default(), Graphics::default()]));
        let mut enc = Encoder::new();
        ctx.serialize_context_graphics(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_graphics_summary_collects_all_faces() {
        let styled = Graphics::with_style(0);
        let mut ctx = TopoContext::new("ctx");
        ctx.add_brep_data(brep_with(&[styled, Graphics::default()]));
        let mut compressed = ctx.new_compressed_brep();
        compressed.add_face(flat_face().with_graphics(styled));
        ctx.add_compressed_brep_data(compressed);

        let mut enc = Encoder::new();
        enc.write_graphics(&Graphics::new(Some(7), None, 1));
        let before = *enc.graphics_cache().current();
        let start = enc.stream().bit_len();
        ctx.serialize_context_graphics(&mut enc).unwrap();
        assert_eq!(*enc.graphics_cache().current(), before);

        let mut r = BitReader::from_stream(enc.stream());
        for _ in 0..start {
            r.read_bit().unwrap();
        }
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_TOPO_FACE);
        assert_eq!(r.read_u32().unwrap(), 3);
        // first styled face: full record
        assert!(r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u8().unwrap(), 0);
        // default face: no graphics
        assert!(!r.read_bool().unwrap());
        // compressed face: same as cached
        assert!(r.read_bool().unwrap());
        assert!(r.read_bool().unwrap());
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_referenceable_header() {
        let mut enc = Encoder::new();
        let mut ctx = TopoContext::new("ctx");
        ctx.make_referenceable(enc.allocate_ids(5));
        assert_eq!(ctx.content.ids().map(|i| i.prc_id()), Some(1));
        assert_eq!(ctx.content.name, "ctx");

        ctx.serialize(&mut enc).unwrap();
        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_TOPO_CONTEXT);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_string().unwrap(), "ctx");
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 5);
        assert_eq!(r.read_u32().unwrap(), 1);
    }

    #[test]
    fn test_unit_and_empty_markups() {
        let mut enc = Encoder::new();
        write_unit(&mut enc, true, 25.4);
        write_empty_markups(&mut enc);

        let mut r = BitReader::from_stream(enc.stream());
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_f64().unwrap(), 25.4);
        for _ in 0..4 {
            assert_eq!(r.read_u32().unwrap(), 0);
        }
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SessionConfig { compression_tolerance: 0.0, ..Default::default() };
        assert!(TopoContext::with_config("bad", config).is_err());
    }
}
