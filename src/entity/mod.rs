//! PRC entity model and serialization.
//!
//! Every entity implements [`PrcWrite`]. A write emits, in order: the type
//! tag, the base header, the category content, the type's own fields and
//! finally any nested references. The order is the format.
//!
//! References:
//! - [`base`] - attributes, content headers, graphics, user data
//! - [`primitives`] - vectors, transformations, extents, parameterizations
//! - [`curve`], [`surface`] - geometry
//! - [`topology`] - faces, shells, connexes and bodies
//! - [`item`] - representation items
//! - [`tess`] - tessellations
//! - [`appearance`] - colors, pictures, textures, materials, styles
//! - [`markup`] - markups and annotations

pub mod appearance;
pub mod base;
pub mod curve;
pub mod item;
pub mod markup;
pub mod primitives;
pub mod surface;
pub mod tess;
pub mod topology;

use std::rc::Rc;

use crate::format::PRC_TYPE_ROOT;
use crate::session::Encoder;
use crate::util::Result;

pub use appearance::{
    FontKey, FontKeysSameFont, MaterialGeneric, Picture, RgbColor, Style, TextureApplication,
    TextureDefinition,
};
pub use base::{
    Attribute, AttributeTitle, AttributeValue, Attributes, BaseInfo, ContentBase, Graphics,
    SingleAttribute, UserData,
};
pub use curve::{Circle, Composite, CompositeSegment, ContentCurve, Curve, CurveFrame, NurbsCurve, PolyLine};
pub use item::{BodyRef, RepresentationItem, RepresentationItemContent};
pub use markup::{AnnotationItem, Markup, ReferenceUniqueIdentifier};
pub use primitives::{
    BoundingBox, CartesianTransformation3d, Domain, GeneralTransformation3d, Interval,
    Parameterization, Transformation, Transformation3d, UvParameterization,
};
pub use surface::{ContentSurface, NurbsSurface, Surface, SurfaceFrame};
pub use tess::{ContentBaseTessData, MarkupTess, Tess3d, TessFace, Tessellation, WireTess3d};
pub use topology::{Body, BrepData, Connex, ContentBody, Face, Shell, ShellFace, SingleWireBody, WireEdge};

/// Serialization into a write session.
pub trait PrcWrite {
    /// Append this entity to the session stream.
    fn write(&self, enc: &mut Encoder) -> Result<()>;
}

impl<T: PrcWrite + ?Sized> PrcWrite for Rc<T> {
    #[inline]
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        (**self).write(enc)
    }
}

impl<T: PrcWrite + ?Sized> PrcWrite for Box<T> {
    #[inline]
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        (**self).write(enc)
    }
}

/// Write an optional nested reference.
///
/// Emits the "not already stored" bit, then the root tag when `entity` is
/// absent or the entity itself in place.
pub fn write_ref<T: PrcWrite + ?Sized>(enc: &mut Encoder, entity: Option<&T>) -> Result<()> {
    enc.write_bool(false);
    match entity {
        Some(e) => e.write(enc),
        None => {
            enc.write_u32(PRC_TYPE_ROOT);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::BitReader;

    #[test]
    fn test_absent_ref_is_placeholder() {
        let mut enc = Encoder::new();
        write_ref::<Curve>(&mut enc, None).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_ROOT);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_shared_ref_writes_in_place() {
        let circle = Rc::new(Curve::circle(2.0));
        let mut a = Encoder::new();
        write_ref(&mut a, Some(&circle)).unwrap();
        let mut b = Encoder::new();
        b.write_bool(false);
        circle.write(&mut b).unwrap();
        assert_eq!(a.stream().as_bytes(), b.stream().as_bytes());
        assert_eq!(a.stream().bit_len(), b.stream().bit_len());
    }
}
