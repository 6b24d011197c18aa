//! Representation items: the drawable leaves of a product tree.

use crate::format::{
    PRC_TYPE_RI_BREP_MODEL, PRC_TYPE_RI_COORDINATE_SYSTEM, PRC_TYPE_RI_CURVE, PRC_TYPE_RI_POINT_SET,
    PRC_TYPE_RI_POLY_BREP_MODEL, PRC_TYPE_RI_POLY_WIRE, PRC_TYPE_RI_SET,
};
use crate::session::Encoder;
use crate::util::{DVec3, Result};

use super::base::{ContentBase, Graphics, UserData};
use super::primitives::{write_vec3, Transformation3d};
use super::PrcWrite;

/// Header shared by all representation items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepresentationItemContent {
    pub base: ContentBase,
    pub graphics: Graphics,
    pub local_coordinate_system: Option<u32>,
    pub tessellation: Option<u32>,
}

impl RepresentationItemContent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { base: ContentBase::new(name), ..Default::default() }
    }

    fn write(&self, enc: &mut Encoder) -> Result<()> {
        self.base.write(enc)?;
        enc.write_graphics(&self.graphics);
        enc.write_index(self.local_coordinate_system);
        enc.write_index(self.tessellation);
        Ok(())
    }
}

/// Body of a topological context, addressed by indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyRef {
    pub context: u32,
    pub body: u32,
}

impl BodyRef {
    pub fn new(context: u32, body: u32) -> Self {
        Self { context, body }
    }

    fn write_optional(body: Option<BodyRef>, enc: &mut Encoder) -> Result<()> {
        enc.write_bool(body.is_some());
        if let Some(b) = body {
            enc.check_body_ref(b.context, b.body)?;
            enc.write_u32(b.context.wrapping_add(1));
            enc.write_u32(b.body.wrapping_add(1));
        }
        Ok(())
    }
}

/// Any representation item.
#[derive(Debug, Clone, PartialEq)]
pub enum RepresentationItem {
    BrepModel {
        content: RepresentationItemContent,
        body: Option<BodyRef>,
        is_closed: bool,
    },
    PolyBrepModel {
        content: RepresentationItemContent,
        is_closed: bool,
    },
    PointSet {
        content: RepresentationItemContent,
        points: Vec<DVec3>,
    },
    Set {
        content: RepresentationItemContent,
        elements: Vec<RepresentationItem>,
    },
    Wire {
        content: RepresentationItemContent,
        body: Option<BodyRef>,
    },
    PolyWire {
        content: RepresentationItemContent,
    },
    CoordinateSystem {
        content: RepresentationItemContent,
        axis_set: Transformation3d,
    },
}

impl RepresentationItem {
    /// B-rep model showing `body`.
    pub fn brep_model(name: impl Into<String>, body: BodyRef, is_closed: bool) -> Self {
        Self::BrepModel { content: RepresentationItemContent::new(name), body: Some(body), is_closed }
    }

    /// Empty set.
    pub fn set(name: impl Into<String>) -> Self {
        Self::Set { content: RepresentationItemContent::new(name), elements: Vec::new() }
    }

    /// Append to a set, returning the element index. `None` for other items.
    pub fn add(&mut self, item: RepresentationItem) -> Option<usize> {
        match self {
            Self::Set { elements, .. } => {
                elements.push(item);
                Some(elements.len() - 1)
            }
            _ => None,
        }
    }

    pub fn type_tag(&self) -> u32 {
        match self {
            Self::BrepModel { .. } => PRC_TYPE_RI_BREP_MODEL,
            Self::PolyBrepModel { .. } => PRC_TYPE_RI_POLY_BREP_MODEL,
            Self::PointSet { .. } => PRC_TYPE_RI_POINT_SET,
            Self::Set { .. } => PRC_TYPE_RI_SET,
            Self::Wire { .. } => PRC_TYPE_RI_CURVE,
            Self::PolyWire { .. } => PRC_TYPE_RI_POLY_WIRE,
            Self::CoordinateSystem { .. } => PRC_TYPE_RI_COORDINATE_SYSTEM,
        }
    }

    pub fn content(&self) -> &RepresentationItemContent {
        match self {
            Self::BrepModel { content, .. }
            | Self::PolyBrepModel { content, .. }
            | Self::PointSet { content, .. }
            | Self::Set { content, .. }
            | Self::Wire { content, .. }
            | Self::PolyWire { content }
            | Self::CoordinateSystem { content, .. } => content,
        }
    }
}

impl PrcWrite for RepresentationItem {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(self.type_tag());
        self.content().write(enc)?;
        match self {
            Self::BrepModel { body, is_closed, .. } => {
                BodyRef::write_optional(*body, enc)?;
                enc.write_bool(*is_closed);
            }
            Self::PolyBrepModel { is_closed, .. } => enc.write_bool(*is_closed),
            Self::PointSet { points, .. } => {
                enc.write_len(points.len())?;
                for &p in points {
                    write_vec3(enc, p);
                }
            }
            Self::Set { elements, .. } => {
                enc.write_len(elements.len())?;
                for element in elements {
                    element.write(enc)?;
                }
            }
            Self::Wire { body, .. } => BodyRef::write_optional(*body, enc)?,
            Self::PolyWire { .. } => {}
            Self::CoordinateSystem { axis_set, .. } => axis_set.write(enc)?,
        }
        UserData::empty().write(enc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::primitives::CartesianTransformation3d;
    use crate::format::PRC_TYPE_MISC_CARTESIAN_TRANSFORMATION;
    use crate::stream::BitReader;
    use crate::util::Error;

    fn read_content(r: &mut BitReader<'_>, name: Option<&str>) {
        assert_eq!(r.read_u32().unwrap(), 0);
        match name {
            Some(n) => {
                assert!(!r.read_bool().unwrap());
                assert_eq!(r.read_string().unwrap(), n);
            }
            None => assert!(r.read_bool().unwrap()),
        }
        // graphics equal to the cached default
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), 0);
    }

    #[test]
    fn test_brep_model_layout() {
        let item = RepresentationItem::brep_model("cube", BodyRef::new(0, 2), true);
        let mut enc = Encoder::new();
        item.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_RI_BREP_MODEL);
        read_content(&mut r, Some("cube"));
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 3);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_nested_set_shares_caches() {
        let mut inner = RepresentationItem::set("group");
        inner.add(RepresentationItem::PolyWire { content: RepresentationItemContent::new("group") });
        let mut outer = RepresentationItem::set("");
        assert_eq!(outer.add(inner), Some(0));
        let mut enc = Encoder::new();
        outer.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_RI_SET);
        read_content(&mut r, None);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_RI_SET);
        read_content(&mut r, Some("group"));
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_RI_POLY_WIRE);
        read_content(&mut r, None);
        // user data of the wire, the inner set and the outer set
        for _ in 0..3 {
            assert_eq!(r.read_u32().unwrap(), 0);
        }
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_coordinate_system_axis_set() {
        let item = RepresentationItem::CoordinateSystem {
            content: RepresentationItemContent::default(),
            axis_set: Transformation3d::Cartesian(CartesianTransformation3d::default()),
        };
        let mut enc = Encoder::new();
        item.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_RI_COORDINATE_SYSTEM);
        read_content(&mut r, None);
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_MISC_CARTESIAN_TRANSFORMATION);
        assert_eq!(r.read_u8().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_add_to_non_set() {
        let mut wire = RepresentationItem::Wire { content: RepresentationItemContent::default(), body: None };
        assert_eq!(wire.add(RepresentationItem::set("x")), None);
    }

    #[test]
    fn test_dangling_body_is_rejected_when_bound() {
        use crate::context::TopoContext;

        let contexts = vec![TopoContext::default()];
        let mut enc = Encoder::new();
        enc.bind_contexts(&contexts);
        let item = RepresentationItem::brep_model("ghost", BodyRef::new(0, 0), false);
        assert!(matches!(item.write(&mut enc), Err(Error::DanglingReference { context: 0, body: 0 })));
    }
}
