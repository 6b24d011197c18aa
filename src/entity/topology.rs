//! Topology: faces, shells, connexes and the body variants.
//!
//! Loops, coedges, edges and vertices are not modelled; a face only records
//! how many loops it has.

use std::rc::Rc;

use crate::compress::CompressedBrepData;
use crate::format::{
    PRC_TYPE_TOPO_BREP_DATA, PRC_TYPE_TOPO_CONNEX, PRC_TYPE_TOPO_FACE, PRC_TYPE_TOPO_SHELL,
    PRC_TYPE_TOPO_SINGLE_WIRE_BODY, PRC_TYPE_TOPO_WIRE_EDGE,
};
use crate::session::Encoder;
use crate::util::{Error, Result};

use super::base::{BaseInfo, Graphics};
use super::curve::Curve;
use super::primitives::{BoundingBox, Domain, Interval};
use super::surface::Surface;
use super::{write_ref, PrcWrite};

// ============================================================================
// Faces, shells, connexes
// ============================================================================

/// Bounded region of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub base: Option<BaseInfo>,
    pub surface: Option<Rc<Surface>>,
    pub trim_domain: Option<Domain>,
    pub tolerance: Option<f64>,
    pub loop_count: u32,
    /// Index of the outer loop, -1 when unknown.
    pub outer_loop_index: i32,
    /// Written in the context graphics summary, not with the face.
    pub graphics: Graphics,
}

impl Default for Face {
    fn default() -> Self {
        Self {
            base: None,
            surface: None,
            trim_domain: None,
            tolerance: None,
            loop_count: 0,
            outer_loop_index: -1,
            graphics: Graphics::default(),
        }
    }
}

impl Face {
    /// Untrimmed face on `surface`.
    pub fn new(surface: Rc<Surface>) -> Self {
        Self { surface: Some(surface), ..Default::default() }
    }

    pub fn with_graphics(mut self, graphics: Graphics) -> Self {
        self.graphics = graphics;
        self
    }
}

impl PrcWrite for Face {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TOPO_FACE);
        BaseInfo::write_optional(self.base.as_ref(), enc)?;
        write_ref(enc, self.surface.as_deref())?;
        enc.write_bool(self.trim_domain.is_some());
        if let Some(domain) = &self.trim_domain {
            domain.write(enc);
        }
        enc.write_bool(self.tolerance.is_some());
        if let Some(tol) = self.tolerance {
            enc.write_f64(tol);
        }
        enc.write_u32(self.loop_count);
        enc.write_i32(self.outer_loop_index);
        Ok(())
    }
}

/// Face plus its orientation relative to the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellFace {
    pub face: Face,
    pub orientation: u8,
}

/// Connected set of faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shell {
    pub base: Option<BaseInfo>,
    pub is_closed: bool,
    pub faces: Vec<ShellFace>,
}

impl Shell {
    pub fn new(is_closed: bool) -> Self {
        Self { is_closed, ..Default::default() }
    }

    /// Append a face, returning its index.
    pub fn add_face(&mut self, face: Face, orientation: u8) -> usize {
        self.faces.push(ShellFace { face, orientation });
        self.faces.len() - 1
    }
}

impl PrcWrite for Shell {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TOPO_SHELL);
        BaseInfo::write_optional(self.base.as_ref(), enc)?;
        enc.write_bool(self.is_closed);
        enc.write_len(self.faces.len())?;
        for sf in &self.faces {
            write_ref(enc, Some(&sf.face))?;
            enc.write_u8(sf.orientation);
        }
        Ok(())
    }
}

/// Set of shells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connex {
    pub base: Option<BaseInfo>,
    pub shells: Vec<Shell>,
}

impl Connex {
    pub fn add_shell(&mut self, shell: Shell) -> usize {
        self.shells.push(shell);
        self.shells.len() - 1
    }
}

impl PrcWrite for Connex {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TOPO_CONNEX);
        BaseInfo::write_optional(self.base.as_ref(), enc)?;
        enc.write_len(self.shells.len())?;
        for shell in &self.shells {
            write_ref(enc, Some(shell))?;
        }
        Ok(())
    }
}

// ============================================================================
// Bodies
// ============================================================================

/// Header shared by all bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentBody {
    pub base: Option<BaseInfo>,
    /// Non-zero behaviour makes a B-rep carry its bounding box.
    pub behaviour: u8,
}

impl ContentBody {
    pub(crate) fn write(&self, enc: &mut Encoder) -> Result<()> {
        BaseInfo::write_optional(self.base.as_ref(), enc)?;
        enc.write_u8(self.behaviour);
        Ok(())
    }
}

/// Boundary representation body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrepData {
    pub content: ContentBody,
    pub connexes: Vec<Connex>,
    pub bounding_box: Option<BoundingBox>,
}

impl BrepData {
    pub fn add_connex(&mut self, connex: Connex) -> usize {
        self.connexes.push(connex);
        self.connexes.len() - 1
    }

    /// All faces, connex by connex and shell by shell.
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.connexes
            .iter()
            .flat_map(|c| c.shells.iter())
            .flat_map(|s| s.faces.iter())
            .map(|sf| &sf.face)
    }
}

impl PrcWrite for BrepData {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        let bbox = match (self.content.behaviour, &self.bounding_box) {
            (0, _) => None,
            (_, Some(b)) => Some(b),
            (behaviour, None) => {
                return Err(Error::invalid(format!(
                    "brep with behaviour {} requires a bounding box",
                    behaviour
                )))
            }
        };
        enc.write_u32(PRC_TYPE_TOPO_BREP_DATA);
        self.content.write(enc)?;
        enc.write_len(self.connexes.len())?;
        for connex in &self.connexes {
            write_ref(enc, Some(connex))?;
        }
        if let Some(b) = bbox {
            b.write(enc);
        }
        Ok(())
    }
}

/// Edge of a wire body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireEdge {
    pub base: Option<BaseInfo>,
    pub curve: Option<Rc<Curve>>,
    pub trim_interval: Option<Interval>,
}

impl WireEdge {
    pub fn new(curve: Rc<Curve>) -> Self {
        Self { curve: Some(curve), ..Default::default() }
    }
}

impl PrcWrite for WireEdge {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TOPO_WIRE_EDGE);
        BaseInfo::write_optional(self.base.as_ref(), enc)?;
        write_ref(enc, self.curve.as_deref())?;
        enc.write_bool(self.trim_interval.is_some());
        if let Some(interval) = &self.trim_interval {
            interval.write(enc);
        }
        Ok(())
    }
}

/// Body made of a single wire edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleWireBody {
    pub content: ContentBody,
    pub wire_edge: Option<WireEdge>,
}

impl PrcWrite for SingleWireBody {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TOPO_SINGLE_WIRE_BODY);
        self.content.write(enc)?;
        write_ref(enc, self.wire_edge.as_ref())
    }
}

/// Any body owned by a topological context.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    SingleWire(SingleWireBody),
    Brep(BrepData),
    CompressedBrep(CompressedBrepData),
}

impl Body {
    /// Type tag reported in the geometry summary.
    pub fn serial_type(&self) -> u32 {
        match self {
            Self::SingleWire(_) => PRC_TYPE_TOPO_SINGLE_WIRE_BODY,
            Self::Brep(_) => PRC_TYPE_TOPO_BREP_DATA,
            Self::CompressedBrep(b) => b.serial_type(),
        }
    }

    /// Compression tolerance, for compressed bodies only.
    pub fn serial_tolerance(&self) -> Option<f64> {
        match self {
            Self::CompressedBrep(b) => Some(b.tolerance),
            _ => None,
        }
    }

    /// Append the graphics of every face of a B-rep body, in write order.
    pub fn collect_face_graphics(&self, out: &mut Vec<Graphics>) {
        match self {
            Self::SingleWire(_) => {}
            Self::Brep(b) => out.extend(b.faces().map(|f| f.graphics)),
            Self::CompressedBrep(b) => out.extend(b.faces.iter().map(|f| f.graphics)),
        }
    }
}

impl PrcWrite for Body {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        match self {
            Self::SingleWire(b) => b.write(enc),
            Self::Brep(b) => b.write(enc),
            Self::CompressedBrep(b) => b.write(enc),
        }
    }
}

impl From<BrepData> for Body {
    fn from(b: BrepData) -> Self {
        Self::Brep(b)
    }
}

impl From<SingleWireBody> for Body {
    fn from(b: SingleWireBody) -> Self {
        Self::SingleWire(b)
    }
}

impl From<CompressedBrepData> for Body {
    fn from(b: CompressedBrepData) -> Self {
        Self::CompressedBrep(b)
    }
}
