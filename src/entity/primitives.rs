//! Geometric primitives shared by curves, surfaces and topology.

use crate::format::{
    transformation as flags, PRC_TYPE_MISC_CARTESIAN_TRANSFORMATION, PRC_TYPE_MISC_GENERAL_TRANSFORMATION,
};
use crate::session::Encoder;
use crate::util::{DMat4, DVec2, DVec3, Result};

use super::PrcWrite;

/// Write a 2D vector as two doubles.
#[inline]
pub fn write_vec2(enc: &mut Encoder, v: DVec2) {
    enc.write_f64(v.x);
    enc.write_f64(v.y);
}

/// Write a 3D vector as three doubles.
#[inline]
pub fn write_vec3(enc: &mut Encoder, v: DVec3) {
    enc.write_f64(v.x);
    enc.write_f64(v.y);
    enc.write_f64(v.z);
}

// ============================================================================
// Extents
// ============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all `points`, `None` if there are none.
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self::new(*first, *first);
        for p in rest {
            bbox.min = bbox.min.min(*p);
            bbox.max = bbox.max.max(*p);
        }
        Some(bbox)
    }

    pub fn write(&self, enc: &mut Encoder) {
        write_vec3(enc, self.min);
        write_vec3(enc, self.max);
    }
}

/// Rectangular 2D parameter domain.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Domain {
    pub min: DVec2,
    pub max: DVec2,
}

impl Domain {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn write(&self, enc: &mut Encoder) {
        write_vec2(enc, self.min);
        write_vec2(enc, self.max);
    }
}

/// 1D parameter interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn write(&self, enc: &mut Encoder) {
        enc.write_f64(self.min);
        enc.write_f64(self.max);
    }
}

/// Curve parameterization: interval plus linear remap `a * t + b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameterization {
    pub interval: Interval,
    pub coeff_a: f64,
    pub coeff_b: f64,
}

impl Default for Parameterization {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl Parameterization {
    /// Identity remap over `[min, max]`.
    pub fn new(min: f64, max: f64) -> Self {
        Self { interval: Interval::new(min, max), coeff_a: 1.0, coeff_b: 0.0 }
    }

    pub fn write(&self, enc: &mut Encoder) {
        self.interval.write(enc);
        enc.write_f64(self.coeff_a);
        enc.write_f64(self.coeff_b);
    }
}

/// Surface parameterization with optional u/v swap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvParameterization {
    pub swap_uv: bool,
    pub uv_domain: Domain,
    pub u_coeff_a: f64,
    pub v_coeff_a: f64,
    pub u_coeff_b: f64,
    pub v_coeff_b: f64,
}

impl Default for UvParameterization {
    fn default() -> Self {
        Self::new(Domain::new(DVec2::ZERO, DVec2::ONE))
    }
}

impl UvParameterization {
    /// Identity remap over `uv_domain`.
    pub fn new(uv_domain: Domain) -> Self {
        Self { swap_uv: false, uv_domain, u_coeff_a: 1.0, v_coeff_a: 1.0, u_coeff_b: 0.0, v_coeff_b: 0.0 }
    }

    pub fn write(&self, enc: &mut Encoder) {
        enc.write_bool(self.swap_uv);
        self.uv_domain.write(enc);
        enc.write_f64(self.u_coeff_a);
        enc.write_f64(self.v_coeff_a);
        enc.write_f64(self.u_coeff_b);
        enc.write_f64(self.v_coeff_b);
    }
}

// ============================================================================
// Transformations
// ============================================================================

/// Partial affine placement of a curve or surface.
///
/// Only the components flagged in `behaviour` are written. A 2D placement
/// writes the x/y parts of each vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    pub behaviour: u8,
    pub is_2d: bool,
    pub origin: DVec3,
    pub x_axis: DVec3,
    pub y_axis: DVec3,
    pub scale: f64,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            behaviour: flags::IDENTITY,
            is_2d: false,
            origin: DVec3::ZERO,
            x_axis: DVec3::X,
            y_axis: DVec3::Y,
            scale: 1.0,
        }
    }
}

impl Transformation {
    /// Pure translation.
    pub fn translation(origin: DVec3) -> Self {
        Self { behaviour: flags::TRANSLATE, origin, ..Default::default() }
    }

    /// Translation plus rotation onto the given axes.
    pub fn placement(origin: DVec3, x_axis: DVec3, y_axis: DVec3) -> Self {
        Self { behaviour: flags::TRANSLATE | flags::ROTATE, origin, x_axis, y_axis, ..Default::default() }
    }

    fn write_point(&self, enc: &mut Encoder, v: DVec3) {
        if self.is_2d {
            write_vec2(enc, v.truncate());
        } else {
            write_vec3(enc, v);
        }
    }

    /// Write the presence bit and, when present, the flagged components.
    pub fn write_optional(transform: Option<&Transformation>, enc: &mut Encoder) {
        enc.write_bool(transform.is_some());
        let Some(t) = transform else {
            return;
        };
        enc.write_u8(t.behaviour);
        if t.behaviour & flags::TRANSLATE != 0 {
            t.write_point(enc, t.origin);
        }
        if t.behaviour & flags::ROTATE != 0 {
            t.write_point(enc, t.x_axis);
            t.write_point(enc, t.y_axis);
        }
        if t.behaviour & flags::SCALE != 0 {
            enc.write_f64(t.scale);
        }
    }
}

/// Full 3D cartesian transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianTransformation3d {
    pub behaviour: u8,
    pub origin: DVec3,
    pub x: DVec3,
    pub y: DVec3,
    pub z: DVec3,
    pub scale: DVec3,
    pub uniform_scale: f64,
    /// Homogeneous row: x, y, z and origin coordinates.
    pub homogeneous: [f64; 4],
}

impl Default for CartesianTransformation3d {
    fn default() -> Self {
        Self {
            behaviour: flags::IDENTITY,
            origin: DVec3::ZERO,
            x: DVec3::X,
            y: DVec3::Y,
            z: DVec3::Z,
            scale: DVec3::ONE,
            uniform_scale: 1.0,
            homogeneous: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl PrcWrite for CartesianTransformation3d {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_MISC_CARTESIAN_TRANSFORMATION);
        enc.write_u8(self.behaviour);
        if self.behaviour & flags::TRANSLATE != 0 {
            write_vec3(enc, self.origin);
        }
        if self.behaviour & flags::NON_ORTHO != 0 {
            write_vec3(enc, self.x);
            write_vec3(enc, self.y);
            write_vec3(enc, self.z);
        } else if self.behaviour & flags::ROTATE != 0 {
            write_vec3(enc, self.x);
            write_vec3(enc, self.y);
        }
        if self.behaviour & flags::NON_UNIFORM_SCALE != 0 {
            write_vec3(enc, self.scale);
        } else if self.behaviour & flags::SCALE != 0 {
            enc.write_f64(self.uniform_scale);
        }
        if self.behaviour & flags::HOMOGENEOUS != 0 {
            for h in self.homogeneous {
                enc.write_f64(h);
            }
        }
        Ok(())
    }
}

/// Arbitrary 4x4 transformation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeneralTransformation3d {
    pub matrix: DMat4,
}

impl PrcWrite for GeneralTransformation3d {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_MISC_GENERAL_TRANSFORMATION);
        for v in self.matrix.to_cols_array() {
            enc.write_f64(v);
        }
        Ok(())
    }
}

/// Axis set of a coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transformation3d {
    Cartesian(CartesianTransformation3d),
    General(GeneralTransformation3d),
}

impl PrcWrite for Transformation3d {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        match self {
            Self::Cartesian(t) => t.write(enc),
            Self::General(t) => t.write(enc),
        }
    }
}
