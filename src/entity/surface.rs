//! Surfaces: NURBS, ruled, blend and the analytic quadrics.

use std::rc::Rc;

use crate::format::{
    PRC_TYPE_SURF_BLEND01, PRC_TYPE_SURF_CYLINDER, PRC_TYPE_SURF_NURBS, PRC_TYPE_SURF_RULED,
    PRC_TYPE_SURF_SPHERE, PRC_TYPE_SURF_TORUS,
};
use crate::session::Encoder;
use crate::util::{DVec3, DVec4, Error, Result};

use super::base::BaseInfo;
use super::curve::Curve;
use super::primitives::{Transformation, UvParameterization};
use super::{write_ref, PrcWrite};

/// Header shared by all surfaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSurface {
    pub base: Option<BaseInfo>,
    pub extend_info: u32,
}

impl ContentSurface {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        BaseInfo::write_optional(self.base.as_ref(), enc)?;
        enc.write_u32(self.extend_info);
        Ok(())
    }
}

/// Placement and UV parameterization of non-NURBS surfaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceFrame {
    pub transformation: Option<Transformation>,
    pub uv: UvParameterization,
}

impl SurfaceFrame {
    fn write(&self, enc: &mut Encoder) {
        Transformation::write_optional(self.transformation.as_ref(), enc);
        self.uv.write(enc);
    }
}

// ============================================================================
// NURBS
// ============================================================================

/// Tensor-product NURBS surface.
///
/// Control points are stored u-major: point `(i, j)` lives at
/// `i * count_v + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct NurbsSurface {
    pub content: ContentSurface,
    pub is_rational: bool,
    pub degree_u: u32,
    pub degree_v: u32,
    pub control_points: Vec<DVec4>,
    pub knots_u: Vec<f64>,
    pub knots_v: Vec<f64>,
    pub knot_type: u32,
    pub surface_form: u32,
}

impl NurbsSurface {
    /// Non-rational surface from 3D control points.
    pub fn new(degree_u: u32, degree_v: u32, control_points: &[DVec3], knots_u: Vec<f64>, knots_v: Vec<f64>) -> Self {
        Self {
            content: ContentSurface::default(),
            is_rational: false,
            degree_u,
            degree_v,
            control_points: control_points.iter().map(|p| p.extend(1.0)).collect(),
            knots_u,
            knots_v,
            knot_type: 0,
            surface_form: 0,
        }
    }

    /// Control point counts per direction implied by knots and degrees.
    pub fn control_counts(&self) -> Result<(usize, usize)> {
        let count = |knots: usize, degree: u32, dir: char| {
            knots.checked_sub(degree as usize + 1).filter(|&n| n > 0).ok_or_else(|| {
                Error::invalid(format!("nurbs surface has {} {}-knots for degree {}", knots, dir, degree))
            })
        };
        Ok((count(self.knots_u.len(), self.degree_u, 'u')?, count(self.knots_v.len(), self.degree_v, 'v')?))
    }
}

impl PrcWrite for NurbsSurface {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        let (count_u, count_v) = self.control_counts()?;
        if self.control_points.len() != count_u * count_v {
            return Err(Error::invalid(format!(
                "nurbs surface expects {}x{} control points, got {}",
                count_u,
                count_v,
                self.control_points.len()
            )));
        }

        enc.write_u32(PRC_TYPE_SURF_NURBS);
        self.content.write(enc)?;
        enc.write_bool(self.is_rational);
        enc.write_u32(self.degree_u);
        enc.write_u32(self.degree_v);
        enc.write_len(count_u - 1)?;
        enc.write_len(count_v - 1)?;
        enc.write_len(self.knots_u.len() - 1)?;
        enc.write_len(self.knots_v.len() - 1)?;
        for p in &self.control_points {
            enc.write_f64(p.x);
            enc.write_f64(p.y);
            enc.write_f64(p.z);
            if self.is_rational {
                enc.write_f64(p.w);
            }
        }
        for &k in self.knots_u.iter().chain(&self.knots_v) {
            enc.write_f64(k);
        }
        enc.write_u32(self.knot_type);
        enc.write_u32(self.surface_form);
        Ok(())
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Any surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    Nurbs(NurbsSurface),
    Ruled {
        content: ContentSurface,
        frame: SurfaceFrame,
        first: Option<Rc<Curve>>,
        second: Option<Rc<Curve>>,
    },
    Blend01 {
        content: ContentSurface,
        frame: SurfaceFrame,
        center: Option<Rc<Curve>>,
        origin: Option<Rc<Curve>>,
        tangent: Option<Rc<Curve>>,
    },
    Sphere {
        content: ContentSurface,
        frame: SurfaceFrame,
        radius: f64,
    },
    Cylinder {
        content: ContentSurface,
        frame: SurfaceFrame,
        radius: f64,
    },
    Torus {
        content: ContentSurface,
        frame: SurfaceFrame,
        major_radius: f64,
        minor_radius: f64,
    },
}

impl Surface {
    /// Sphere of `radius` around `center`.
    pub fn sphere(center: DVec3, radius: f64) -> Self {
        Self::Sphere { content: ContentSurface::default(), frame: placed_at(center), radius }
    }

    /// Cylinder of `radius` along the z axis through `origin`.
    pub fn cylinder(origin: DVec3, radius: f64) -> Self {
        Self::Cylinder { content: ContentSurface::default(), frame: placed_at(origin), radius }
    }

    /// Torus around the z axis through `center`.
    pub fn torus(center: DVec3, major_radius: f64, minor_radius: f64) -> Self {
        Self::Torus { content: ContentSurface::default(), frame: placed_at(center), major_radius, minor_radius }
    }

    /// Ruled surface between two curves.
    pub fn ruled(first: Rc<Curve>, second: Rc<Curve>) -> Self {
        Self::Ruled {
            content: ContentSurface::default(),
            frame: SurfaceFrame::default(),
            first: Some(first),
            second: Some(second),
        }
    }

    /// Type tag written first.
    pub fn type_tag(&self) -> u32 {
        match self {
            Self::Nurbs(_) => PRC_TYPE_SURF_NURBS,
            Self::Ruled { .. } => PRC_TYPE_SURF_RULED,
            Self::Blend01 { .. } => PRC_TYPE_SURF_BLEND01,
            Self::Sphere { .. } => PRC_TYPE_SURF_SPHERE,
            Self::Cylinder { .. } => PRC_TYPE_SURF_CYLINDER,
            Self::Torus { .. } => PRC_TYPE_SURF_TORUS,
        }
    }
}

fn placed_at(origin: DVec3) -> SurfaceFrame {
    let transformation = (origin != DVec3::ZERO).then(|| Transformation::translation(origin));
    SurfaceFrame { transformation, ..Default::default() }
}

impl PrcWrite for Surface {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        let (content, frame) = match self {
            Self::Nurbs(s) => return s.write(enc),
            Self::Ruled { content, frame, .. }
            | Self::Blend01 { content, frame, .. }
            | Self::Sphere { content, frame, .. }
            | Self::Cylinder { content, frame, .. }
            | Self::Torus { content, frame, .. } => (content, frame),
        };
        enc.write_u32(self.type_tag());
        content.write(enc)?;
        frame.write(enc);

        match self {
            Self::Nurbs(_) => {}
            Self::Ruled { first, second, .. } => {
                write_ref(enc, first.as_deref())?;
                write_ref(enc, second.as_deref())?;
            }
            Self::Blend01 { center, origin, tangent, .. } => {
                write_ref(enc, center.as_deref())?;
                write_ref(enc, origin.as_deref())?;
                write_ref(enc, tangent.as_deref())?;
            }
            Self::Sphere { radius, .. } | Self::Cylinder { radius, .. } => enc.write_f64(*radius),
            Self::Torus { major_radius, minor_radius, .. } => {
                enc.write_f64(*major_radius);
                enc.write_f64(*minor_radius);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{PRC_TYPE_CRV_CIRCLE, PRC_TYPE_ROOT};
    use crate::stream::BitReader;

    fn bilinear(points: &[DVec3]) -> NurbsSurface {
        NurbsSurface::new(1, 1, points, vec![0.0, 0.0, 1.0, 1.0], vec![0.0, 0.0, 1.0, 1.0])
    }

    #[test]
    fn test_nurbs_surface_header() {
        let pts = [DVec3::ZERO, DVec3::Y, DVec3::X, DVec3::new(1.0, 1.0, 0.0)];
        let mut enc = Encoder::new();
        bilinear(&pts).write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_SURF_NURBS);
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 0);
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 1);
        // highest control point index = (knots - 1) - degree - 1
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 3);
        assert_eq!(r.read_u32().unwrap(), 3);
        for p in pts {
            assert_eq!(r.read_f64().unwrap(), p.x);
            assert_eq!(r.read_f64().unwrap(), p.y);
            assert_eq!(r.read_f64().unwrap(), p.z);
        }
        for _ in 0..8 {
            r.read_f64().unwrap();
        }
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_nurbs_surface_count_mismatch() {
        let surf = bilinear(&[DVec3::ZERO, DVec3::X, DVec3::Y]);
        assert!(matches!(surf.write(&mut Encoder::new()), Err(Error::InvalidEntity(_))));

        let mut short = bilinear(&[DVec3::ZERO; 4]);
        short.knots_u = vec![0.0, 1.0];
        assert!(short.write(&mut Encoder::new()).is_err());
    }

    #[test]
    fn test_sphere_layout() {
        let mut enc = Encoder::new();
        Surface::sphere(DVec3::new(0.0, 0.0, 5.0), 2.5).write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_SURF_SPHERE);
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 0);
        assert!(r.read_bool().unwrap());
        r.read_u8().unwrap();
        for _ in 0..3 {
            r.read_f64().unwrap();
        }
        assert!(!r.read_bool().unwrap());
        for _ in 0..8 {
            r.read_f64().unwrap();
        }
        assert_eq!(r.read_f64().unwrap(), 2.5);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_blend_refs_in_order() {
        let surf = Surface::Blend01 {
            content: ContentSurface::default(),
            frame: SurfaceFrame::default(),
            center: Some(Rc::new(Curve::circle(1.0))),
            origin: None,
            tangent: None,
        };
        let mut enc = Encoder::new();
        surf.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_SURF_BLEND01);
        r.read_bool().unwrap();
        r.read_u32().unwrap();
        r.read_bool().unwrap();
        r.read_bool().unwrap();
        for _ in 0..8 {
            r.read_f64().unwrap();
        }
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_CRV_CIRCLE);
        r.read_bool().unwrap();
        r.read_u32().unwrap();
        r.read_bool().unwrap();
        r.read_bool().unwrap();
        for _ in 0..5 {
            r.read_f64().unwrap();
        }
        for _ in 0..2 {
            assert!(!r.read_bool().unwrap());
            assert_eq!(r.read_u32().unwrap(), PRC_TYPE_ROOT);
        }
        assert_eq!(r.remaining(), 0);
    }
}
