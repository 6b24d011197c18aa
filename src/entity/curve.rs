//! Curves: NURBS, polyline, circle and composite.

use std::rc::Rc;

use crate::format::{PRC_TYPE_CRV_CIRCLE, PRC_TYPE_CRV_COMPOSITE, PRC_TYPE_CRV_NURBS, PRC_TYPE_CRV_POLYLINE};
use crate::session::Encoder;
use crate::util::{DVec3, DVec4, Error, Result};

use super::base::BaseInfo;
use super::primitives::{write_vec2, write_vec3, Parameterization, Transformation};
use super::{write_ref, PrcWrite};

/// Header shared by all curves.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentCurve {
    pub base: Option<BaseInfo>,
    pub extend_info: u32,
    pub is_3d: bool,
}

impl Default for ContentCurve {
    fn default() -> Self {
        Self { base: None, extend_info: 0, is_3d: true }
    }
}

impl ContentCurve {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        BaseInfo::write_optional(self.base.as_ref(), enc)?;
        enc.write_u32(self.extend_info);
        enc.write_bool(self.is_3d);
        Ok(())
    }
}

/// Placement and parameterization of analytic curves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveFrame {
    pub transformation: Option<Transformation>,
    pub parameterization: Parameterization,
}

impl CurveFrame {
    fn write(&self, enc: &mut Encoder) {
        Transformation::write_optional(self.transformation.as_ref(), enc);
        self.parameterization.write(enc);
    }
}

// ============================================================================
// Curve types
// ============================================================================

/// Non-uniform rational B-spline curve.
///
/// Control points carry the weight in `w`, only written for rational curves.
#[derive(Debug, Clone, PartialEq)]
pub struct NurbsCurve {
    pub content: ContentCurve,
    pub is_rational: bool,
    pub degree: u32,
    pub control_points: Vec<DVec4>,
    pub knots: Vec<f64>,
    pub knot_type: u32,
    pub curve_form: u32,
}

impl NurbsCurve {
    /// Non-rational curve from 3D control points.
    pub fn new(degree: u32, control_points: &[DVec3], knots: Vec<f64>) -> Self {
        Self {
            content: ContentCurve::default(),
            is_rational: false,
            degree,
            control_points: control_points.iter().map(|p| p.extend(1.0)).collect(),
            knots,
            knot_type: 0,
            curve_form: 0,
        }
    }

    fn validate(&self) -> Result<()> {
        let expected = self.control_points.len() + self.degree as usize + 1;
        if self.control_points.is_empty() || self.knots.len() != expected {
            return Err(Error::invalid(format!(
                "nurbs curve of degree {} with {} control points needs {} knots, got {}",
                self.degree,
                self.control_points.len(),
                expected,
                self.knots.len()
            )));
        }
        Ok(())
    }
}

impl PrcWrite for NurbsCurve {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        self.validate()?;
        enc.write_u32(PRC_TYPE_CRV_NURBS);
        self.content.write(enc)?;
        enc.write_bool(self.is_rational);
        enc.write_u32(self.degree);
        enc.write_len(self.control_points.len() - 1)?;
        enc.write_len(self.knots.len() - 1)?;
        for p in &self.control_points {
            enc.write_f64(p.x);
            enc.write_f64(p.y);
            if self.content.is_3d {
                enc.write_f64(p.z);
            }
            if self.is_rational {
                enc.write_f64(p.w);
            }
        }
        for &k in &self.knots {
            enc.write_f64(k);
        }
        enc.write_u32(self.knot_type);
        enc.write_u32(self.curve_form);
        Ok(())
    }
}

/// Piecewise linear curve. 2D polylines write the x/y of each point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyLine {
    pub content: ContentCurve,
    pub frame: CurveFrame,
    pub points: Vec<DVec3>,
}

impl PrcWrite for PolyLine {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_CRV_POLYLINE);
        self.content.write(enc)?;
        self.frame.write(enc);
        enc.write_len(self.points.len())?;
        for &p in &self.points {
            if self.content.is_3d {
                write_vec3(enc, p);
            } else {
                write_vec2(enc, p.truncate());
            }
        }
        Ok(())
    }
}

/// Circle of `radius` in the frame's xy plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub content: ContentCurve,
    pub frame: CurveFrame,
    pub radius: f64,
}

impl PrcWrite for Circle {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_CRV_CIRCLE);
        self.content.write(enc)?;
        self.frame.write(enc);
        enc.write_f64(self.radius);
        Ok(())
    }
}

/// One sub-curve of a composite, with its orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSegment {
    pub curve: Option<Rc<Curve>>,
    pub same_sense: bool,
}

impl CompositeSegment {
    pub fn new(curve: Rc<Curve>, same_sense: bool) -> Self {
        Self { curve: Some(curve), same_sense }
    }
}

/// Chain of sub-curves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
    pub content: ContentCurve,
    pub frame: CurveFrame,
    pub segments: Vec<CompositeSegment>,
    pub is_closed: bool,
}

impl PrcWrite for Composite {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_CRV_COMPOSITE);
        self.content.write(enc)?;
        self.frame.write(enc);
        enc.write_len(self.segments.len())?;
        for seg in &self.segments {
            write_ref(enc, seg.curve.as_deref())?;
            enc.write_bool(seg.same_sense);
        }
        enc.write_bool(self.is_closed);
        Ok(())
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Any curve.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Nurbs(NurbsCurve),
    PolyLine(PolyLine),
    Circle(Circle),
    Composite(Composite),
}

impl Curve {
    /// Circle of `radius` around the origin.
    pub fn circle(radius: f64) -> Self {
        Self::Circle(Circle { content: ContentCurve::default(), frame: CurveFrame::default(), radius })
    }

    /// 3D polyline through `points`.
    pub fn polyline(points: Vec<DVec3>) -> Self {
        Self::PolyLine(PolyLine { points, ..Default::default() })
    }

    /// Type tag written first.
    pub fn type_tag(&self) -> u32 {
        match self {
            Self::Nurbs(_) => PRC_TYPE_CRV_NURBS,
            Self::PolyLine(_) => PRC_TYPE_CRV_POLYLINE,
            Self::Circle(_) => PRC_TYPE_CRV_CIRCLE,
            Self::Composite(_) => PRC_TYPE_CRV_COMPOSITE,
        }
    }

    pub fn content(&self) -> &ContentCurve {
        match self {
            Self::Nurbs(c) => &c.content,
            Self::PolyLine(c) => &c.content,
            Self::Circle(c) => &c.content,
            Self::Composite(c) => &c.content,
        }
    }
}

impl PrcWrite for Curve {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        match self {
            Self::Nurbs(c) => c.write(enc),
            Self::PolyLine(c) => c.write(enc),
            Self::Circle(c) => c.write(enc),
            Self::Composite(c) => c.write(enc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PRC_TYPE_ROOT;
    use crate::stream::BitReader;

    fn skip_content(r: &mut BitReader) -> bool {
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 0);
        r.read_bool().unwrap()
    }

    #[test]
    fn test_nurbs_curve_layout() {
        let pts = [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0)];
        let curve = NurbsCurve::new(2, &pts, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let mut enc = Encoder::new();
        curve.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_CRV_NURBS);
        assert!(skip_content(&mut r));
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 2);
        assert_eq!(r.read_u32().unwrap(), 2);
        assert_eq!(r.read_u32().unwrap(), 5);
        for p in pts {
            assert_eq!(r.read_f64().unwrap(), p.x);
            assert_eq!(r.read_f64().unwrap(), p.y);
            assert_eq!(r.read_f64().unwrap(), p.z);
        }
        for _ in 0..6 {
            r.read_f64().unwrap();
        }
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_nurbs_curve_knot_mismatch() {
        let curve = NurbsCurve::new(1, &[DVec3::ZERO, DVec3::X], vec![0.0, 1.0]);
        assert!(matches!(curve.write(&mut Encoder::new()), Err(Error::InvalidEntity(_))));
    }

    #[test]
    fn test_polyline_2d_points() {
        let line = PolyLine {
            content: ContentCurve { is_3d: false, ..Default::default() },
            points: vec![DVec3::new(1.0, 2.0, 9.0), DVec3::new(3.0, 4.0, 9.0)],
            ..Default::default()
        };
        let mut enc = Encoder::new();
        line.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_CRV_POLYLINE);
        assert!(!skip_content(&mut r));
        assert!(!r.read_bool().unwrap());
        for _ in 0..4 {
            r.read_f64().unwrap();
        }
        assert_eq!(r.read_u32().unwrap(), 2);
        assert_eq!(r.read_f64().unwrap(), 1.0);
        assert_eq!(r.read_f64().unwrap(), 2.0);
        assert_eq!(r.read_f64().unwrap(), 3.0);
        assert_eq!(r.read_f64().unwrap(), 4.0);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_composite_absent_segment() {
        let shared = Rc::new(Curve::circle(1.0));
        let composite = Composite {
            segments: vec![
                CompositeSegment::new(shared.clone(), true),
                CompositeSegment { curve: None, same_sense: false },
            ],
            is_closed: true,
            ..Default::default()
        };
        let mut enc = Encoder::new();
        composite.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_CRV_COMPOSITE);
        skip_content(&mut r);
        assert!(!r.read_bool().unwrap());
        for _ in 0..4 {
            r.read_f64().unwrap();
        }
        assert_eq!(r.read_u32().unwrap(), 2);

        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_CRV_CIRCLE);
        skip_content(&mut r);
        assert!(!r.read_bool().unwrap());
        for _ in 0..4 {
            r.read_f64().unwrap();
        }
        assert_eq!(r.read_f64().unwrap(), 1.0);
        assert!(r.read_bool().unwrap());

        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_ROOT);
        assert!(!r.read_bool().unwrap());
        assert!(r.read_bool().unwrap());
        assert_eq!(r.remaining(), 0);
        assert_eq!(Rc::strong_count(&shared), 2);
    }
}
