//! Control-point compression of single-span NURBS patches.
//!
//! A patch of degree `d` has a `(d+1) x (d+1)` control grid. The first row
//! and first column are stored as quantized deltas from their predecessor.
//! Every interior point is predicted from its three already-decoded
//! neighbours (parallelogram rule) and only the residual is stored, expressed
//! in the local frame spanned by the neighbour edges when that saves bits.
//!
//! Quantization always works on decoded values, so the decoder rebuilds
//! exactly the grid the encoder saw and errors never accumulate.

use smallvec::SmallVec;
use tracing::trace;

use crate::session::Encoder;
use crate::stream::bits_for_triple;
use crate::util::{
    checked_length, quantize, quantize_vec, round_to, round_vec, try_unit, DVec3, Error, Result, NORMALIZE_EPSILON,
};

/// Knots per direction; one span with clamped ends.
pub const KNOTS_PER_DIRECTION: u32 = 4;

/// Largest degree the 5-bit degree fields can carry.
pub const MAX_DEGREE: u32 = 31;

/// Bits of the width fields written before the residuals.
pub const WIDTH_FIELD_BITS: u32 = 20;

/// Quantization step for a brep tolerance.
#[inline]
pub fn quantization_step(tolerance: f64) -> f64 {
    tolerance / 5.0
}

/// Width of the first-knot multiplicity field.
#[inline]
pub fn multiplicity_bits(degree: u32) -> u32 {
    if degree == 0 {
        2
    } else {
        // ceil(log2(degree + 2))
        32 - (degree + 1).leading_zeros()
    }
}

/// Grid of `(degree + 1)^2` points, u-major.
pub type ControlGrid = SmallVec<[DVec3; 16]>;

/// Encoding chosen for an interior control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointType {
    /// Prediction is within tolerance; nothing stored.
    Predicted,
    /// Residual along the local normal only.
    Normal,
    /// Residual in the local tangent plane only.
    Tangent,
    /// Full cartesian residual.
    Full,
}

impl PointType {
    /// 2-bit wire code.
    pub fn code(self) -> u32 {
        match self {
            Self::Predicted => 0,
            Self::Normal => 1,
            Self::Tangent => 2,
            Self::Full => 3,
        }
    }

    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Self::Predicted),
            1 => Ok(Self::Normal),
            2 => Ok(Self::Tangent),
            3 => Ok(Self::Full),
            _ => Err(Error::stream(format!("invalid control point type {}", code))),
        }
    }

    /// Indices of the residual components that are stored.
    pub fn stored_components(self) -> &'static [usize] {
        match self {
            Self::Predicted => &[],
            Self::Normal => &[2],
            Self::Tangent => &[0, 1],
            Self::Full => &[0, 1, 2],
        }
    }
}

/// Local frame of an interior point: tangent `ue`, normal `ne`, binormal `ne x ue`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalFrame {
    pub ue: DVec3,
    pub ne: DVec3,
    pub nue: DVec3,
}

impl LocalFrame {
    /// Frame from the neighbour edges, `None` if they are degenerate.
    pub fn from_edges(u: DVec3, v: DVec3) -> Option<Self> {
        if checked_length(v).map_or(true, |len| len < NORMALIZE_EPSILON) {
            return None;
        }
        let ue = try_unit(u)?;
        let ne = try_unit(u.cross(v))?;
        Some(Self { ue, ne, nue: ne.cross(ue) })
    }
}

/// Fail fast on patches the encoding cannot represent.
pub fn validate_patch(degree: u32, point_count: usize, tolerance: f64) -> Result<()> {
    if degree > MAX_DEGREE {
        return Err(Error::UnsupportedPatch(format!("degree {} exceeds {}", degree, MAX_DEGREE)));
    }
    let n = degree as usize + 1;
    if point_count != n * n {
        return Err(Error::UnsupportedPatch(format!(
            "degree {} patch needs {} control points, got {}",
            degree,
            n * n,
            point_count
        )));
    }
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(Error::UnsupportedPatch(format!("tolerance {} must be positive and finite", tolerance)));
    }
    Ok(())
}

fn check_range(value: f64, step: f64) -> Result<()> {
    // Anything at or past i32 range would saturate silently.
    if !(value.abs() / step < i32::MAX as f64) {
        return Err(Error::UnsupportedPatch(format!("coordinate delta {} out of range for step {}", value, step)));
    }
    Ok(())
}

fn units(value: f64, step: f64) -> Result<i32> {
    check_range(value, step)?;
    Ok(quantize(value, step))
}

fn units_vec(v: DVec3, step: f64) -> Result<[i32; 3]> {
    for c in v.to_array() {
        check_range(c, step)?;
    }
    Ok(quantize_vec(v, step))
}

// ============================================================================
// Encoder
// ============================================================================

/// Quantized form of one patch, ready to write.
#[derive(Debug, Clone)]
pub struct CompressedNurbs {
    pub degree: u32,
    pub step: f64,
    pub anchor: DVec3,
    /// Width of boundary residuals (written as `isomin_bits + 1`).
    pub isomin_bits: u32,
    /// Width of interior residuals (written as `rest_bits + 1`).
    pub rest_bits: u32,
    /// First row (j = 1..) then first column (i = 1..).
    pub boundary: SmallVec<[[i32; 3]; 8]>,
    /// Interior points, row-major.
    pub interior: SmallVec<[(PointType, [i32; 3]); 16]>,
    /// Grid as the decoder will rebuild it.
    pub decoded: ControlGrid,
}

impl CompressedNurbs {
    /// Quantize `control_points` (u-major, `(degree+1)^2` of them).
    pub fn compress(degree: u32, control_points: &[DVec3], tolerance: f64) -> Result<Self> {
        validate_patch(degree, control_points.len(), tolerance)?;
        let step = quantization_step(tolerance);
        let n = degree as usize + 1;
        let at = |i: usize, j: usize| i * n + j;

        let mut p: ControlGrid = control_points.iter().copied().collect();
        let mut boundary = SmallVec::new();
        let mut isomin_bits = 1;

        for j in 1..n {
            let delta = p[at(0, j)] - p[at(0, j - 1)];
            let q = units_vec(delta, step)?;
            p[at(0, j)] = p[at(0, j - 1)] + round_vec(delta, step);
            isomin_bits = isomin_bits.max(bits_for_triple(q));
            boundary.push(q);
        }
        for i in 1..n {
            let delta = p[at(i, 0)] - p[at(i - 1, 0)];
            let q = units_vec(delta, step)?;
            p[at(i, 0)] = p[at(i - 1, 0)] + round_vec(delta, step);
            isomin_bits = isomin_bits.max(bits_for_triple(q));
            boundary.push(q);
        }

        let mut interior = SmallVec::new();
        let mut rest_bits = 1;
        for i in 1..n {
            for j in 1..n {
                let base = p[at(i - 1, j - 1)];
                let v = p[at(i - 1, j)] - base;
                let u = p[at(i, j - 1)] - base;
                let predicted = base + u + v;
                let residual = p[at(i, j)] - predicted;

                let (kind, q, decoded) = encode_interior(residual, u, v, predicted, step)?;
                p[at(i, j)] = decoded;
                rest_bits = rest_bits.max(bits_for_triple(q));
                interior.push((kind, q));
            }
        }

        // Matches the widths consuming viewers expect.
        if rest_bits == 2 {
            rest_bits = 1;
        }
        trace!(degree, isomin_bits, rest_bits, "compressed patch widths");

        Ok(Self { degree, step, anchor: p[0], isomin_bits, rest_bits, boundary, interior, decoded: p })
    }

    /// Write the patch: degrees, knot description, widths, anchor, residuals.
    pub fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_unsigned_bits(self.degree, 5)?;
        enc.write_unsigned_bits(self.degree, 5)?;
        for _ in 0..2 {
            enc.write_unsigned_bits(KNOTS_PER_DIRECTION - 2, 16)?;
            enc.write_bool(false);
            enc.write_unsigned_bits(self.degree + 1, multiplicity_bits(self.degree))?;
            enc.write_bool(true);
        }
        // closed in u, closed in v
        enc.write_bool(false);
        enc.write_bool(false);

        enc.write_unsigned_bits(self.isomin_bits, WIDTH_FIELD_BITS)?;
        enc.write_unsigned_bits(self.rest_bits, WIDTH_FIELD_BITS)?;
        enc.write_f64(self.anchor.x);
        enc.write_f64(self.anchor.y);
        enc.write_f64(self.anchor.z);

        for q in &self.boundary {
            for &c in q {
                enc.write_signed_bits(c, self.isomin_bits + 1)?;
            }
        }
        for (kind, q) in &self.interior {
            enc.write_unsigned_bits(kind.code(), 2)?;
            for &c in kind.stored_components() {
                enc.write_signed_bits(q[c], self.rest_bits + 1)?;
            }
        }

        // default u and v parameterization, not rational
        enc.write_bool(true);
        enc.write_bool(true);
        enc.write_bool(false);
        Ok(())
    }
}

/// Classify one interior residual. Returns its type, stored components and
/// the decoded point.
fn encode_interior(
    residual: DVec3,
    u: DVec3,
    v: DVec3,
    predicted: DVec3,
    step: f64,
) -> Result<(PointType, [i32; 3], DVec3)> {
    let Some(len) = checked_length(residual) else {
        return Err(Error::UnsupportedPatch(format!("non-finite interior residual {}", residual)));
    };
    if len < step {
        return Ok((PointType::Predicted, [0; 3], predicted));
    }

    if let Some(frame) = LocalFrame::from_edges(u, v) {
        let x = residual.dot(frame.ue);
        let y = residual.dot(frame.nue);
        let z = residual.dot(frame.ne);
        if x * x + y * y < step * step {
            let qz = units(z, step)?;
            return Ok((PointType::Normal, [0, 0, qz], predicted + frame.ne * round_to(z, step)));
        }
        if z.abs() < step / 2.0 {
            let qx = units(x, step)?;
            let qy = units(y, step)?;
            let decoded = predicted + frame.ue * round_to(x, step) + frame.nue * round_to(y, step);
            return Ok((PointType::Tangent, [qx, qy, 0], decoded));
        }
    }

    let q = units_vec(residual, step)?;
    Ok((PointType::Full, q, predicted + round_vec(residual, step)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(degree: u32, f: impl Fn(f64, f64) -> DVec3) -> Vec<DVec3> {
        let n = degree + 1;
        let d = degree.max(1) as f64;
        (0..n).flat_map(|i| (0..n).map(move |j| (i, j))).map(|(i, j)| f(i as f64 / d, j as f64 / d)).collect()
    }

    #[test]
    fn test_multiplicity_bits() {
        assert_eq!(multiplicity_bits(0), 2);
        assert_eq!(multiplicity_bits(1), 2);
        assert_eq!(multiplicity_bits(2), 2);
        assert_eq!(multiplicity_bits(3), 3);
        assert_eq!(multiplicity_bits(6), 3);
        assert_eq!(multiplicity_bits(7), 4);
        assert_eq!(multiplicity_bits(31), 6);
    }

    #[test]
    fn test_planar_patch_is_predicted() {
        let pts = grid(3, |u, v| DVec3::new(u, v, 0.0));
        let c = CompressedNurbs::compress(3, &pts, 1e-3).unwrap();
        assert!(c.interior.iter().all(|(k, _)| *k == PointType::Predicted));
        // all-zero residual triples are 2 bits wide, then folded to 1
        assert_eq!(c.rest_bits, 1);
        assert_eq!(c.boundary.len(), 6);
        assert_eq!(c.interior.len(), 9);
    }

    #[test]
    fn test_bump_is_normal_residual() {
        let mut pts = grid(2, |u, v| DVec3::new(u, v, 0.0));
        pts[4].z = 0.01;
        let c = CompressedNurbs::compress(2, &pts, 1e-3).unwrap();
        assert_eq!(c.interior[0].0, PointType::Normal);
        assert_eq!(c.interior[0].1, [0, 0, 50]);
        assert!((c.decoded[4] - pts[4]).length() < 1e-3);
    }

    #[test]
    fn test_in_plane_shift_is_tangent_residual() {
        let mut pts = grid(1, |u, v| DVec3::new(u, v, 0.0));
        pts[3] += DVec3::new(0.05, 0.02, 0.0);
        let c = CompressedNurbs::compress(1, &pts, 1e-2).unwrap();
        assert_eq!(c.interior[0].0, PointType::Tangent);
        assert_eq!(c.interior[0].1[2], 0);
    }

    #[test]
    fn test_collapsed_edge_is_full_residual() {
        let mut pts = grid(1, |u, v| DVec3::new(u, v, 0.0));
        // zero-length v edge, so no local frame exists
        pts[1] = pts[0];
        pts[3] = DVec3::new(1.0, 0.5, 0.3);
        let c = CompressedNurbs::compress(1, &pts, 1e-3).unwrap();
        assert_eq!(c.interior[0].0, PointType::Full);
        assert!((c.decoded[3] - pts[3]).length() < 1e-3);
    }

    #[test]
    fn test_rest_width_quirk_only_folds_two() {
        let mut pts = grid(1, |u, v| DVec3::new(u, v, 0.0));
        pts[3].z = 1.0;
        let c = CompressedNurbs::compress(1, &pts, 1e-3).unwrap();
        assert_eq!(c.interior[0].0, PointType::Normal);
        assert!(c.rest_bits > 2);
    }

    #[test]
    fn test_preconditions() {
        let pts = grid(2, |u, v| DVec3::new(u, v, 0.0));
        assert!(matches!(CompressedNurbs::compress(3, &pts, 1e-3), Err(Error::UnsupportedPatch(_))));
        assert!(CompressedNurbs::compress(2, &pts, 0.0).is_err());
        assert!(CompressedNurbs::compress(2, &pts, f64::NAN).is_err());
        assert!(validate_patch(32, 33 * 33, 1.0).is_err());

        let mut bad = pts.clone();
        bad[1].x = f64::INFINITY;
        assert!(CompressedNurbs::compress(2, &bad, 1e-3).is_err());
    }

    #[test]
    fn test_non_finite_interior_fails() {
        let mut pts = grid(1, |u, v| DVec3::new(u, v, 0.0));
        pts[3] = DVec3::new(f64::NAN, 1.0, 1.0);
        assert!(matches!(CompressedNurbs::compress(1, &pts, 1e-3), Err(Error::UnsupportedPatch(_))));

        let mut pts = grid(2, |u, v| DVec3::new(u, v, 0.0));
        pts[8].z = f64::NEG_INFINITY;
        assert!(matches!(CompressedNurbs::compress(2, &pts, 1e-3), Err(Error::UnsupportedPatch(_))));
    }

    #[test]
    fn test_write_width_fields() {
        let pts = grid(1, |u, v| DVec3::new(u, v, 0.0));
        let c = CompressedNurbs::compress(1, &pts, 0.5).unwrap();
        let mut enc = Encoder::new();
        c.write(&mut enc).unwrap();

        let boundary_bits = 6 * u64::from(c.isomin_bits + 1);
        let interior_bits = 2;
        let expected = 10 + 2 * (16 + 1 + 2 + 1) + 2 + 40 + 192 + boundary_bits + interior_bits + 3;
        assert_eq!(enc.stream().bit_len(), expected);
    }
}
