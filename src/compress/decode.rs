//! Reader for compressed faces and compressed B-rep bodies.
//!
//! Replays the prediction rules of [`CompressedNurbs`](super::CompressedNurbs)
//! so that the rebuilt grid equals the encoder's decoded grid bit for bit.

use crate::format::{COMPRESSED_ANA_NURBS, PRC_TYPE_TOPO_BREP_DATA_COMPRESS};
use crate::stream::BitReader;
use crate::util::{DVec3, Error, Result};

use super::nurbs::{
    multiplicity_bits, quantization_step, ControlGrid, LocalFrame, PointType, KNOTS_PER_DIRECTION,
    WIDTH_FIELD_BITS,
};

/// One face read back from a compressed shell.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFace {
    pub orientation: bool,
    pub degree: u32,
    pub control_points: ControlGrid,
}

/// Compressed body read back from a stream.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBrep {
    pub behaviour: u8,
    pub tolerance: f64,
    pub faces: Vec<DecodedFace>,
}

fn expect(cond: bool, what: &str) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(Error::stream(what))
    }
}

fn read_knot_description(r: &mut BitReader<'_>, degree: u32) -> Result<()> {
    let knots = r.read_unsigned_bits(16)? + 2;
    expect(knots == KNOTS_PER_DIRECTION, "only single-span knot vectors are supported")?;
    expect(!r.read_bool()?, "first knot multiplicity flag must be unset")?;
    let multiplicity = r.read_unsigned_bits(multiplicity_bits(degree))?;
    expect(multiplicity == degree + 1, "first knot multiplicity must be degree + 1")?;
    expect(r.read_bool()?, "remaining multiplicities must be marked stored")
}

fn read_triple(r: &mut BitReader<'_>, bits: u32) -> Result<[i32; 3]> {
    Ok([r.read_signed_bits(bits)?, r.read_signed_bits(bits)?, r.read_signed_bits(bits)?])
}

#[inline]
fn units(q: i32, step: f64) -> f64 {
    q as f64 * step
}

/// Read a compressed NURBS patch, from the degree fields to the trailing
/// parameterization bits. Returns the degree and the rebuilt control grid.
pub fn decode_compressed_nurbs(r: &mut BitReader<'_>, tolerance: f64) -> Result<(u32, ControlGrid)> {
    let step = quantization_step(tolerance);
    let degree = r.read_unsigned_bits(5)?;
    expect(r.read_unsigned_bits(5)? == degree, "u and v degrees must match")?;
    read_knot_description(r, degree)?;
    read_knot_description(r, degree)?;
    expect(!r.read_bool()? && !r.read_bool()?, "closed patches are not supported")?;

    let isomin_bits = r.read_unsigned_bits(WIDTH_FIELD_BITS)?;
    let rest_bits = r.read_unsigned_bits(WIDTH_FIELD_BITS)?;
    let anchor = DVec3::new(r.read_f64()?, r.read_f64()?, r.read_f64()?);

    let n = degree as usize + 1;
    let at = |i: usize, j: usize| i * n + j;
    let mut p: ControlGrid = std::iter::repeat(DVec3::ZERO).take(n * n).collect();
    p[0] = anchor;

    for j in 1..n {
        let q = read_triple(r, isomin_bits + 1)?;
        p[at(0, j)] = p[at(0, j - 1)] + DVec3::new(units(q[0], step), units(q[1], step), units(q[2], step));
    }
    for i in 1..n {
        let q = read_triple(r, isomin_bits + 1)?;
        p[at(i, 0)] = p[at(i - 1, 0)] + DVec3::new(units(q[0], step), units(q[1], step), units(q[2], step));
    }

    for i in 1..n {
        for j in 1..n {
            let base = p[at(i - 1, j - 1)];
            let v = p[at(i - 1, j)] - base;
            let u = p[at(i, j - 1)] - base;
            let predicted = base + u + v;

            let kind = PointType::from_code(r.read_unsigned_bits(2)?)?;
            let mut q = [0i32; 3];
            for &c in kind.stored_components() {
                q[c] = r.read_signed_bits(rest_bits + 1)?;
            }

            p[at(i, j)] = match kind {
                PointType::Predicted => predicted,
                PointType::Full => {
                    predicted + DVec3::new(units(q[0], step), units(q[1], step), units(q[2], step))
                }
                PointType::Normal | PointType::Tangent => {
                    let frame = LocalFrame::from_edges(u, v)
                        .ok_or_else(|| Error::stream("frame-relative residual on a degenerate frame"))?;
                    if kind == PointType::Normal {
                        predicted + frame.ne * units(q[2], step)
                    } else {
                        predicted + frame.ue * units(q[0], step) + frame.nue * units(q[1], step)
                    }
                }
            };
        }
    }

    expect(r.read_bool()? && r.read_bool()?, "only default parameterization is supported")?;
    expect(!r.read_bool()?, "rational patches are not supported")?;
    Ok((degree, p))
}

/// Read one compressed face: entity header then the patch.
pub fn decode_compressed_face(r: &mut BitReader<'_>, tolerance: f64) -> Result<DecodedFace> {
    expect(!r.read_bool()?, "compressed curves are not supported")?;
    let code = r.read_unsigned_bits(4)?;
    if code != COMPRESSED_ANA_NURBS {
        return Err(Error::stream(format!("unsupported compressed entity code {}", code)));
    }
    let orientation = r.read_bool()?;
    expect(!r.read_bool()?, "trimmed compressed faces are not supported")?;
    let (degree, control_points) = decode_compressed_nurbs(r, tolerance)?;
    Ok(DecodedFace { orientation, degree, control_points })
}

/// Read a whole compressed B-rep body written without base information.
pub fn decode_compressed_brep(r: &mut BitReader<'_>) -> Result<DecodedBrep> {
    let tag = r.read_u32()?;
    if tag != PRC_TYPE_TOPO_BREP_DATA_COMPRESS {
        return Err(Error::stream(format!("expected compressed brep tag, found {}", tag)));
    }
    expect(!r.read_bool()?, "base information is not supported")?;
    let behaviour = r.read_u8()?;
    let tolerance = r.read_f64()?;

    let ref_bits = r.read_number_of_bits_then_unsigned()?;
    expect(r.read_unsigned_bits(ref_bits)? == 0, "iso vertices are not supported")?;
    expect(r.read_unsigned_bits(ref_bits)? == 0, "iso edges are not supported")?;
    expect(r.read_bool()?, "only a single shell is supported")?;

    let count = if r.read_bool()? { 1 } else { r.read_number_of_bits_then_unsigned()? };
    let faces = (0..count).map(|_| decode_compressed_face(r, tolerance)).collect::<Result<Vec<_>>>()?;
    for _ in 0..count {
        expect(!r.read_bool()?, "iso faces are not supported")?;
    }
    for _ in 0..count {
        expect(!r.read_bool()?, "face base information is not supported")?;
    }
    Ok(DecodedBrep { behaviour, tolerance, faces })
}
