//! Compressed B-rep bodies.
//!
//! A compressed body stores each face as a single-span NURBS patch whose
//! control points are quantized against the body tolerance (see [`nurbs`]).
//! Faces are written twice: once as compressed geometry inside the shell,
//! then again as their base topology header, in the same order.

mod decode;
pub mod nurbs;

pub use decode::{decode_compressed_brep, decode_compressed_face, decode_compressed_nurbs, DecodedBrep, DecodedFace};
pub use nurbs::{CompressedNurbs, ControlGrid, PointType};

use tracing::debug;

use crate::entity::{BaseInfo, ContentBody, Graphics, PrcWrite};
use crate::format::{COMPRESSED_ANA_NURBS, PRC_TYPE_TOPO_BREP_DATA_COMPRESS};
use crate::session::Encoder;
use crate::util::{DVec3, Error, Result};

/// Bits used for iso vertex and iso edge references.
const REFERENCE_BITS: u32 = 1;

/// Face of a compressed body: one patch of degree `degree` in both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedFace {
    pub base: Option<BaseInfo>,
    /// Whether the surface normal agrees with the shell.
    pub orientation: bool,
    pub degree: u32,
    /// `(degree + 1)^2` points, u-major.
    pub control_points: Vec<DVec3>,
    pub graphics: Graphics,
}

impl CompressedFace {
    pub fn new(degree: u32, control_points: Vec<DVec3>) -> Self {
        Self { base: None, orientation: true, degree, control_points, graphics: Graphics::default() }
    }

    pub fn with_graphics(mut self, graphics: Graphics) -> Self {
        self.graphics = graphics;
        self
    }

    /// Compress the control grid against a body tolerance.
    pub fn compress(&self, tolerance: f64) -> Result<CompressedNurbs> {
        CompressedNurbs::compress(self.degree, &self.control_points, tolerance)
    }

    /// Write the compressed entity header and patch.
    pub fn write_compressed(&self, enc: &mut Encoder, tolerance: f64) -> Result<()> {
        let patch = self.compress(tolerance)?;
        // is_a_curve
        enc.write_bool(false);
        enc.write_unsigned_bits(COMPRESSED_ANA_NURBS, 4)?;
        enc.write_bool(self.orientation);
        // surface_is_trimmed
        enc.write_bool(false);
        patch.write(enc)
    }
}

/// B-rep body stored with compressed faces in a single shell.
///
/// The shell pass and the base-info pass both walk `faces`, so the declared
/// face count and the number of records in each pass are equal by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedBrepData {
    pub content: ContentBody,
    pub tolerance: f64,
    pub faces: Vec<CompressedFace>,
}

impl CompressedBrepData {
    pub fn new(tolerance: f64) -> Self {
        Self { content: ContentBody::default(), tolerance, faces: Vec::new() }
    }

    pub fn add_face(&mut self, face: CompressedFace) -> usize {
        self.faces.push(face);
        self.faces.len() - 1
    }

    pub fn serial_type(&self) -> u32 {
        PRC_TYPE_TOPO_BREP_DATA_COMPRESS
    }

    fn write_shell(&self, enc: &mut Encoder) -> Result<()> {
        let count = u32::try_from(self.faces.len())
            .map_err(|_| Error::invalid(format!("{} faces in one compressed shell", self.faces.len())))?;
        enc.write_bool(count == 1);
        if count != 1 {
            enc.write_number_of_bits_then_unsigned(count)?;
        }
        for face in &self.faces {
            face.write_compressed(enc, self.tolerance)?;
        }
        // no iso faces
        for _ in &self.faces {
            enc.write_bool(false);
        }
        Ok(())
    }
}

impl PrcWrite for CompressedBrepData {
    #[tracing::instrument(skip_all, fields(faces = self.faces.len(), tolerance = self.tolerance))]
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::UnsupportedPatch(format!(
                "compression tolerance {} must be positive and finite",
                self.tolerance
            )));
        }
        let start = enc.stream().bit_len();

        enc.write_u32(PRC_TYPE_TOPO_BREP_DATA_COMPRESS);
        self.content.write(enc)?;
        enc.write_f64(self.tolerance);
        enc.write_number_of_bits_then_unsigned(REFERENCE_BITS)?;
        // iso vertex and iso edge counts
        enc.write_unsigned_bits(0, REFERENCE_BITS)?;
        enc.write_unsigned_bits(0, REFERENCE_BITS)?;
        // one shell, one connex
        enc.write_bool(true);

        self.write_shell(enc)?;
        for face in &self.faces {
            BaseInfo::write_optional(face.base.as_ref(), enc)?;
        }

        debug!(bits = enc.stream().bit_len() - start, "compressed brep written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::BitReader;

    fn quad(z: f64) -> CompressedFace {
        CompressedFace::new(1, vec![DVec3::ZERO, DVec3::Y, DVec3::X, DVec3::new(1.0, 1.0, z)])
    }

    #[test]
    fn test_single_face_flag() {
        let mut brep = CompressedBrepData::new(1e-3);
        brep.add_face(quad(0.0));
        let mut enc = Encoder::new();
        brep.write(&mut enc).unwrap();

        let decoded = decode_compressed_brep(&mut BitReader::from_stream(enc.stream())).unwrap();
        assert_eq!(decoded.faces.len(), 1);
        assert_eq!(decoded.tolerance, 1e-3);
    }

    #[test]
    fn test_face_count_both_passes() {
        let mut brep = CompressedBrepData::new(1e-3);
        for z in [0.0, 0.1, 0.2] {
            brep.add_face(quad(z));
        }
        let mut enc = Encoder::new();
        brep.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        let decoded = decode_compressed_brep(&mut r).unwrap();
        assert_eq!(decoded.faces.len(), 3);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_empty_shell() {
        let brep = CompressedBrepData::new(1e-3);
        let mut enc = Encoder::new();
        brep.write(&mut enc).unwrap();
        let decoded = decode_compressed_brep(&mut BitReader::from_stream(enc.stream())).unwrap();
        assert!(decoded.faces.is_empty());
    }

    #[test]
    fn test_bad_tolerance_fails_fast() {
        let mut brep = CompressedBrepData::new(-1.0);
        brep.add_face(quad(0.0));
        let mut enc = Encoder::new();
        assert!(matches!(brep.write(&mut enc), Err(Error::UnsupportedPatch(_))));
        assert!(enc.stream().is_empty());
    }

    #[test]
    fn test_bad_face_propagates() {
        let mut brep = CompressedBrepData::new(1e-3);
        brep.add_face(CompressedFace::new(2, vec![DVec3::ZERO; 4]));
        assert!(matches!(brep.write(&mut Encoder::new()), Err(Error::UnsupportedPatch(_))));
    }
}
