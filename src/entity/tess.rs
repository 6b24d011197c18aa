//! Tessellated geometry: triangle meshes, wires and markup glyphs.

use crate::format::{face_tess, PRC_TYPE_TESS_3D, PRC_TYPE_TESS_3D_WIRE, PRC_TYPE_TESS_FACE, PRC_TYPE_TESS_MARKUP};
use crate::session::Encoder;
use crate::util::{Error, Result};

use super::PrcWrite;

fn write_u32_list(enc: &mut Encoder, values: &[u32]) -> Result<()> {
    enc.write_len(values.len())?;
    for &v in values {
        enc.write_u32(v);
    }
    Ok(())
}

fn write_f64_list(enc: &mut Encoder, values: &[f64]) -> Result<()> {
    enc.write_len(values.len())?;
    for &v in values {
        enc.write_f64(v);
    }
    Ok(())
}

/// Write per-vertex colors with run compression.
///
/// The first color is written in full. Each following color writes a bit
/// telling whether it repeats its predecessor, and its bytes only if not.
pub fn write_rgba_array(enc: &mut Encoder, colors: &[u8], is_rgba: bool) -> Result<()> {
    let stride = if is_rgba { 4 } else { 3 };
    if colors.is_empty() || colors.len() % stride != 0 {
        return Err(Error::invalid(format!(
            "{} color bytes do not form whole {}-component colors",
            colors.len(),
            stride
        )));
    }
    let mut prev: Option<&[u8]> = None;
    for color in colors.chunks_exact(stride) {
        match prev {
            None => {}
            Some(p) if p == color => {
                enc.write_bool(true);
                continue;
            }
            Some(_) => enc.write_bool(false),
        }
        for &c in color {
            enc.write_u8(c);
        }
        prev = Some(color);
    }
    Ok(())
}

/// Coordinates shared by all tessellation kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentBaseTessData {
    pub is_calculated: bool,
    pub coordinates: Vec<f64>,
}

impl ContentBaseTessData {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_bool(self.is_calculated);
        write_f64_list(enc, &self.coordinates)
    }
}

// ============================================================================
// Faces
// ============================================================================

/// Tessellation of one face of a [`Tess3d`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TessFace {
    /// Line style indices; also enable the trailing behaviour field.
    pub line_attributes: Vec<u32>,
    pub start_wire: u32,
    pub sizes_wire: Vec<u32>,
    /// Combination of [`face_tess`] flags.
    pub used_entities_flag: u32,
    pub start_triangulated: u32,
    pub sizes_triangulated: Vec<u32>,
    pub texture_coordinate_index_count: u32,
    pub is_rgba: bool,
    pub rgba_vertices: Vec<u8>,
    pub behaviour: u32,
}

impl TessFace {
    /// Triangle list starting at `start` with `count` triangles.
    pub fn triangles(start: u32, count: u32) -> Self {
        Self {
            used_entities_flag: face_tess::TRIANGLE,
            start_triangulated: start,
            sizes_triangulated: vec![count],
            ..Default::default()
        }
    }

    /// Texture index count as written. Textured faces never write 0.
    pub fn written_texture_index_count(&self) -> u32 {
        if self.texture_coordinate_index_count == 0 && self.used_entities_flag & face_tess::ANY_TEXTURED != 0 {
            1
        } else {
            self.texture_coordinate_index_count
        }
    }
}

impl PrcWrite for TessFace {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TESS_FACE);
        enc.write_len(self.line_attributes.len())?;
        for &attr in &self.line_attributes {
            enc.write_index(Some(attr));
        }
        enc.write_u32(self.start_wire);
        write_u32_list(enc, &self.sizes_wire)?;
        enc.write_u32(self.used_entities_flag);
        enc.write_u32(self.start_triangulated);
        write_u32_list(enc, &self.sizes_triangulated)?;
        enc.write_u32(self.written_texture_index_count());

        let has_colors = !self.rgba_vertices.is_empty();
        enc.write_bool(has_colors);
        if has_colors {
            enc.write_bool(self.is_rgba);
            // not optimised
            enc.write_bool(false);
            write_rgba_array(enc, &self.rgba_vertices, self.is_rgba)?;
        }
        if !self.line_attributes.is_empty() {
            enc.write_u32(self.behaviour);
        }
        Ok(())
    }
}

// ============================================================================
// Tessellation kinds
// ============================================================================

/// Triangle-based 3D tessellation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tess3d {
    pub base: ContentBaseTessData,
    pub has_faces: bool,
    pub has_loops: bool,
    /// Used by viewers to rebuild normals when none are given.
    pub crease_angle: f64,
    pub normal_coordinates: Vec<f64>,
    pub wire_indices: Vec<u32>,
    pub triangulated_indices: Vec<u32>,
    pub faces: Vec<TessFace>,
    pub texture_coordinates: Vec<f64>,
}

impl Default for Tess3d {
    fn default() -> Self {
        Self {
            base: ContentBaseTessData::default(),
            has_faces: false,
            has_loops: false,
            crease_angle: 25.8419,
            normal_coordinates: Vec::new(),
            wire_indices: Vec::new(),
            triangulated_indices: Vec::new(),
            faces: Vec::new(),
            texture_coordinates: Vec::new(),
        }
    }
}

impl Tess3d {
    pub fn add_face(&mut self, face: TessFace) -> usize {
        self.faces.push(face);
        self.faces.len() - 1
    }
}

impl PrcWrite for Tess3d {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TESS_3D);
        self.base.write(enc)?;
        enc.write_bool(self.has_faces);
        enc.write_bool(self.has_loops);
        let recalculate_normals = self.normal_coordinates.is_empty();
        enc.write_bool(recalculate_normals);
        if recalculate_normals {
            // recalculation flags, reserved
            enc.write_u8(0);
            enc.write_f64(self.crease_angle);
        }
        write_f64_list(enc, &self.normal_coordinates)?;
        write_u32_list(enc, &self.wire_indices)?;
        write_u32_list(enc, &self.triangulated_indices)?;
        enc.write_len(self.faces.len())?;
        for face in &self.faces {
            face.write(enc)?;
        }
        write_f64_list(enc, &self.texture_coordinates)
    }
}

/// Polyline tessellation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireTess3d {
    pub base: ContentBaseTessData,
    pub wire_indexes: Vec<u32>,
    pub is_rgba: bool,
    pub is_segment_color: bool,
    pub rgba_vertices: Vec<u8>,
}

impl PrcWrite for WireTess3d {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TESS_3D_WIRE);
        self.base.write(enc)?;
        write_u32_list(enc, &self.wire_indexes)?;
        let has_colors = !self.rgba_vertices.is_empty();
        enc.write_bool(has_colors);
        if has_colors {
            enc.write_bool(self.is_rgba);
            enc.write_bool(self.is_segment_color);
            enc.write_bool(false);
            write_rgba_array(enc, &self.rgba_vertices, self.is_rgba)?;
        }
        Ok(())
    }
}

/// Drawing-code tessellation of a markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupTess {
    pub base: ContentBaseTessData,
    pub codes: Vec<u32>,
    pub texts: Vec<String>,
    pub label: String,
    pub behaviour: u8,
}

impl PrcWrite for MarkupTess {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_TESS_MARKUP);
        self.base.write(enc)?;
        write_u32_list(enc, &self.codes)?;
        enc.write_len(self.texts.len())?;
        for text in &self.texts {
            enc.write_str(text);
        }
        enc.write_str(&self.label);
        enc.write_u8(self.behaviour);
        Ok(())
    }
}

/// Any tessellation.
#[derive(Debug, Clone, PartialEq)]
pub enum Tessellation {
    Tess3d(Tess3d),
    Wire(WireTess3d),
    Markup(MarkupTess),
}

impl PrcWrite for Tessellation {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        match self {
            Self::Tess3d(t) => t.write(enc),
            Self::Wire(t) => t.write(enc),
            Self::Markup(t) => t.write(enc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::BitReader;

    #[test]
    fn test_rgba_run_compression() {
        let colors = [255, 0, 0, 255, 0, 0, 0, 255, 0, 0, 255, 0];
        let mut enc = Encoder::new();
        write_rgba_array(&mut enc, &colors, false).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u8().unwrap(), 255);
        assert_eq!(r.read_u8().unwrap(), 0);
        assert_eq!(r.read_u8().unwrap(), 0);
        assert!(r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u8().unwrap(), 0);
        assert_eq!(r.read_u8().unwrap(), 255);
        assert_eq!(r.read_u8().unwrap(), 0);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_rgba_rejects_partial_color() {
        assert!(write_rgba_array(&mut Encoder::new(), &[1, 2, 3, 4, 5], false).is_err());
        assert!(write_rgba_array(&mut Encoder::new(), &[1, 2, 3], true).is_err());
    }

    #[test]
    fn test_textured_face_writes_one_index() {
        let mut face = TessFace::triangles(0, 2);
        face.used_entities_flag |= face_tess::TRIANGLE_TEXTURED;
        assert_eq!(face.written_texture_index_count(), 1);
        face.texture_coordinate_index_count = 3;
        assert_eq!(face.written_texture_index_count(), 3);
        assert_eq!(TessFace::triangles(0, 2).written_texture_index_count(), 0);
    }

    #[test]
    fn test_tess_face_layout() {
        let face = TessFace { line_attributes: vec![4], behaviour: 7, ..TessFace::triangles(3, 1) };
        let mut enc = Encoder::new();
        face.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_TESS_FACE);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 5);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), face_tess::TRIANGLE);
        assert_eq!(r.read_u32().unwrap(), 3);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 7);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_tess3d_normals_flag() {
        let mut tess = Tess3d::default();
        let mut without = Encoder::new();
        tess.write(&mut without).unwrap();

        tess.normal_coordinates = vec![0.0, 0.0, 1.0];
        let mut with = Encoder::new();
        tess.write(&mut with).unwrap();

        let mut r = BitReader::from_stream(with.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_TESS_3D);
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 0);
        assert!(!r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 3);

        let mut r = BitReader::from_stream(without.stream());
        r.read_u32().unwrap();
        r.read_bool().unwrap();
        r.read_u32().unwrap();
        r.read_bool().unwrap();
        r.read_bool().unwrap();
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_u8().unwrap(), 0);
        assert_eq!(r.read_f64().unwrap(), 25.8419);
    }
}
