//! Appearance entities: colors, pictures, textures, materials and styles.
//!
//! These are written into the file-structure globals by the container
//! assembler; indices between them are positions in those global lists.

use crate::format::{
    texture, PRC_TYPE_GRAPH_MATERIAL, PRC_TYPE_GRAPH_PICTURE, PRC_TYPE_GRAPH_STYLE,
    PRC_TYPE_GRAPH_TEXTURE_APPLICATION, PRC_TYPE_GRAPH_TEXTURE_DEFINITION,
};
use crate::session::Encoder;
use crate::util::Result;

use super::base::ContentBase;
use super::PrcWrite;

/// RGB color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RgbColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl RgbColor {
    pub fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }
}

impl PrcWrite for RgbColor {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_f64(self.red);
        enc.write_f64(self.green);
        enc.write_f64(self.blue);
        Ok(())
    }
}

/// Raster image stored in an uncompressed file of the file structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Picture {
    pub base: ContentBase,
    pub format: i32,
    pub uncompressed_file_index: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl PrcWrite for Picture {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_GRAPH_PICTURE);
        self.base.write(enc)?;
        enc.write_i32(self.format);
        enc.write_index(Some(self.uncompressed_file_index));
        enc.write_u32(self.pixel_width);
        enc.write_u32(self.pixel_height);
        Ok(())
    }
}

/// 2D texture with stored mapping coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDefinition {
    pub base: ContentBase,
    pub picture_index: u32,
    pub mapping_attribute: u32,
    pub mapping_intensity: f64,
    pub mapping_components: u8,
    pub function: i32,
    pub applying_mode: u8,
    pub wrapping_mode_s: i32,
    pub wrapping_mode_t: i32,
}

impl Default for TextureDefinition {
    fn default() -> Self {
        Self {
            base: ContentBase::default(),
            picture_index: 0,
            mapping_attribute: texture::MAPPING_DIFFUSE,
            mapping_intensity: 1.0,
            mapping_components: texture::MAPPING_COMPONENTS_RGBA,
            function: texture::FUNCTION_MODULATE,
            applying_mode: texture::APPLYING_MODE_NONE,
            wrapping_mode_s: texture::WRAPPING_MODE_UNKNOWN,
            wrapping_mode_t: texture::WRAPPING_MODE_UNKNOWN,
        }
    }
}

impl TextureDefinition {
    const DIMENSION: u8 = 2;
}

impl PrcWrite for TextureDefinition {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_GRAPH_TEXTURE_DEFINITION);
        self.base.write(enc)?;
        enc.write_index(Some(self.picture_index));
        enc.write_u8(Self::DIMENSION);
        enc.write_i32(texture::MAPPING_TYPE_STORED);

        enc.write_u32(self.mapping_attribute);
        enc.write_u32(1);
        enc.write_f64(self.mapping_intensity);
        enc.write_u32(1);
        enc.write_u8(self.mapping_components);

        enc.write_i32(self.function);
        if self.function == texture::FUNCTION_BLEND {
            // white, opaque blend color
            for _ in 0..4 {
                enc.write_f64(1.0);
            }
        }
        // rgb and alpha blend sources; unknown, so no destinations follow
        enc.write_i32(texture::BLEND_PARAMETER_UNKNOWN);
        enc.write_i32(texture::BLEND_PARAMETER_UNKNOWN);

        enc.write_u8(self.applying_mode);
        if self.applying_mode & texture::APPLYING_MODE_ALPHATEST != 0 {
            enc.write_i32(texture::ALPHA_TEST_UNKNOWN);
            enc.write_f64(1.0);
        }
        enc.write_i32(self.wrapping_mode_s);
        enc.write_i32(self.wrapping_mode_t);
        // texture transformation
        enc.write_bool(false);
        Ok(())
    }
}

/// Phong-style material referencing colors by index.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGeneric {
    pub base: ContentBase,
    pub ambient: Option<u32>,
    pub diffuse: Option<u32>,
    pub emissive: Option<u32>,
    pub specular: Option<u32>,
    pub shininess: f64,
    pub ambient_alpha: f64,
    pub diffuse_alpha: f64,
    pub emissive_alpha: f64,
    pub specular_alpha: f64,
}

impl Default for MaterialGeneric {
    fn default() -> Self {
        Self {
            base: ContentBase::default(),
            ambient: None,
            diffuse: None,
            emissive: None,
            specular: None,
            shininess: 0.0,
            ambient_alpha: 1.0,
            diffuse_alpha: 1.0,
            emissive_alpha: 1.0,
            specular_alpha: 1.0,
        }
    }
}

impl PrcWrite for MaterialGeneric {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_GRAPH_MATERIAL);
        self.base.write(enc)?;
        enc.write_index(self.ambient);
        enc.write_index(self.diffuse);
        enc.write_index(self.emissive);
        enc.write_index(self.specular);
        enc.write_f64(self.shininess);
        enc.write_f64(self.ambient_alpha);
        enc.write_f64(self.diffuse_alpha);
        enc.write_f64(self.emissive_alpha);
        enc.write_f64(self.specular_alpha);
        Ok(())
    }
}

/// Texture bound to a material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureApplication {
    pub base: ContentBase,
    pub material_generic_index: Option<u32>,
    pub texture_definition_index: Option<u32>,
    pub next_texture_index: Option<u32>,
    pub uv_coordinates_index: Option<u32>,
}

impl PrcWrite for TextureApplication {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_GRAPH_TEXTURE_APPLICATION);
        self.base.write(enc)?;
        enc.write_index(self.material_generic_index);
        enc.write_index(self.texture_definition_index);
        enc.write_index(self.next_texture_index);
        enc.write_index(self.uv_coordinates_index);
        Ok(())
    }
}

/// Category-1 line style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub base: ContentBase,
    pub line_width: f64,
    pub is_vpicture: bool,
    pub line_pattern_vpicture_index: Option<u32>,
    /// `color_material_index` addresses a material rather than a color.
    pub is_material: bool,
    pub color_material_index: Option<u32>,
    pub transparency: Option<u8>,
    /// Rendering hint; 0 means undefined and is not written.
    pub additional: u8,
}

impl PrcWrite for Style {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_GRAPH_STYLE);
        self.base.write(enc)?;
        enc.write_f64(self.line_width);
        enc.write_bool(self.is_vpicture);
        enc.write_index(self.line_pattern_vpicture_index);
        enc.write_bool(self.is_material);
        enc.write_index(self.color_material_index);
        enc.write_bool(self.transparency.is_some());
        if let Some(t) = self.transparency {
            enc.write_u8(t);
        }
        enc.write_bool(self.additional != 0);
        if self.additional != 0 {
            enc.write_u8(self.additional);
        }
        // additional 2 and 3
        enc.write_bool(false);
        enc.write_bool(false);
        Ok(())
    }
}

/// Size and attribute flags of one font key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FontKey {
    pub font_size: u32,
    pub attributes: u8,
}

/// Keys of one font family and character set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontKeysSameFont {
    pub font_name: String,
    pub char_set: u32,
    pub font_keys: Vec<FontKey>,
}

impl PrcWrite for FontKeysSameFont {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_str(&self.font_name);
        enc.write_u32(self.char_set);
        enc.write_len(self.font_keys.len())?;
        for key in &self.font_keys {
            enc.write_u32(key.font_size.wrapping_add(1));
            enc.write_u8(key.attributes);
        }
        Ok(())
    }
}
