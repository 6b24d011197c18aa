//! Markups and the annotations that point at them.

use crate::format::{PRC_TYPE_MISC_REFERENCE_ON_PRC_BASE, PRC_TYPE_MKP_ANNOTATION_ITEM, PRC_TYPE_MKP_MARKUP};
use crate::session::Encoder;
use crate::util::Result;

use super::base::{ContentBase, Graphics, UserData};
use super::PrcWrite;

/// Non-owning reference to an entity of the same file structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReferenceUniqueIdentifier {
    /// Type tag of the target.
    pub target_type: u32,
    /// PRC id of the target.
    pub unique_identifier: u32,
}

impl ReferenceUniqueIdentifier {
    pub fn new(target_type: u32, unique_identifier: u32) -> Self {
        Self { target_type, unique_identifier }
    }

    /// Reference to a markup by its PRC id.
    pub fn markup(prc_id: u32) -> Self {
        Self::new(PRC_TYPE_MKP_MARKUP, prc_id)
    }
}

impl PrcWrite for ReferenceUniqueIdentifier {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_MISC_REFERENCE_ON_PRC_BASE);
        enc.write_u32(self.target_type);
        // target lives in the same file structure
        enc.write_bool(true);
        enc.write_u32(self.unique_identifier);
        Ok(())
    }
}

/// Markup entity. Linked items and leaders are always empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markup {
    pub base: ContentBase,
    pub graphics: Graphics,
    pub markup_type: u32,
    pub sub_type: u32,
    pub tessellation: Option<u32>,
}

impl PrcWrite for Markup {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_MKP_MARKUP);
        self.base.write(enc)?;
        enc.write_graphics(&self.graphics);
        enc.write_u32(self.markup_type);
        enc.write_u32(self.sub_type);
        // linked items, leaders
        enc.write_u32(0);
        enc.write_u32(0);
        enc.write_index(self.tessellation);
        UserData::empty().write(enc)
    }
}

/// Annotation entity wrapping one markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationItem {
    pub base: ContentBase,
    pub graphics: Graphics,
    pub markup: ReferenceUniqueIdentifier,
}

impl PrcWrite for AnnotationItem {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_MKP_ANNOTATION_ITEM);
        self.base.write(enc)?;
        enc.write_graphics(&self.graphics);
        self.markup.write(enc)?;
        UserData::empty().write(enc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::BitReader;

    #[test]
    fn test_markup_layout() {
        let markup = Markup { markup_type: 2, sub_type: 5, tessellation: Some(0), ..Default::default() };
        let mut enc = Encoder::new();
        markup.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_MKP_MARKUP);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert!(r.read_bool().unwrap());
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 2);
        assert_eq!(r.read_u32().unwrap(), 5);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_annotation_references_markup() {
        let item = AnnotationItem {
            graphics: Graphics::new(Some(1), None, 1),
            markup: ReferenceUniqueIdentifier::markup(42),
            ..Default::default()
        };
        let mut enc = Encoder::new();
        item.write(&mut enc).unwrap();

        let mut r = BitReader::from_stream(enc.stream());
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_MKP_ANNOTATION_ITEM);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert!(r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 2);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u8().unwrap(), 0);
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_MISC_REFERENCE_ON_PRC_BASE);
        assert_eq!(r.read_u32().unwrap(), PRC_TYPE_MKP_MARKUP);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 42);
        assert_eq!(r.read_u32().unwrap(), 0);
        assert_eq!(r.remaining(), 0);
    }
}
