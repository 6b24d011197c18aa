//! Entity headers shared by every category.
//!
//! - [`ContentBase`] - attributes, cached name and optional id triple
//! - [`BaseInfo`] - optional header of topology and geometry items
//! - [`Graphics`] - layer / line style / behaviour triple
//! - [`UserData`] - opaque bit payload

use crate::format::PRC_TYPE_MISC_ATTRIBUTE;
use crate::session::{Encoder, ReferenceIds};
use crate::util::{Error, Result};

use super::PrcWrite;

// ============================================================================
// Attributes
// ============================================================================

/// Title of an attribute or attribute group.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeTitle {
    Integer(u32),
    Text(String),
}

impl Default for AttributeTitle {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl AttributeTitle {
    fn write(&self, enc: &mut Encoder) {
        match self {
            Self::Integer(v) => {
                enc.write_bool(true);
                enc.write_u32(*v);
            }
            Self::Text(s) => {
                enc.write_bool(false);
                enc.write_str(s);
            }
        }
    }
}

/// Value of a single attribute key.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Integer(i32),
    Real(f64),
    Time(u32),
    Text(String),
}

impl AttributeValue {
    /// Modeller attribute type code.
    pub fn type_code(&self) -> u32 {
        match self {
            Self::Null => 0,
            Self::Integer(_) => 1,
            Self::Real(_) => 2,
            Self::Time(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

/// One key/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleAttribute {
    pub title: AttributeTitle,
    pub value: AttributeValue,
}

impl SingleAttribute {
    pub fn new(title: AttributeTitle, value: AttributeValue) -> Self {
        Self { title, value }
    }

    fn write(&self, enc: &mut Encoder) {
        self.title.write(enc);
        enc.write_u32(self.value.type_code());
        match &self.value {
            AttributeValue::Null => {}
            AttributeValue::Integer(v) => enc.write_i32(*v),
            AttributeValue::Real(v) => enc.write_f64(*v),
            AttributeValue::Time(v) => enc.write_u32(*v),
            AttributeValue::Text(v) => enc.write_str(v),
        }
    }
}

/// Titled group of key/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribute {
    pub title: AttributeTitle,
    pub entries: Vec<SingleAttribute>,
}

impl PrcWrite for Attribute {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u32(PRC_TYPE_MISC_ATTRIBUTE);
        self.title.write(enc);
        enc.write_len(self.entries.len())?;
        for entry in &self.entries {
            entry.write(enc);
        }
        Ok(())
    }
}

/// Ordered attribute groups of one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub groups: Vec<Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: Attribute) {
        self.groups.push(group);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl PrcWrite for Attributes {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_len(self.groups.len())?;
        for group in &self.groups {
            group.write(enc)?;
        }
        Ok(())
    }
}

// ============================================================================
// Content headers
// ============================================================================

/// Base header of every named, attributed entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentBase {
    pub attributes: Attributes,
    pub name: String,
    ids: Option<ReferenceIds>,
}

impl ContentBase {
    /// Header that cannot be referenced from elsewhere.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Header carrying an allocated id triple.
    pub fn referenceable(name: impl Into<String>, ids: ReferenceIds) -> Self {
        Self { name: name.into(), ids: Some(ids), ..Default::default() }
    }

    /// Identifier triple, if the entity is referenceable.
    pub fn ids(&self) -> Option<&ReferenceIds> {
        self.ids.as_ref()
    }
}

impl PrcWrite for ContentBase {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        self.attributes.write(enc)?;
        enc.write_name(&self.name);
        if let Some(ids) = &self.ids {
            enc.write_u32(ids.cad_id());
            enc.write_u32(ids.cad_persistent_id());
            enc.write_u32(ids.prc_id());
        }
        Ok(())
    }
}

/// Optional header block of topology and geometry items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseInfo {
    pub attributes: Attributes,
    pub name: String,
    pub identifier: u32,
}

impl BaseInfo {
    pub fn new(name: impl Into<String>, identifier: u32) -> Self {
        Self { name: name.into(), identifier, ..Default::default() }
    }

    /// Write the presence bit, then the block when present.
    pub fn write_optional(base: Option<&BaseInfo>, enc: &mut Encoder) -> Result<()> {
        enc.write_bool(base.is_some());
        if let Some(info) = base {
            info.attributes.write(enc)?;
            enc.write_name(&info.name);
            enc.write_u32(info.identifier);
        }
        Ok(())
    }
}

// ============================================================================
// Graphics
// ============================================================================

/// Layer, line-style and behaviour attributes of a drawable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Graphics {
    pub layer_index: Option<u32>,
    pub line_style_index: Option<u32>,
    pub behaviour: u16,
}

impl Default for Graphics {
    fn default() -> Self {
        Self { layer_index: None, line_style_index: None, behaviour: 1 }
    }
}

impl Graphics {
    pub fn new(layer_index: Option<u32>, line_style_index: Option<u32>, behaviour: u16) -> Self {
        Self { layer_index, line_style_index, behaviour }
    }

    /// Graphics with only a line style set.
    pub fn with_style(line_style_index: u32) -> Self {
        Self { line_style_index: Some(line_style_index), ..Default::default() }
    }

    /// Check if anything differs from the defaults.
    pub fn has_graphics(&self) -> bool {
        self.normalized() != Self::default()
    }

    /// Same graphics with `u32::MAX` indices replaced by `None`.
    ///
    /// `u32::MAX` has no wire form of its own; it is written as absent, so it
    /// compares as absent too.
    pub fn normalized(&self) -> Self {
        let valid = |i: Option<u32>| i.filter(|&i| i != u32::MAX);
        Self { layer_index: valid(self.layer_index), line_style_index: valid(self.line_style_index), ..*self }
    }

    /// Wire form of an optional index: absent is 0, present is `index + 1`.
    /// `Some(u32::MAX)` is written as absent.
    #[inline]
    pub fn index_plus_one(index: Option<u32>) -> u32 {
        index.map_or(0, |i| i.wrapping_add(1))
    }
}

// ============================================================================
// User data
// ============================================================================

/// Opaque payload of `bit_len` bits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserData {
    pub bit_len: u32,
    pub data: Vec<u8>,
}

impl UserData {
    /// Payload written by every entity that has nothing to attach.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl PrcWrite for UserData {
    fn write(&self, enc: &mut Encoder) -> Result<()> {
        let whole = (self.bit_len / 8) as usize;
        let tail = self.bit_len % 8;
        let needed = whole + usize::from(tail != 0);
        if self.data.len() < needed {
            return Err(Error::invalid(format!(
                "user data declares {} bits but holds {} bytes",
                self.bit_len,
                self.data.len()
            )));
        }
        enc.write_u32(self.bit_len);
        for &byte in &self.data[..whole] {
            enc.write_u8(byte);
        }
        if tail != 0 {
            let last = self.data[whole];
            for j in 0..tail {
                enc.write_bool(last & (0x80 >> j) != 0);
            }
        }
        Ok(())
    }
}
