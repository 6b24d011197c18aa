//! # PRC
//!
//! Bit-stream encoder for PRC, the compressed 3D format embedded in PDF.
//!
//! The crate turns an in-memory model of topological contexts, bodies,
//! geometry, tessellations, appearance and markups into the exact bit layout
//! PRC readers expect. B-rep bodies made of bicubic-style NURBS patches can be
//! written in the lossy compressed form, with a decoder for checking it.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math helpers
//! - [`stream`] - MSB-first bit writer and the matching reader
//! - [`format`] - Type tags and format constants
//! - [`session`] - Encoder state: caches, id counters, configuration
//! - [`entity`] - Entity model and per-entity serialization
//! - [`compress`] - Compressed NURBS faces and B-rep bodies
//! - [`context`] - Topological contexts and their summary records
//!
//! ## Example
//!
//! ```ignore
//! use prc::prelude::*;
//!
//! let mut ctx = TopoContext::new("part");
//! let mut brep = ctx.new_compressed_brep();
//! brep.add_face(CompressedFace::new(1, corners));
//! ctx.add_compressed_brep_data(brep);
//!
//! let stream = ctx.encode()?;
//! stream.write_to(&mut file)?;
//! ```

pub mod util;
pub mod stream;
pub mod format;
pub mod session;
pub mod entity;
pub mod compress;
pub mod context;

// Re-export commonly used types
pub use util::{Error, Result};
pub use stream::{BitReader, BitStream};
pub use session::{Encoder, SessionConfig};
pub use entity::PrcWrite;
pub use context::TopoContext;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, DVec2, DVec3};
    pub use crate::stream::{BitReader, BitStream};
    pub use crate::session::{Encoder, SessionConfig};
    pub use crate::entity::*;
    pub use crate::compress::{CompressedBrepData, CompressedFace};
    pub use crate::context::{write_empty_markups, write_unit, TopoContext};
}
