//! Utility types and functions for the PRC encoder.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and quantization helpers

mod error;
mod math;

pub use error::*;
pub use math::*;
