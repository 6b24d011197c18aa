//! Math type re-exports and PRC-specific numeric helpers.
//!
//! Vectors come from `glam` (double precision throughout, the wire format
//! stores every coordinate as a double). The helpers here mirror the
//! degenerate-vector and quantization rules the compressed encodings rely on.

pub use glam::{DMat4, DVec2, DVec3, DVec4};

/// Length below which a vector is treated as degenerate when normalizing.
pub const NORMALIZE_EPSILON: f64 = f32::EPSILON as f64;

/// Euclidean length computed with `hypot`, `None` if it is NaN or infinite.
#[inline]
pub fn checked_length(v: DVec3) -> Option<f64> {
    let len = v.x.hypot(v.y).hypot(v.z);
    len.is_finite().then_some(len)
}

/// Unit vector along `v`, `None` when `v` is degenerate.
#[inline]
pub fn try_unit(v: DVec3) -> Option<DVec3> {
    let len = checked_length(v)?;
    if len < NORMALIZE_EPSILON {
        return None;
    }
    Some(v * (1.0 / len))
}

/// Number of `step` units in `value`, rounded to nearest (half away from zero).
#[inline]
pub fn quantize(value: f64, step: f64) -> i32 {
    let ratio = value.abs() / step;
    let mut units = ratio as i32;
    if ratio - units as f64 >= 0.5 {
        units += 1;
    }
    if value < 0.0 { -units } else { units }
}

/// `value` snapped to the nearest multiple of `step`.
#[inline]
pub fn round_to(value: f64, step: f64) -> f64 {
    quantize(value, step) as f64 * step
}

/// Component-wise [`quantize`].
#[inline]
pub fn quantize_vec(v: DVec3, step: f64) -> [i32; 3] {
    [quantize(v.x, step), quantize(v.y, step), quantize(v.z, step)]
}

/// Component-wise [`round_to`].
#[inline]
pub fn round_vec(v: DVec3, step: f64) -> DVec3 {
    DVec3::new(round_to(v.x, step), round_to(v.y, step), round_to(v.z, step))
}
