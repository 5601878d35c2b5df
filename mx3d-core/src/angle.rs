//! Degree/radian conversion at the public boundary.
//!
//! Every public function in this crate takes and returns angles in degrees.
//! These two helpers are the only place the conversion happens.

/// Converts a caller-supplied angle in degrees to radians for trig use.
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Converts an internally computed angle in radians back to degrees.
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}
