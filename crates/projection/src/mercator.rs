//! Spherical Mercator projection.
//!
//! Projected coordinates are expressed in radians on the unit sphere:
//! `x = λ`, `y = ln(tan(π/4 + φ/2))`. Multiplying by the Earth radius gives
//! EPSG:3857 meters; the view transform folds that factor into its affine
//! coefficients.

use std::f64::consts::PI;

/// WGS84 semi-major axis used by EPSG:3857 (meters).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Degrees per radian.
pub const RAD_TO_DEG: f64 = 180.0 / PI;

/// Latitude at which the Web Mercator square ends (degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Forward projection of a latitude in degrees.
#[inline]
pub fn lat_to_y(lat_deg: f64) -> f64 {
    let phi = lat_deg / RAD_TO_DEG;
    (PI / 4.0 + phi / 2.0).tan().ln()
}

/// Inverse projection (inverse Gudermannian), returning degrees.
#[inline]
pub fn y_to_lat(y: f64) -> f64 {
    (2.0 * y.exp().atan() - PI / 2.0) * RAD_TO_DEG
}

/// Forward projection of a longitude in degrees.
#[inline]
pub fn lng_to_x(lng_deg: f64) -> f64 {
    lng_deg / RAD_TO_DEG
}

/// Inverse projection of x, returning degrees.
#[inline]
pub fn x_to_lng(x: f64) -> f64 {
    x * RAD_TO_DEG
}

/// Clamp a latitude into the range where the projection is finite.
#[inline]
pub fn clamp_latitude(lat_deg: f64) -> f64 {
    lat_deg.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}
