//! Inverse projection from map pixels to raster cells.
//!
//! The host map is a spherical Mercator (conformal cylindrical) projection
//! composed with an affine pixel transform. The raster lives on a regular
//! lat/lng grid, so locating the sample under an output pixel takes one
//! inverse Gudermannian per row.

pub mod locator;
pub mod mercator;
pub mod transform;
pub mod window;

pub use locator::{nearest_texel, RasterLocator};
pub use transform::ViewTransform;
pub use window::PlotWindow;
