//! Locating raster cells under output pixels.

use overlay_common::{GeoBounds, RasterGrid};

use crate::transform::ViewTransform;

/// Nearest-sample index for a normalized coordinate along an axis of `size` cells.
///
/// Returns `None` when `frac * size` falls outside `[0, size)`, including NaN.
/// This is the floor convention shared by both render paths.
#[inline]
pub fn nearest_texel(frac: f64, size: usize) -> Option<usize> {
    let index = (frac * size as f64).floor();
    if index >= 0.0 && index < size as f64 {
        Some(index as usize)
    } else {
        None
    }
}

/// Maps geographic coordinates onto the cells of a raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterLocator {
    pub bounds: GeoBounds,
    pub width: usize,
    pub height: usize,
}

impl RasterLocator {
    pub fn new(bounds: GeoBounds, width: usize, height: usize) -> Self {
        Self {
            bounds,
            width,
            height,
        }
    }

    /// Locator for a grid's dimensions.
    pub fn for_grid(bounds: GeoBounds, grid: &RasterGrid) -> Self {
        Self::new(bounds, grid.width(), grid.height())
    }

    /// Fractional row position of a latitude; 0 at the north edge, 1 at the south edge.
    #[inline]
    pub fn row_frac(&self, lat: f64) -> f64 {
        (self.bounds.north - lat) / (self.bounds.north - self.bounds.south)
    }

    /// Fractional column position of a longitude; 0 at the west edge, 1 at the east edge.
    #[inline]
    pub fn col_frac(&self, lng: f64) -> f64 {
        (lng - self.bounds.west) / (self.bounds.east - self.bounds.west)
    }

    #[inline]
    pub fn row_at(&self, lat: f64) -> Option<usize> {
        nearest_texel(self.row_frac(lat), self.height)
    }

    #[inline]
    pub fn col_at(&self, lng: f64) -> Option<usize> {
        nearest_texel(self.col_frac(lng), self.width)
    }

    /// Cell `(row, col)` containing a geographic point, if any.
    pub fn cell_at_lat_lng(&self, lat: f64, lng: f64) -> Option<(usize, usize)> {
        Some((self.row_at(lat)?, self.col_at(lng)?))
    }

    /// Normalized texture coordinate `(u, v)` under output pixel `(x, y)`.
    ///
    /// `u` runs west to east, `v` north to south. Values outside `[0, 1)` are off-raster.
    #[inline]
    pub fn texcoord(&self, view: &ViewTransform, x: f64, y: f64) -> (f64, f64) {
        let (lat, lng) = view.unproject(x, y);
        (self.col_frac(lng), self.row_frac(lat))
    }

    /// Cell `(row, col)` under output pixel `(x, y)`, if the pixel covers the raster.
    pub fn cell_at_pixel(&self, view: &ViewTransform, x: f64, y: f64) -> Option<(usize, usize)> {
        let (u, v) = self.texcoord(view, x, y);
        Some((nearest_texel(v, self.height)?, nearest_texel(u, self.width)?))
    }
}
