//! View transform between output pixels and projected map coordinates.
//!
//! The forward direction (what the host map does) is:
//!
//! ```text
//! pixel_x = scale * (A * x + B) - x_origin
//! pixel_y = scale * (C * y + D) - y_origin
//! ```
//!
//! where `(x, y)` are unit-sphere Mercator coordinates. Rendering only needs
//! the inverse, evaluated once per output column and once per output row.

use nalgebra::{Matrix3, Vector3};
use overlay_common::{GeoBounds, OverlayError, OverlayResult};
use std::f64::consts::PI;

use crate::mercator::{clamp_latitude, lat_to_y, lng_to_x, x_to_lng, y_to_lat};

/// Size of a Web Mercator tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Per-render view parameters supplied by the host map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Pixels per projected unit at the current zoom
    pub scale: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    /// World pixel of the output rectangle's left edge
    pub x_origin: f64,
    /// World pixel of the output rectangle's top edge
    pub y_origin: f64,
    /// Display matrix applied to the output quad (parallel path only)
    pub matrix: Matrix3<f64>,
}

impl ViewTransform {
    /// Create a view with an identity display matrix.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scale: f64,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        x_origin: f64,
        y_origin: f64,
    ) -> Self {
        Self {
            scale,
            a,
            b,
            c,
            d,
            x_origin,
            y_origin,
            matrix: Matrix3::identity(),
        }
    }

    /// EPSG:3857 view at `zoom`, with the output's top-left at the given world pixel.
    ///
    /// Uses the standard 256px tile pyramid: `scale = 256 * 2^zoom`,
    /// `A = 0.5/π`, `B = 0.5`, `C = -0.5/π`, `D = 0.5`.
    pub fn web_mercator(zoom: f64, x_origin: f64, y_origin: f64) -> Self {
        let k = 0.5 / PI;
        Self::new(TILE_SIZE * zoom.exp2(), k, 0.5, -k, 0.5, x_origin, y_origin)
    }

    /// View that maps a `width` x `height` output rectangle 1:1 onto a raster
    /// covering `bounds` with the same number of columns and rows.
    ///
    /// Output column `x` lands on the centre of raster column `x`. The first and
    /// last output rows land on the centres of the first and last raster rows;
    /// rows in between follow the Mercator curve.
    pub fn fit_bounds(bounds: &GeoBounds, width: usize, height: usize) -> OverlayResult<Self> {
        bounds.validate()?;
        if width == 0 || height == 0 {
            return Err(OverlayError::InvalidView(format!(
                "cannot fit {}x{} output",
                width, height
            )));
        }

        let dx = bounds.lng_span() / width as f64;
        let first_lng = bounds.west + 0.5 * dx;
        // (x - b) / a is in radians; solve for lng(x) = first_lng + x * dx
        let a = 1.0 / lng_to_x(dx);
        let b = -first_lng / dx;

        let dy = bounds.lat_span() / height as f64;
        let y_first = lat_to_y(bounds.north - 0.5 * dy);
        let (c, d) = if height == 1 {
            (-1.0, y_first)
        } else {
            let y_last = lat_to_y(bounds.south + 0.5 * dy);
            let c = (height - 1) as f64 / (y_last - y_first);
            (c, -c * y_first)
        };

        let view = Self::new(1.0, a, b, c, d, 0.0, 0.0);
        view.validate()?;
        Ok(view)
    }

    /// Replace the display matrix.
    pub fn with_matrix(mut self, matrix: Matrix3<f64>) -> Self {
        self.matrix = matrix;
        self
    }

    /// Same view with the pixel origin moved by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x_origin: self.x_origin + dx,
            y_origin: self.y_origin + dy,
            ..*self
        }
    }

    /// Reject views whose inverse is undefined.
    pub fn validate(&self) -> OverlayResult<()> {
        let coefficients = [
            self.scale,
            self.a,
            self.b,
            self.c,
            self.d,
            self.x_origin,
            self.y_origin,
        ];
        if coefficients.iter().any(|v| !v.is_finite()) {
            return Err(OverlayError::InvalidView(format!(
                "non-finite coefficients in {:?}",
                coefficients
            )));
        }
        if self.scale == 0.0 || self.a == 0.0 || self.c == 0.0 {
            return Err(OverlayError::InvalidView(format!(
                "scale ({}), A ({}) and C ({}) must be non-zero",
                self.scale, self.a, self.c
            )));
        }
        if self.matrix.try_inverse().is_none() {
            return Err(OverlayError::InvalidView(
                "display matrix is not invertible".to_string(),
            ));
        }
        Ok(())
    }

    /// Longitude (degrees) under output column `x`.
    #[inline]
    pub fn lng_at(&self, x: f64) -> f64 {
        x_to_lng(((self.x_origin + x) / self.scale - self.b) / self.a)
    }

    /// Latitude (degrees) under output row `y`.
    #[inline]
    pub fn lat_at(&self, y: f64) -> f64 {
        y_to_lat(((self.y_origin + y) / self.scale - self.d) / self.c)
    }

    /// `(lat, lng)` under output pixel `(x, y)`.
    #[inline]
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        (self.lat_at(y), self.lng_at(x))
    }

    /// Output pixel of a geographic point. Latitudes are clamped to the Mercator range.
    pub fn project(&self, lat: f64, lng: f64) -> (f64, f64) {
        let x = self.scale * (self.a * lng_to_x(lng) + self.b) - self.x_origin;
        let y = self.scale * (self.c * lat_to_y(clamp_latitude(lat)) + self.d) - self.y_origin;
        (x, y)
    }

    /// Whether the display matrix leaves the quad in place.
    pub fn has_identity_display(&self) -> bool {
        self.matrix == Matrix3::identity()
    }

    /// Inverse of the display matrix, if it has one.
    pub fn inverse_display(&self) -> Option<Matrix3<f64>> {
        self.matrix.try_inverse()
    }
}

/// Map a screen pixel back onto the untransformed quad using an inverted display matrix.
#[inline]
pub fn unapply_display(inverse: &Matrix3<f64>, x: f64, y: f64) -> (f64, f64) {
    let p = inverse * Vector3::new(x, y, 1.0);
    (p.x / p.z, p.y / p.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, assert_coords_approx_eq};

    #[test]
    fn test_web_mercator_world_origin() {
        // At zoom 0 the world is one 256px tile; (0, 0) is its centre.
        let view = ViewTransform::web_mercator(0.0, 0.0, 0.0);
        let (x, y) = view.project(0.0, 0.0);
        assert_coords_approx_eq!((x, y), (128.0, 128.0), 1e-9);

        let (lat, lng) = view.unproject(128.0, 128.0);
        assert_coords_approx_eq!((lat, lng), (0.0, 0.0), 1e-9);
    }

    #[test]
    fn test_web_mercator_corners() {
        let view = ViewTransform::web_mercator(2.0, 0.0, 0.0);
        assert_approx_eq!(view.lng_at(0.0), -180.0, 1e-9);
        assert_approx_eq!(view.lng_at(1024.0), 180.0, 1e-9);
        assert_approx_eq!(view.lat_at(0.0), crate::mercator::MAX_LATITUDE, 1e-7);
    }

    #[test]
    fn test_project_unproject_roundtrip() {
        let view = ViewTransform::web_mercator(5.0, 4000.0, 3000.0);
        for (lat, lng) in [(10.0, 20.0), (-33.9, 151.2), (51.5, -0.12)] {
            let (x, y) = view.project(lat, lng);
            let (lat2, lng2) = view.unproject(x, y);
            assert_coords_approx_eq!((lat2, lng2), (lat, lng), 1e-9);
        }
    }

    #[test]
    fn test_offset_shifts_origin() {
        let view = ViewTransform::web_mercator(3.0, 100.0, 200.0);
        let shifted = view.offset(10.0, 20.0);
        assert_eq!(shifted.lng_at(0.0), view.lng_at(10.0));
        assert_eq!(shifted.lat_at(0.0), view.lat_at(20.0));
    }

    #[test]
    fn test_fit_bounds_hits_cell_centres() {
        let bounds = GeoBounds::new(-10.0, 0.0, 10.0, 40.0).unwrap();
        let view = ViewTransform::fit_bounds(&bounds, 4, 2).unwrap();
        for x in 0..4 {
            assert_approx_eq!(view.lng_at(x as f64), 5.0 + 10.0 * x as f64, 1e-9);
        }
        assert_approx_eq!(view.lat_at(0.0), 5.0, 1e-9);
        assert_approx_eq!(view.lat_at(1.0), -5.0, 1e-9);
    }

    #[test]
    fn test_fit_bounds_single_row() {
        let bounds = GeoBounds::new(0.0, 0.0, 2.0, 2.0).unwrap();
        let view = ViewTransform::fit_bounds(&bounds, 1, 1).unwrap();
        let (lat, lng) = view.unproject(0.0, 0.0);
        assert_coords_approx_eq!((lat, lng), (1.0, 1.0), 1e-9);
    }

    #[test]
    fn test_validate() {
        assert!(ViewTransform::new(0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0).validate().is_err());
        assert!(ViewTransform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0).validate().is_err());
        let singular = ViewTransform::web_mercator(1.0, 0.0, 0.0).with_matrix(Matrix3::zeros());
        assert_eq!(singular.validate().unwrap_err().kind(), "InvalidView");
        assert!(ViewTransform::web_mercator(1.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_unapply_translation() {
        let matrix = Matrix3::new(1.0, 0.0, 5.0, 0.0, 1.0, -3.0, 0.0, 0.0, 1.0);
        let view = ViewTransform::web_mercator(1.0, 0.0, 0.0).with_matrix(matrix);
        assert!(!view.has_identity_display());
        let inverse = view.inverse_display().unwrap();
        let (qx, qy) = unapply_display(&inverse, 5.0, -3.0);
        assert_coords_approx_eq!((qx, qy), (0.0, 0.0), 1e-12);
    }
}
