//! Visible on-screen rectangle of a raster overlay.

use overlay_common::GeoBounds;

use crate::transform::ViewTransform;

/// The part of the viewport covered by the raster, in viewport pixels.
///
/// `width` or `height` may be zero or negative when the raster is scrolled
/// off-screen; renderers treat that as an empty frame, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotWindow {
    pub x_start: i64,
    pub y_start: i64,
    pub width: i64,
    pub height: i64,
}

impl PlotWindow {
    /// Clip the raster's projected extent to a `viewport_width` x `viewport_height` viewport.
    ///
    /// `view` must have its origin at the viewport's top-left corner.
    pub fn visible(
        view: &ViewTransform,
        bounds: &GeoBounds,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Self {
        let (x_nw, y_nw) = view.project(bounds.north, bounds.west);
        let (x_se, y_se) = view.project(bounds.south, bounds.east);

        let x_start = x_nw.min(x_se).max(0.0).floor();
        let y_start = y_nw.min(y_se).max(0.0).floor();
        let x_finish = x_nw.max(x_se).min(viewport_width as f64).ceil();
        let y_finish = y_nw.max(y_se).min(viewport_height as f64).ceil();

        Self {
            x_start: x_start as i64,
            y_start: y_start as i64,
            width: (x_finish - x_start) as i64,
            height: (y_finish - y_start) as i64,
        }
    }

    /// Whether nothing of the raster is visible.
    pub fn is_offscreen(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// View whose pixel `(0, 0)` is this window's top-left corner.
    pub fn view_for(&self, view: &ViewTransform) -> ViewTransform {
        view.offset(self.x_start as f64, self.y_start as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_inside_viewport() {
        // Zoom 0 world is 256px; the whole world fits in a 512px viewport.
        let view = ViewTransform::web_mercator(0.0, 0.0, 0.0);
        let bounds = GeoBounds::new(0.0, 0.0, 45.0, 90.0).unwrap();
        let window = PlotWindow::visible(&view, &bounds, 512, 512);

        assert_eq!(window.x_start, 128);
        assert!((window.width - 64).abs() <= 1, "width {}", window.width);
        assert_eq!(window.y_start, 92);
        assert!((window.y_start + window.height - 128).abs() <= 1);
        assert!(!window.is_offscreen());
    }

    #[test]
    fn test_clipped_to_viewport() {
        let view = ViewTransform::web_mercator(0.0, 0.0, 0.0);
        let bounds = GeoBounds::new(-85.0, -180.0, 85.0, 180.0).unwrap();
        let window = PlotWindow::visible(&view, &bounds, 100, 60);
        assert_eq!((window.x_start, window.y_start), (0, 0));
        assert_eq!((window.width, window.height), (100, 60));
    }

    #[test]
    fn test_offscreen() {
        // Viewport sits over the western hemisphere; raster is in the east.
        let view = ViewTransform::web_mercator(1.0, 0.0, 0.0);
        let bounds = GeoBounds::new(0.0, 100.0, 10.0, 120.0).unwrap();
        let window = PlotWindow::visible(&view, &bounds, 200, 512);
        assert!(window.is_offscreen());
    }

    #[test]
    fn test_view_for_moves_origin() {
        let view = ViewTransform::web_mercator(0.0, 0.0, 0.0);
        let bounds = GeoBounds::new(0.0, 0.0, 45.0, 90.0).unwrap();
        let window = PlotWindow::visible(&view, &bounds, 512, 512);
        let local = window.view_for(&view);
        assert_eq!(local.lng_at(0.0), view.lng_at(window.x_start as f64));
    }
}
