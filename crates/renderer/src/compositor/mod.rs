//! Frame compositor.
//!
//! Drives the per-pixel pipeline (inverse projection, sampling, domain
//! mapping, LUT lookup) over an output rectangle. There are two paths:
//!
//! - `parallel`: a stateless kernel evaluated independently per pixel
//!   over a data texture, fanned out with rayon.
//! - `sequential`: a scalar row-major loop over the raster grid.
//!
//! Both go through [`crate::mapper::map_value`] and the floor convention in
//! [`projection::nearest_texel`], so alpha and LUT index agree pixel for pixel.

mod parallel;
mod sequential;

pub use parallel::{shade, FrameUniforms};

use image::RgbaImage;
use overlay_common::{Domain, GeoBounds, OverlayError, OverlayResult, RasterGrid, RenderMode};
use projection::{RasterLocator, ViewTransform};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::colorscale::ColorLut;
use crate::mapper::MappedValue;
use crate::texture::DataTexture;

/// Value written for transparent pixels on both paths.
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Final pixel color for a mapped value.
#[inline]
pub(crate) fn resolve_color(mapped: MappedValue, lut: &ColorLut) -> [u8; 4] {
    if mapped.is_transparent() {
        TRANSPARENT
    } else {
        lut.get(mapped.index)
    }
}

/// Where a frame reads its samples from.
#[derive(Debug, Clone)]
pub enum FrameSource {
    /// Device texture, for the parallel kernel
    Texture(DataTexture),
    /// Host raster, for the sequential loop
    Grid(Arc<RasterGrid>),
}

impl FrameSource {
    pub fn mode(&self) -> RenderMode {
        match self {
            FrameSource::Texture(_) => RenderMode::Parallel,
            FrameSource::Grid(_) => RenderMode::Sequential,
        }
    }

    fn dimensions(&self) -> (usize, usize) {
        match self {
            FrameSource::Texture(t) => (t.width(), t.height()),
            FrameSource::Grid(g) => (g.width(), g.height()),
        }
    }
}

/// Everything one render needs, captured at a point in time.
///
/// Snapshots share the raster and LUT through `Arc`s and never observe later
/// changes to the context they came from, so one can be moved to a worker
/// thread while the context keeps being mutated.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    source: FrameSource,
    bounds: GeoBounds,
    lut: Arc<ColorLut>,
    domain: Domain,
    no_data: Option<f64>,
}

impl FrameSnapshot {
    pub fn new(
        source: FrameSource,
        bounds: GeoBounds,
        lut: Arc<ColorLut>,
        domain: Domain,
        no_data: Option<f64>,
    ) -> Self {
        Self {
            source,
            bounds,
            lut,
            domain,
            no_data,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.source.mode()
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn no_data(&self) -> Option<f64> {
        self.no_data
    }

    pub fn lut(&self) -> &ColorLut {
        &self.lut
    }

    fn locator(&self) -> RasterLocator {
        let (width, height) = self.source.dimensions();
        RasterLocator::new(self.bounds, width, height)
    }

    /// Render a `width` x `height` frame.
    ///
    /// A non-positive size is the offscreen case and yields an empty image.
    pub fn render(&self, view: &ViewTransform, width: i64, height: i64) -> OverlayResult<RgbaImage> {
        if width <= 0 || height <= 0 {
            warn!(width, height, "Overlay is offscreen, rendering empty frame");
            return Ok(RgbaImage::new(0, 0));
        }
        let out_width = u32::try_from(width)
            .map_err(|_| OverlayError::InvalidView(format!("output width {} too large", width)))?;
        let out_height = u32::try_from(height)
            .map_err(|_| OverlayError::InvalidView(format!("output height {} too large", height)))?;
        view.validate()?;

        let start = Instant::now();
        let mut image = RgbaImage::new(out_width, out_height);
        let locator = self.locator();

        match &self.source {
            FrameSource::Texture(texture) => {
                let uniforms = FrameUniforms::new(*view, locator, self.domain, self.no_data);
                parallel::render(&uniforms, texture, &self.lut, &mut image);
            }
            FrameSource::Grid(grid) => sequential::render(
                view,
                &locator,
                grid,
                &self.domain,
                self.no_data,
                &self.lut,
                &mut image,
            ),
        }

        debug!(
            mode = ?self.mode(),
            width = out_width,
            height = out_height,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Rendered frame"
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TexturePool;

    fn grid() -> RasterGrid {
        RasterGrid::new(2, 2, vec![0.0, 50.0, 100.0, f32::NAN]).unwrap()
    }

    fn bounds() -> GeoBounds {
        GeoBounds::new(-10.0, 0.0, 10.0, 20.0).unwrap()
    }

    fn lut() -> Arc<ColorLut> {
        let bytes: Vec<u8> = (0..=255u8).flat_map(|i| [i, i, i, 255]).collect();
        Arc::new(ColorLut::from_bytes(&bytes).unwrap())
    }

    fn snapshots() -> [FrameSnapshot; 2] {
        let domain = Domain::new(0.0, 100.0).unwrap();
        let mut pool = TexturePool::new();
        let handle = pool.upload_data(&grid());
        let texture = pool.data(handle).unwrap().clone();
        [
            FrameSnapshot::new(FrameSource::Texture(texture), bounds(), lut(), domain, None),
            FrameSnapshot::new(FrameSource::Grid(Arc::new(grid())), bounds(), lut(), domain, None),
        ]
    }

    #[test]
    fn test_fitted_quad() {
        let view = ViewTransform::fit_bounds(&bounds(), 2, 2).unwrap();
        for snapshot in snapshots() {
            let image = snapshot.render(&view, 2, 2).unwrap();
            assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255], "{:?}", snapshot.mode());
            assert_eq!(image.get_pixel(1, 0).0, [128, 128, 128, 255]);
            assert_eq!(image.get_pixel(0, 1).0, [255, 255, 255, 255]);
            assert_eq!(image.get_pixel(1, 1).0, TRANSPARENT);
        }
    }

    #[test]
    fn test_non_positive_size_is_empty() {
        let view = ViewTransform::web_mercator(0.0, 0.0, 0.0);
        for snapshot in snapshots() {
            for (w, h) in [(0, 10), (10, 0), (-5, 10), (3, -1)] {
                let image = snapshot.render(&view, w, h).unwrap();
                assert_eq!(image.dimensions(), (0, 0));
            }
        }
    }

    #[test]
    fn test_invalid_view_rejected() {
        let view = ViewTransform::new(0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0);
        for snapshot in snapshots() {
            assert_eq!(snapshot.render(&view, 4, 4).unwrap_err().kind(), "InvalidView");
        }
    }

    #[test]
    fn test_snapshot_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrameSnapshot>();
    }
}
