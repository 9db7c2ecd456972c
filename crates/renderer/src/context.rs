//! The render context.
//!
//! An `OverlayContext` owns everything that used to be ambient state: the
//! color scales, the active LUT, the domain and no-data settings, and the
//! dataset registry with its current selection. Every render goes through
//! it (or through a snapshot taken from it).

use image::RgbaImage;
use overlay_common::{
    ColorScaleSpec, Domain, GeoBounds, OverlayConfig, OverlayError, OverlayResult, RasterGrid,
    RenderMode,
};
use projection::{RasterLocator, ViewTransform};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::colorscale::{ColorLut, ColorScaleRegistry, ColorStop};
use crate::compositor::{resolve_color, FrameSnapshot, FrameSource};
use crate::mapper::map_value;
use crate::registry::{DatasetEntry, DatasetRegistry};
use crate::sampler::sample;
use crate::source::RasterLoad;

const DEFAULT_COLOR_SCALE: &str = "viridis";

#[derive(Debug)]
pub struct OverlayContext {
    mode: RenderMode,
    scales: ColorScaleRegistry,
    lut: Arc<ColorLut>,
    domain: Domain,
    no_data: Option<f64>,
    datasets: DatasetRegistry,
}

impl OverlayContext {
    /// Context with the default scale (viridis), domain `[0, 1]` and both sides clamped.
    ///
    /// The render mode is fixed for the lifetime of the context.
    pub fn new(mode: RenderMode) -> OverlayResult<Self> {
        let scales = ColorScaleRegistry::with_builtins();
        let lut = Arc::new(scales.build(DEFAULT_COLOR_SCALE)?);
        let datasets = match mode {
            RenderMode::Parallel => DatasetRegistry::with_textures(),
            RenderMode::Sequential => DatasetRegistry::new(),
        };

        let mut context = Self {
            mode,
            scales,
            lut,
            domain: Domain::default(),
            no_data: None,
            datasets,
        };
        context.upload_scale();
        Ok(context)
    }

    /// Context configured from an [`OverlayConfig`].
    pub fn from_config(config: &OverlayConfig) -> OverlayResult<Self> {
        let domain = config.domain()?;
        let mut context = Self::new(config.render_mode)?;
        context.set_color_scale_spec(&config.color_scale)?;
        context.domain = domain;
        context.no_data = config.no_data_value;
        debug!(
            mode = ?config.render_mode,
            low = domain.low(),
            high = domain.high(),
            "Created overlay context from config"
        );
        Ok(context)
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    // ========================================================================
    // Color scale
    // ========================================================================

    fn install_lut(&mut self, lut: ColorLut) {
        self.lut = Arc::new(lut);
        self.upload_scale();
    }

    fn upload_scale(&mut self) {
        let lut = Arc::clone(&self.lut);
        if let Some(pool) = self.datasets.textures_mut() {
            pool.upload_scale(lut);
        }
    }

    /// Activate a registered scale by name.
    pub fn set_color_scale(&mut self, name: &str) -> OverlayResult<()> {
        let lut = self.scales.build(name)?;
        self.install_lut(lut);
        debug!(scale = name, "Rebuilt color scale");
        Ok(())
    }

    /// Activate an ad-hoc gradient.
    pub fn set_color_scale_stops(&mut self, stops: &[ColorStop]) -> OverlayResult<()> {
        let lut = ColorLut::from_stops(stops)?;
        self.install_lut(lut);
        debug!(stops = stops.len(), "Rebuilt color scale");
        Ok(())
    }

    /// Activate a precomputed 256-entry RGBA table.
    pub fn set_color_scale_lut(&mut self, bytes: &[u8]) -> OverlayResult<()> {
        let lut = ColorLut::from_bytes(bytes)?;
        self.install_lut(lut);
        debug!("Installed precomputed color scale");
        Ok(())
    }

    pub fn set_color_scale_spec(&mut self, spec: &ColorScaleSpec) -> OverlayResult<()> {
        let lut = self.scales.resolve(spec)?;
        self.install_lut(lut);
        Ok(())
    }

    /// Register a named gradient for later use with [`Self::set_color_scale`].
    pub fn add_color_scale(&mut self, name: &str, colors: &[&str], positions: &[f64]) -> OverlayResult<()> {
        self.scales.add_color_scale(name, colors, positions)?;
        debug!(scale = name, "Registered color scale");
        Ok(())
    }

    pub fn color_scales(&self) -> &ColorScaleRegistry {
        &self.scales
    }

    /// The active LUT as 1024 RGBA bytes.
    pub fn color_scale_bytes(&self) -> &[u8] {
        self.lut.as_bytes()
    }

    /// The active LUT as a 256x1 image.
    pub fn color_scale_image(&self) -> RgbaImage {
        self.lut.to_image()
    }

    // ========================================================================
    // Domain
    // ========================================================================

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Set `[low, high]`, keeping the clamp flags.
    pub fn set_domain(&mut self, low: f64, high: f64) -> OverlayResult<()> {
        let domain = Domain::new(low, high)?;
        self.domain = domain.with_clamp(self.domain.clamp_low(), self.domain.clamp_high());
        Ok(())
    }

    /// Set the domain from a `[low, high]` slice.
    pub fn set_domain_slice(&mut self, values: &[f64]) -> OverlayResult<()> {
        let domain = Domain::from_slice(values)?;
        self.set_domain(domain.low(), domain.high())
    }

    /// Set both clamp flags; `high` defaults to `low`.
    pub fn set_clamp(&mut self, low: bool, high: Option<bool>) {
        self.domain = self.domain.with_clamp(low, high.unwrap_or(low));
    }

    pub fn set_clamp_low(&mut self, clamp: bool) {
        self.domain = self.domain.with_clamp(clamp, self.domain.clamp_high());
    }

    pub fn set_clamp_high(&mut self, clamp: bool) {
        self.domain = self.domain.with_clamp(self.domain.clamp_low(), clamp);
    }

    pub fn set_no_data_value(&mut self, no_data: Option<f64>) {
        self.no_data = no_data;
    }

    /// No-data sentinel in effect for `grid`.
    fn effective_no_data(&self, grid: Option<&RasterGrid>) -> Option<f64> {
        self.no_data.or_else(|| grid.and_then(RasterGrid::no_data_value))
    }

    // ========================================================================
    // Datasets
    // ========================================================================

    pub fn set_data(&mut self, grid: RasterGrid, bounds: GeoBounds) -> OverlayResult<()> {
        self.datasets.set_data(grid, bounds)
    }

    pub fn add_dataset(&mut self, id: &str, grid: RasterGrid, bounds: GeoBounds) -> OverlayResult<()> {
        self.datasets.add_dataset(id, grid, bounds)
    }

    pub fn set_current_dataset(&mut self, id: &str) -> OverlayResult<()> {
        self.datasets.set_current_dataset(id)
    }

    pub fn remove_dataset(&mut self, id: &str) -> OverlayResult<()> {
        self.datasets.remove_dataset(id)
    }

    pub fn dataset_available(&self, id: &str) -> bool {
        self.datasets.dataset_available(id)
    }

    pub fn datasets(&self) -> &DatasetRegistry {
        &self.datasets
    }

    /// Register the outcome of an external load.
    ///
    /// `None` replaces the anonymous dataset, `Some(id)` adds a named one.
    /// A failed load leaves the registry untouched.
    pub fn accept_load(&mut self, id: Option<&str>, load: RasterLoad) -> OverlayResult<()> {
        let loaded = match load {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(id = id.unwrap_or("<anonymous>"), error = %e, "Raster load failed");
                return Err(OverlayError::Load(e.to_string()));
            }
        };
        match id {
            Some(id) => self.add_dataset(id, loaded.grid, loaded.bounds),
            None => self.set_data(loaded.grid, loaded.bounds),
        }
    }

    /// Raw grid of the current dataset.
    pub fn data(&self) -> OverlayResult<&RasterGrid> {
        Ok(self.datasets.require_current()?.grid())
    }

    /// Number of data and scale textures currently allocated.
    pub fn live_textures(&self) -> (usize, usize) {
        self.datasets
            .textures()
            .map(|pool| (pool.live_data_textures(), pool.live_scale_textures()))
            .unwrap_or((0, 0))
    }

    // ========================================================================
    // Point queries
    // ========================================================================

    /// Raster value at `(row, col)` of the current dataset.
    pub fn value_at(&self, row: usize, col: usize) -> OverlayResult<f32> {
        sample(self.data()?, row, col)
    }

    /// Raster value under a geographic point, `None` off the raster.
    pub fn value_at_lat_lng(&self, lat: f64, lng: f64) -> OverlayResult<Option<f32>> {
        let entry = self.datasets.require_current()?;
        let locator = RasterLocator::for_grid(*entry.bounds(), entry.grid());
        Ok(locator
            .cell_at_lat_lng(lat, lng)
            .and_then(|(row, col)| entry.grid().get(row, col)))
    }

    /// Color a value would be drawn with, without rendering a frame.
    pub fn color_at(&self, value: f32) -> [u8; 4] {
        let grid = self.datasets.current().map(|entry| entry.grid().as_ref());
        let mapped = map_value(value, &self.domain, self.effective_no_data(grid));
        resolve_color(mapped, &self.lut)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn source_for(&self, entry: &DatasetEntry) -> FrameSource {
        let texture = self
            .datasets
            .textures()
            .zip(entry.texture())
            .and_then(|(pool, handle)| pool.data(handle));
        match texture {
            Some(texture) => FrameSource::Texture(texture.clone()),
            None => FrameSource::Grid(Arc::clone(entry.grid())),
        }
    }

    /// Capture the current dataset and settings for rendering elsewhere.
    pub fn snapshot(&self) -> OverlayResult<FrameSnapshot> {
        let entry = self.datasets.require_current()?;
        let lut = self
            .datasets
            .textures()
            .and_then(|pool| pool.scale())
            .unwrap_or(&self.lut);
        Ok(FrameSnapshot::new(
            self.source_for(entry),
            *entry.bounds(),
            Arc::clone(lut),
            self.domain,
            self.effective_no_data(Some(entry.grid())),
        ))
    }

    /// Render the current dataset into a `width` x `height` frame.
    pub fn render(&self, view: &ViewTransform, width: i64, height: i64) -> OverlayResult<RgbaImage> {
        self.snapshot()?.render(view, width, height)
    }

    /// Select a named dataset, then render it.
    pub fn render_dataset(
        &mut self,
        id: &str,
        view: &ViewTransform,
        width: i64,
        height: i64,
    ) -> OverlayResult<RgbaImage> {
        self.set_current_dataset(id)?;
        self.render(view, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> GeoBounds {
        GeoBounds::new(-10.0, 0.0, 10.0, 20.0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let context = OverlayContext::new(RenderMode::Parallel).unwrap();
        assert_eq!(context.domain(), &Domain::default());
        assert_eq!(context.color_scale_bytes().len(), 1024);
        assert_eq!(context.live_textures(), (0, 1));
    }

    #[test]
    fn test_failed_rebuild_keeps_lut() {
        let mut context = OverlayContext::new(RenderMode::Sequential).unwrap();
        let before = context.color_scale_bytes().to_vec();
        assert_eq!(context.set_color_scale("nope").unwrap_err().kind(), "InvalidColorScale");
        assert_eq!(context.color_scale_bytes(), before.as_slice());
    }

    #[test]
    fn test_set_clamp_shorthand() {
        let mut context = OverlayContext::new(RenderMode::Sequential).unwrap();
        context.set_clamp(false, None);
        assert!(!context.domain().clamp_low() && !context.domain().clamp_high());
        context.set_clamp(false, Some(true));
        assert!(!context.domain().clamp_low() && context.domain().clamp_high());
    }

    #[test]
    fn test_set_domain_keeps_clamps() {
        let mut context = OverlayContext::new(RenderMode::Sequential).unwrap();
        context.set_clamp(false, Some(true));
        context.set_domain(10.0, 20.0).unwrap();
        assert_eq!(context.domain().low(), 10.0);
        assert!(!context.domain().clamp_low());
        assert_eq!(context.set_domain(5.0, 5.0).unwrap_err().kind(), "InvalidDomain");
        assert_eq!(context.set_domain_slice(&[1.0]).unwrap_err().kind(), "InvalidDomain");
    }

    #[test]
    fn test_grid_no_data_used_when_unset() {
        let mut context = OverlayContext::new(RenderMode::Sequential).unwrap();
        let grid = RasterGrid::new(1, 1, vec![0.5]).unwrap().with_no_data(Some(0.5));
        context.set_data(grid, bounds()).unwrap();
        assert_eq!(context.color_at(0.5)[3], 0);

        context.set_no_data_value(Some(-1.0));
        assert_eq!(context.color_at(0.5)[3], 255);
    }

    #[test]
    fn test_value_at_lat_lng() {
        let mut context = OverlayContext::new(RenderMode::Sequential).unwrap();
        assert_eq!(context.value_at_lat_lng(0.0, 0.0).unwrap_err(), OverlayError::NoDataset);

        let grid = RasterGrid::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        context.set_data(grid, bounds()).unwrap();
        assert_eq!(context.value_at_lat_lng(5.0, 5.0).unwrap(), Some(1.0));
        assert_eq!(context.value_at_lat_lng(-5.0, 15.0).unwrap(), Some(4.0));
        assert_eq!(context.value_at_lat_lng(50.0, 5.0).unwrap(), None);
    }
}
