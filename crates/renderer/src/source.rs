//! Hand-off contract with raster loaders.
//!
//! Decoding happens outside the renderer. A loader delivers either a complete
//! validated grid with its bounds, or a failure; there is no partial state.

use overlay_common::{GeoBounds, OverlayError, RasterGrid};
use thiserror::Error;

/// A fully materialized raster ready for registration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRaster {
    pub grid: RasterGrid,
    pub bounds: GeoBounds,
}

impl LoadedRaster {
    pub fn new(grid: RasterGrid, bounds: GeoBounds) -> Self {
        Self { grid, bounds }
    }
}

/// Why a loader could not produce a raster.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Invalid(#[from] OverlayError),
}

/// Outcome of one load.
pub type RasterLoad = Result<LoadedRaster, LoadError>;

/// Anything that can produce a raster on demand.
pub trait RasterSource {
    fn load(&self) -> RasterLoad;
}

impl<F> RasterSource for F
where
    F: Fn() -> RasterLoad,
{
    fn load(&self) -> RasterLoad {
        self()
    }
}
