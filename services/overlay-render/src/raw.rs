//! Raw little-endian `f32` raster files.
//!
//! The file holds `width * height` samples, row-major, north row first, with
//! no header. Anything else is rejected as a whole.

use overlay_common::{GeoBounds, RasterGrid};
use renderer::{LoadError, LoadedRaster, RasterLoad, RasterSource};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RawFileSource {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub bounds: GeoBounds,
    pub no_data: Option<f64>,
}

/// Decode a packed little-endian `f32` buffer.
pub fn decode_samples(bytes: &[u8], width: usize, height: usize) -> Result<Vec<f32>, LoadError> {
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| LoadError::Decode(format!("{}x{} raster is too large", width, height)))?;
    if bytes.len() != expected {
        return Err(LoadError::Decode(format!(
            "expected {} bytes for {}x{} f32 samples, got {}",
            expected,
            width,
            height,
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

impl RasterSource for RawFileSource {
    fn load(&self) -> RasterLoad {
        let bytes = std::fs::read(&self.path)?;
        let samples = decode_samples(&bytes, self.width, self.height)?;
        let grid = RasterGrid::new(self.width, self.height, samples)?.with_no_data(self.no_data);
        self.bounds.validate()?;
        debug!(
            path = %self.path.display(),
            width = self.width,
            height = self.height,
            "Loaded raw raster"
        );
        Ok(LoadedRaster::new(grid, self.bounds))
    }
}
