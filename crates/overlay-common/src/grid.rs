//! Single-band scalar raster grids.

use crate::error::{OverlayError, OverlayResult};

/// A fully materialized single-band raster.
///
/// Samples are stored row-major, row 0 first (the north edge).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    width: usize,
    height: usize,
    samples: Vec<f32>,
    no_data_value: Option<f64>,
}

impl RasterGrid {
    /// Create a new grid.
    ///
    /// Fails with `InvalidGrid` if either dimension is zero or the sample
    /// count does not equal `width * height`.
    pub fn new(width: usize, height: usize, samples: Vec<f32>) -> OverlayResult<Self> {
        if width == 0 || height == 0 {
            return Err(OverlayError::InvalidGrid(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            OverlayError::InvalidGrid(format!("dimensions {}x{} overflow", width, height))
        })?;
        if samples.len() != expected {
            return Err(OverlayError::InvalidGrid(format!(
                "expected {} samples for {}x{}, got {}",
                expected,
                width,
                height,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
            no_data_value: None,
        })
    }

    /// Attach the source's no-data sentinel.
    pub fn with_no_data(mut self, no_data_value: Option<f64>) -> Self {
        self.no_data_value = no_data_value;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn no_data_value(&self) -> Option<f64> {
        self.no_data_value
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.height && col < self.width {
            Some(self.samples[row * self.width + col])
        } else {
            None
        }
    }
}
