//! Synthetic raster generators.
//!
//! These create predictable, verifiable sample patterns that can be used
//! across the test suite and benches.

use overlay_common::RasterGrid;
use rand::Rng;

/// Creates samples where each cell encodes its position as `col * 1000 + row`.
///
/// # Example
///
/// ```
/// use test_utils::create_test_samples;
///
/// let samples = create_test_samples(10, 5);
/// assert_eq!(samples.len(), 50);
/// assert_eq!(samples[1], 1000.0);  // col=1, row=0
/// assert_eq!(samples[10], 1.0);    // col=0, row=1
/// ```
pub fn create_test_samples(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a grid whose values rise linearly from 0 (top-left) to 100 (bottom-right).
pub fn create_ramp_grid(width: usize, height: usize) -> RasterGrid {
    let span = (width + height).saturating_sub(2).max(1) as f32;
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((row + col) as f32 / span * 100.0);
        }
    }
    grid(width, height, data)
}

/// Creates a temperature-like grid in Kelvin (roughly 250K to 310K).
pub fn create_temperature_grid(width: usize, height: usize) -> RasterGrid {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f32 / width.max(1) as f32;
            let y_factor = row as f32 / height.max(1) as f32;
            data.push(250.0 + (x_factor * 30.0) + (y_factor * 30.0));
        }
    }
    grid(width, height, data)
}

/// Creates a ramp grid with every `stride`-th cell replaced by `hole`.
///
/// Use `f32::NAN` or a no-data sentinel as the hole value.
pub fn create_grid_with_holes(width: usize, height: usize, stride: usize, hole: f32) -> RasterGrid {
    let ramp = create_ramp_grid(width, height);
    let stride = stride.max(1);
    let data = ramp
        .samples()
        .iter()
        .enumerate()
        .map(|(i, &v)| if i % stride == 0 { hole } else { v })
        .collect();
    grid(width, height, data)
}

/// Creates a grid of uniform random values in `[low, high)`.
pub fn create_noise_grid(width: usize, height: usize, low: f32, high: f32) -> RasterGrid {
    let mut rng = rand::thread_rng();
    let data = (0..width * height).map(|_| rng.gen_range(low..high)).collect();
    grid(width, height, data)
}

fn grid(width: usize, height: usize, data: Vec<f32>) -> RasterGrid {
    match RasterGrid::new(width, height, data) {
        Ok(grid) => grid,
        Err(e) => panic!("generator produced an invalid grid: {}", e),
    }
}
