//! Nearest-neighbor raster sampling.

use overlay_common::{OverlayError, OverlayResult, RasterGrid};

/// Sample at `(row, col)` for direct queries.
///
/// Off-grid indices are a caller error here. Inside a frame the compositor
/// uses [`RasterGrid::get`] and treats `None` as no-data instead.
pub fn sample(grid: &RasterGrid, row: usize, col: usize) -> OverlayResult<f32> {
    grid.get(row, col).ok_or(OverlayError::IndexOutOfBounds {
        row,
        col,
        width: grid.width(),
        height: grid.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_in_range() {
        let grid = RasterGrid::new(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(sample(&grid, 0, 0).unwrap(), 1.0);
        assert_eq!(sample(&grid, 1, 2).unwrap(), 6.0);
    }

    #[test]
    fn test_sample_out_of_range() {
        let grid = RasterGrid::new(3, 2, vec![0.0; 6]).unwrap();
        let err = sample(&grid, 2, 0).unwrap_err();
        assert_eq!(
            err,
            OverlayError::IndexOutOfBounds {
                row: 2,
                col: 0,
                width: 3,
                height: 2
            }
        );
        assert!(sample(&grid, 0, 3).is_err());
    }
}
