//! Geographic bounds of a raster.

use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, OverlayResult};

/// Extent of a raster sampled on a regular lat/lng grid, in degrees.
///
/// Row 0 of the raster lies on the `north` edge, column 0 on the `west` edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Create bounds, rejecting empty or inverted extents.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> OverlayResult<Self> {
        let bounds = Self {
            south,
            west,
            north,
            east,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Bounds from two opposite corners given as `[lat, lng]` pairs, in any order.
    ///
    /// This is the shape raster decoders hand over (`[[y_min, x_min], [y_max, x_max]]`),
    /// where the "min" corner may actually be the northern one.
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> OverlayResult<Self> {
        Self::new(a[0].min(b[0]), a[1].min(b[1]), a[0].max(b[0]), a[1].max(b[1]))
    }

    /// Check the `south < north`, `west < east` invariant.
    pub fn validate(&self) -> OverlayResult<()> {
        let all_finite = [self.south, self.west, self.north, self.east]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(OverlayError::InvalidBounds(format!(
                "non-finite bounds {:?}",
                self
            )));
        }
        if self.south >= self.north {
            return Err(OverlayError::InvalidBounds(format!(
                "south {} must be below north {}",
                self.south, self.north
            )));
        }
        if self.west >= self.east {
            return Err(OverlayError::InvalidBounds(format!(
                "west {} must be below east {}",
                self.west, self.east
            )));
        }
        Ok(())
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude span in degrees.
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Check if a point lies within the bounds (edges inclusive).
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }
}
