//! Common test fixtures.
//!
//! `PARITY_CASES` is the shared table of value-to-color decisions. Both
//! render paths and the point-query API are tested against it rather than
//! against each other.

use overlay_common::{GeoBounds, RasterGrid};

/// Sentinel used by the raster decoder for missing samples.
pub const NO_DATA: f64 = -9999.0;

/// A GeoTIFF sentinel with no exact `f32` representation.
pub const INEXACT_NO_DATA: f64 = -9999.9;

/// GDAL's lowest-float sentinel as written in GeoTIFF metadata.
pub const GDAL_FLOAT_MIN: f64 = -3.40282346639e38;

/// One expected value-to-color decision.
#[derive(Debug, Clone, Copy)]
pub struct ParityCase {
    pub name: &'static str,
    pub value: f32,
    pub low: f64,
    pub high: f64,
    pub clamp_low: bool,
    pub clamp_high: bool,
    pub no_data: Option<f64>,
    /// LUT index, or `None` when the pixel is transparent
    pub index: Option<u8>,
}

impl ParityCase {
    pub fn alpha(&self) -> u8 {
        if self.index.is_some() {
            255
        } else {
            0
        }
    }
}

const fn case(
    name: &'static str,
    value: f32,
    low: f64,
    high: f64,
    clamp_low: bool,
    clamp_high: bool,
    no_data: Option<f64>,
    index: Option<u8>,
) -> ParityCase {
    ParityCase {
        name,
        value,
        low,
        high,
        clamp_low,
        clamp_high,
        no_data,
        index,
    }
}

#[rustfmt::skip]
pub const PARITY_CASES: &[ParityCase] = &[
    case("domain low",            0.0,     0.0,   100.0, false, false, None,          Some(0)),
    case("domain high",           100.0,   0.0,   100.0, false, false, None,          Some(255)),
    case("midpoint rounds up",    50.0,    0.0,   100.0, true,  true,  None,          Some(128)),
    case("half rounds away",      10.0,    0.0,   100.0, true,  true,  None,          Some(26)),
    case("quarter",               25.0,    0.0,   100.0, true,  true,  None,          Some(64)),
    case("three quarters",        75.0,    0.0,   100.0, true,  true,  None,          Some(191)),
    case("negative domain",       -40.0,   -50.0, 50.0,  true,  true,  None,          Some(26)),
    case("kelvin",                273.15,  250.0, 310.0, true,  true,  None,          Some(98)),
    case("below low clamped",     -5.0,    0.0,   100.0, true,  false, None,          Some(0)),
    case("below low unclamped",   -5.0,    0.0,   100.0, false, true,  None,          None),
    case("above high clamped",    150.0,   0.0,   100.0, false, true,  None,          Some(255)),
    case("above high unclamped",  150.0,   0.0,   100.0, true,  false, None,          None),
    case("rounds onto low",       -0.1,    0.0,   100.0, false, false, None,          Some(0)),
    case("rounds onto high",      100.1,   0.0,   100.0, false, false, None,          Some(255)),
    case("rounds past high",      100.3,   0.0,   100.0, true,  false, None,          None),
    case("nan clamped",           f32::NAN, 0.0,  100.0, true,  true,  None,          None),
    case("nan unclamped",         f32::NAN, 0.0,  100.0, false, false, None,          None),
    case("no data clamped",       -9999.0, 0.0,   100.0, true,  true,  Some(NO_DATA), None),
    case("no data inside domain", 42.0,    0.0,   100.0, true,  true,  Some(42.0),    None),
    case("sentinel not set",      -9999.0, 0.0,   100.0, true,  true,  None,          Some(0)),
    case("inexact sentinel",      INEXACT_NO_DATA as f32, 0.0, 100.0, true, true, Some(INEXACT_NO_DATA), None),
    case("float min sentinel",    GDAL_FLOAT_MIN as f32, 0.0, 100.0, true, true, Some(GDAL_FLOAT_MIN), None),
];

/// Bounds of the small equatorial test raster.
pub fn small_bounds() -> GeoBounds {
    match GeoBounds::new(-10.0, 0.0, 10.0, 20.0) {
        Ok(bounds) => bounds,
        Err(e) => panic!("invalid fixture bounds: {}", e),
    }
}

/// The 2x2 end-to-end raster: `[0, 50, 100, NaN]`.
pub fn quad_grid() -> RasterGrid {
    match RasterGrid::new(2, 2, vec![0.0, 50.0, 100.0, f32::NAN]) {
        Ok(grid) => grid,
        Err(e) => panic!("invalid fixture grid: {}", e),
    }
}

/// A 1xN raster holding every parity-case value, in table order.
pub fn parity_row() -> RasterGrid {
    let values = PARITY_CASES.iter().map(|c| c.value).collect::<Vec<_>>();
    match RasterGrid::new(values.len(), 1, values) {
        Ok(grid) => grid,
        Err(e) => panic!("invalid parity grid: {}", e),
    }
}
