//! Scalar row-major render loop.

use image::RgbaImage;
use overlay_common::{Domain, RasterGrid};
use projection::{RasterLocator, ViewTransform};

use super::{resolve_color, TRANSPARENT};
use crate::colorscale::ColorLut;
use crate::mapper::map_value;

/// Fill `image` one pixel at a time.
///
/// Latitude depends only on the output row and longitude only on the output
/// column, so the raster row is resolved once per line and the raster
/// columns once per frame.
pub(super) fn render(
    view: &ViewTransform,
    locator: &RasterLocator,
    grid: &RasterGrid,
    domain: &Domain,
    no_data: Option<f64>,
    lut: &ColorLut,
    image: &mut RgbaImage,
) {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let cols: Vec<Option<usize>> = (0..width)
        .map(|x| locator.col_at(view.lng_at(x as f64)))
        .collect();

    let pixels: &mut [u8] = image;
    for y in 0..height {
        let row = locator.row_at(view.lat_at(y as f64));
        let line = &mut pixels[y * width * 4..(y + 1) * width * 4];

        for (x, col) in cols.iter().enumerate() {
            let color = match (row, *col) {
                (Some(row), Some(col)) => match grid.get(row, col) {
                    Some(value) => resolve_color(map_value(value, domain, no_data), lut),
                    None => TRANSPARENT,
                },
                _ => TRANSPARENT,
            };
            line[x * 4..x * 4 + 4].copy_from_slice(&color);
        }
    }
}
