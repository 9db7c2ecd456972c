//! Stateless per-pixel kernel.
//!
//! The kernel's inputs are spelled out in [`FrameUniforms`] so the fan-out
//! strategy (rayon here) can change without touching the pipeline itself.

use image::RgbaImage;
use nalgebra::Matrix3;
use overlay_common::Domain;
use projection::transform::unapply_display;
use projection::{RasterLocator, ViewTransform};
use rayon::prelude::*;

use super::{resolve_color, TRANSPARENT};
use crate::colorscale::ColorLut;
use crate::mapper::map_value;
use crate::texture::DataTexture;

/// Per-frame constants shared by every kernel invocation.
#[derive(Debug, Clone, Copy)]
pub struct FrameUniforms {
    pub view: ViewTransform,
    /// Inverse display matrix; `None` when the display matrix is the identity
    pub inverse_display: Option<Matrix3<f64>>,
    pub locator: RasterLocator,
    pub domain: Domain,
    pub no_data: Option<f64>,
}

impl FrameUniforms {
    pub fn new(
        view: ViewTransform,
        locator: RasterLocator,
        domain: Domain,
        no_data: Option<f64>,
    ) -> Self {
        let inverse_display = if view.has_identity_display() {
            None
        } else {
            view.inverse_display()
        };
        Self {
            view,
            inverse_display,
            locator,
            domain,
            no_data,
        }
    }
}

/// Color of output pixel `(x, y)`.
#[inline]
pub fn shade(uniforms: &FrameUniforms, texture: &DataTexture, lut: &ColorLut, x: f64, y: f64) -> [u8; 4] {
    let (qx, qy) = match &uniforms.inverse_display {
        Some(inverse) => unapply_display(inverse, x, y),
        None => (x, y),
    };
    let (u, v) = uniforms.locator.texcoord(&uniforms.view, qx, qy);
    match texture.fetch(u, v) {
        Some(value) => resolve_color(map_value(value, &uniforms.domain, uniforms.no_data), lut),
        None => TRANSPARENT,
    }
}

pub(super) fn render(uniforms: &FrameUniforms, texture: &DataTexture, lut: &ColorLut, image: &mut RgbaImage) {
    let width = image.width() as usize;
    let pixels: &mut [u8] = image;

    pixels
        .par_chunks_mut(4)
        .with_min_len(width.max(1))
        .enumerate()
        .for_each(|(i, pixel)| {
            let x = (i % width) as f64;
            let y = (i / width) as f64;
            pixel.copy_from_slice(&shade(uniforms, texture, lut, x, y));
        });
}
