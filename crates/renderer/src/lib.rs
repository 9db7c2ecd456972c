//! Colorized rendering of geographic rasters onto a Web Mercator map.
//!
//! Components, leaf first:
//! - `colorscale`: gradients and named scales baked into a 256-entry LUT
//! - `mapper`: raster value to LUT index, with clamp and no-data rules
//! - `sampler`: bounds-checked point sampling
//! - `texture`: device-side copies of rasters and the LUT
//! - `compositor`: the per-pixel pipeline, parallel and sequential
//! - `registry`: anonymous and named datasets plus the current selection
//! - `context`: owns all of the above and is what callers talk to

pub mod colorscale;
pub mod compositor;
pub mod context;
pub mod mapper;
pub mod registry;
pub mod sampler;
pub mod source;
pub mod texture;

pub use colorscale::{Color, ColorLut, ColorScale, ColorScaleRegistry, ColorStop, LUT_SIZE};
pub use compositor::{FrameSnapshot, FrameSource, FrameUniforms, TRANSPARENT};
pub use context::OverlayContext;
pub use mapper::{map_value, MappedValue};
pub use registry::{DatasetEntry, DatasetRegistry};
pub use source::{LoadError, LoadedRaster, RasterLoad, RasterSource};
pub use texture::{DataTexture, TextureHandle, TexturePool};
