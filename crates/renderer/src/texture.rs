//! Device-side resources for the parallel render path.
//!
//! The pool stands in for GPU memory: uploading copies the samples into a
//! pool-owned texture, and every texture has to be released explicitly.
//! Live counts let callers check that replacement never leaks.

use overlay_common::RasterGrid;
use projection::nearest_texel;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::colorscale::ColorLut;

/// Opaque handle to a texture owned by a [`TexturePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u64);

impl TextureHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Single-channel float texture sampled with nearest filtering.
#[derive(Debug, Clone)]
pub struct DataTexture {
    width: usize,
    height: usize,
    texels: Arc<[f32]>,
}

impl DataTexture {
    fn upload(grid: &RasterGrid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            texels: Arc::from(grid.samples()),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest texel at normalized coordinate `(u, v)`; `None` outside `[0, 1)`.
    #[inline]
    pub fn fetch(&self, u: f64, v: f64) -> Option<f32> {
        let col = nearest_texel(u, self.width)?;
        let row = nearest_texel(v, self.height)?;
        Some(self.texels[row * self.width + col])
    }
}

/// Allocator for data textures and the single color-scale texture.
#[derive(Debug, Default)]
pub struct TexturePool {
    next_id: u64,
    data: HashMap<TextureHandle, DataTexture>,
    scale: Option<(TextureHandle, Arc<ColorLut>)>,
}

impl TexturePool {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> TextureHandle {
        self.next_id += 1;
        TextureHandle(self.next_id)
    }

    /// Copy a grid's samples into a new texture.
    pub fn upload_data(&mut self, grid: &RasterGrid) -> TextureHandle {
        let handle = self.allocate();
        self.data.insert(handle, DataTexture::upload(grid));
        debug!(
            texture = handle.0,
            width = grid.width(),
            height = grid.height(),
            live = self.data.len(),
            "Uploaded data texture"
        );
        handle
    }

    /// Free a data texture. Returns false if the handle was not live.
    pub fn release(&mut self, handle: TextureHandle) -> bool {
        let released = self.data.remove(&handle).is_some();
        if released {
            debug!(texture = handle.0, live = self.data.len(), "Released data texture");
        }
        released
    }

    pub fn data(&self, handle: TextureHandle) -> Option<&DataTexture> {
        self.data.get(&handle)
    }

    /// Replace the color-scale texture. The previous one is freed first.
    pub fn upload_scale(&mut self, lut: Arc<ColorLut>) -> TextureHandle {
        if let Some((old, _)) = self.scale.take() {
            debug!(texture = old.0, "Released scale texture");
        }
        let handle = self.allocate();
        self.scale = Some((handle, lut));
        debug!(texture = handle.0, "Uploaded scale texture");
        handle
    }

    pub fn scale(&self) -> Option<&Arc<ColorLut>> {
        self.scale.as_ref().map(|(_, lut)| lut)
    }

    pub fn live_data_textures(&self) -> usize {
        self.data.len()
    }

    pub fn live_scale_textures(&self) -> usize {
        usize::from(self.scale.is_some())
    }
}
