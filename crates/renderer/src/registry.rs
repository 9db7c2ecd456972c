//! Dataset registry.
//!
//! Holds the anonymous dataset (set with [`DatasetRegistry::set_data`]) and
//! any number of named ones, plus the current-dataset selection. In parallel
//! mode every dataset also owns a data texture in the registry's pool; a
//! slot's texture is always released before its replacement is uploaded.
//!
//! The anonymous dataset only lives while it is current. Selecting a named
//! dataset drops it. The first named dataset added while nothing is current
//! becomes current.

use overlay_common::{GeoBounds, OverlayError, OverlayResult, RasterGrid};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::texture::{TextureHandle, TexturePool};

/// One registered raster.
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    id: Option<String>,
    grid: Arc<RasterGrid>,
    bounds: GeoBounds,
    texture: Option<TextureHandle>,
}

impl DatasetEntry {
    /// `None` for the anonymous dataset.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn grid(&self) -> &Arc<RasterGrid> {
        &self.grid
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }
}

#[derive(Debug)]
enum CurrentSlot {
    Anonymous(DatasetEntry),
    Named(String),
}

#[derive(Debug, Default)]
pub struct DatasetRegistry {
    named: HashMap<String, DatasetEntry>,
    current: Option<CurrentSlot>,
    textures: Option<TexturePool>,
}

impl DatasetRegistry {
    /// Registry for the sequential path; no textures are created.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that mirrors every dataset into a texture pool.
    pub fn with_textures() -> Self {
        Self {
            textures: Some(TexturePool::new()),
            ..Self::default()
        }
    }

    pub fn textures(&self) -> Option<&TexturePool> {
        self.textures.as_ref()
    }

    pub fn textures_mut(&mut self) -> Option<&mut TexturePool> {
        self.textures.as_mut()
    }

    fn create(&mut self, id: Option<String>, grid: RasterGrid, bounds: GeoBounds) -> OverlayResult<DatasetEntry> {
        bounds.validate()?;
        let texture = self.textures.as_mut().map(|pool| pool.upload_data(&grid));
        Ok(DatasetEntry {
            id,
            grid: Arc::new(grid),
            bounds,
            texture,
        })
    }

    fn destroy(&mut self, entry: DatasetEntry) {
        if let (Some(pool), Some(handle)) = (self.textures.as_mut(), entry.texture) {
            pool.release(handle);
        }
    }

    fn drop_anonymous(&mut self) {
        if matches!(self.current, Some(CurrentSlot::Anonymous(_))) {
            if let Some(CurrentSlot::Anonymous(entry)) = self.current.take() {
                self.destroy(entry);
            }
        }
    }

    /// Replace the anonymous dataset and make it current.
    pub fn set_data(&mut self, grid: RasterGrid, bounds: GeoBounds) -> OverlayResult<()> {
        bounds.validate()?;
        self.drop_anonymous();
        let (width, height) = (grid.width(), grid.height());
        let entry = self.create(None, grid, bounds)?;
        self.current = Some(CurrentSlot::Anonymous(entry));
        debug!(width, height, "Set anonymous dataset");
        Ok(())
    }

    /// Register a named dataset, selecting it when nothing is current.
    pub fn add_dataset(&mut self, id: &str, grid: RasterGrid, bounds: GeoBounds) -> OverlayResult<()> {
        if self.dataset_available(id) {
            return Err(OverlayError::DuplicateId(id.to_string()));
        }
        let (width, height) = (grid.width(), grid.height());
        let entry = self.create(Some(id.to_string()), grid, bounds)?;
        self.named.insert(id.to_string(), entry);
        let selected = self.current.is_none();
        if selected {
            self.current = Some(CurrentSlot::Named(id.to_string()));
        }
        debug!(id, width, height, selected, datasets = self.named.len(), "Added dataset");
        Ok(())
    }

    /// Make a named dataset current.
    pub fn set_current_dataset(&mut self, id: &str) -> OverlayResult<()> {
        if !self.dataset_available(id) {
            return Err(OverlayError::UnknownId(id.to_string()));
        }
        self.drop_anonymous();
        self.current = Some(CurrentSlot::Named(id.to_string()));
        debug!(id, "Selected current dataset");
        Ok(())
    }

    /// Remove a named dataset, clearing the selection if it was current.
    pub fn remove_dataset(&mut self, id: &str) -> OverlayResult<()> {
        let entry = self
            .named
            .remove(id)
            .ok_or_else(|| OverlayError::UnknownId(id.to_string()))?;
        self.destroy(entry);
        if matches!(&self.current, Some(CurrentSlot::Named(current)) if current == id) {
            self.current = None;
        }
        debug!(id, datasets = self.named.len(), "Removed dataset");
        Ok(())
    }

    pub fn dataset_available(&self, id: &str) -> bool {
        self.named.contains_key(id)
    }

    /// Ids of the named datasets, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.named.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn current(&self) -> Option<&DatasetEntry> {
        match &self.current {
            Some(CurrentSlot::Anonymous(entry)) => Some(entry),
            Some(CurrentSlot::Named(id)) => self.named.get(id),
            None => None,
        }
    }

    /// The current dataset, or `NoDataset`.
    pub fn require_current(&self) -> OverlayResult<&DatasetEntry> {
        self.current().ok_or(OverlayError::NoDataset)
    }
}
