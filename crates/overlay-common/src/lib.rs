//! Common types shared by the projection, renderer and CLI crates.

pub mod bbox;
pub mod config;
pub mod domain;
pub mod error;
pub mod grid;

pub use bbox::GeoBounds;
pub use config::{ColorScaleSpec, ColorStopSpec, OverlayConfig, RenderMode};
pub use domain::Domain;
pub use error::{OverlayError, OverlayResult};
pub use grid::RasterGrid;
