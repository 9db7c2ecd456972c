//! Error types for the overlay pipeline.

use thiserror::Error;

/// Result type alias using OverlayError.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Primary error type for overlay operations.
///
/// Every failure is synchronous and caller-visible; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    // === Color scale / domain ===
    #[error("Invalid color scale: {0}")]
    InvalidColorScale(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    // === Dataset registry ===
    #[error("No dataset available")]
    NoDataset,

    #[error("There is already a dataset registered with id '{0}'")]
    DuplicateId(String),

    #[error("No such dataset registered: '{0}'")]
    UnknownId(String),

    #[error("Coordinates ({row}, {col}) are outside of raster bounds {width}x{height}")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    // === Inputs ===
    #[error("Invalid raster grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid geographic bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid view transform: {0}")]
    InvalidView(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Raster load failed: {0}")]
    Load(String),
}

impl OverlayError {
    /// Stable machine-readable code for this error, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            OverlayError::InvalidColorScale(_) => "InvalidColorScale",
            OverlayError::InvalidDomain(_) => "InvalidDomain",
            OverlayError::NoDataset => "NoDatasetError",
            OverlayError::DuplicateId(_) => "DuplicateId",
            OverlayError::UnknownId(_) => "UnknownId",
            OverlayError::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            OverlayError::InvalidGrid(_) => "InvalidGrid",
            OverlayError::InvalidBounds(_) => "InvalidBounds",
            OverlayError::InvalidView(_) => "InvalidView",
            OverlayError::Config(_) => "Config",
            OverlayError::Load(_) => "Load",
        }
    }
}

impl From<std::io::Error> for OverlayError {
    fn from(err: std::io::Error) -> Self {
        OverlayError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for OverlayError {
    fn from(err: serde_json::Error) -> Self {
        OverlayError::Config(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for OverlayError {
    fn from(err: serde_yaml::Error) -> Self {
        OverlayError::Config(format!("YAML error: {}", err))
    }
}
