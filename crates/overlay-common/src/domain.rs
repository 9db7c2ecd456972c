//! Value domain mapped onto the color scale.

use crate::error::{OverlayError, OverlayResult};

/// The `[low, high]` value range plus clamp policy for each side.
///
/// Only constructed through [`Domain::new`], so `low < high` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    low: f64,
    high: f64,
    clamp_low: bool,
    clamp_high: bool,
}

impl Domain {
    /// Create a domain with both sides clamped.
    pub fn new(low: f64, high: f64) -> OverlayResult<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(OverlayError::InvalidDomain(format!(
                "bounds must be finite, got [{}, {}]",
                low, high
            )));
        }
        if low >= high {
            return Err(OverlayError::InvalidDomain(format!(
                "low {} must be below high {}",
                low, high
            )));
        }
        Ok(Self {
            low,
            high,
            clamp_low: true,
            clamp_high: true,
        })
    }

    /// Create a domain from a `[low, high]` slice.
    pub fn from_slice(values: &[f64]) -> OverlayResult<Self> {
        match values {
            [low, high] => Self::new(*low, *high),
            _ => Err(OverlayError::InvalidDomain(format!(
                "expected [low, high], got {} values",
                values.len()
            ))),
        }
    }

    /// Replace the clamp flags.
    pub fn with_clamp(mut self, clamp_low: bool, clamp_high: bool) -> Self {
        self.clamp_low = clamp_low;
        self.clamp_high = clamp_high;
        self
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn clamp_low(&self) -> bool {
        self.clamp_low
    }

    pub fn clamp_high(&self) -> bool {
        self.clamp_high
    }

    /// Width of the domain; always positive.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 1.0,
            clamp_low: true,
            clamp_high: true,
        }
    }
}
