//! Value to LUT index mapping.
//!
//! `map_value` is the one decision function both render paths and the
//! point-query API call. Any change to rounding or clamping happens here.

use overlay_common::Domain;

/// Result of mapping a raster value onto the color scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedValue {
    /// LUT index; meaningless when `alpha == 0`
    pub index: u8,
    /// 0 (transparent) or 255 (opaque)
    pub alpha: u8,
}

impl MappedValue {
    pub const TRANSPARENT: MappedValue = MappedValue { index: 0, alpha: 0 };

    #[inline]
    fn opaque(index: u8) -> Self {
        Self { index, alpha: 255 }
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.alpha == 0
    }
}

/// Whether `value` is missing: NaN, or equal to the no-data sentinel.
///
/// The sentinel is compared at sample precision, so a value such as
/// `-9999.9` that has no exact `f32` form still matches its stored sample.
#[inline]
pub fn is_no_data(value: f32, no_data: Option<f64>) -> bool {
    value.is_nan() || no_data.is_some_and(|nd| value == nd as f32)
}

/// Map a raster value to a LUT index and alpha.
///
/// `t * 255` is rounded half away from zero before the range checks, so a
/// value slightly outside the domain may still land on index 0 or 255.
#[inline]
pub fn map_value(value: f32, domain: &Domain, no_data: Option<f64>) -> MappedValue {
    if is_no_data(value, no_data) {
        return MappedValue::TRANSPARENT;
    }

    let t = (value as f64 - domain.low()) / domain.range();
    let index = (t * 255.0).round();

    if index < 0.0 {
        if domain.clamp_low() {
            MappedValue::opaque(0)
        } else {
            MappedValue::TRANSPARENT
        }
    } else if index > 255.0 {
        if domain.clamp_high() {
            MappedValue::opaque(255)
        } else {
            MappedValue::TRANSPARENT
        }
    } else {
        MappedValue::opaque(index as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(clamp_low: bool, clamp_high: bool) -> Domain {
        Domain::new(0.0, 100.0).unwrap().with_clamp(clamp_low, clamp_high)
    }

    #[test]
    fn test_domain_endpoints() {
        let d = domain(false, false);
        assert_eq!(map_value(0.0, &d, None).index, 0);
        assert_eq!(map_value(100.0, &d, None).index, 255);
        assert_eq!(map_value(100.0, &d, None).alpha, 255);
    }

    #[test]
    fn test_clamp_flags() {
        assert_eq!(map_value(-20.0, &domain(true, false), None), MappedValue::opaque(0));
        assert!(map_value(-20.0, &domain(false, true), None).is_transparent());
        assert_eq!(map_value(120.0, &domain(false, true), None), MappedValue::opaque(255));
        assert!(map_value(120.0, &domain(true, false), None).is_transparent());
    }

    #[test]
    fn test_no_data_beats_clamp() {
        let d = domain(true, true);
        assert!(map_value(f32::NAN, &d, None).is_transparent());
        assert!(map_value(-9999.0, &d, Some(-9999.0)).is_transparent());
        assert!(!map_value(-9999.0, &d, None).is_transparent());
    }

    #[test]
    fn test_inexact_sentinels_match_stored_samples() {
        let d = domain(true, true);
        for sentinel in [-9999.9f64, -3.40282346639e38, 1.0e-7] {
            let stored = sentinel as f32;
            assert!(map_value(stored, &d, Some(sentinel)).is_transparent(), "{}", sentinel);
            assert!(!map_value(stored, &d, None).is_transparent(), "{}", sentinel);
        }
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        // 10/100 * 255 = 25.5
        assert_eq!(map_value(10.0, &domain(true, true), None).index, 26);
    }
}
