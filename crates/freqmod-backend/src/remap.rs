//! Affine range remapping.

use crate::error::{FmError, FmResult};

/// A precomputed affine map from one interval onto another.
///
/// Values outside the source interval extrapolate linearly; nothing is
/// clamped. Offsets are scaled before dividing, so integer inputs on an
/// integer-to-integer map land exactly on integers, and the source maximum
/// maps exactly onto `new_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remap {
    old_min: f64,
    old_max: f64,
    old_span: f64,
    new_min: f64,
    new_max: f64,
    new_span: f64,
}

impl Remap {
    /// Builds a map from `[old_min, old_max]` onto `[new_min, new_max]`.
    ///
    /// Fails when the source interval is empty or any bound is not finite.
    pub fn new(old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> FmResult<Self> {
        let finite = [old_min, old_max, new_min, new_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || old_max == old_min {
            return Err(FmError::DegenerateRange {
                min: old_min,
                max: old_max,
            });
        }
        Ok(Self {
            old_min,
            old_max,
            old_span: old_max - old_min,
            new_min,
            new_max,
            new_span: new_max - new_min,
        })
    }

    /// Maps a single value.
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        if value == self.old_max {
            return self.new_max;
        }
        self.new_min + (value - self.old_min) * self.new_span / self.old_span
    }
}

/// One-shot remap of `value` from `[old_min, old_max]` onto `[new_min, new_max]`.
pub fn remap(value: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> FmResult<f64> {
    Ok(Remap::new(old_min, old_max, new_min, new_max)?.apply(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        let map = Remap::new(0.0, 1.0, 0.3, 7.9).unwrap();
        assert_eq!(map.apply(0.0), 0.3);
        assert_eq!(map.apply(1.0), 7.9);
    }

    #[test]
    fn test_midpoint() {
        assert!((remap(127.5, 0.0, 255.0, -1.0, 1.0).unwrap()).abs() < 1e-12);
        assert!((remap(5.0, 0.0, 10.0, 0.0, 100.0).unwrap() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_extrapolates_without_clamping() {
        let v = remap(2.0, 0.0, 1.0, 10.0, 20.0).unwrap();
        assert!((v - 30.0).abs() < 1e-12);
        let v = remap(-1.0, 0.0, 1.0, 10.0, 20.0).unwrap();
        assert!((v - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_target() {
        let v = remap(0.25, 0.0, 1.0, 1.0, 0.0).unwrap();
        assert!((v - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_integer_maps_stay_integral() {
        let map = Remap::new(0.0, 255.0, 0.0, 255.0).unwrap();
        for v in 0..=255 {
            assert_eq!(map.apply(f64::from(v)), f64::from(v));
        }
        let up = Remap::new(0.0, 4.0, 0.0, 255.0).unwrap();
        assert_eq!(up.apply(1.0), 63.75);
        assert_eq!(up.apply(2.0), 127.5);
    }

    #[test]
    fn test_degenerate_source_rejected() {
        assert!(matches!(
            Remap::new(3.0, 3.0, 0.0, 1.0),
            Err(FmError::DegenerateRange { .. })
        ));
        assert!(Remap::new(0.0, f64::INFINITY, 0.0, 1.0).is_err());
        assert!(Remap::new(0.0, 1.0, f64::NAN, 1.0).is_err());
    }
}
