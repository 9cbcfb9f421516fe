//! Per-row FM synthesis.
//!
//! Each row is read as a modulating signal. Pixel intensities are mapped into
//! the phase deviation range and added to a fixed carrier advance, so the
//! instantaneous phase is
//!
//! ```text
//! θ_0 = 0
//! θ_{i+1} = θ_i + omega + d_i
//! out_i  = sin(θ_i)
//! ```
//!
//! Rows carry no state between each other.

use freqmod_spec::SourceRange;

use crate::buffer::min_max;
use crate::error::{FmError, FmResult};
use crate::remap::Remap;

/// Largest value of an 8-bit intensity.
pub const FULL_SCALE: f64 = 255.0;

/// Maps intensities of one row onto phase deviations.
#[derive(Debug, Clone, Copy)]
enum Deviation {
    /// Every sample contributes nothing.
    Zero,
    Mapped(Remap),
}

impl Deviation {
    fn for_row(row: &[f64], phase: f64, source: SourceRange) -> FmResult<Self> {
        let (lo, hi) = match source {
            SourceRange::Full => (0.0, FULL_SCALE),
            SourceRange::Observed => match min_max(row) {
                Some((lo, hi)) if lo != hi => (lo, hi),
                _ => return Ok(Deviation::Zero),
            },
        };
        Ok(Deviation::Mapped(Remap::new(lo, hi, -phase, phase)?))
    }

    #[inline]
    fn at(&self, value: f64) -> f64 {
        match self {
            Deviation::Zero => 0.0,
            Deviation::Mapped(map) => map.apply(value),
        }
    }
}

/// Synthesizes one phase-modulated row.
///
/// # Arguments
/// * `row` - Intensities of one image row
/// * `phase` - Deviation bound; deviations span `[-phase, +phase]`
/// * `omega` - Carrier advance per pixel, in radians
/// * `source` - Range the intensities are mapped from
///
/// The output has the same length as `row` and lies in `[-1, 1]`.
pub fn synthesize_row(
    row: &[f64],
    phase: f64,
    omega: f64,
    source: SourceRange,
) -> FmResult<Vec<f64>> {
    if row.is_empty() {
        return Err(FmError::EmptyRow);
    }
    let deviation = Deviation::for_row(row, phase, source)?;

    Ok(row
        .iter()
        .scan(0.0_f64, |theta, &x| {
            let out = theta.sin();
            *theta += omega + deviation.at(x);
            Some(out)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_constant_row_is_pure_carrier() {
        let omega = 0.37;
        for c in [0.0, 17.0, 128.0, 255.0] {
            let row = vec![c; 50];
            let out = synthesize_row(&row, 1.3, omega, SourceRange::Observed).unwrap();
            for (i, v) in out.iter().enumerate() {
                let expected = (i as f64 * omega).sin();
                assert!((v - expected).abs() < 1e-9, "c = {c}, i = {i}");
            }
        }
    }

    #[test]
    fn test_zero_phase_collapses_deviation() {
        let row: Vec<f64> = (0..32).map(|i| (i * 8) as f64).collect();
        let out = synthesize_row(&row, 0.0, 0.2, SourceRange::Observed).unwrap();
        for (i, v) in out.iter().enumerate() {
            assert!((v - (i as f64 * 0.2).sin()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_full_range_constant_row_shifts_carrier() {
        // 0 maps to -phase under the full 8-bit range.
        let phase = 0.1;
        let omega = 0.5;
        let out = synthesize_row(&[0.0; 10], phase, omega, SourceRange::Full).unwrap();
        for (i, v) in out.iter().enumerate() {
            let expected = (i as f64 * (omega - phase)).sin();
            assert!((v - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_deviation_follows_intensity() {
        // Two samples: min maps to -phase, max to +phase.
        let phase = PI / 4.0;
        let omega = 1.0;
        let out = synthesize_row(&[10.0, 20.0, 20.0], phase, omega, SourceRange::Observed).unwrap();
        assert_eq!(out[0], 0.0);
        assert!((out[1] - (omega - phase).sin()).abs() < 1e-12);
        assert!((out[2] - ((omega - phase) + (omega + phase)).sin()).abs() < 1e-12);
    }

    #[test]
    fn test_output_length_and_bounds() {
        let row: Vec<f64> = (0..257).map(|i| ((i * 37) % 256) as f64).collect();
        let out = synthesize_row(&row, 2.0, 0.8, SourceRange::Full).unwrap();
        assert_eq!(out.len(), row.len());
        assert!(out.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_empty_row_rejected() {
        assert!(matches!(
            synthesize_row(&[], 1.0, 1.0, SourceRange::Observed),
            Err(FmError::EmptyRow)
        ));
    }
}
