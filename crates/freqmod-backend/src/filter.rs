//! Zero-phase Butterworth lowpass built from biquad sections.
//!
//! A Butterworth filter of even order `N` factors into `N/2` second-order
//! sections that share the cutoff and differ only in their Q. Each section is
//! a standard Audio EQ Cookbook lowpass biquad, which is the bilinear
//! transform (prewarped at the cutoff) of `1 / (s² + s/Q + 1)`, so the cascade
//! reproduces the digital Butterworth response exactly.
//!
//! Rows are filtered forward and then backward, which cancels the phase
//! response and leaves the output aligned with the input.

use std::f64::consts::PI;

use freqmod_spec::params::lowpass_enabled;

use crate::error::{FmError, FmResult};

/// Nominal sample rate the lowpass amount is expressed against, in Hz.
pub const SAMPLE_RATE: f64 = 30.0;

/// Order of the smoothing filter.
pub const ORDER: usize = 6;

/// Biquad filter coefficients, normalized so that `a0 = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Creates lowpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `q` - Q factor; 0.707 is a second-order Butterworth
    /// * `sample_rate` - Sample rate in Hz
    pub fn lowpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let omega = 2.0 * PI * cutoff / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Gain at 0 Hz.
    pub fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }
}

/// Biquad filter state (direct form I).
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    // Delay line for input samples
    x1: f64,
    x2: f64,
    // Delay line for output samples
    y1: f64,
    y2: f64,
}

impl BiquadFilter {
    /// Creates a new biquad filter with the given coefficients.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the delay lines to the steady state reached after an infinitely
    /// long run of `input`, and returns the matching steady output.
    pub fn prime(&mut self, input: f64) -> f64 {
        let output = input * self.coeffs.dc_gain();
        self.x1 = input;
        self.x2 = input;
        self.y1 = output;
        self.y2 = output;
        output
    }

    /// Processes a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.coeffs.b0 * input + self.coeffs.b1 * self.x1 + self.coeffs.b2 * self.x2
            - self.coeffs.a1 * self.y1
            - self.coeffs.a2 * self.y2;

        // Update delay lines
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}

/// A Butterworth lowpass as a cascade of biquad sections.
#[derive(Debug, Clone)]
pub struct ButterworthLowpass {
    sections: Vec<BiquadCoeffs>,
}

impl ButterworthLowpass {
    /// Designs the filter.
    ///
    /// Fails when `order` is odd or zero, or `cutoff` is not strictly between
    /// 0 and the Nyquist frequency `sample_rate / 2`.
    pub fn design(cutoff: f64, sample_rate: f64, order: usize) -> FmResult<Self> {
        if order == 0 || order % 2 != 0 {
            return Err(FmError::FilterOrder { order });
        }
        let nyquist = sample_rate / 2.0;
        let in_band = cutoff > 0.0 && cutoff < nyquist;
        if !in_band {
            return Err(FmError::FilterCutoff { cutoff, nyquist });
        }

        let sections = (1..=order / 2)
            .map(|k| BiquadCoeffs::lowpass(cutoff, section_q(k, order), sample_rate))
            .collect();
        Ok(Self { sections })
    }

    /// Designs the smoothing filter for a normalized `amount` using the fixed
    /// sample rate and order.
    pub fn for_amount(amount: f64) -> FmResult<Self> {
        Self::design(amount * SAMPLE_RATE, SAMPLE_RATE, ORDER)
    }

    /// The second-order sections, lowest Q first.
    pub fn sections(&self) -> &[BiquadCoeffs] {
        &self.sections
    }

    /// Filter order.
    pub fn order(&self) -> usize {
        self.sections.len() * 2
    }

    /// Number of samples mirrored onto each end of a row before filtering.
    pub fn pad_len(&self) -> usize {
        3 * (self.order() + 1)
    }

    /// Runs the cascade once over `signal` in place, starting from the
    /// steady state for its first sample.
    fn run(&self, signal: &mut [f64]) {
        let Some(&first) = signal.first() else {
            return;
        };
        let mut input = first;
        for coeffs in &self.sections {
            let mut filter = BiquadFilter::new(*coeffs);
            input = filter.prime(input);
            for sample in signal.iter_mut() {
                *sample = filter.process(*sample);
            }
        }
    }

    /// Filters a row forward and backward, returning a row of the same
    /// length with no phase shift.
    ///
    /// The row is extended at both ends by an odd reflection about its end
    /// samples to suppress start-up transients.
    pub fn filtfilt(&self, row: &[f64]) -> Vec<f64> {
        let n = row.len();
        if n == 0 {
            return Vec::new();
        }
        let pad = self.pad_len().min(n - 1);
        let (first, last) = (row[0], row[n - 1]);

        let mut ext = Vec::with_capacity(n + 2 * pad);
        ext.extend((1..=pad).rev().map(|i| 2.0 * first - row[i]));
        ext.extend_from_slice(row);
        ext.extend((1..=pad).map(|i| 2.0 * last - row[n - 1 - i]));

        self.run(&mut ext);
        ext.reverse();
        self.run(&mut ext);
        ext.reverse();

        ext.drain(pad..pad + n).collect()
    }
}

/// Q of section `k` (1-based) of an order-`order` Butterworth filter.
fn section_q(k: usize, order: usize) -> f64 {
    let angle = (2 * k - 1) as f64 * PI / (2 * order) as f64;
    1.0 / (2.0 * angle.sin())
}

/// Designs the smoothing filter, or returns `None` when `amount` leaves it
/// disabled.
pub fn design_filter(amount: f64) -> FmResult<Option<ButterworthLowpass>> {
    if !lowpass_enabled(amount) {
        return Ok(None);
    }
    ButterworthLowpass::for_amount(amount).map(Some)
}

/// Applies the smoothing filter to a row, or returns it unchanged when the
/// filter is disabled.
pub fn lowpass_row(row: &[f64], amount: f64) -> FmResult<Vec<f64>> {
    Ok(match design_filter(amount)? {
        Some(filter) => filter.filtfilt(row),
        None => row.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use freqmod_spec::params::LOWPASS_EPSILON;

    fn sine(len: usize, freq: f64) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / SAMPLE_RATE).sin())
            .collect()
    }

    #[test]
    fn test_single_biquad_passes_dc() {
        let mut filter = BiquadFilter::new(BiquadCoeffs::lowpass(3.0, 0.707, SAMPLE_RATE));
        let mut last = 0.0;
        for _ in 0..500 {
            last = filter.process(1.0);
        }
        assert!((last - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_prime_is_steady_state() {
        let mut filter = BiquadFilter::new(BiquadCoeffs::lowpass(5.0, 1.2, SAMPLE_RATE));
        let steady = filter.prime(0.75);
        for _ in 0..10 {
            assert!((filter.process(0.75) - steady).abs() < 1e-12);
        }
    }

    #[test]
    fn test_butterworth_section_qs() {
        assert!((section_q(1, 2) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);

        let filter = ButterworthLowpass::for_amount(0.2).unwrap();
        assert_eq!(filter.order(), ORDER);
        assert_eq!(filter.sections().len(), 3);
        assert_eq!(filter.pad_len(), 21);
    }

    #[test]
    fn test_design_rejects_cutoff_at_or_above_nyquist() {
        for amount in [0.5, 0.75, 1.0] {
            let err = ButterworthLowpass::for_amount(amount).unwrap_err();
            assert!(matches!(err, FmError::FilterCutoff { nyquist, .. } if nyquist == 15.0));
        }
        assert!(ButterworthLowpass::for_amount(0.0).is_err());
        assert!(ButterworthLowpass::for_amount(0.499).is_ok());
    }

    #[test]
    fn test_design_rejects_odd_order() {
        assert!(matches!(
            ButterworthLowpass::design(3.0, SAMPLE_RATE, 5),
            Err(FmError::FilterOrder { order: 5 })
        ));
        assert!(ButterworthLowpass::design(3.0, SAMPLE_RATE, 0).is_err());
    }

    #[test]
    fn test_filtfilt_preserves_constant_row() {
        let filter = ButterworthLowpass::for_amount(0.1).unwrap();
        let out = filter.filtfilt(&[0.6; 64]);
        assert_eq!(out.len(), 64);
        assert!(out.iter().all(|v| (v - 0.6).abs() < 1e-9));
    }

    #[test]
    fn test_filtfilt_removes_nyquist_content() {
        let row: Vec<f64> = (0..200).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let out = ButterworthLowpass::for_amount(0.1).unwrap().filtfilt(&row);
        assert_eq!(out.len(), row.len());
        assert!(out[60..140].iter().all(|v| v.abs() < 1e-2));
    }

    #[test]
    fn test_filtfilt_has_no_phase_shift() {
        let row = sine(300, 0.5);
        let out = ButterworthLowpass::for_amount(0.1).unwrap().filtfilt(&row);
        for i in 30..270 {
            assert!((out[i] - row[i]).abs() < 1e-2, "sample {i}");
        }
    }

    #[test]
    fn test_filtfilt_short_rows_keep_length() {
        let filter = ButterworthLowpass::for_amount(0.3).unwrap();
        for len in [1, 2, 5, 21, 22] {
            let row: Vec<f64> = (0..len).map(|i| i as f64).collect();
            let out = filter.filtfilt(&row);
            assert_eq!(out.len(), len);
            assert!(out.iter().all(|v| v.is_finite()));
        }
        assert!(filter.filtfilt(&[]).is_empty());
    }

    #[test]
    fn test_lowpass_row_bypass_is_bitwise_identical() {
        let row = sine(40, 4.0);
        assert_eq!(lowpass_row(&row, 0.0).unwrap(), row);
        assert_eq!(lowpass_row(&row, LOWPASS_EPSILON).unwrap(), row);
    }

    #[test]
    fn test_design_filter_shares_enable_threshold() {
        assert!(design_filter(LOWPASS_EPSILON).unwrap().is_none());
        assert!(design_filter(2.0 * LOWPASS_EPSILON).unwrap().is_some());
        assert!(matches!(
            design_filter(f64::NAN),
            Err(FmError::FilterCutoff { .. })
        ));
    }

    #[test]
    fn test_lowpass_row_just_above_epsilon_designs() {
        let row = sine(40, 4.0);
        let out = lowpass_row(&row, 2.0 * LOWPASS_EPSILON).unwrap();
        assert_eq!(out.len(), row.len());
    }
}
