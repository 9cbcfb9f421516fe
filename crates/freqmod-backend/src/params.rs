//! Mapping of normalized user controls into physical synthesis parameters.

use std::f64::consts::PI;

use freqmod_spec::{FreqModParams, SourceRange};

use crate::error::{FmError, FmResult};
use crate::remap::remap;

/// Carrier period, as a fraction of the row width, at `omega01 = 0`.
pub const LONGEST_PERIOD_FRACTION: f64 = 0.5;

/// Carrier period, as a fraction of the row width, at `omega01 = 1`.
pub const SHORTEST_PERIOD_FRACTION: f64 = 0.005;

/// Physical parameters for one overlay invocation.
///
/// Derived once from [`FreqModParams`] and the image width, then shared
/// read-only by every row and channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayParameters {
    /// Carrier angular frequency, radians per pixel.
    pub omega: f64,
    /// Phase deviation bound; deviations lie in `[-phase, +phase]`.
    pub phase: f64,
    /// Lowpass amount (fraction of the nominal sample rate).
    pub lowpass: f64,
    /// Threshold in standard deviations; 0 disables.
    pub numdevs: f64,
    /// Collapse to one luminance channel.
    pub greyscale: bool,
    /// Source range for the deviation mapping.
    pub source_range: SourceRange,
}

impl OverlayParameters {
    /// Derives physical parameters for an image `width` pixels wide.
    pub fn from_params(params: &FreqModParams, width: u32) -> FmResult<Self> {
        Ok(Self {
            omega: map_omega(params.omega, width)?,
            phase: map_phase(params.phase)?,
            lowpass: params.lowpass,
            numdevs: params.numdevs,
            greyscale: params.greyscale,
            source_range: params.source_range,
        })
    }

    /// The symmetric phase deviation interval.
    pub fn deviation_range(&self) -> (f64, f64) {
        (-self.phase, self.phase)
    }

    /// Length of one carrier cycle in pixels.
    pub fn carrier_period(&self) -> f64 {
        2.0 * PI / self.omega
    }
}

/// Maps normalized `omega01` onto a carrier angular frequency.
///
/// `0` gives a period of half the row, `1` a period of 0.5% of the row.
/// Values outside `[0, 1]` extrapolate.
pub fn map_omega(omega01: f64, width: u32) -> FmResult<f64> {
    if width == 0 {
        return Err(FmError::EmptyImage { width, height: 0 });
    }
    let w = f64::from(width);
    remap(
        omega01,
        0.0,
        1.0,
        2.0 * PI / (LONGEST_PERIOD_FRACTION * w),
        2.0 * PI / (SHORTEST_PERIOD_FRACTION * w),
    )
}

/// Maps normalized `phase01` onto a deviation bound in `[0, 2π]`.
pub fn map_phase(phase01: f64) -> FmResult<f64> {
    remap(phase01, 0.0, 1.0, 0.0, 2.0 * PI)
}
