//! Error types for the frequency modulation pipeline.

use freqmod_spec::BackendError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type FmResult<T> = Result<T, FmError>;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Input buffer checks.
    Input,
    /// Parameter mapping and range remapping.
    Mapping,
    /// Per-row FM synthesis.
    Synthesis,
    /// Lowpass filter design.
    FilterDesign,
    /// Channel normalization.
    Normalization,
    /// Post-quantization.
    Quantization,
}

impl Stage {
    /// Snake-case stage name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::Mapping => "mapping",
            Stage::Synthesis => "synthesis",
            Stage::FilterDesign => "filter_design",
            Stage::Normalization => "normalization",
            Stage::Quantization => "quantization",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while running the effect.
#[derive(Debug, Error)]
pub enum FmError {
    /// Image has no pixels.
    #[error("image must be non-empty, got {width}x{height}")]
    EmptyImage {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// Pixel buffer length does not match the declared dimensions.
    #[error("buffer holds {actual} values, expected {expected} for {width}x{height}x{channels}")]
    BufferSize {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Values per pixel.
        channels: usize,
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// Source range of a remap has zero width or a non-finite bound.
    #[error("cannot remap from degenerate range [{min}, {max}]")]
    DegenerateRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Row of length zero handed to the synthesizer.
    #[error("cannot synthesize an empty row")]
    EmptyRow,

    /// Lowpass cutoff outside the open interval (0, Nyquist).
    #[error("invalid lowpass cutoff {cutoff} Hz: must be in (0, {nyquist}) Hz")]
    FilterCutoff {
        /// Requested cutoff in Hz.
        cutoff: f64,
        /// Nyquist frequency in Hz.
        nyquist: f64,
    },

    /// Filter order that cannot be built from second-order sections.
    #[error("invalid filter order {order}: must be even and non-zero")]
    FilterOrder {
        /// Requested order.
        order: usize,
    },

    /// Channel with no values handed to the normalizer.
    #[error("cannot normalize an empty channel")]
    EmptyChannel,

    /// Zero quantization levels.
    #[error("quantization levels must be > 0")]
    InvalidQuantization,
}

impl FmError {
    /// The pipeline stage that raised this error.
    pub fn stage(&self) -> Stage {
        match self {
            FmError::EmptyImage { .. } | FmError::BufferSize { .. } => Stage::Input,
            FmError::DegenerateRange { .. } => Stage::Mapping,
            FmError::EmptyRow => Stage::Synthesis,
            FmError::FilterCutoff { .. } | FmError::FilterOrder { .. } => Stage::FilterDesign,
            FmError::EmptyChannel => Stage::Normalization,
            FmError::InvalidQuantization => Stage::Quantization,
        }
    }
}

impl BackendError for FmError {
    fn code(&self) -> &'static str {
        match self {
            FmError::EmptyImage { .. } => "FM_001",
            FmError::BufferSize { .. } => "FM_002",
            FmError::DegenerateRange { .. } => "FM_003",
            FmError::EmptyRow => "FM_004",
            FmError::FilterCutoff { .. } => "FM_005",
            FmError::FilterOrder { .. } => "FM_006",
            FmError::EmptyChannel => "FM_007",
            FmError::InvalidQuantization => "FM_008",
        }
    }

    fn category(&self) -> &'static str {
        self.stage().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_names_nyquist() {
        let err = FmError::FilterCutoff {
            cutoff: 18.0,
            nyquist: 15.0,
        };
        assert!(err.to_string().contains("18"));
        assert!(err.to_string().contains("15"));
        assert_eq!(err.stage(), Stage::FilterDesign);
        assert_eq!(err.category(), "filter_design");
        assert_eq!(err.code(), "FM_005");
    }

    #[test]
    fn test_stage_mapping() {
        assert_eq!(FmError::EmptyRow.stage(), Stage::Synthesis);
        assert_eq!(FmError::EmptyChannel.stage(), Stage::Normalization);
        assert_eq!(FmError::InvalidQuantization.stage(), Stage::Quantization);
        assert_eq!(
            FmError::DegenerateRange { min: 1.0, max: 1.0 }.stage(),
            Stage::Mapping
        );
        assert_eq!(
            FmError::EmptyImage {
                width: 0,
                height: 3
            }
            .category(),
            "input"
        );
    }
}
