//! Frequency modulation parameters.
//!
//! All values here are the normalized controls a user sets. The backend maps
//! `omega` and `phase` into physical units once the image width is known.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{
    ErrorCode, ParamError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};

/// Default normalized carrier frequency.
pub const DEFAULT_OMEGA: f64 = 0.1;

/// Default normalized phase deviation.
pub const DEFAULT_PHASE: f64 = 0.1;

/// Upper end of the nominal range for `omega` and `phase`.
pub const NOMINAL_MAX: f64 = 1.0;

/// Lowpass amounts at or below this are treated as disabled.
pub const LOWPASS_EPSILON: f64 = 1e-6;

/// Returns true when a lowpass amount switches the smoothing filter on.
///
/// NaN counts as enabled so that filter design rejects it.
pub fn lowpass_enabled(amount: f64) -> bool {
    !(amount <= LOWPASS_EPSILON)
}

/// Where the synthesizer takes the source range of a row from when mapping
/// intensities into the phase deviation range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceRange {
    /// Use the row's own minimum and maximum.
    /// Flat rows contribute no deviation and render as the bare carrier.
    #[default]
    Observed,
    /// Use the fixed 8-bit range [0, 255].
    Full,
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceRange::Observed => write!(f, "observed"),
            SourceRange::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for SourceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "observed" => Ok(SourceRange::Observed),
            "full" => Ok(SourceRange::Full),
            other => Err(format!(
                "unknown source range '{}', expected 'observed' or 'full'",
                other
            )),
        }
    }
}

/// User-facing parameters of the frequency modulation effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FreqModParams {
    /// Normalized carrier frequency; controls line spacing.
    /// Nominal range 0.0 to 1.0, larger values extrapolate.
    #[serde(default = "default_omega")]
    pub omega: f64,
    /// Normalized phase deviation; higher values distort the image more.
    /// Nominal range 0.0 to 1.0.
    #[serde(default = "default_phase")]
    pub phase: f64,
    /// Lowpass filter amount in [0, 1]. 0 disables the filter.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub lowpass: f64,
    /// Number of levels for post-quantization. 0 disables it.
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub pquantize: u32,
    /// Standard deviations above the mean mapped to white. 0 disables it.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub numdevs: f64,
    /// Collapse the input to a single luminance channel.
    #[serde(default = "default_greyscale")]
    pub greyscale: bool,
    /// Source range used when mapping row intensities to phase deviation.
    #[serde(default)]
    pub source_range: SourceRange,
}

fn default_omega() -> f64 {
    DEFAULT_OMEGA
}

fn default_phase() -> f64 {
    DEFAULT_PHASE
}

fn default_greyscale() -> bool {
    true
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

impl Default for FreqModParams {
    fn default() -> Self {
        Self {
            omega: DEFAULT_OMEGA,
            phase: DEFAULT_PHASE,
            lowpass: 0.0,
            pquantize: 0,
            numdevs: 0.0,
            greyscale: default_greyscale(),
            source_range: SourceRange::default(),
        }
    }
}

impl FreqModParams {
    /// Parses parameters from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ParamError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads parameters from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ParamError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes parameters to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ParamError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every field against its documented domain.
    ///
    /// Errors are collected rather than returned on the first failure.
    /// Values above the nominal range of `omega`/`phase` are accepted with a
    /// warning, since they still produce (noisier) output.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        for (field, value) in [
            ("omega", self.omega),
            ("phase", self.phase),
            ("lowpass", self.lowpass),
            ("numdevs", self.numdevs),
        ] {
            if !value.is_finite() {
                result.add_error(ValidationError::with_field(
                    ErrorCode::NonFiniteValue,
                    format!("{} must be a finite number, got {}", field, value),
                    field,
                ));
            } else if value < 0.0 {
                result.add_error(ValidationError::with_field(
                    ErrorCode::NegativeValue,
                    format!("{} must be >= 0, got {}", field, value),
                    field,
                ));
            }
        }

        if self.lowpass.is_finite() && self.lowpass > 1.0 {
            result.add_error(ValidationError::with_field(
                ErrorCode::LowpassOutOfRange,
                format!("lowpass must be in [0, 1], got {}", self.lowpass),
                "lowpass",
            ));
        }

        if self.omega.is_finite() && self.omega > NOMINAL_MAX {
            result.add_warning(ValidationWarning::with_field(
                WarningCode::OmegaAboveNominal,
                format!(
                    "omega {} is above the nominal range [0, 1]; the carrier extrapolates",
                    self.omega
                ),
                "omega",
            ));
        }

        if self.phase.is_finite() && self.phase > NOMINAL_MAX {
            result.add_warning(ValidationWarning::with_field(
                WarningCode::PhaseAboveNominal,
                format!(
                    "phase {} is above the nominal range [0, 1]; deviation exceeds 2π",
                    self.phase
                ),
                "phase",
            ));
        }

        result
    }
}
