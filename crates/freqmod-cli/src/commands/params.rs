//! Parameter resolution for the `apply` command.
//!
//! Values come from, in increasing precedence: built-in defaults, the
//! `--params` JSON file, explicit command-line flags.

use anyhow::{Context, Result};
use freqmod_spec::{FreqModParams, SourceRange};
use std::path::Path;

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamOverrides {
    pub omega: Option<f64>,
    pub phase: Option<f64>,
    pub lowpass: Option<f64>,
    pub pquantize: Option<u32>,
    pub numdevs: Option<f64>,
    /// `--colour` given; forces colour mode.
    pub colour: bool,
    pub source_range: Option<SourceRange>,
}

impl ParamOverrides {
    /// Applies the explicit values on top of `base`.
    pub fn apply_to(&self, mut base: FreqModParams) -> FreqModParams {
        if let Some(v) = self.omega {
            base.omega = v;
        }
        if let Some(v) = self.phase {
            base.phase = v;
        }
        if let Some(v) = self.lowpass {
            base.lowpass = v;
        }
        if let Some(v) = self.pquantize {
            base.pquantize = v;
        }
        if let Some(v) = self.numdevs {
            base.numdevs = v;
        }
        if self.colour {
            base.greyscale = false;
        }
        if let Some(v) = self.source_range {
            base.source_range = v;
        }
        base
    }
}

/// Loads the optional parameter file and layers the overrides on top.
///
/// The result is not validated.
pub fn resolve_params(params_file: Option<&str>, overrides: &ParamOverrides) -> Result<FreqModParams> {
    let base = match params_file {
        Some(path) => FreqModParams::from_file(Path::new(path))
            .with_context(|| format!("Failed to load parameters from {}", path))?,
        None => FreqModParams::default(),
    };
    Ok(overrides.apply_to(base))
}
