//! Apply command implementation
//!
//! Loads an image, runs the FM overlay and writes the result as PNG.

use anyhow::{Context, Result};
use colored::Colorize;
use freqmod_backend::png::{encode_overlay_with_hash, PngConfig};
use freqmod_backend::{quantize, ChannelObserver, FreqModOverlay, OverlayParameters, RgbImage};
use freqmod_spec::{FreqModParams, ValidationResult};
use log::debug;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{
    anyhow_to_json, validation_warning_to_json, ApplyOutput, ApplyResult,
};
use super::params::{resolve_params, ParamOverrides};

/// Run the apply command
///
/// # Arguments
/// * `input` - Path to the input image (any format the `image` crate decodes)
/// * `output` - Path of the PNG to write
/// * `params_file` - Optional JSON parameter file
/// * `overrides` - Values given explicitly on the command line
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(
    input: &str,
    output: &str,
    params_file: Option<&str>,
    overrides: &ParamOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(input, output, params_file, overrides)
    } else {
        run_human(input, output, params_file, overrides)
    }
}

/// Run apply with human-readable (colored) output
fn run_human(
    input: &str,
    output: &str,
    params_file: Option<&str>,
    overrides: &ParamOverrides,
) -> Result<ExitCode> {
    println!("{} {}", "Applying:".cyan().bold(), input);

    let params = resolve_params(params_file, overrides)?;
    let validation = params.validate();
    print_validation(&validation);
    validation.into_result()?;

    print_params(&params);

    let progress = |index: usize, total: usize| {
        println!("  {} channel {}/{}", "-".dimmed(), index + 1, total);
    };
    let result = execute(Path::new(input), Path::new(output), params, Some(&progress))?;

    println!(
        "\n{} {}x{}, {} channel(s)",
        "Done:".green().bold(),
        result.width,
        result.height,
        result.channels
    );
    println!("{} {}", "Output:".dimmed(), output);
    println!("{} {}", "Hash:".dimmed(), &result.output_hash[..16]);

    Ok(ExitCode::SUCCESS)
}

/// Run apply with machine-readable JSON output
fn run_json(
    input: &str,
    output: &str,
    params_file: Option<&str>,
    overrides: &ParamOverrides,
) -> Result<ExitCode> {
    let params = match resolve_params(params_file, overrides) {
        Ok(p) => p,
        Err(e) => {
            let report = ApplyOutput::failure(input, output, anyhow_to_json(&e), Vec::new());
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(ExitCode::from(1));
        }
    };

    let validation = params.validate();
    let warnings = validation
        .warnings
        .iter()
        .map(validation_warning_to_json)
        .collect::<Vec<_>>();
    if let Err(e) = validation.into_result() {
        let errors = anyhow_to_json(&anyhow::Error::new(e));
        let report = ApplyOutput::failure(input, output, errors, warnings);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::from(1));
    }

    let (report, code) = match execute(Path::new(input), Path::new(output), params, None) {
        Ok(result) => (
            ApplyOutput::success(input, output, result, warnings),
            ExitCode::SUCCESS,
        ),
        Err(e) => (
            ApplyOutput::failure(input, output, anyhow_to_json(&e), warnings),
            ExitCode::from(1),
        ),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(code)
}

/// Runs the overlay end to end on validated parameters.
pub fn execute(
    input: &Path,
    output: &Path,
    params: FreqModParams,
    observer: Option<&dyn ChannelObserver>,
) -> Result<ApplyResult> {
    let image = load_rgb(input)?;
    debug!(
        "loaded {} ({}x{})",
        input.display(),
        image.width,
        image.height
    );

    let mapped = OverlayParameters::from_params(&params, image.width)?;
    let overlay = FreqModOverlay::new(params);
    let mut result = overlay
        .apply_with_observer(&image, observer)
        .context("Overlay failed")?;

    let levels = overlay.params().pquantize;
    if levels > 0 {
        debug!("post-quantizing to {} levels", levels);
        result = quantize(&result, levels).context("Post-quantization failed")?;
    }

    let (png, output_hash) =
        encode_overlay_with_hash(&result, &PngConfig::default()).context("Failed to encode PNG")?;
    fs::write(output, &png)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    Ok(ApplyResult {
        width: result.width(),
        height: result.height(),
        channels: result.channels(),
        omega: mapped.omega,
        phase: mapped.phase,
        output_hash,
        params: overlay.params().clone(),
    })
}

/// Decodes an image file into an 8-bit RGB buffer.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let decoded = image::open(path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(RgbImage::new(width, height, rgb.into_raw())?)
}

/// Print resolved parameters to the console
fn print_params(params: &FreqModParams) {
    println!(
        "  {} omega={} phase={} lowpass={} pquantize={} numdevs={}",
        "params:".dimmed(),
        params.omega,
        params.phase,
        params.lowpass,
        params.pquantize,
        params.numdevs
    );
    let mode = if params.greyscale { "greyscale" } else { "colour" };
    println!(
        "  {} {} ({} source range)",
        "mode:".dimmed(),
        mode,
        params.source_range
    );
}

/// Print validation errors and warnings to the console
fn print_validation(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &result.errors {
            let path_info = error
                .field
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.to_string().red(),
                path_info.dimmed(),
                error.message
            );
        }
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            let path_info = warning
                .field
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.to_string().yellow(),
                path_info.dimmed(),
                warning.message
            );
        }
    }
}
