//! Describe command implementation
//!
//! Prints the physical carrier and phase deviation that normalized
//! parameters map to for a given image width.

use anyhow::Result;
use colored::Colorize;
use freqmod_backend::{map_omega, map_phase, FmResult};
use std::f64::consts::PI;
use std::process::ExitCode;

use super::json_output::{anyhow_to_json, DescribeOutput, DescribeResult};

/// Run the describe command
///
/// # Arguments
/// * `width` - Row width in pixels
/// * `omega01` - Normalized carrier control
/// * `phase01` - Normalized deviation control
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(width: u32, omega01: f64, phase01: f64, json_output: bool) -> Result<ExitCode> {
    if json_output {
        let output = match describe(width, omega01, phase01) {
            Ok(result) => DescribeOutput::success(result),
            Err(e) => DescribeOutput::failure(anyhow_to_json(&anyhow::Error::new(e))),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(if output.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    let result = describe(width, omega01, phase01)?;

    println!("{} {} px", "Width:".cyan().bold(), result.width);
    println!(
        "  {} {} rad/px (omega01 = {})",
        "carrier:".dimmed(),
        result.omega,
        result.omega01
    );
    println!(
        "  {} {:.3} px",
        "carrier period:".dimmed(),
        result.carrier_period
    );
    println!(
        "  {} ±{} rad (phase01 = {})",
        "phase deviation:".dimmed(),
        result.phase,
        result.phase01
    );
    println!(
        "  {} [{}, {}] rad/px",
        "carrier range:".dimmed(),
        result.omega_range[0],
        result.omega_range[1]
    );

    Ok(ExitCode::SUCCESS)
}

/// Maps normalized parameters for `width`.
pub fn describe(width: u32, omega01: f64, phase01: f64) -> FmResult<DescribeResult> {
    let omega = map_omega(omega01, width)?;
    Ok(DescribeResult {
        width,
        omega01,
        phase01,
        omega,
        carrier_period: 2.0 * PI / omega,
        phase: map_phase(phase01)?,
        omega_range: [map_omega(0.0, width)?, map_omega(1.0, width)?],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_endpoints() {
        let low = describe(200, 0.0, 0.0).unwrap();
        assert!((low.carrier_period - 100.0).abs() < 1e-9);
        assert_eq!(low.phase, 0.0);

        let high = describe(200, 1.0, 1.0).unwrap();
        assert!((high.carrier_period - 1.0).abs() < 1e-9);
        assert_eq!(high.phase, 2.0 * PI);
        assert_eq!(high.omega, high.omega_range[1]);
    }

    #[test]
    fn test_describe_zero_width() {
        assert!(describe(0, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_run_exit_codes() {
        assert_eq!(run(640, 0.1, 0.1, true).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(640, 0.1, 0.1, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(0, 0.1, 0.1, true).unwrap(), ExitCode::from(1));
        assert!(run(0, 0.1, 0.1, false).is_err());
    }
}
