//! JSON output types for machine-readable CLI output.
//!
//! Structured reports for the `--json` flag on `apply` and `describe`, so
//! scripts can consume results without scraping colored text.

use freqmod_backend::png::PngError;
use freqmod_backend::FmError;
use freqmod_spec::{BackendError, FreqModParams, ParamError, ValidationError, ValidationWarning};
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// These codes are stable. Backend failures pass through their own
/// `FM_XXX` codes and parameter validation failures their `EXXX` codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Input image could not be decoded
    pub const IMAGE_DECODE: &str = "CLI_002";
    /// Parameter file is not valid JSON for the parameter schema
    pub const PARAMS_PARSE: &str = "CLI_003";
    /// Output file could not be written
    pub const FILE_WRITE: &str = "CLI_004";
    /// PNG encoding error
    pub const PNG_ENCODE: &str = "CLI_005";
    /// Any other failure
    pub const INTERNAL: &str = "CLI_099";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "FM_005", "E002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Parameter the error refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Pipeline stage that failed (backend errors only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            stage: None,
        }
    }

    /// Sets the parameter path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the pipeline stage for this error.
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// Parameter the warning refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Converts a ValidationError to a JsonError.
pub fn validation_error_to_json(err: &ValidationError) -> JsonError {
    let mut error = JsonError::new(err.code.to_string(), &err.message);
    if let Some(ref field) = err.field {
        error = error.with_path(field);
    }
    error
}

/// Converts a ValidationWarning to a JsonWarning.
pub fn validation_warning_to_json(warn: &ValidationWarning) -> JsonWarning {
    JsonWarning {
        code: warn.code.to_string(),
        message: warn.message.clone(),
        path: warn.field.clone(),
    }
}

/// Converts a command failure into JSON errors.
///
/// Walks the error chain and reports the innermost typed error it
/// recognizes. Parameter validation failures expand to one entry per
/// offending field.
pub fn anyhow_to_json(err: &anyhow::Error) -> Vec<JsonError> {
    let message = format!("{:#}", err);
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ParamError>() {
            return match e {
                ParamError::ValidationFailed(errors) => {
                    errors.iter().map(validation_error_to_json).collect()
                }
                ParamError::JsonParse(_) => {
                    vec![JsonError::new(error_codes::PARAMS_PARSE, message)]
                }
                ParamError::Io(_) => vec![JsonError::new(error_codes::FILE_READ, message)],
            };
        }
        if let Some(e) = cause.downcast_ref::<FmError>() {
            return vec![JsonError::new(e.code(), message).with_stage(e.category())];
        }
        if let Some(e) = cause.downcast_ref::<image::ImageError>() {
            let code = match e {
                image::ImageError::IoError(_) => error_codes::FILE_READ,
                _ => error_codes::IMAGE_DECODE,
            };
            return vec![JsonError::new(code, message)];
        }
        if let Some(e) = cause.downcast_ref::<PngError>() {
            let code = match e {
                PngError::Io(_) => error_codes::FILE_WRITE,
                PngError::Encoding(_) => error_codes::PNG_ENCODE,
            };
            return vec![JsonError::new(code, message)];
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return vec![JsonError::new(error_codes::FILE_WRITE, message)];
        }
    }
    vec![JsonError::new(error_codes::INTERNAL, message)]
}

/// Details of a successful `apply` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Output channels (1 greyscale, 3 colour)
    pub channels: usize,
    /// Carrier angular frequency used, radians per pixel
    pub omega: f64,
    /// Phase deviation bound used, radians
    pub phase: f64,
    /// BLAKE3 hash of the written PNG
    pub output_hash: String,
    /// Resolved user parameters
    pub params: FreqModParams,
}

/// JSON output for the `apply` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyOutput {
    /// Whether the overlay was applied and written
    pub success: bool,
    /// Input image path
    pub input: String,
    /// Output image path
    pub output: String,
    /// Run details (on success)
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub result: Option<ApplyResult>,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Parameter warnings
    pub warnings: Vec<JsonWarning>,
}

impl ApplyOutput {
    /// Creates a successful apply output.
    pub fn success(
        input: &str,
        output: &str,
        result: ApplyResult,
        warnings: Vec<JsonWarning>,
    ) -> Self {
        Self {
            success: true,
            input: input.to_string(),
            output: output.to_string(),
            result: Some(result),
            errors: Vec::new(),
            warnings,
        }
    }

    /// Creates a failed apply output.
    pub fn failure(
        input: &str,
        output: &str,
        errors: Vec<JsonError>,
        warnings: Vec<JsonWarning>,
    ) -> Self {
        Self {
            success: false,
            input: input.to_string(),
            output: output.to_string(),
            result: None,
            errors,
            warnings,
        }
    }
}

/// Physical parameters for one width.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescribeResult {
    /// Row width in pixels
    pub width: u32,
    /// Normalized omega that was mapped
    pub omega01: f64,
    /// Normalized phase that was mapped
    pub phase01: f64,
    /// Carrier angular frequency, radians per pixel
    pub omega: f64,
    /// Carrier period in pixels
    pub carrier_period: f64,
    /// Phase deviation bound, radians
    pub phase: f64,
    /// Carrier frequency at omega01 = 0 and omega01 = 1
    pub omega_range: [f64; 2],
}

/// JSON output for the `describe` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeOutput {
    /// Whether the mapping succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Mapped parameters (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DescribeResult>,
}

impl DescribeOutput {
    /// Creates a successful describe output.
    pub fn success(result: DescribeResult) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Creates a failed describe output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use freqmod_spec::ErrorCode;

    #[test]
    fn test_json_error_skips_empty_fields() {
        let json = serde_json::to_string(&JsonError::new("CLI_001", "missing")).unwrap();
        assert_eq!(json, r#"{"code":"CLI_001","message":"missing"}"#);
    }

    #[test]
    fn test_backend_error_keeps_code_and_stage() {
        let err = anyhow::Error::new(FmError::InvalidQuantization).context("quantizing output");
        let errors = anyhow_to_json(&err);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "FM_008");
        assert_eq!(errors[0].stage.as_deref(), Some("quantization"));
        assert!(errors[0].message.starts_with("quantizing output: "));
    }

    #[test]
    fn test_validation_failure_expands_per_field() {
        let failure = ParamError::ValidationFailed(vec![
            ValidationError::with_field(ErrorCode::NegativeValue, "omega must be >= 0", "omega"),
            ValidationError::with_field(ErrorCode::LowpassOutOfRange, "lowpass too big", "lowpass"),
        ]);
        let errors = anyhow_to_json(&anyhow::Error::new(failure));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].code, "E002");
        assert_eq!(errors[1].path.as_deref(), Some("lowpass"));
    }

    #[test]
    fn test_io_error_is_write_failure() {
        let err: anyhow::Result<()> =
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
                .context("Failed to write output");
        let errors = anyhow_to_json(&err.unwrap_err());
        assert_eq!(errors[0].code, error_codes::FILE_WRITE);
    }

    #[test]
    fn test_apply_output_flattens_result() {
        let output = ApplyOutput::success(
            "in.png",
            "out.png",
            ApplyResult {
                width: 4,
                height: 2,
                channels: 1,
                omega: 1.5,
                phase: 0.25,
                output_hash: "abc".to_string(),
                params: FreqModParams::default(),
            },
            Vec::new(),
        );
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["width"], 4);
        assert_eq!(value["output_hash"], "abc");
        assert_eq!(value["params"]["omega"], 0.1);

        let failed =
            serde_json::to_value(ApplyOutput::failure("in.png", "out.png", vec![], vec![]))
                .unwrap();
        assert!(failed.get("width").is_none());
    }
}
