//! Error types for parameter validation and loading.

use thiserror::Error;

/// Error codes for parameter validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: A parameter is NaN or infinite
    NonFiniteValue,
    /// E002: A parameter that must be non-negative is negative
    NegativeValue,
    /// E003: Lowpass amount outside [0, 1]
    LowpassOutOfRange,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::NonFiniteValue => "E001",
            ErrorCode::NegativeValue => "E002",
            ErrorCode::LowpassOutOfRange => "E003",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for parameter validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Omega above the nominal [0, 1] range
    OmegaAboveNominal,
    /// W002: Phase above the nominal [0, 1] range
    PhaseAboveNominal,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::OmegaAboveNominal => "W001",
            WarningCode::PhaseAboveNominal => "W002",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Name of the problematic field (e.g., "lowpass").
    pub field: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Creates a new validation error attached to a field.
    pub fn with_field(code: ErrorCode, message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "{}: {} (at {})", self.code, self.message, field)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Name of the problematic field.
    pub field: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning attached to a field.
    pub fn with_field(
        code: WarningCode,
        message: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "{}: {} (at {})", self.code, self.message, field)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for parameter operations.
#[derive(Debug, Error)]
pub enum ParamError {
    /// Validation failed with one or more errors.
    #[error("parameter validation failed: {}", join_errors(.0))]
    ValidationFailed(Vec<ValidationError>),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result of parameter validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts to a Result, returning the warnings on success.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ParamError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ParamError::ValidationFailed(self.errors))
        }
    }
}

/// Common trait for pipeline errors.
///
/// Gives every error raised while running the effect a stable code and a
/// category naming the stage that failed, so reports can group them.
pub trait BackendError: std::error::Error {
    /// Stable error code, e.g. "FM_003".
    fn code(&self) -> &'static str;

    /// Human-readable message.
    fn message(&self) -> String {
        self.to_string()
    }

    /// The stage that raised the error (e.g. "synthesis", "filter_design").
    fn category(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::NonFiniteValue.code(), "E001");
        assert_eq!(ErrorCode::NegativeValue.code(), "E002");
        assert_eq!(ErrorCode::LowpassOutOfRange.code(), "E003");
        assert_eq!(WarningCode::OmegaAboveNominal.to_string(), "W001");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::with_field(ErrorCode::NegativeValue, "must be >= 0", "numdevs");
        assert_eq!(err.to_string(), "E002: must be >= 0 (at numdevs)");

        let err = ValidationError::new(ErrorCode::NonFiniteValue, "bad");
        assert_eq!(err.to_string(), "E001: bad");
    }

    #[test]
    fn test_into_result() {
        let mut result = ValidationResult::default();
        assert!(result.is_ok());
        result.add_warning(ValidationWarning::with_field(
            WarningCode::PhaseAboveNominal,
            "large",
            "phase",
        ));
        assert_eq!(result.clone().into_result().unwrap().len(), 1);

        result.add_error(ValidationError::new(ErrorCode::LowpassOutOfRange, "too big"));
        let err = result.into_result().unwrap_err();
        assert!(err.to_string().contains("E003: too big"));
    }
}
