//! freqmod parameter library
//!
//! This crate holds the user-facing contract of the frequency modulation
//! effect: the normalized parameters a caller supplies, their defaults, JSON
//! (de)serialization, and validation.
//!
//! # Example
//!
//! ```
//! use freqmod_spec::{FreqModParams, SourceRange};
//!
//! let params = FreqModParams::from_json(r#"{ "omega": 0.4, "numdevs": 1.5 }"#).unwrap();
//! assert_eq!(params.phase, 0.1);
//! assert!(params.greyscale);
//! assert_eq!(params.source_range, SourceRange::Observed);
//!
//! let result = params.validate();
//! assert!(result.is_ok());
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation, and the shared
//!   [`BackendError`] trait
//! - [`params`]: The [`FreqModParams`] type and its validation

pub mod error;
pub mod params;

pub use error::{
    BackendError, ErrorCode, ParamError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use params::{FreqModParams, SourceRange};
