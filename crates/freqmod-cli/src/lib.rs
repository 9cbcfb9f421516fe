//! freqmod CLI library.
//!
//! Image loading and saving, parameter resolution and the `apply` and
//! `describe` commands behind the `freqmod` binary.

pub mod commands;
