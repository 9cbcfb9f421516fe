//! CLI command implementations

pub mod apply;
pub mod describe;
pub mod json_output;
pub mod params;
