//! Configuration management for the normalization pipeline.
//!
//! This module provides the validation trait and error type shared by every
//! configuration struct in the crate.

pub mod errors;

pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
