//! The core module of the normalization pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Configuration validation
//! - Error handling
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod config;
pub mod errors;

pub use config::{ConfigError, ConfigValidator, ConfigValidatorExt};
pub use errors::{ImageProcessError, OCRError, OcrResult, ProcessingStage};
