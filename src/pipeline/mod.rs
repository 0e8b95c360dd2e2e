//! The normalization pipeline and its configuration.

pub mod config;
pub mod normalizer;

pub use config::NormalizerConfig;
pub use normalizer::{
    ImageNormalizer, NormalizationOutput, normalize, normalize_batch, normalize_with_report,
};
