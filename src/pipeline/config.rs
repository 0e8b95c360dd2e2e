//! Configuration for the normalization pipeline.

use crate::core::config::{ConfigError, ConfigValidator};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default smoothing kernel size.
pub const DEFAULT_SMOOTHING_KERNEL: u32 = 5;
/// Default smoothing standard deviation.
pub const DEFAULT_SMOOTHING_SIGMA: f32 = 1.0;
/// Default adaptive threshold neighborhood.
pub const DEFAULT_BINARIZE_BLOCK_SIZE: u32 = 15;
/// Default adaptive threshold bias.
pub const DEFAULT_BINARIZE_CONSTANT: i32 = 2;
/// Default output height expected by the recognizer.
pub const DEFAULT_TARGET_HEIGHT: u32 = 64;
/// Default level written for foreground pixels.
pub const DEFAULT_FOREGROUND_VALUE: u8 = 255;

fn default_smoothing_kernel() -> u32 {
    DEFAULT_SMOOTHING_KERNEL
}

fn default_smoothing_sigma() -> f32 {
    DEFAULT_SMOOTHING_SIGMA
}

fn default_binarize_block_size() -> u32 {
    DEFAULT_BINARIZE_BLOCK_SIZE
}

fn default_binarize_constant() -> i32 {
    DEFAULT_BINARIZE_CONSTANT
}

fn default_target_height() -> u32 {
    DEFAULT_TARGET_HEIGHT
}

fn default_foreground_value() -> u8 {
    DEFAULT_FOREGROUND_VALUE
}

/// Parameters of every pipeline stage.
///
/// Fixed once a normalizer is built; no stage recomputes them. Missing fields
/// in a JSON document take their defaults, so a partial file works.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Gaussian smoothing kernel size. Must be odd.
    #[serde(default = "default_smoothing_kernel")]
    pub smoothing_kernel: u32,
    /// Gaussian smoothing sigma. Zero derives it from the kernel size.
    #[serde(default = "default_smoothing_sigma")]
    pub smoothing_sigma: f32,
    /// Adaptive threshold neighborhood size. Must be odd and at least 3.
    #[serde(default = "default_binarize_block_size")]
    pub binarize_block_size: u32,
    /// Subtracted from the local mean before thresholding.
    #[serde(default = "default_binarize_constant")]
    pub binarize_constant: i32,
    /// Output height in pixels.
    #[serde(default = "default_target_height")]
    pub target_height: u32,
    /// Level written for foreground pixels in the binary raster.
    #[serde(default = "default_foreground_value")]
    pub foreground_value: u8,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            smoothing_kernel: DEFAULT_SMOOTHING_KERNEL,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
            binarize_block_size: DEFAULT_BINARIZE_BLOCK_SIZE,
            binarize_constant: DEFAULT_BINARIZE_CONSTANT,
            target_height: DEFAULT_TARGET_HEIGHT,
            foreground_value: DEFAULT_FOREGROUND_VALUE,
        }
    }
}

impl NormalizerConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the smoothing kernel size and sigma.
    pub fn with_smoothing(mut self, kernel: u32, sigma: f32) -> Self {
        self.smoothing_kernel = kernel;
        self.smoothing_sigma = sigma;
        self
    }

    /// Sets the adaptive threshold block size and constant.
    pub fn with_binarization(mut self, block_size: u32, constant: i32) -> Self {
        self.binarize_block_size = block_size;
        self.binarize_constant = constant;
        self
    }

    /// Sets the output height.
    pub fn with_target_height(mut self, target_height: u32) -> Self {
        self.target_height = target_height;
        self
    }

    /// Sets the foreground level.
    pub fn with_foreground_value(mut self, value: u8) -> Self {
        self.foreground_value = value;
        self
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::core::OcrResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ConfigValidator for NormalizerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_odd_window(self.smoothing_kernel, 1, "smoothing_kernel")?;
        self.validate_non_negative_f32(self.smoothing_sigma, "smoothing_sigma")?;
        self.validate_odd_window(self.binarize_block_size, 3, "binarize_block_size")?;
        self.validate_positive_u32(self.target_height, "target_height")?;
        if self.foreground_value == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "foreground_value must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
