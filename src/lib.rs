//! # mathocr
//!
//! Image normalization for handwritten and printed math formula recognition.
//!
//! A recognizer for formula images wants a clean, level, fixed-height strip of
//! bright ink on a black background. This crate turns an arbitrary photo or scan
//! into exactly that.
//!
//! ## Pipeline
//!
//! 1. Grayscale conversion
//! 2. Gaussian smoothing
//! 3. Inverted adaptive Gaussian thresholding
//! 4. Crop to the largest external foreground contour
//! 5. Skew correction from the contour's minimum-area rectangle
//! 6. Area resize to a fixed height (64 pixels by default)
//!
//! ## Modules
//!
//! * [`core`] - Error handling and configuration validation
//! * [`pipeline`] - The normalizer and its configuration
//! * [`processors`] - The individual image processing stages
//! * [`utils`] - Image I/O, rotation, and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mathocr::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = load_image(Path::new("formula.jpg"))?;
//! let normalized = normalize(&image, &NormalizerConfig::default())?;
//! assert_eq!(normalized.height(), 64);
//! # Ok(())
//! # }
//! ```
//!
//! ### Stateful usage
//!
//! ```rust,no_run
//! use mathocr::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NormalizerConfig::new().with_target_height(48);
//! let image = load_image(Path::new("formula.png"))?;
//! let mut normalizer = ImageNormalizer::with_config(image, config)?;
//! normalizer.run()?;
//! if let Some(detection) = normalizer.report().and_then(|r| r.detection) {
//!     println!("skew: {:.2} deg", detection.skew_angle);
//! }
//! let strip = normalizer.get_processed_image()?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use mathocr::prelude::*;
/// ```
///
/// Included items:
/// - The normalizer (`normalize`, `normalize_batch`, `ImageNormalizer`, `NormalizerConfig`)
/// - Essential error and result types (`OCRError`, `OcrResult`)
/// - Basic image loading and saving (`load_image`, `save_gray_image`)
pub mod prelude {
    // Pipeline
    pub use crate::pipeline::{
        ImageNormalizer, NormalizationOutput, NormalizerConfig, normalize, normalize_batch,
        normalize_with_report,
    };

    // Error Handling
    pub use crate::core::{OCRError, OcrResult};

    // Image Utility
    pub use crate::utils::{load_image, load_images, save_gray_image};
}
