//! The image normalization pipeline.
//!
//! Turns a photographed or scanned formula into the fixed-height, binarized,
//! deskewed strip a recognizer consumes:
//!
//! 1. grayscale conversion
//! 2. Gaussian smoothing
//! 3. inverted adaptive thresholding (ink becomes bright on black)
//! 4. detection of the dominant foreground contour and a crop to its bounds
//! 5. rotation of the crop by the contour's skew angle
//! 6. area resize to the target height
//!
//! [`normalize`] is the stateless entry point. [`ImageNormalizer`] wraps it
//! for callers that hold on to an input and fetch the result later.

use crate::core::config::{ConfigValidator, ConfigValidatorExt};
use crate::core::errors::{OCRError, OcrResult, ProcessingStage};
use crate::pipeline::config::NormalizerConfig;
use crate::processors::binarize::{adaptive_threshold_inv, gaussian_smooth};
use crate::processors::foreground::{ForegroundDetection, detect_foreground};
use crate::processors::resize_height::HeightResize;
use crate::processors::utils::{check_image_size, rgb_to_grayscale, slice_gray_image};
use crate::utils::image::dynamic_to_rgb;
use crate::utils::transform::rotate_about_center;
use image::{DynamicImage, GrayImage, RgbImage};
use rayon::prelude::*;
use tracing::debug;

/// The processed image together with what the pipeline found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationOutput {
    /// Single-channel output, exactly `target_height` rows tall.
    pub image: GrayImage,
    /// The foreground contour the crop and angle came from, if any was found.
    pub detection: Option<ForegroundDetection>,
    /// Whether the rotated crop was empty and a blank square was emitted.
    pub fallback_used: bool,
}

fn ensure_non_empty(image: &RgbImage) -> OcrResult<()> {
    let (width, height) = image.dimensions();
    check_image_size(&[width, height]).map_err(|_| {
        OCRError::invalid_input(format!(
            "image must have non-zero dimensions, got {width}x{height}"
        ))
    })
}

/// Normalizes one color image.
///
/// # Errors
///
/// * `OCRError::InvalidInput` if the image has a zero dimension.
/// * `OCRError::Config` if `config` fails validation.
/// * `OCRError::Processing` if a stage fails.
pub fn normalize(image: &RgbImage, config: &NormalizerConfig) -> OcrResult<GrayImage> {
    normalize_with_report(image, config).map(|output| output.image)
}

/// Normalizes one color image and reports the detection it was based on.
///
/// The input is never modified; every stage allocates a new raster.
pub fn normalize_with_report(
    image: &RgbImage,
    config: &NormalizerConfig,
) -> OcrResult<NormalizationOutput> {
    ensure_non_empty(image)?;
    config.validate()?;

    let gray = rgb_to_grayscale(image);

    let smoothed = gaussian_smooth(&gray, config.smoothing_kernel, config.smoothing_sigma)
        .map_err(|e| OCRError::filter_error(ProcessingStage::Smoothing, e))?;

    let binary = adaptive_threshold_inv(
        &smoothed,
        config.binarize_block_size,
        config.binarize_constant,
        config.foreground_value,
    )
    .map_err(|e| OCRError::filter_error(ProcessingStage::Binarization, e))?;

    let detection = detect_foreground(&binary);
    let (cropped, angle) = match &detection {
        Some(found) => {
            let crop = slice_gray_image(&binary, found.region.to_coords())
                .map_err(|e| OCRError::crop_error("slice foreground region", e))?;
            (crop, found.skew_angle)
        }
        None => {
            debug!("No foreground contour found, keeping the full binary raster");
            (binary, 0.0)
        }
    };

    let rotated = rotate_about_center(&cropped, angle);
    let fallback_used = rotated.width() == 0 || rotated.height() == 0;
    let output = HeightResize::new(config.target_height).resize(&rotated);

    debug!(
        "Normalized {}x{} -> {}x{} (angle {:.2}, fallback {})",
        image.width(),
        image.height(),
        output.width(),
        output.height(),
        angle,
        fallback_used
    );

    Ok(NormalizationOutput {
        image: output,
        detection,
        fallback_used,
    })
}

/// Normalizes independent images in parallel.
///
/// Results are returned in input order, each with its own outcome.
pub fn normalize_batch(
    images: &[RgbImage],
    config: &NormalizerConfig,
) -> Vec<OcrResult<GrayImage>> {
    images.par_iter().map(|img| normalize(img, config)).collect()
}

/// Holds one input image and the result of normalizing it.
///
/// Starts out unprocessed; [`ImageNormalizer::run`] computes the output and
/// [`ImageNormalizer::get_processed_image`] hands it back. Running again
/// recomputes from the original input.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    image: RgbImage,
    config: NormalizerConfig,
    output: Option<NormalizationOutput>,
}

impl ImageNormalizer {
    /// Creates a normalizer with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `OCRError::InvalidInput` if the image has a zero dimension.
    pub fn new(image: RgbImage) -> OcrResult<Self> {
        Self::with_config(image, NormalizerConfig::default())
    }

    /// Creates a normalizer with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `OCRError::InvalidInput` for a zero-dimension image and
    /// `OCRError::Config` for an invalid configuration.
    pub fn with_config(image: RgbImage, config: NormalizerConfig) -> OcrResult<Self> {
        ensure_non_empty(&image)?;
        let config = config.validate_and_wrap_ocr_error()?;
        Ok(Self {
            image,
            config,
            output: None,
        })
    }

    /// Creates a normalizer from any decoded image.
    pub fn from_dynamic(image: DynamicImage, config: NormalizerConfig) -> OcrResult<Self> {
        Self::with_config(dynamic_to_rgb(image), config)
    }

    /// Runs the pipeline and stores the result.
    ///
    /// Any earlier result is dropped first, so a failed run leaves the
    /// normalizer unprocessed.
    pub fn run(&mut self) -> OcrResult<()> {
        self.output = None;
        self.output = Some(normalize_with_report(&self.image, &self.config)?);
        Ok(())
    }

    /// Returns the processed image.
    ///
    /// # Errors
    ///
    /// Returns `OCRError::NotProcessed` if [`run`](Self::run) has not succeeded.
    pub fn get_processed_image(&self) -> OcrResult<&GrayImage> {
        self.output
            .as_ref()
            .map(|output| &output.image)
            .ok_or(OCRError::NotProcessed)
    }

    /// Consumes the normalizer and returns the processed image.
    pub fn into_processed_image(self) -> OcrResult<GrayImage> {
        self.output
            .map(|output| output.image)
            .ok_or(OCRError::NotProcessed)
    }

    /// Returns the full output of the last successful run.
    pub fn report(&self) -> Option<&NormalizationOutput> {
        self.output.as_ref()
    }

    /// Returns whether a result is available.
    pub fn is_processed(&self) -> bool {
        self.output.is_some()
    }

    /// Returns the input image.
    pub fn input(&self) -> &RgbImage {
        &self.image
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }
}
