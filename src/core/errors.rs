//! Error types for the normalization pipeline.
//!
//! This module defines the errors that can occur while preparing an image for
//! recognition: invalid input rasters, invalid configuration, stage failures,
//! and the I/O errors raised by the image helpers. It also provides utility
//! functions for creating these errors with appropriate context.

use thiserror::Error;

/// Enum representing the stages of the normalization pipeline.
///
/// This enum is used to identify which stage of the pipeline an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred during Gaussian smoothing.
    Smoothing,
    /// Error occurred during adaptive binarization.
    Binarization,
    /// Error occurred while cropping to the foreground region.
    Crop,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Smoothing => write!(f, "smoothing"),
            ProcessingStage::Binarization => write!(f, "binarization"),
            ProcessingStage::Crop => write!(f, "crop"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Errors raised by low-level raster operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageProcessError {
    /// The crop size is invalid (e.g., zero dimensions).
    #[error("invalid crop size")]
    InvalidCropSize,
    /// The crop coordinates are inverted or empty.
    #[error("invalid crop coordinates")]
    InvalidCropCoordinates,
    /// The crop coordinates are out of bounds.
    #[error("crop coordinates are out of bounds")]
    CropOutOfBounds,
    /// A filter kernel could not be built.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),
}

/// Enum representing the errors that can occur while normalizing an image.
#[derive(Error, Debug)]
pub enum OCRError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred while writing an image.
    #[error("image save: {path}")]
    ImageSave {
        /// Destination that could not be written.
        path: std::path::PathBuf,
        /// The underlying encoder error.
        #[source]
        source: image::ImageError,
    },

    /// Error occurred during one of the pipeline stages.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// The processed image was requested before a successful run.
    #[error("processed image is not available, run the normalizer first")]
    NotProcessed,

    /// Error indicating a configuration problem.
    #[error("configuration")]
    Config(#[from] crate::core::config::ConfigError),

    /// Error reading or writing a configuration document.
    #[error("serialization")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for normalization operations.
pub type OcrResult<T> = Result<T, OCRError>;

impl OCRError {
    /// Creates a processing error tagged with the stage it came from.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an error for the crop stage.
    pub fn crop_error(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing(ProcessingStage::Crop, context, error)
    }

    /// Creates an error for the smoothing and binarization filters.
    pub fn filter_error(
        kind: ProcessingStage,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing(kind, "filter kernel rejected", error)
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Returns the pipeline stage for processing errors.
    pub fn stage(&self) -> Option<ProcessingStage> {
        match self {
            Self::Processing { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<ImageProcessError> for OCRError {
    /// Converts an ImageProcessError to OCRError::Processing.
    fn from(error: ImageProcessError) -> Self {
        Self::Processing {
            kind: ProcessingStage::Generic,
            context: "image processing failed".to_string(),
            source: Box::new(error),
        }
    }
}
