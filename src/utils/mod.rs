//! Utility functions for the normalization pipeline.
//!
//! This module provides image I/O helpers, the skew-correcting rotation, and
//! logging setup.

pub mod image;
pub mod transform;

// Re-export image I/O functions
pub use image::{dynamic_to_rgb, load_image, load_images, save_gray_image};

// Re-export transform utility functions
pub use transform::{AffineMatrix, rotate_about_center, rotation_matrix};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
