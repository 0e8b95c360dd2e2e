//! Shared raster helpers for the processors.

pub mod image_utils;

pub use image_utils::{check_image_size, rgb_to_grayscale, slice_gray_image};
