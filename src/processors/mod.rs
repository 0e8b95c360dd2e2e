//! Image processing stages of the normalization pipeline.
//!
//! # Modules
//!
//! * `binarize` - Gaussian smoothing and inverted adaptive thresholding
//! * `foreground` - Detection of the dominant foreground contour
//! * `geometry` - Geometric primitives: bounding regions, polygons, rotated rectangles
//! * `resize_height` - Area-averaging resize to a fixed height
//! * `utils` - Raster helpers shared by the stages

pub mod binarize;
pub mod foreground;
pub mod geometry;
pub mod resize_height;
pub mod utils;

pub use binarize::{
    FloatImage, adaptive_threshold_inv, gaussian_filter_f32, gaussian_kernel, gaussian_smooth,
    sigma_for_kernel,
};
pub use foreground::{ForegroundDetection, detect_foreground, external_contours, largest_contour};
pub use geometry::*;
pub use resize_height::{HeightResize, area_resize};
