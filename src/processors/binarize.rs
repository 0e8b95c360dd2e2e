//! Smoothing and adaptive binarization.
//!
//! Both stages are Gaussian filters built from an explicit odd-sized kernel and
//! applied separably through imageproc. Filtering runs on `f32` buffers so the
//! two passes are not rounded in between; smoothing rounds once at the end and
//! the threshold compares against the unrounded local mean. Edge pixels are
//! replicated by the filter, so the output keeps the input dimensions.

use crate::core::errors::ImageProcessError;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;
use tracing::debug;

/// A single-channel `f32` raster.
pub type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Derives a standard deviation from a kernel size.
///
/// This is the usual rule for "sigma follows the window": a 3-tap kernel gets
/// 0.8, a 15-tap kernel gets 2.6.
pub fn sigma_for_kernel(size: u32) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Builds a normalized 1D Gaussian kernel.
///
/// # Arguments
///
/// * `size` - Number of taps; must be odd.
/// * `sigma` - Standard deviation. Values `<= 0` derive sigma from `size`.
///
/// # Errors
///
/// Returns `ImageProcessError::InvalidKernel` if `size` is zero or even.
pub fn gaussian_kernel(size: u32, sigma: f32) -> Result<Vec<f32>, ImageProcessError> {
    if size == 0 || size % 2 == 0 {
        return Err(ImageProcessError::InvalidKernel(format!(
            "kernel size must be odd and positive, got {size}"
        )));
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        sigma_for_kernel(size)
    };
    let center = (size / 2) as f32;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / two_sigma_sq).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    Ok(kernel)
}

/// Applies a square Gaussian filter without intermediate rounding.
///
/// # Errors
///
/// Returns `ImageProcessError::InvalidKernel` for an even or zero kernel size.
pub fn gaussian_filter_f32(
    img: &GrayImage,
    kernel_size: u32,
    sigma: f32,
) -> Result<FloatImage, ImageProcessError> {
    let kernel = gaussian_kernel(kernel_size, sigma)?;
    let float: FloatImage = ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
        Luma([img.get_pixel(x, y)[0] as f32])
    });
    if kernel.len() == 1 {
        return Ok(float);
    }
    Ok(separable_filter_equal(&float, kernel.as_slice()))
}

/// Applies a square Gaussian blur of the given kernel size and sigma.
///
/// The filtered values are rounded to the nearest level once.
///
/// # Errors
///
/// Returns `ImageProcessError::InvalidKernel` for an even or zero kernel size.
pub fn gaussian_smooth(
    img: &GrayImage,
    kernel_size: u32,
    sigma: f32,
) -> Result<GrayImage, ImageProcessError> {
    if kernel_size == 1 {
        return Ok(img.clone());
    }
    let filtered = gaussian_filter_f32(img, kernel_size, sigma)?;
    Ok(GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([filtered.get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8])
    }))
}

/// Binarizes against a Gaussian-weighted local mean, inverted.
///
/// A pixel becomes `on_value` when it is at least `constant` levels darker
/// than the weighted mean of its `block_size × block_size` neighborhood, and 0
/// otherwise. Ink on paper therefore comes out bright on black, regardless of
/// how the illumination varies across the page.
///
/// # Errors
///
/// Returns `ImageProcessError::InvalidKernel` for an even or zero block size.
pub fn adaptive_threshold_inv(
    img: &GrayImage,
    block_size: u32,
    constant: i32,
    on_value: u8,
) -> Result<GrayImage, ImageProcessError> {
    let local_mean = gaussian_filter_f32(img, block_size, 0.0)?;
    let bias = -(constant as f32);

    let mut binary = GrayImage::new(img.width(), img.height());
    let mut foreground = 0usize;
    for (x, y, pixel) in binary.enumerate_pixels_mut() {
        let src = img.get_pixel(x, y)[0] as f32;
        let mean = local_mean.get_pixel(x, y)[0];
        if src - mean <= bias {
            *pixel = Luma([on_value]);
            foreground += 1;
        }
    }

    debug!(
        "Adaptive threshold (block {}, C {}): {} foreground pixels of {}",
        block_size,
        constant,
        foreground,
        img.width() as usize * img.height() as usize
    );

    Ok(binary)
}
