//! Utility functions for basic image operations.

use crate::core::errors::ImageProcessError;
use image::{GrayImage, RgbImage, imageops};

/// Checks if the given image size is valid (non-zero dimensions).
///
/// # Arguments
///
/// * `size` - A reference to an array containing width and height values.
///
/// # Returns
///
/// * `Ok(())` if both dimensions are greater than zero.
/// * `Err(ImageProcessError::InvalidCropSize)` if either dimension is zero.
pub fn check_image_size(size: &[u32; 2]) -> Result<(), ImageProcessError> {
    if size[0] == 0 || size[1] == 0 {
        return Err(ImageProcessError::InvalidCropSize);
    }
    Ok(())
}

/// Slices a region from a grayscale image buffer.
///
/// # Arguments
///
/// * `img` - Reference to the source grayscale image buffer.
/// * `coords` - Tuple containing (x1, y1, x2, y2) coordinates defining the crop region.
///   (x1, y1) is the top-left corner, (x2, y2) is the exclusive bottom-right corner.
///
/// # Returns
///
/// * `Ok(GrayImage)` - The cropped grayscale image region.
/// * `Err(ImageProcessError)` - If the coordinates are invalid or out of bounds.
///
/// # Examples
///
/// ```rust
/// use image::GrayImage;
/// use mathocr::processors::utils::image_utils::slice_gray_image;
///
/// let img = GrayImage::new(100, 100);
/// let cropped = slice_gray_image(&img, (10, 10, 50, 50)).unwrap();
/// assert_eq!(cropped.dimensions(), (40, 40));
/// ```
pub fn slice_gray_image(
    img: &GrayImage,
    coords: (u32, u32, u32, u32),
) -> Result<GrayImage, ImageProcessError> {
    let (x1, y1, x2, y2) = coords;
    let (img_width, img_height) = img.dimensions();

    if x1 >= x2 || y1 >= y2 {
        return Err(ImageProcessError::InvalidCropCoordinates);
    }

    if x2 > img_width || y2 > img_height {
        return Err(ImageProcessError::CropOutOfBounds);
    }

    Ok(imageops::crop_imm(img, x1, y1, x2 - x1, y2 - y1).to_image())
}

/// Converts an RGB image to grayscale.
///
/// Luminance uses the Rec. 709 weights of `image::imageops::grayscale`.
///
/// # Arguments
///
/// * `img` - Reference to the source RGB image.
///
/// # Returns
///
/// * `GrayImage` - The converted grayscale image.
pub fn rgb_to_grayscale(img: &RgbImage) -> GrayImage {
    imageops::grayscale(img)
}
