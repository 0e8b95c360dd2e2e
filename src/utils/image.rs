//! Utility functions for image I/O.
//!
//! This module provides functions for loading images from disk, converting
//! between the `image` crate's buffer types, and writing normalized output.

use crate::core::OCRError;
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::Path;

/// Converts a DynamicImage to an RgbImage.
///
/// Alpha is dropped and 16-bit or float channels are scaled down to 8 bits.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// Any format supported by the `image` crate is accepted.
///
/// # Errors
///
/// Returns `OCRError::ImageLoad` if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> Result<RgbImage, OCRError> {
    let img = image::open(path).map_err(OCRError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Loads a batch of images from file paths.
///
/// Images are decoded in parallel; each entry carries its own result so one
/// unreadable file does not hide the others.
pub fn load_images<P: AsRef<Path> + Send + Sync>(
    paths: &[P],
) -> Vec<Result<RgbImage, OCRError>> {
    use rayon::prelude::*;
    paths.par_iter().map(|p| load_image(p.as_ref())).collect()
}

/// Writes a grayscale image, choosing the format from the file extension.
///
/// # Errors
///
/// Returns `OCRError::ImageSave` naming the destination if encoding or
/// writing fails.
pub fn save_gray_image(img: &GrayImage, path: &Path) -> Result<(), OCRError> {
    img.save(path).map_err(|source| OCRError::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, Rgba, RgbaImage};

    #[test]
    fn test_dynamic_to_rgb_drops_alpha() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let rgb = dynamic_to_rgb(DynamicImage::ImageRgba8(rgba));
        assert_eq!(*rgb.get_pixel(1, 1), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_load_missing_image() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, OCRError::ImageLoad(_)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let img = GrayImage::from_fn(6, 4, |x, y| Luma([(x * 40 + y) as u8]));

        save_gray_image(&img, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (6, 4));
        assert_eq!(*loaded.get_pixel(2, 1), Rgb([81, 81, 81]));

        let results = load_images(&[path.clone(), dir.path().join("missing.png")]);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_save_to_missing_directory_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.png");
        let err = save_gray_image(&GrayImage::new(2, 2), &path).unwrap_err();
        match err {
            OCRError::ImageSave { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
