//! Image transformation utilities for skew correction.
//!
//! This module provides the affine rotation used to level a tilted formula
//! crop. Rotation happens about the raster center and keeps the canvas size;
//! samples that fall outside the source replicate the nearest edge pixel, so
//! no artificial black border is introduced around the foreground.

use image::GrayImage;
use rayon::prelude::*;
use tracing::debug;

/// Free parameter of the cubic convolution kernel.
const CUBIC_A: f64 = -0.75;

/// A 2×3 affine matrix in row-major order.
pub type AffineMatrix = [[f64; 3]; 2];

/// Builds the matrix that rotates by `angle_deg` about `center`.
///
/// Positive angles rotate counter-clockwise as seen on screen, with the y axis
/// pointing down.
///
/// # Arguments
///
/// * `center` - Rotation center in pixel coordinates
/// * `angle_deg` - Rotation angle in degrees
///
/// # Returns
///
/// The forward mapping from source to destination coordinates.
pub fn rotation_matrix(center: (f64, f64), angle_deg: f64) -> AffineMatrix {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (cx, cy) = center;
    [
        [cos, sin, (1.0 - cos) * cx - sin * cy],
        [-sin, cos, sin * cx + (1.0 - cos) * cy],
    ]
}

/// Inverts a rotation-about-a-point matrix.
///
/// The linear part is orthonormal, so the inverse is its transpose with the
/// translation carried through.
fn invert_rotation(m: &AffineMatrix) -> AffineMatrix {
    let (a, b, tx) = (m[0][0], m[0][1], m[0][2]);
    let (c, d, ty) = (m[1][0], m[1][1], m[1][2]);
    [
        [a, c, -(a * tx + c * ty)],
        [b, d, -(b * tx + d * ty)],
    ]
}

/// Rotates a grayscale image about its center.
///
/// The center is taken at `(width / 2, height / 2)` using integer division.
/// Output pixels are sampled with bicubic interpolation; taps beyond the
/// border are clamped to the nearest edge pixel. The output has the same
/// dimensions as the input.
///
/// # Arguments
///
/// * `src_image` - The image to rotate
/// * `angle_deg` - Counter-clockwise rotation in degrees
///
/// # Returns
///
/// The rotated image. A zero angle or an empty image returns an exact copy.
pub fn rotate_about_center(src_image: &GrayImage, angle_deg: f32) -> GrayImage {
    let (width, height) = src_image.dimensions();
    if width == 0 || height == 0 || angle_deg == 0.0 || !angle_deg.is_finite() {
        return src_image.clone();
    }

    let center = ((width / 2) as f64, (height / 2) as f64);
    let inverse = invert_rotation(&rotation_matrix(center, angle_deg as f64));
    debug!(
        "Rotating {}x{} by {:.3} deg about ({}, {})",
        width, height, angle_deg, center.0, center.1
    );

    let mut dst_image = GrayImage::new(width, height);
    let buffer: &mut [u8] = dst_image.as_mut();

    buffer
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(dst_y, row_buffer)| {
            let y = dst_y as f64;
            for (dst_x, out) in row_buffer.iter_mut().enumerate() {
                let x = dst_x as f64;
                let src_x = inverse[0][0] * x + inverse[0][1] * y + inverse[0][2];
                let src_y = inverse[1][0] * x + inverse[1][1] * y + inverse[1][2];
                *out = bicubic_interpolate(src_image, src_x, src_y);
            }
        });

    dst_image
}

/// Weights of the four taps around a sample with fractional offset `t`.
fn cubic_weights(t: f64) -> [f64; 4] {
    let near = |x: f64| ((CUBIC_A + 2.0) * x - (CUBIC_A + 3.0)) * x * x + 1.0;
    let far = |x: f64| ((CUBIC_A * x - 5.0 * CUBIC_A) * x + 8.0 * CUBIC_A) * x - 4.0 * CUBIC_A;
    [far(1.0 + t), near(t), near(1.0 - t), far(2.0 - t)]
}

/// Performs bicubic interpolation at non-integer coordinates.
///
/// Neighbor indices are clamped to the image, which replicates the border.
fn bicubic_interpolate(image: &GrayImage, x: f64, y: f64) -> u8 {
    let (width, height) = image.dimensions();
    let x0 = x.floor();
    let y0 = y.floor();
    let wx = cubic_weights(x - x0);
    let wy = cubic_weights(y - y0);

    let clamp_index = |v: f64, len: u32| -> u32 { v.clamp(0.0, (len - 1) as f64) as u32 };

    let mut acc = 0.0;
    for (j, weight_y) in wy.iter().enumerate() {
        let sy = clamp_index(y0 + j as f64 - 1.0, height);
        let mut row = 0.0;
        for (i, weight_x) in wx.iter().enumerate() {
            let sx = clamp_index(x0 + i as f64 - 1.0, width);
            row += weight_x * image.get_pixel(sx, sy)[0] as f64;
        }
        acc += weight_y * row;
    }

    acc.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_cubic_weights_sum_to_one() {
        for t in [0.0, 0.25, 0.5, 0.9] {
            let sum: f64 = cubic_weights(t).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "t = {t}");
        }
        let at_zero = cubic_weights(0.0);
        assert!((at_zero[1] - 1.0).abs() < 1e-12);
        assert!(at_zero[0].abs() < 1e-12 && at_zero[2].abs() < 1e-12);
    }

    #[test]
    fn test_rotation_matrix_round_trip() {
        let m = rotation_matrix((10.0, 5.0), 30.0);
        let inv = invert_rotation(&m);
        let (x, y) = (3.0, 7.0);
        let fx = m[0][0] * x + m[0][1] * y + m[0][2];
        let fy = m[1][0] * x + m[1][1] * y + m[1][2];
        let bx = inv[0][0] * fx + inv[0][1] * fy + inv[0][2];
        let by = inv[1][0] * fx + inv[1][1] * fy + inv[1][2];
        assert!((bx - x).abs() < 1e-9);
        assert!((by - y).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_matrix_keeps_center_fixed() {
        let m = rotation_matrix((10.0, 5.0), 37.0);
        let fx = m[0][0] * 10.0 + m[0][1] * 5.0 + m[0][2];
        let fy = m[1][0] * 10.0 + m[1][1] * 5.0 + m[1][2];
        assert!((fx - 10.0).abs() < 1e-9);
        assert!((fy - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_angle_is_exact_copy() {
        let img = GrayImage::from_fn(13, 7, |x, y| Luma([(x * 17 + y * 5) as u8]));
        assert_eq!(rotate_about_center(&img, 0.0), img);
    }

    #[test]
    fn test_rotation_keeps_dimensions() {
        let img = GrayImage::from_fn(40, 15, |x, _| Luma([(x * 6) as u8]));
        let rotated = rotate_about_center(&img, 12.5);
        assert_eq!(rotated.dimensions(), (40, 15));
    }

    #[test]
    fn test_constant_image_stays_constant() {
        // Replicated borders mean no black corners appear.
        let img = GrayImage::from_pixel(30, 20, Luma([77]));
        let rotated = rotate_about_center(&img, 17.0);
        assert!(rotated.pixels().all(|p| p[0] == 77));
    }

    #[test]
    fn test_quarter_turn_is_counter_clockwise() {
        let mut img = GrayImage::new(5, 5);
        img.put_pixel(4, 2, Luma([255]));
        let rotated = rotate_about_center(&img, 90.0);
        assert_eq!(rotated.get_pixel(2, 0)[0], 255);
        assert_eq!(rotated.get_pixel(4, 2)[0], 0);
    }

    #[test]
    fn test_half_turn_mirrors_corners() {
        let mut img = GrayImage::new(5, 5);
        img.put_pixel(0, 0, Luma([200]));
        let rotated = rotate_about_center(&img, 180.0);
        assert_eq!(rotated.get_pixel(4, 4)[0], 200);
        assert_eq!(rotated.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_empty_image_is_returned_unchanged() {
        let img = GrayImage::new(0, 10);
        assert_eq!(rotate_about_center(&img, 30.0).dimensions(), (0, 10));
    }
}
