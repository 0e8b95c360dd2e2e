//! Height normalization for recognition input.
//!
//! Recognition models expect a fixed input height. This module scales a crop
//! to that height while preserving its aspect ratio, using area averaging so
//! thin strokes survive strong downscaling.

use image::GrayImage;
use rayon::prelude::*;
use tracing::debug;

/// Scales grayscale images to a fixed height.
#[derive(Debug, Clone, Copy)]
pub struct HeightResize {
    /// Output height in pixels.
    pub target_height: u32,
}

impl HeightResize {
    /// Creates a resizer for the given output height.
    pub fn new(target_height: u32) -> Self {
        Self { target_height }
    }

    /// Computes the output width for a `width × height` input.
    ///
    /// Uses integer arithmetic, `width * target / height` truncated, and never
    /// returns less than one pixel. Returns `None` for a degenerate input.
    pub fn target_width(&self, width: u32, height: u32) -> Option<u32> {
        if width == 0 || height == 0 {
            return None;
        }
        let scaled = width as u64 * self.target_height as u64 / height as u64;
        Some(scaled.clamp(1, u32::MAX as u64) as u32)
    }

    /// Resizes `img` to the target height.
    ///
    /// An image with a zero dimension cannot be scaled; it is replaced by an
    /// all-black square of `target_height × target_height`.
    pub fn resize(&self, img: &GrayImage) -> GrayImage {
        let (width, height) = img.dimensions();
        match self.target_width(width, height) {
            Some(new_width) => {
                debug!(
                    "Resizing {}x{} -> {}x{}",
                    width, height, new_width, self.target_height
                );
                area_resize(img, new_width, self.target_height)
            }
            None => {
                debug!(
                    "Degenerate {}x{} input, emitting blank {}x{}",
                    width, height, self.target_height, self.target_height
                );
                GrayImage::new(self.target_height, self.target_height)
            }
        }
    }
}

/// Source taps and their weights for each output index along one axis.
///
/// Each output pixel covers a box of `src_len / dst_len` source pixels; a
/// source pixel contributes in proportion to how much of it the box covers.
fn area_taps(src_len: u32, dst_len: u32) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len as usize);

            let mut taps: Vec<(usize, f64)> = (first..last)
                .filter_map(|s| {
                    let cover = (end.min((s + 1) as f64) - start.max(s as f64)).max(0.0);
                    (cover > 1e-9).then_some((s, cover))
                })
                .collect();
            if taps.is_empty() {
                taps.push((first.min(src_len as usize - 1), 1.0));
            }

            let total: f64 = taps.iter().map(|(_, w)| w).sum();
            taps.into_iter()
                .map(|(s, w)| (s, (w / total) as f32))
                .collect()
        })
        .collect()
}

/// Resizes by area averaging to exactly `dst_width × dst_height`.
///
/// Both target dimensions must be non-zero, as must the source's.
pub fn area_resize(img: &GrayImage, dst_width: u32, dst_height: u32) -> GrayImage {
    let (src_width, src_height) = img.dimensions();
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return GrayImage::new(dst_width, dst_height);
    }
    if (src_width, src_height) == (dst_width, dst_height) {
        return img.clone();
    }

    let x_taps = area_taps(src_width, dst_width);
    let y_taps = area_taps(src_height, dst_height);

    // Horizontal pass into a float buffer, one row per source row.
    let src = img.as_raw();
    let mut horizontal = vec![0f32; src_height as usize * dst_width as usize];
    horizontal
        .par_chunks_mut(dst_width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src[y * src_width as usize..(y + 1) * src_width as usize];
            for (out, taps) in row.iter_mut().zip(&x_taps) {
                *out = taps.iter().map(|&(s, w)| src_row[s] as f32 * w).sum();
            }
        });

    let mut dst_image = GrayImage::new(dst_width, dst_height);
    let buffer: &mut [u8] = dst_image.as_mut();
    buffer
        .par_chunks_mut(dst_width as usize)
        .zip(y_taps.par_iter())
        .for_each(|(row, taps)| {
            for (x, out) in row.iter_mut().enumerate() {
                let value: f32 = taps
                    .iter()
                    .map(|&(s, w)| horizontal[s * dst_width as usize + x] * w)
                    .sum();
                *out = value.round().clamp(0.0, 255.0) as u8;
            }
        });

    dst_image
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_target_width_preserves_aspect_ratio() {
        let resizer = HeightResize::new(64);
        assert_eq!(resizer.target_width(100, 40), Some(160));
        assert_eq!(resizer.target_width(640, 480), Some(85));
        assert_eq!(resizer.target_width(64, 64), Some(64));
    }

    #[test]
    fn test_target_width_never_collapses() {
        let resizer = HeightResize::new(64);
        assert_eq!(resizer.target_width(1, 1000), Some(1));
        assert_eq!(resizer.target_width(0, 10), None);
        assert_eq!(resizer.target_width(10, 0), None);
    }

    #[test]
    fn test_degenerate_input_yields_blank_square() {
        let resizer = HeightResize::new(64);
        let out = resizer.resize(&GrayImage::new(0, 25));
        assert_eq!(out.dimensions(), (64, 64));
        assert!(out.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_resize_output_height() {
        let img = GrayImage::from_fn(100, 40, |x, y| Luma([((x + y) % 256) as u8]));
        let out = HeightResize::new(64).resize(&img);
        assert_eq!(out.dimensions(), (160, 64));
    }

    #[test]
    fn test_same_size_is_copy() {
        let img = GrayImage::from_fn(30, 64, |x, y| Luma([(x * 3 + y) as u8]));
        assert_eq!(HeightResize::new(64).resize(&img), img);
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let img = GrayImage::from_pixel(97, 53, Luma([140]));
        let out = HeightResize::new(32).resize(&img);
        assert!(out.pixels().all(|p| p[0] == 140));
    }

    #[test]
    fn test_area_resize_averages_blocks() {
        let img = GrayImage::from_raw(
            4,
            4,
            vec![
                0, 0, 100, 100, //
                0, 0, 100, 100, //
                200, 200, 40, 40, //
                200, 200, 40, 60,
            ],
        )
        .unwrap();
        let out = area_resize(&img, 2, 2);
        assert_eq!(out.as_raw(), &vec![0, 100, 200, 45]);
    }

    #[test]
    fn test_area_resize_fractional_boxes() {
        // 3 -> 2 columns: each output covers 1.5 source pixels.
        let img = GrayImage::from_raw(3, 1, vec![0, 90, 180]).unwrap();
        let out = area_resize(&img, 2, 1);
        assert_eq!(out.as_raw(), &vec![30, 150]);
    }

    #[test]
    fn test_area_taps_are_normalized() {
        for (src, dst) in [(7, 3), (3, 7), (640, 85), (1, 5)] {
            for taps in area_taps(src, dst) {
                let sum: f32 = taps.iter().map(|(_, w)| w).sum();
                assert!((sum - 1.0).abs() < 1e-5);
                assert!(taps.iter().all(|&(s, _)| s < src as usize));
            }
        }
    }
}
