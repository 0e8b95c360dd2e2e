//! Foreground detection on binary rasters.
//!
//! The detection stage traces the external contours of the foreground, keeps
//! the one enclosing the largest area, and derives both the crop window and the
//! skew angle from that single contour, in the uncropped frame. The crop and
//! rotation stages both consume the one [`ForegroundDetection`].

use crate::processors::geometry::{BoundingRegion, ContourPolygon, MinAreaRect};
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The crop window and skew estimate of the dominant foreground contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForegroundDetection {
    /// Axis-aligned bounds of the contour, in the binary raster's frame.
    pub region: BoundingRegion,
    /// Rotation in degrees, within `[-45, 45)`, that deskews the region.
    pub skew_angle: f32,
    /// Area enclosed by the contour.
    pub contour_area: f32,
    /// The minimum area rectangle the angle was read from.
    pub min_area_rect: MinAreaRect,
    /// How many external contours were found in total.
    pub contour_count: usize,
}

/// Traces the outermost contours of the non-zero pixels in `binary`.
///
/// Holes and anything nested inside a hole are skipped. Contours come back in
/// raster-scan order of their first pixel.
pub fn external_contours(binary: &GrayImage) -> Vec<ContourPolygon> {
    find_contours::<u32>(binary)
        .iter()
        .filter(|contour| {
            matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none()
        })
        .map(ContourPolygon::from_contour)
        .collect()
}

/// Picks the contour with the largest enclosed area.
///
/// Ties go to the earliest contour in the slice.
pub fn largest_contour(contours: &[ContourPolygon]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, contour) in contours.iter().enumerate() {
        let area = contour.area();
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((index, area)),
        }
    }
    best
}

/// Detects the dominant foreground contour of a binary raster.
///
/// Returns `None` when the raster has no foreground at all; callers then carry
/// the full raster forward unchanged.
pub fn detect_foreground(binary: &GrayImage) -> Option<ForegroundDetection> {
    let contours = external_contours(binary);
    let (index, contour_area) = largest_contour(&contours)?;
    let contour = &contours[index];

    let region = contour.bounding_region()?;
    let min_area_rect = contour.min_area_rect();
    let skew_angle = min_area_rect.deskew_angle();

    debug!(
        "Foreground: {} external contours, largest #{} (area {:.1}) at {:?}, skew {:.2} deg",
        contours.len(),
        index,
        contour_area,
        region,
        skew_angle
    );

    Some(ForegroundDetection {
        region,
        skew_angle,
        contour_area,
        min_area_rect,
        contour_count: contours.len(),
    })
}
