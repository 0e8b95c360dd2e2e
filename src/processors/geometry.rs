//! Geometric utilities for foreground analysis.
//!
//! This module provides the geometric primitives used by the detection stage:
//! points, contour polygons, axis-aligned bounding regions, and the minimum
//! area rectangle whose orientation drives skew correction.

use imageproc::contours::Contour;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use std::f32::consts::PI;

/// Skew angles closer to zero than this are treated as exactly zero.
const ANGLE_SNAP_DEGREES: f32 = 1e-3;

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixel coordinates.
///
/// `width` and `height` count pixels, so a region covering a single pixel has
/// a width and height of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRegion {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoundingRegion {
    /// Creates a new region.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `(x1, y1, x2, y2)` with exclusive right and bottom edges.
    pub fn to_coords(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// A closed polygon traced along the border of a foreground component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourPolygon {
    /// The border points in tracing order.
    pub points: Vec<Point>,
}

impl ContourPolygon {
    /// Creates a new polygon from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates a polygon from an imageproc contour.
    pub fn from_contour(contour: &Contour<u32>) -> Self {
        let points = contour
            .points
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();
        Self { points }
    }

    /// Calculates the enclosed area using the shoelace formula.
    ///
    /// Returns 0.0 if the polygon has fewer than 3 points.
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area.abs() / 2.0
    }

    /// Computes the axis-aligned pixel region enclosing every point.
    ///
    /// Returns `None` for an empty polygon.
    pub fn bounding_region(&self) -> Option<BoundingRegion> {
        let (min_x, max_x) = self.points.iter().map(|p| p.x).minmax().into_option()?;
        let (min_y, max_y) = self.points.iter().map(|p| p.y).minmax().into_option()?;

        let x = min_x.max(0.0) as u32;
        let y = min_y.max(0.0) as u32;
        Some(BoundingRegion {
            x,
            y,
            width: (max_x - min_x) as u32 + 1,
            height: (max_y - min_y) as u32 + 1,
        })
    }

    /// Computes the convex hull using Graham's scan.
    ///
    /// If the polygon has fewer than 3 points, returns a clone of it.
    fn convex_hull(&self) -> ContourPolygon {
        if self.points.len() < 3 {
            return self.clone();
        }

        let mut points = self.points.clone();

        // Find the point with the lowest y-coordinate (and leftmost if tied)
        let mut start_idx = 0;
        for i in 1..points.len() {
            if points[i].y < points[start_idx].y
                || (points[i].y == points[start_idx].y && points[i].x < points[start_idx].x)
            {
                start_idx = i;
            }
        }
        points.swap(0, start_idx);
        let start_point = points[0];

        // Sort points by polar angle with respect to the start point
        points[1..].sort_by(|a, b| {
            let cross = Self::cross_product(&start_point, a, b);
            if cross == 0.0 {
                let dist_a = (a.x - start_point.x).powi(2) + (a.y - start_point.y).powi(2);
                let dist_b = (b.x - start_point.x).powi(2) + (b.y - start_point.y).powi(2);
                dist_a
                    .partial_cmp(&dist_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else if cross > 0.0 {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            }
        });

        let mut hull: Vec<Point> = Vec::with_capacity(points.len());
        for point in points {
            while hull.len() > 1
                && Self::cross_product(&hull[hull.len() - 2], &hull[hull.len() - 1], &point) <= 0.0
            {
                hull.pop();
            }
            hull.push(point);
        }

        ContourPolygon::new(hull)
    }

    /// Computes the cross product of three points.
    ///
    /// Positive for a counter-clockwise turn, negative for clockwise, zero when collinear.
    fn cross_product(p1: &Point, p2: &Point, p3: &Point) -> f32 {
        (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
    }

    /// Computes the minimum area rectangle that encloses the polygon.
    ///
    /// Uses rotating calipers over the convex hull. Polygons whose hull is
    /// degenerate (a point or a line) get an axis-aligned rectangle with angle 0.
    pub fn min_area_rect(&self) -> MinAreaRect {
        let hull = self.convex_hull();
        let hull_points = &hull.points;

        if hull_points.len() < 3 {
            return Self::axis_aligned_rect(&self.points);
        }

        let mut min_area = f32::MAX;
        let mut min_rect = MinAreaRect::default();

        let n = hull_points.len();
        for i in 0..n {
            let j = (i + 1) % n;

            let edge_x = hull_points[j].x - hull_points[i].x;
            let edge_y = hull_points[j].y - hull_points[i].y;
            let edge_length = (edge_x * edge_x + edge_y * edge_y).sqrt();

            if edge_length < f32::EPSILON {
                continue;
            }

            // Unit edge direction and its normal
            let nx = edge_x / edge_length;
            let ny = edge_y / edge_length;
            let px = -ny;
            let py = nx;

            let mut min_n = f32::MAX;
            let mut max_n = f32::MIN;
            let mut min_p = f32::MAX;
            let mut max_p = f32::MIN;

            for point in hull_points {
                let dx = point.x - hull_points[i].x;
                let dy = point.y - hull_points[i].y;

                let proj_n = nx * dx + ny * dy;
                min_n = min_n.min(proj_n);
                max_n = max_n.max(proj_n);

                let proj_p = px * dx + py * dy;
                min_p = min_p.min(proj_p);
                max_p = max_p.max(proj_p);
            }

            let width = max_n - min_n;
            let height = max_p - min_p;
            let area = width * height;

            if area < min_area {
                min_area = area;

                let center_n = (min_n + max_n) / 2.0;
                let center_p = (min_p + max_p) / 2.0;

                let center_x = hull_points[i].x + center_n * nx + center_p * px;
                let center_y = hull_points[i].y + center_n * ny + center_p * py;

                min_rect = MinAreaRect {
                    center: Point::new(center_x, center_y),
                    width,
                    height,
                    angle: f32::atan2(ny, nx) * 180.0 / PI,
                };
            }
        }

        min_rect
    }

    fn axis_aligned_rect(points: &[Point]) -> MinAreaRect {
        let x_bounds = points.iter().map(|p| p.x).minmax().into_option();
        let y_bounds = points.iter().map(|p| p.y).minmax().into_option();

        match (x_bounds, y_bounds) {
            (Some((min_x, max_x)), Some((min_y, max_y))) => MinAreaRect {
                center: Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
                width: max_x - min_x,
                height: max_y - min_y,
                angle: 0.0,
            },
            _ => MinAreaRect::default(),
        }
    }
}

/// A rotated rectangle with minimum area that encloses a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinAreaRect {
    /// The center point of the rectangle.
    pub center: Point,
    /// Extent along the rectangle's reference edge.
    pub width: f32,
    /// Extent perpendicular to the reference edge.
    pub height: f32,
    /// Direction of the reference edge in degrees, image coordinates (y down).
    pub angle: f32,
}

impl Default for MinAreaRect {
    fn default() -> Self {
        Self {
            center: Point::new(0.0, 0.0),
            width: 0.0,
            height: 0.0,
            angle: 0.0,
        }
    }
}

impl MinAreaRect {
    /// Returns the rotation, in degrees, that brings the rectangle's sides
    /// back onto the image axes.
    ///
    /// A rectangle's orientation is only defined modulo 90°, so the raw edge
    /// angle is folded into `[-45, 45)`. Positive values mean the content is
    /// tilted clockwise on screen and must be turned counter-clockwise.
    pub fn deskew_angle(&self) -> f32 {
        normalize_skew_angle(self.angle)
    }
}

/// Folds an angle in degrees into `[-45, 45)`.
pub fn normalize_skew_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut folded = angle.rem_euclid(90.0);
    if folded >= 45.0 {
        folded -= 90.0;
    }
    if folded.abs() < ANGLE_SNAP_DEGREES {
        0.0
    } else {
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_outline(x0: f32, y0: f32, x1: f32, y1: f32) -> ContourPolygon {
        let mut points = Vec::new();
        let mut x = x0;
        while x <= x1 {
            points.push(Point::new(x, y0));
            x += 1.0;
        }
        let mut y = y0 + 1.0;
        while y <= y1 {
            points.push(Point::new(x1, y));
            y += 1.0;
        }
        let mut x = x1 - 1.0;
        while x >= x0 {
            points.push(Point::new(x, y1));
            x -= 1.0;
        }
        let mut y = y1 - 1.0;
        while y > y0 {
            points.push(Point::new(x0, y));
            y -= 1.0;
        }
        ContourPolygon::new(points)
    }

    #[test]
    fn test_area_of_square() {
        let poly = ContourPolygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        assert_eq!(poly.area(), 16.0);
    }

    #[test]
    fn test_area_of_degenerate_polygon() {
        let poly = ContourPolygon::new(vec![Point::new(3.0, 3.0)]);
        assert_eq!(poly.area(), 0.0);
    }

    #[test]
    fn test_bounding_region_is_pixel_inclusive() {
        let poly = rect_outline(10.0, 20.0, 109.0, 59.0);
        let region = poly.bounding_region().unwrap();
        assert_eq!(region, BoundingRegion::new(10, 20, 100, 40));
        assert_eq!(region.to_coords(), (10, 20, 110, 60));
    }

    #[test]
    fn test_bounding_region_of_single_point() {
        let poly = ContourPolygon::new(vec![Point::new(7.0, 8.0)]);
        assert_eq!(poly.bounding_region(), Some(BoundingRegion::new(7, 8, 1, 1)));
        assert_eq!(ContourPolygon::new(Vec::new()).bounding_region(), None);
    }

    #[test]
    fn test_min_area_rect_axis_aligned() {
        let poly = rect_outline(0.0, 0.0, 99.0, 39.0);
        let rect = poly.min_area_rect();
        let (long, short) = if rect.width >= rect.height {
            (rect.width, rect.height)
        } else {
            (rect.height, rect.width)
        };
        assert!((long - 99.0).abs() < 1e-3);
        assert!((short - 39.0).abs() < 1e-3);
        assert!((rect.center.x - 49.5).abs() < 1e-3);
        assert!((rect.center.y - 19.5).abs() < 1e-3);
        assert_eq!(rect.deskew_angle(), 0.0);
    }

    #[test]
    fn test_min_area_rect_rotated_square() {
        // A diamond: square rotated by 45 degrees
        let poly = ContourPolygon::new(vec![
            Point::new(10.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 20.0),
            Point::new(0.0, 10.0),
        ]);
        let rect = poly.min_area_rect();
        assert!((rect.width * rect.height - 200.0).abs() < 1e-2);
        assert!((rect.deskew_angle().abs() - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_min_area_rect_collinear_points() {
        let poly = ContourPolygon::new(vec![
            Point::new(0.0, 5.0),
            Point::new(3.0, 5.0),
            Point::new(6.0, 5.0),
        ]);
        let rect = poly.min_area_rect();
        assert_eq!(rect.angle, 0.0);
        assert_eq!(rect.width, 6.0);
        assert_eq!(rect.height, 0.0);
    }

    #[test]
    fn test_normalize_skew_angle() {
        assert_eq!(normalize_skew_angle(0.0), 0.0);
        assert_eq!(normalize_skew_angle(90.0), 0.0);
        assert_eq!(normalize_skew_angle(-90.0), 0.0);
        assert_eq!(normalize_skew_angle(180.0), 0.0);
        assert!((normalize_skew_angle(10.0) - 10.0).abs() < 1e-4);
        assert!((normalize_skew_angle(100.0) - 10.0).abs() < 1e-4);
        assert!((normalize_skew_angle(-170.0) - 10.0).abs() < 1e-4);
        assert!((normalize_skew_angle(80.0) + 10.0).abs() < 1e-4);
        assert_eq!(normalize_skew_angle(45.0), -45.0);
        assert_eq!(normalize_skew_angle(f32::NAN), 0.0);
    }
}
