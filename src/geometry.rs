//! Pure 2D math: point transforms and bounding-box construction.
//!
//! All rotation here follows the host's convention: degrees, clockwise on a
//! y-down screen plane, about an explicit center point.

use crate::types::{BoundingBox, Vector2};

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees / 180.0 * std::f64::consts::PI
}

/// Non-uniform scale of `point` about `center`.
pub fn scale_point(point: Vector2, center: Vector2, scale: Vector2) -> Vector2 {
    Vector2 {
        x: (point.x - center.x) * scale.x + center.x,
        y: (point.y - center.y) * scale.y + center.y,
    }
}

/// Rotate `point` about `center` by `degrees` clockwise.
pub fn rotate_point(point: Vector2, center: Vector2, degrees: f64) -> Vector2 {
    let radians = deg_to_rad(degrees);
    let sin = radians.sin();
    let cos = radians.cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Vector2 {
        x: dx * cos - dy * sin + center.x,
        y: dy * cos + dx * sin + center.y,
    }
}

/// Axis-aligned bounding box over a point set.
///
/// `points` must be non-empty; every caller in this crate passes a fixed,
/// non-empty array.
pub fn bounding_box_of(points: &[Vector2]) -> BoundingBox {
    debug_assert!(!points.is_empty(), "bounding_box_of requires points");

    let mut min = Vector2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for point in points {
        min.x = min.x.min(point.x);
        min.y = min.y.min(point.y);
        max.x = max.x.max(point.x);
        max.y = max.y.max(point.y);
    }

    BoundingBox::from_min_max(min, max)
}
