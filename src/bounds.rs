//! Bounding-box resolution and containment testing.
//!
//! Every supported item kind has a distinct local geometry and transform
//! pipeline (non-uniform scale, then rotation about the shape center, then
//! recombination with the item's world position). This module maps each of
//! them into a common world-space [`BoundingBox`] and decides whether a world
//! point falls inside one.

use crate::error::{MountError, Result};
use crate::geometry::{bounding_box_of, deg_to_rad, rotate_point, scale_point};
use crate::types::{BoundingBox, GridScale, ImagePixels, ItemGeometry, SceneItem, ShapeType, Vector2};

/// Images are normalized against this reference DPI before applying the
/// item's own scale.
const REFERENCE_DPI: f64 = 150.0;

/// Resolve the world-space axis-aligned bounding box of a supported item.
///
/// Pure function of the item's current fields. Returns
/// [`MountError::UnsupportedItem`] for kinds without reconstructable geometry
/// (text, paths); the engine filters those out before calling.
pub fn resolve_bounds(item: &SceneItem) -> Result<BoundingBox> {
    match &item.geometry {
        ItemGeometry::Curve { points } => Ok(curve_bounds(item, points)),
        ItemGeometry::Line {
            start_position,
            end_position,
        } => Ok(line_bounds(item.position, *start_position, *end_position)),
        ItemGeometry::Image { image, grid } => Ok(image_bounds(item, *image, *grid)),
        ItemGeometry::Shape {
            shape_type,
            width,
            height,
        } => Ok(shape_bounds(item, *shape_type, *width, *height)),
        ItemGeometry::Text | ItemGeometry::Path => {
            Err(MountError::UnsupportedItem(item.geometry.kind_name()))
        }
    }
}

/// Point-in-box test with an optional hit-area shrink.
///
/// `center_distance` is a percentage in [0, 100]: at 0 the full box counts,
/// at 100 only the exact center point does. The box is shrunk symmetrically
/// toward its center before the inclusive min/max comparison. Callers clamp
/// the percentage upstream ([`RoomConfig::from_metadata`]).
///
/// [`RoomConfig::from_metadata`]: crate::types::RoomConfig::from_metadata
pub fn contains(point: Vector2, bounds: &BoundingBox, center_distance: f64) -> bool {
    let (min, max) = if center_distance > 0.0 {
        let factor = (100.0 - center_distance) / 100.0;
        (
            Vector2::new(
                bounds.center.x + (bounds.min.x - bounds.center.x) * factor,
                bounds.center.y + (bounds.min.y - bounds.center.y) * factor,
            ),
            Vector2::new(
                bounds.center.x + (bounds.max.x - bounds.center.x) * factor,
                bounds.center.y + (bounds.max.y - bounds.center.y) * factor,
            ),
        )
    } else {
        (bounds.min, bounds.max)
    };

    min.x <= point.x && point.x <= max.x && min.y <= point.y && point.y <= max.y
}

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

fn curve_bounds(curve: &SceneItem, points: &[Vector2]) -> BoundingBox {
    // A curve with no points yet (drawing in progress) degenerates to its
    // anchor position.
    if points.is_empty() {
        return bounding_box_of(&[curve.position]);
    }

    let local = bounding_box_of(points);

    // The item's world position anchors the scaled+rotated local origin, not
    // the local box center. Rotate the scaled center offset to find where the
    // origin lands, then shift every transformed point by the difference.
    let radians = deg_to_rad(curve.rotation);
    let sin = radians.sin();
    let cos = radians.cos();

    let dx = -local.center.x * curve.scale.x;
    let dy = -local.center.y * curve.scale.y;

    let original_position = Vector2 {
        x: local.center.x + dx * cos - dy * sin,
        y: local.center.y + dy * cos + dx * sin,
    };

    let offset = Vector2 {
        x: curve.position.x - original_position.x,
        y: curve.position.y - original_position.y,
    };

    let transformed: Vec<Vector2> = points
        .iter()
        .map(|point| {
            let scaled = scale_point(*point, local.center, curve.scale);
            let rotated = rotate_point(scaled, local.center, curve.rotation);
            Vector2::new(rotated.x + offset.x, rotated.y + offset.y)
        })
        .collect();

    bounding_box_of(&transformed)
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

fn line_bounds(position: Vector2, start: Vector2, end: Vector2) -> BoundingBox {
    bounding_box_of(&[
        Vector2::new(position.x + start.x, position.y + start.y),
        Vector2::new(position.x + end.x, position.y + end.y),
    ])
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// An image is an equivalent rotated rectangle: pixel dimensions scaled by
/// the DPI normalization factor and the item's own scale, positioned so the
/// grid anchor offset (rotated with the image) lands on the item position.
fn image_bounds(image: &SceneItem, pixels: ImagePixels, grid: GridScale) -> BoundingBox {
    let dpi_scale = REFERENCE_DPI / grid.dpi;
    let scale = Vector2::new(dpi_scale * image.scale.x, dpi_scale * image.scale.y);

    let offset_x = grid.offset.x * scale.x;
    let offset_y = grid.offset.y * scale.y;

    let radians = deg_to_rad(image.rotation);
    let sin = radians.sin();
    let cos = radians.cos();

    let position = Vector2 {
        x: image.position.x - offset_x * cos + offset_y * sin,
        y: image.position.y - offset_y * cos - offset_x * sin,
    };

    rectangle_bounds(
        position,
        image.rotation,
        scale,
        pixels.width,
        pixels.height,
    )
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

fn shape_bounds(shape: &SceneItem, shape_type: ShapeType, width: f64, height: f64) -> BoundingBox {
    match shape_type {
        ShapeType::Rectangle => {
            rectangle_bounds(shape.position, shape.rotation, shape.scale, width, height)
        }
        ShapeType::Circle => circle_bounds(shape.position, shape.scale, width, height),
        ShapeType::Triangle => {
            triangle_bounds(shape.position, shape.rotation, shape.scale, width, height)
        }
        ShapeType::Hexagon => hexagon_bounds(shape.position, shape.rotation, shape.scale, width),
    }
}

/// A rectangle's position anchors its top-left corner; the center sits at the
/// rotated half-extent offset.
fn rectangle_bounds(
    position: Vector2,
    rotation: f64,
    scale: Vector2,
    width: f64,
    height: f64,
) -> BoundingBox {
    let radians = deg_to_rad(rotation);
    let sin = radians.sin();
    let cos = radians.cos();

    let rx = width / 2.0 * scale.x;
    let ry = height / 2.0 * scale.y;

    let center = Vector2 {
        x: position.x + rx * cos - ry * sin,
        y: position.y + ry * cos + rx * sin,
    };

    let corners = [
        Vector2::new(center.x - rx * cos + ry * sin, center.y - rx * sin - ry * cos),
        Vector2::new(center.x + rx * cos + ry * sin, center.y + rx * sin - ry * cos),
        Vector2::new(center.x + rx * cos - ry * sin, center.y + rx * sin + ry * cos),
        Vector2::new(center.x - rx * cos - ry * sin, center.y - rx * sin + ry * cos),
    ];

    bounding_box_of(&corners)
}

/// Rotation is a no-op for circles. Non-uniform scale picks the smaller of
/// the two effective diameters.
fn circle_bounds(position: Vector2, scale: Vector2, width: f64, height: f64) -> BoundingBox {
    let radius = f64::min(width * scale.x, height * scale.y) / 2.0;

    BoundingBox::from_min_max(
        Vector2::new(position.x - radius, position.y - radius),
        Vector2::new(position.x + radius, position.y + radius),
    )
}

/// Flat-top hexagon vertex layout: six corners at fixed angles around the
/// position, each offset by the item rotation.
fn hexagon_bounds(position: Vector2, rotation: f64, scale: Vector2, width: f64) -> BoundingBox {
    use std::f64::consts::PI;

    let radius = width / 2.0 * scale.x;
    let radians = deg_to_rad(rotation);

    let corner_angles = [
        PI / 2.0,
        PI / 6.0,
        11.0 * PI / 6.0,
        3.0 * PI / 2.0,
        7.0 * PI / 6.0,
        5.0 * PI / 6.0,
    ];

    let corners = corner_angles.map(|angle| {
        let angle = angle + radians;
        Vector2 {
            x: position.x + radius * angle.cos(),
            y: position.y + radius * angle.sin(),
        }
    });

    bounding_box_of(&corners)
}

/// A triangle's position anchors its apex; the base corners hang below it by
/// the scaled height, rotated with the item.
fn triangle_bounds(
    position: Vector2,
    rotation: f64,
    scale: Vector2,
    width: f64,
    height: f64,
) -> BoundingBox {
    let radians = deg_to_rad(rotation);
    let sin = radians.sin();
    let cos = radians.cos();

    let half_width = width / 2.0 * scale.x;
    let height = height * scale.y;

    let corners = [
        position,
        Vector2::new(
            position.x - half_width * cos - height * sin,
            position.y + height * cos - half_width * sin,
        ),
        Vector2::new(
            position.x + half_width * cos - height * sin,
            position.y + height * cos + half_width * sin,
        ),
    ];

    bounding_box_of(&corners)
}
