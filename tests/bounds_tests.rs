//! Bounding-box resolver and containment tests

#[cfg(test)]
mod tests {
    use mount_me::bounds::{contains, resolve_bounds};
    use mount_me::error::MountError;
    use mount_me::types::{
        BoundingBox, GridScale, ImagePixels, ItemGeometry, Layer, SceneItem, ShapeType, Vector2,
    };

    const EPS: f64 = 1e-9;

    fn item(geometry: ItemGeometry, position: Vector2, rotation: f64, scale: Vector2) -> SceneItem {
        SceneItem {
            id: "item".into(),
            name: String::new(),
            layer: Layer::Mount,
            position,
            rotation,
            scale,
            visible: true,
            attached_to: None,
            last_modified_user_id: String::new(),
            metadata: Default::default(),
            geometry,
        }
    }

    fn shape(
        shape_type: ShapeType,
        position: Vector2,
        rotation: f64,
        scale: Vector2,
        width: f64,
        height: f64,
    ) -> SceneItem {
        item(
            ItemGeometry::Shape {
                shape_type,
                width,
                height,
            },
            position,
            rotation,
            scale,
        )
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    // -----------------------------------------------------------------------
    // Rectangles
    // -----------------------------------------------------------------------

    #[test]
    fn unrotated_rectangle_extends_from_its_anchor() {
        let rect = shape(
            ShapeType::Rectangle,
            Vector2::zero(),
            0.0,
            Vector2::new(1.0, 1.0),
            100.0,
            50.0,
        );
        let bounds = resolve_bounds(&rect).unwrap();
        assert_close(bounds.min.x, 0.0);
        assert_close(bounds.min.y, 0.0);
        assert_close(bounds.max.x, 100.0);
        assert_close(bounds.max.y, 50.0);
        assert_close(bounds.center.x, 50.0);
        assert_close(bounds.center.y, 25.0);
        assert_close(bounds.width, 100.0);
        assert_close(bounds.height, 50.0);
    }

    #[test]
    fn unrotated_rectangle_applies_non_uniform_scale() {
        let rect = shape(
            ShapeType::Rectangle,
            Vector2::new(10.0, 20.0),
            0.0,
            Vector2::new(2.0, 0.5),
            100.0,
            40.0,
        );
        let bounds = resolve_bounds(&rect).unwrap();
        assert_close(bounds.min.x, 10.0);
        assert_close(bounds.min.y, 20.0);
        assert_close(bounds.width, 200.0);
        assert_close(bounds.height, 20.0);
    }

    #[test]
    fn quarter_turn_rectangle_swaps_extents() {
        let rect = shape(
            ShapeType::Rectangle,
            Vector2::zero(),
            90.0,
            Vector2::new(1.0, 1.0),
            100.0,
            50.0,
        );
        let bounds = resolve_bounds(&rect).unwrap();
        assert_close(bounds.width, 50.0);
        assert_close(bounds.height, 100.0);
        assert_close(bounds.min.x, -50.0);
        assert_close(bounds.min.y, 0.0);
    }

    #[test]
    fn tilted_rectangle_bounds_grow() {
        // At 45° a 100×100 square needs a 100·√2 bounding box.
        let rect = shape(
            ShapeType::Rectangle,
            Vector2::zero(),
            45.0,
            Vector2::new(1.0, 1.0),
            100.0,
            100.0,
        );
        let bounds = resolve_bounds(&rect).unwrap();
        assert_close(bounds.width, 100.0 * std::f64::consts::SQRT_2);
        assert_close(bounds.height, 100.0 * std::f64::consts::SQRT_2);
    }

    // -----------------------------------------------------------------------
    // Circles
    // -----------------------------------------------------------------------

    #[test]
    fn circle_is_centered_on_position() {
        let circle = shape(
            ShapeType::Circle,
            Vector2::new(10.0, -10.0),
            0.0,
            Vector2::new(1.0, 1.0),
            80.0,
            80.0,
        );
        let bounds = resolve_bounds(&circle).unwrap();
        assert_close(bounds.min.x, -30.0);
        assert_close(bounds.max.x, 50.0);
        assert_close(bounds.min.y, -50.0);
        assert_close(bounds.max.y, 30.0);
        assert_close(bounds.center.x, 10.0);
        assert_close(bounds.center.y, -10.0);
    }

    #[test]
    fn circle_bounds_ignore_rotation() {
        let make = |rotation| {
            shape(
                ShapeType::Circle,
                Vector2::new(5.0, 5.0),
                rotation,
                Vector2::new(2.0, 2.0),
                30.0,
                30.0,
            )
        };
        let reference = resolve_bounds(&make(0.0)).unwrap();
        for rotation in [17.0, 90.0, 123.4, 270.0] {
            assert_eq!(resolve_bounds(&make(rotation)).unwrap(), reference);
        }
    }

    #[test]
    fn squashed_circle_uses_smaller_diameter() {
        let circle = shape(
            ShapeType::Circle,
            Vector2::zero(),
            0.0,
            Vector2::new(1.0, 1.0),
            100.0,
            50.0,
        );
        let bounds = resolve_bounds(&circle).unwrap();
        // radius = min(100, 50) / 2
        assert_close(bounds.width, 50.0);
        assert_close(bounds.height, 50.0);
    }

    // -----------------------------------------------------------------------
    // Hexagons
    // -----------------------------------------------------------------------

    #[test]
    fn hexagon_bounds_match_vertex_layout() {
        let hexagon = shape(
            ShapeType::Hexagon,
            Vector2::zero(),
            0.0,
            Vector2::new(1.0, 1.0),
            100.0,
            100.0,
        );
        let bounds = resolve_bounds(&hexagon).unwrap();
        // Vertices at ±radius vertically, ±radius·cos(30°) horizontally.
        let radius = 50.0;
        assert_close(bounds.min.y, -radius);
        assert_close(bounds.max.y, radius);
        assert_close(bounds.min.x, -radius * (std::f64::consts::PI / 6.0).cos());
        assert_close(bounds.max.x, radius * (std::f64::consts::PI / 6.0).cos());
    }

    #[test]
    fn hexagon_rotated_thirty_degrees_swaps_flat_sides() {
        let hexagon = shape(
            ShapeType::Hexagon,
            Vector2::zero(),
            30.0,
            Vector2::new(1.0, 1.0),
            100.0,
            100.0,
        );
        let bounds = resolve_bounds(&hexagon).unwrap();
        let radius = 50.0;
        assert_close(bounds.min.x, -radius);
        assert_close(bounds.max.x, radius);
        assert_close(bounds.min.y, -radius * (std::f64::consts::PI / 6.0).cos());
        assert_close(bounds.max.y, radius * (std::f64::consts::PI / 6.0).cos());
    }

    // -----------------------------------------------------------------------
    // Triangles
    // -----------------------------------------------------------------------

    #[test]
    fn triangle_hangs_below_its_apex() {
        let triangle = shape(
            ShapeType::Triangle,
            Vector2::zero(),
            0.0,
            Vector2::new(1.0, 1.0),
            100.0,
            80.0,
        );
        let bounds = resolve_bounds(&triangle).unwrap();
        assert_close(bounds.min.x, -50.0);
        assert_close(bounds.max.x, 50.0);
        assert_close(bounds.min.y, 0.0);
        assert_close(bounds.max.y, 80.0);
    }

    #[test]
    fn triangle_scale_applies_before_rotation() {
        let triangle = shape(
            ShapeType::Triangle,
            Vector2::zero(),
            180.0,
            Vector2::new(2.0, 1.0),
            100.0,
            80.0,
        );
        let bounds = resolve_bounds(&triangle).unwrap();
        // Flipped upside down: the base sits above the apex.
        assert_close(bounds.min.y, -80.0);
        assert_close(bounds.max.y, 0.0);
        assert_close(bounds.width, 200.0);
    }

    // -----------------------------------------------------------------------
    // Lines
    // -----------------------------------------------------------------------

    #[test]
    fn line_bounds_span_both_endpoints() {
        let line = item(
            ItemGeometry::Line {
                start_position: Vector2::zero(),
                end_position: Vector2::new(30.0, -20.0),
            },
            Vector2::new(10.0, 10.0),
            0.0,
            Vector2::new(1.0, 1.0),
        );
        let bounds = resolve_bounds(&line).unwrap();
        assert_close(bounds.min.x, 10.0);
        assert_close(bounds.min.y, -10.0);
        assert_close(bounds.max.x, 40.0);
        assert_close(bounds.max.y, 10.0);
    }

    // -----------------------------------------------------------------------
    // Curves
    // -----------------------------------------------------------------------

    #[test]
    fn curve_bounds_follow_the_anchor_position() {
        let curve = item(
            ItemGeometry::Curve {
                points: vec![
                    Vector2::zero(),
                    Vector2::new(10.0, 0.0),
                    Vector2::new(10.0, 10.0),
                    Vector2::new(0.0, 10.0),
                ],
            },
            Vector2::new(100.0, 100.0),
            0.0,
            Vector2::new(1.0, 1.0),
        );
        let bounds = resolve_bounds(&curve).unwrap();
        assert_close(bounds.min.x, 100.0);
        assert_close(bounds.min.y, 100.0);
        assert_close(bounds.max.x, 110.0);
        assert_close(bounds.max.y, 110.0);
    }

    #[test]
    fn curve_scales_about_its_anchor() {
        let curve = item(
            ItemGeometry::Curve {
                points: vec![
                    Vector2::zero(),
                    Vector2::new(10.0, 0.0),
                    Vector2::new(10.0, 10.0),
                    Vector2::new(0.0, 10.0),
                ],
            },
            Vector2::zero(),
            0.0,
            Vector2::new(2.0, 2.0),
        );
        let bounds = resolve_bounds(&curve).unwrap();
        assert_close(bounds.min.x, 0.0);
        assert_close(bounds.min.y, 0.0);
        assert_close(bounds.max.x, 20.0);
        assert_close(bounds.max.y, 20.0);
    }

    #[test]
    fn empty_curve_degenerates_to_its_position() {
        let curve = item(
            ItemGeometry::Curve { points: vec![] },
            Vector2::new(7.0, 8.0),
            0.0,
            Vector2::new(1.0, 1.0),
        );
        let bounds = resolve_bounds(&curve).unwrap();
        assert_eq!(bounds.min, Vector2::new(7.0, 8.0));
        assert_eq!(bounds.max, Vector2::new(7.0, 8.0));
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    #[test]
    fn image_with_half_size_grid_offset_is_centered_on_position() {
        let image = item(
            ItemGeometry::Image {
                image: ImagePixels {
                    width: 100.0,
                    height: 100.0,
                },
                grid: GridScale {
                    dpi: 300.0,
                    offset: Vector2::new(50.0, 50.0),
                },
            },
            Vector2::new(100.0, 100.0),
            0.0,
            Vector2::new(2.0, 2.0),
        );
        let bounds = resolve_bounds(&image).unwrap();
        // dpi scale 150/300 = 0.5 combined with item scale 2 gives 1:1 pixels.
        assert_close(bounds.min.x, 50.0);
        assert_close(bounds.min.y, 50.0);
        assert_close(bounds.max.x, 150.0);
        assert_close(bounds.max.y, 150.0);
        assert_close(bounds.center.x, 100.0);
        assert_close(bounds.center.y, 100.0);
    }

    #[test]
    fn image_rotation_rotates_the_grid_offset() {
        let image = item(
            ItemGeometry::Image {
                image: ImagePixels {
                    width: 100.0,
                    height: 100.0,
                },
                grid: GridScale {
                    dpi: 150.0,
                    offset: Vector2::new(50.0, 50.0),
                },
            },
            Vector2::zero(),
            90.0,
            Vector2::new(1.0, 1.0),
        );
        let bounds = resolve_bounds(&image).unwrap();
        // Centered on the anchor regardless of rotation when the offset is
        // half the pixel size.
        assert_close(bounds.center.x, 0.0);
        assert_close(bounds.center.y, 0.0);
        assert_close(bounds.width, 100.0);
        assert_close(bounds.height, 100.0);
    }

    // -----------------------------------------------------------------------
    // Unsupported kinds
    // -----------------------------------------------------------------------

    #[test]
    fn text_and_path_are_unsupported() {
        let text = item(
            ItemGeometry::Text,
            Vector2::zero(),
            0.0,
            Vector2::new(1.0, 1.0),
        );
        assert_eq!(
            resolve_bounds(&text),
            Err(MountError::UnsupportedItem("TEXT"))
        );

        let path = item(
            ItemGeometry::Path,
            Vector2::zero(),
            0.0,
            Vector2::new(1.0, 1.0),
        );
        assert_eq!(
            resolve_bounds(&path),
            Err(MountError::UnsupportedItem("PATH"))
        );
    }

    // -----------------------------------------------------------------------
    // Containment
    // -----------------------------------------------------------------------

    fn centered_box(half: f64) -> BoundingBox {
        BoundingBox::from_min_max(Vector2::new(-half, -half), Vector2::new(half, half))
    }

    #[test]
    fn zero_center_distance_matches_plain_box_test() {
        let bounds = centered_box(50.0);
        for (x, y, expected) in [
            (0.0, 0.0, true),
            (50.0, 50.0, true),
            (-50.0, 50.0, true),
            (50.1, 0.0, false),
            (0.0, -50.1, false),
        ] {
            let plain = bounds.min.x <= x && x <= bounds.max.x && bounds.min.y <= y && y <= bounds.max.y;
            assert_eq!(contains(Vector2::new(x, y), &bounds, 0.0), plain);
            assert_eq!(plain, expected);
        }
    }

    #[test]
    fn full_center_distance_accepts_only_the_center() {
        let bounds = centered_box(50.0);
        assert!(contains(Vector2::zero(), &bounds, 100.0));
        assert!(!contains(Vector2::new(1.0, 0.0), &bounds, 100.0));
        assert!(!contains(Vector2::new(0.0, -1.0), &bounds, 100.0));
    }

    #[test]
    fn half_center_distance_halves_the_hit_box() {
        let bounds = centered_box(50.0);
        assert!(contains(Vector2::new(20.0, 0.0), &bounds, 50.0));
        assert!(contains(Vector2::new(25.0, 25.0), &bounds, 50.0));
        assert!(!contains(Vector2::new(30.0, 0.0), &bounds, 50.0));
        assert!(!contains(Vector2::new(0.0, 26.0), &bounds, 50.0));
    }

    #[test]
    fn shrink_keeps_the_box_centered_off_origin() {
        let bounds = BoundingBox::from_min_max(Vector2::new(100.0, 100.0), Vector2::new(200.0, 200.0));
        assert!(contains(Vector2::new(150.0, 150.0), &bounds, 90.0));
        assert!(!contains(Vector2::new(120.0, 150.0), &bounds, 90.0));
    }
}
