//! Core scene types shared across all modules.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::protocol::keys;

// ---------------------------------------------------------------------------
// Basic math
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl std::fmt::Display for Vector2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Axis-aligned bounding box in world space.
///
/// `center`, `width` and `height` are always derived from `min`/`max`, so the
/// invariants (`min <= max` per axis, center is the midpoint, width/height are
/// the extents) hold by construction. Boxes are produced fresh per resolution
/// call and never cached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub min: Vector2,
    pub max: Vector2,
    pub center: Vector2,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn from_min_max(min: Vector2, max: Vector2) -> Self {
        Self {
            min,
            max,
            center: Vector2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0),
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// Host scene layer tags, as serialized on the wire.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    Map,
    Grid,
    Drawing,
    Prop,
    Mount,
    Character,
    Attachment,
    Note,
    Text,
    Ruler,
    Fog,
    Pointer,
    PostProcess,
    Control,
    Popover,
}

// ---------------------------------------------------------------------------
// Item geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeType {
    Rectangle,
    Circle,
    Triangle,
    Hexagon,
}

impl std::fmt::Display for ShapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rectangle => write!(f, "RECTANGLE"),
            Self::Circle => write!(f, "CIRCLE"),
            Self::Triangle => write!(f, "TRIANGLE"),
            Self::Hexagon => write!(f, "HEXAGON"),
        }
    }
}

/// Pixel dimensions of an image item's source asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ImagePixels {
    pub width: f64,
    pub height: f64,
}

/// Grid alignment of an image item: the DPI the asset was authored at and the
/// pixel offset of its grid anchor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridScale {
    pub dpi: f64,
    pub offset: Vector2,
}

/// Shape-kind-specific payload, discriminated by the host's `type` tag.
///
/// `Text` and `Path` carry no geometry here: their bounding boxes are too
/// complex to reconstruct host-side for hidden items, so they are excluded
/// from candidacy and the resolver reports them as unsupported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ItemGeometry {
    Curve {
        /// Ordered local-space points of the freeform curve.
        points: Vec<Vector2>,
    },
    Line {
        start_position: Vector2,
        end_position: Vector2,
    },
    Image {
        image: ImagePixels,
        grid: GridScale,
    },
    Shape {
        shape_type: ShapeType,
        width: f64,
        height: f64,
    },
    Text,
    Path,
}

impl ItemGeometry {
    /// Human-readable kind name, used in error reporting.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Curve { .. } => "CURVE",
            Self::Line { .. } => "LINE",
            Self::Image { .. } => "IMAGE",
            Self::Shape { .. } => "SHAPE",
            Self::Text => "TEXT",
            Self::Path => "PATH",
        }
    }
}

// ---------------------------------------------------------------------------
// Scene items
// ---------------------------------------------------------------------------

/// Free-form metadata bag attached to rooms and items by the host.
pub type Metadata = HashMap<String, serde_json::Value>;

/// A host-owned scene item. Lifecycle and ownership belong entirely to the
/// host scene graph; this service only reads items and requests mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SceneItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub layer: Layer,
    /// World-space anchor position.
    pub position: Vector2,
    /// Clockwise rotation in degrees about the item's own center.
    #[serde(default)]
    pub rotation: f64,
    /// Non-uniform scale applied before rotation.
    #[serde(default = "unit_scale")]
    pub scale: Vector2,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Id of the mount this item is currently attached to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<String>,
    /// Session/user that last changed this item.
    #[serde(default)]
    pub last_modified_user_id: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(flatten)]
    pub geometry: ItemGeometry,
}

fn unit_scale() -> Vector2 {
    Vector2::new(1.0, 1.0)
}

fn default_true() -> bool {
    true
}

impl SceneItem {
    /// Whether the resolver can compute a bounding box for this item.
    pub fn is_supported(&self) -> bool {
        !matches!(self.geometry, ItemGeometry::Text | ItemGeometry::Path)
    }

    /// Whether this item carries the auto-attached marker set by this service.
    pub fn auto_attached(&self) -> bool {
        self.metadata
            .get(keys::AUTO_ATTACHED)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Room configuration
// ---------------------------------------------------------------------------

/// One rider→mounts rule. Duplicate riders are allowed across rules; the
/// engine unions their mount lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MountLayerRule {
    pub rider: Layer,
    pub mount: Vec<Layer>,
}

/// Per-room configuration, persisted in the host's room metadata under
/// [`keys::ROOM_CONFIG`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    #[serde(default = "default_mount_layers")]
    pub mount_layers: Vec<MountLayerRule>,
    /// Item ids excluded from all auto-attach/detach behavior.
    #[serde(default)]
    pub exceptions: HashSet<String>,
    /// Shrink factor for the mount hit-area: 0 = full bounding box,
    /// 100 = only the exact center point.
    #[serde(default)]
    pub center_distance: f64,
}

fn default_mount_layers() -> Vec<MountLayerRule> {
    vec![
        MountLayerRule {
            rider: Layer::Character,
            mount: vec![Layer::Mount, Layer::Drawing],
        },
        MountLayerRule {
            rider: Layer::Attachment,
            mount: vec![Layer::Mount, Layer::Character, Layer::Drawing],
        },
    ]
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            mount_layers: default_mount_layers(),
            exceptions: HashSet::new(),
            center_distance: 0.0,
        }
    }
}

impl RoomConfig {
    /// Read the configuration out of a room metadata snapshot.
    ///
    /// A missing or unparseable entry is treated as "absent" and yields the
    /// defaults; a brand-new room with no metadata yet is not an error.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let mut config = metadata
            .get(keys::ROOM_CONFIG)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_else(Self::default);
        config.center_distance = config.center_distance.clamp(0.0, 100.0);
        config
    }

    /// Distinct rider layers across all rules.
    pub fn rider_layers(&self) -> HashSet<Layer> {
        self.mount_layers.iter().map(|rule| rule.rider).collect()
    }

    /// Union of mount layers across every rule whose rider matches `rider`.
    pub fn mounts_for(&self, rider: Layer) -> HashSet<Layer> {
        self.mount_layers
            .iter()
            .filter(|rule| rule.rider == rider)
            .flat_map(|rule| rule.mount.iter().copied())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub events_processed: u64,
    pub items_cached: usize,
    pub attached_total: u64,
    pub detached_total: u64,
}
