//! Mount Me Service
//!
//! Automatically attaches movable tokens ("riders") to the surfaces they are
//! dragged onto ("mounts") in a shared virtual tabletop scene, and detaches
//! them again when they are dragged away. Runs as a standalone scene
//! participant driven by the host's change-notification stream.
//!
//! ## Architecture
//!
//! ```text
//! SceneAgent  (bus.rs)
//!   └── MountService  (service.rs)  ← classification, attach/detach pass
//!         ├── resolve_bounds / contains  (bounds.rs)
//!         │     └── geometry.rs          ← point transforms, bbox math
//!         └── RoomConfig / SceneItem     (types.rs)
//! ```
//!
//! `MountService` consumes full item-list snapshots and emits mutation
//! intents. `SceneAgent` feeds it from an ordered [`protocol::SceneEvent`]
//! stream and turns the intents into [`protocol::HostCommand`] mutations.

// Protocol, geometry and the engine are always available (no server feature
// needed).
pub mod bounds;
pub mod error;
pub mod geometry;
pub mod protocol;
pub mod service;
pub mod types;

// The host-facing agent requires the `server` feature.
#[cfg(feature = "server")]
pub mod bus;

// Convenience re-exports
#[cfg(feature = "server")]
pub use bus::SceneAgent;
pub use bounds::{contains, resolve_bounds};
pub use error::MountError;
pub use service::{Attachment, Detachment, MountService, PassEvents};
pub use types::{
    BoundingBox, EngineStats, ItemGeometry, Layer, RoomConfig, SceneItem, ShapeType, Vector2,
};
