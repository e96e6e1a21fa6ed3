//! Scene host wire protocol.
//!
//! This module owns every message that crosses the boundary between the
//! mount service and the hosting tabletop application.
//!
//! ## Message namespaces
//!
//! | Direction        | Type          | Carried by                      |
//! |------------------|---------------|---------------------------------|
//! | host → service   | `SceneEvent`  | change-notification stream      |
//! | service → host   | `HostCommand` | mutation / reply channel        |
//!
//! ## Design rules
//!
//! 1. Every struct is `Serialize + Deserialize` with camelCase JSON, matching
//!    the host's item representation.
//! 2. Item-list events always carry the **complete** current list, never a
//!    diff; the engine derives deltas from its own position cache.
//! 3. Mutations are one patch per affected item; no cross-rider batching.

use serde::{Deserialize, Serialize};

use crate::types::{EngineStats, Metadata, SceneItem};

// ---------------------------------------------------------------------------
// Namespaced metadata keys
// ---------------------------------------------------------------------------

/// Fixed keys under which this service stores state in host metadata bags.
pub mod keys {
    /// Room-level configuration record (rider/mount rules, exceptions,
    /// center distance).
    pub const ROOM_CONFIG: &str = "com.mount-me/config";

    /// Item-level boolean marker distinguishing automatic attachment from
    /// user-initiated attachment.
    pub const AUTO_ATTACHED: &str = "com.mount-me/auto-attached";
}

// ---------------------------------------------------------------------------
// Inbound events (host → service)
// ---------------------------------------------------------------------------

/// Change notifications delivered by the host, one at a time, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SceneEvent {
    /// The scene item list changed. Carries the full current list.
    ItemsChanged { items: Vec<SceneItem> },
    /// The room metadata mapping changed. Carries the full mapping.
    RoomMetadataChanged { metadata: Metadata },
    /// The scene became ready (or stopped being ready).
    SceneReadyChanged { ready: bool },
    /// The local player's identity changed.
    PlayerChanged {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Outbound mutations (service → host)
// ---------------------------------------------------------------------------

/// A single-item mutation request.
///
/// The host applies each patch to the corresponding live item:
/// `Attach` sets `attachedTo` and the [`keys::AUTO_ATTACHED`] flag,
/// `Detach` clears both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ItemPatch {
    Attach { id: String, mount_id: String },
    Detach { id: String },
}

impl ItemPatch {
    /// Id of the item this patch mutates.
    pub fn item_id(&self) -> &str {
        match self {
            Self::Attach { id, .. } | Self::Detach { id } => id,
        }
    }
}

/// Commands emitted back to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCommand {
    /// Apply the given item patches, one host transaction per patch.
    UpdateItems { patches: Vec<ItemPatch> },
    /// Engine statistics snapshot, for diagnostics.
    Stats { stats: EngineStats },
}
