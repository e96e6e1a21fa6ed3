//! Error types for bounding-box resolution.

use thiserror::Error;

/// Failures raised while resolving an item's bounding box.
///
/// These are invariant-violation class rather than user-facing: the engine
/// pre-filters candidates with [`SceneItem::is_supported`], so hitting one of
/// these during normal operation means a classification bug upstream.
///
/// [`SceneItem::is_supported`]: crate::types::SceneItem::is_supported
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MountError {
    #[error("unsupported item type: {0}")]
    UnsupportedItem(&'static str),
}

pub type Result<T> = std::result::Result<T, MountError>;
