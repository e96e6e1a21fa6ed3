//! MountService – change classification and attach/detach decisions.

use crate::bounds::{contains, resolve_bounds};
use crate::protocol::ItemPatch;
use crate::types::{EngineStats, RoomConfig, SceneItem};
use log::{debug, warn};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Pass result
// ---------------------------------------------------------------------------

/// A rider that should be attached to a mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub rider_id: String,
    pub mount_id: String,
}

/// A rider whose automatic attachment should be cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detachment {
    pub rider_id: String,
}

/// Mutation intents produced by a single [`MountService::process`] call.
///
/// Callers (typically the scene agent) turn these into host mutations.
#[derive(Debug, Default)]
pub struct PassEvents {
    pub attached: Vec<Attachment>,
    pub detached: Vec<Detachment>,
}

impl PassEvents {
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }

    /// Flatten into per-item host patches, attachments first.
    pub fn into_patches(self) -> Vec<ItemPatch> {
        let mut patches = Vec::with_capacity(self.attached.len() + self.detached.len());
        for attachment in self.attached {
            patches.push(ItemPatch::Attach {
                id: attachment.rider_id,
                mount_id: attachment.mount_id,
            });
        }
        for detachment in self.detached {
            patches.push(ItemPatch::Detach {
                id: detachment.rider_id,
            });
        }
        patches
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct MountService {
    player_id: String,
    /// Last-observed item snapshots, rebuilt wholesale after every processed
    /// event. Used only to detect position deltas and brand-new items.
    token_cache: HashMap<String, SceneItem>,
    events_processed: u64,
    attached_total: u64,
    detached_total: u64,
}

impl MountService {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            token_cache: HashMap::new(),
            events_processed: 0,
            attached_total: 0,
            detached_total: 0,
        }
    }

    /// Update the local player identity (host role/identity change).
    pub fn set_player_id(&mut self, player_id: impl Into<String>) {
        self.player_id = player_id.into();
    }

    /// Drop all cached snapshots. Called when the scene unloads so entries
    /// from a previous scene cannot mask moves in the next one.
    pub fn clear_cache(&mut self) {
        self.token_cache.clear();
    }

    pub fn cached_items(&self) -> usize {
        self.token_cache.len()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            events_processed: self.events_processed,
            items_cached: self.token_cache.len(),
            attached_total: self.attached_total,
            detached_total: self.detached_total,
        }
    }

    // -----------------------------------------------------------------------
    // Main pass
    // -----------------------------------------------------------------------

    /// Process one scene-change event carrying the full current item list.
    ///
    /// Classifies items into moved rider candidates and auto-attached removal
    /// candidates, evaluates them against the resolved mount bounds, and
    /// returns the mutation intents. The position cache is replaced from the
    /// full list unconditionally, independent of what the caller does with
    /// the intents.
    pub fn process(&mut self, items: &[SceneItem], config: &RoomConfig) -> PassEvents {
        let rider_layers = config.rider_layers();

        let mut moved: Vec<&SceneItem> = Vec::new();
        let mut removed: Vec<&SceneItem> = Vec::new();

        for item in items {
            if item.last_modified_user_id != self.player_id {
                // Changed by another session; that session handles it.
                continue;
            }
            if item.attached_to.is_none()
                && !config.exceptions.contains(&item.id)
                && rider_layers.contains(&item.layer)
            {
                // New items have no cached predecessor and always count as moved.
                match self.token_cache.get(&item.id) {
                    Some(cached) if cached.position == item.position => {}
                    _ => moved.push(item),
                }
            } else if item.auto_attached() && !config.exceptions.contains(&item.id) {
                removed.push(item);
            }
        }

        let mut events = PassEvents::default();

        for rider in &moved {
            if let Some(attachment) = self.find_mount(rider, items, config) {
                events.attached.push(attachment);
            }
        }

        for rider in &removed {
            if let Some(detachment) = self.check_detach(rider, items, config) {
                events.detached.push(detachment);
            }
        }

        self.token_cache = items
            .iter()
            .map(|item| (item.id.clone(), item.clone()))
            .collect();

        self.events_processed += 1;
        self.attached_total += events.attached.len() as u64;
        self.detached_total += events.detached.len() as u64;

        events
    }

    /// Evaluate one moved rider against every candidate target, in input
    /// order. First target whose bounds contain the rider's position wins.
    fn find_mount(
        &self,
        rider: &SceneItem,
        items: &[SceneItem],
        config: &RoomConfig,
    ) -> Option<Attachment> {
        let mount_layers = config.mounts_for(rider.layer);
        if mount_layers.is_empty() {
            return None;
        }

        let targets = items.iter().filter(|target| {
            target.id != rider.id
                && target.visible
                && !config.exceptions.contains(&target.id)
                && target.is_supported()
                && mount_layers.contains(&target.layer)
        });

        for target in targets {
            let bounds = match resolve_bounds(target) {
                Ok(bounds) => bounds,
                Err(e) => {
                    // One bad target must not abort the rest of the batch.
                    warn!("skipping target {}: {}", target.id, e);
                    continue;
                }
            };
            if contains(rider.position, &bounds, config.center_distance) {
                debug!("attaching {} to {}", rider.id, target.id);
                return Some(Attachment {
                    rider_id: rider.id.clone(),
                    mount_id: target.id.clone(),
                });
            }
        }

        None
    }

    /// Decide whether an auto-attached rider has left its mount's bounds.
    fn check_detach(
        &self,
        rider: &SceneItem,
        items: &[SceneItem],
        config: &RoomConfig,
    ) -> Option<Detachment> {
        // Flagged but unattached: stale marker, nothing to dereference.
        let mount_id = rider.attached_to.as_deref()?;

        let Some(mount) = items.iter().find(|item| item.id == mount_id) else {
            // The mount was deleted out from under the rider; clear the
            // stale attachment rather than leaving the flag dangling.
            debug!("mount {} gone, detaching {}", mount_id, rider.id);
            return Some(Detachment {
                rider_id: rider.id.clone(),
            });
        };

        match resolve_bounds(mount) {
            Ok(bounds) => {
                if contains(rider.position, &bounds, config.center_distance) {
                    None
                } else {
                    debug!("detaching {} from {}", rider.id, mount.id);
                    Some(Detachment {
                        rider_id: rider.id.clone(),
                    })
                }
            }
            Err(e) => {
                warn!("cannot resolve mount {}, leaving {} attached: {}", mount.id, rider.id, e);
                None
            }
        }
    }
}
