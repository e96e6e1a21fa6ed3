//! Scene integration – SceneAgent drives the engine from host change events.
//!
//! ## Event contract (inbound)
//!
//! | Event                 | Payload            | Effect                         |
//! |-----------------------|--------------------|--------------------------------|
//! | `itemsChanged`        | full item list     | run one attach/detach pass     |
//! | `roomMetadataChanged` | full metadata map  | replace config snapshot source |
//! | `sceneReadyChanged`   | ready flag         | gate passes, clear cache       |
//! | `playerChanged`       | id, role, name     | update local player identity   |
//!
//! ## Command contract (outbound)
//!
//! | Command       | Payload                                   |
//! |---------------|-------------------------------------------|
//! | `updateItems` | one `ItemPatch` per host transaction      |
//! | `stats`       | final `EngineStats` on stream shutdown    |
//!
//! The host guarantees events arrive sequentially; the agent mirrors that by
//! handling one `recv` at a time, so a pass always runs to completion before
//! the next event is looked at.

use crate::protocol::{HostCommand, ItemPatch, SceneEvent};
use crate::service::MountService;
use crate::types::{Metadata, RoomConfig, SceneItem};
use anyhow::{Context, Result};
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Wraps a [`MountService`] and drives it from the host event stream.
///
/// Call [`SceneAgent::run`] inside a Tokio task with the inbound event
/// receiver and the outbound command sender.
pub struct SceneAgent {
    service: Arc<Mutex<MountService>>,
    room_metadata: Metadata,
    scene_ready: bool,
}

impl SceneAgent {
    pub fn new(service: Arc<Mutex<MountService>>) -> Self {
        Self {
            service,
            room_metadata: Metadata::new(),
            scene_ready: false,
        }
    }

    /// Consume the event stream until the host closes it, then emit a final
    /// stats snapshot.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<SceneEvent>,
        commands: mpsc::UnboundedSender<HostCommand>,
    ) -> Result<()> {
        info!("SceneAgent active, waiting for host events");

        while let Some(event) = events.recv().await {
            self.handle(event, &commands)?;
        }

        let stats = self.service.lock().stats();
        commands
            .send(HostCommand::Stats { stats })
            .context("command channel closed")?;

        info!("SceneAgent shutting down (event stream closed)");
        Ok(())
    }

    fn handle(
        &mut self,
        event: SceneEvent,
        commands: &mpsc::UnboundedSender<HostCommand>,
    ) -> Result<()> {
        match event {
            SceneEvent::PlayerChanged { id, .. } => {
                debug!("local player is now {}", id);
                self.service.lock().set_player_id(id);
            }
            SceneEvent::RoomMetadataChanged { metadata } => {
                self.room_metadata = metadata;
            }
            SceneEvent::SceneReadyChanged { ready } => {
                self.scene_ready = ready;
                if !ready {
                    // Snapshots from the previous scene must not mask moves
                    // in the next one.
                    self.service.lock().clear_cache();
                }
            }
            SceneEvent::ItemsChanged { items } => {
                if self.scene_ready {
                    self.process_items(&items, commands)?;
                }
            }
        }
        Ok(())
    }

    fn process_items(
        &mut self,
        items: &[SceneItem],
        commands: &mpsc::UnboundedSender<HostCommand>,
    ) -> Result<()> {
        // Fresh configuration snapshot per change event.
        let config = RoomConfig::from_metadata(&self.room_metadata);

        let pass = {
            let mut service = self.service.lock();
            service.process(items, &config)
        };

        if pass.is_empty() {
            return Ok(());
        }

        info!(
            "pass produced {} attach / {} detach request(s)",
            pass.attached.len(),
            pass.detached.len()
        );

        // Each attach or detach is its own host transaction.
        for patch in pass.into_patches() {
            self.send_patch(patch, commands)?;
        }
        Ok(())
    }

    fn send_patch(
        &self,
        patch: ItemPatch,
        commands: &mpsc::UnboundedSender<HostCommand>,
    ) -> Result<()> {
        commands
            .send(HostCommand::UpdateItems {
                patches: vec![patch],
            })
            .context("command channel closed")
    }
}
