// Arena wiring: spawns the world task and owns the channels around it.

use crate::domain::World;
use crate::domain::tuning::ArenaTuning;
use crate::use_cases::game::world_task;
use crate::use_cases::{GameEvent, WorldUpdate};
use axum::extract::ws::Utf8Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};

/// Configuration for spawning the arena world.
#[derive(Debug, Clone)]
pub struct ArenaSettings {
    /// Capacity for inbound player events.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast world updates.
    pub world_broadcast_capacity: usize,
    /// Fixed tick interval for the simulation loop.
    pub tick_interval: Duration,
    /// Gameplay tuning for the field and movement.
    pub tuning: ArenaTuning,
}

/// Channels connecting network adapters to the running world task.
#[derive(Clone)]
pub struct ArenaHandle {
    /// Sender for game events into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Broadcast sender for raw world updates.
    pub world_tx: broadcast::Sender<WorldUpdate>,
    /// Broadcast sender for serialized world updates.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    /// Watch sender holding the latest serialized world update.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    /// Stops the world task.
    shutdown: Arc<Notify>,
}

impl ArenaHandle {
    /// Creates an empty world and spawns its world task.
    pub fn spawn(settings: &ArenaSettings) -> Self {
        // Channel wiring for the world loop.
        let (input_tx, input_rx) = mpsc::channel::<GameEvent>(settings.input_channel_capacity);
        let (world_tx, _world_rx) =
            broadcast::channel::<WorldUpdate>(settings.world_broadcast_capacity);
        let (world_bytes_tx, _world_bytes_rx) =
            broadcast::channel::<Utf8Bytes>(settings.world_broadcast_capacity);
        let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
        let shutdown = Arc::new(Notify::new());

        // Spawn the authoritative world loop.
        tokio::spawn(world_task(
            input_rx,
            world_tx.clone(),
            World::new(settings.tuning),
            settings.tick_interval,
            shutdown.clone(),
        ));

        Self {
            input_tx,
            world_tx,
            world_bytes_tx,
            world_latest_tx,
            shutdown,
        }
    }

    /// Asks the world task to exit after its current step.
    pub fn shutdown(&self) {
        // notify_one keeps a permit if the task is not waiting right now.
        self.shutdown.notify_one();
    }
}
