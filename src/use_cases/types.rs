// Use-case level inputs/outputs for the world task.

use crate::domain::{AppearanceUpdate, Entity, Intent, Mark, PlayerId, WorldSnapshot};

/// Mutation requests sent by connection handlers to the world task.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Join { player_id: PlayerId },
    Leave { player_id: PlayerId },
    Input { player_id: PlayerId, intent: Intent },
    PlaceMark { player_id: PlayerId },
    SetAppearance { player_id: PlayerId, update: AppearanceUpdate },
}

/// Full-state snapshot published after a tick or a discrete world change.
#[derive(Debug, Clone)]
pub struct WorldUpdate {
    // Ticks completed when the snapshot was taken.
    pub tick: u64,
    pub players: Vec<Entity>,
    pub marks: Vec<Mark>,
}

impl WorldUpdate {
    pub fn new(tick: u64, snapshot: WorldSnapshot) -> Self {
        Self {
            tick,
            players: snapshot.players,
            marks: snapshot.marks,
        }
    }
}
