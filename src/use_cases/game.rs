use super::types::{GameEvent, WorldUpdate};
use crate::domain::World;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

/// Single owner of the world.
///
/// Applies player events as they arrive and advances the simulation on a
/// fixed step. A full snapshot is published after every tick and after every
/// event that visibly changed the world; intent updates wait for the next tick.
pub async fn world_task(
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    mut world: World,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    let mut tick: u64 = 0;

    // Drive the fixed-step loop at the configured tick rate.
    // Late ticks are delayed rather than bunched; dt never changes.
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let dt = tick_interval.as_secs_f32();

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(tick, "world task shutting down");
                break;
            }
            _ = interval.tick() => {
                let moved = world.step(dt);
                tick += 1;
                trace!(tick, moved, "tick");
                // Broadcast even when nothing moved.
                publish(&world_tx, &world, tick);
            }
            ev = input_rx.recv() => {
                let Some(ev) = ev else {
                    info!(tick, "event channel closed; world task exiting");
                    break;
                };
                if apply_event(&mut world, ev) {
                    publish(&world_tx, &world, tick);
                }
            }
        }
    }
}

/// Applies one event; returns true when the change must be broadcast now.
fn apply_event(world: &mut World, ev: GameEvent) -> bool {
    match ev {
        GameEvent::Join { player_id } => {
            let e = world.create(player_id);
            info!(player_id = %e.id, x = e.x, y = e.y, "player joined");
            true
        }
        GameEvent::Leave { player_id } => {
            let removed = world.remove(&player_id);
            if removed {
                info!(%player_id, players = world.player_count(), "player left");
            } else {
                debug!(%player_id, "leave for unknown player ignored");
            }
            removed
        }
        GameEvent::Input { player_id, intent } => {
            if !world.set_intent(&player_id, intent) {
                trace!(%player_id, "input for unknown player ignored");
            }
            false
        }
        GameEvent::PlaceMark { player_id } => {
            let placed = world.place_mark(&player_id).is_some();
            if placed {
                debug!(%player_id, marks = world.marks().len(), "mark placed");
            } else {
                debug!(%player_id, "mark request for unknown player ignored");
            }
            placed
        }
        GameEvent::SetAppearance { player_id, update } => {
            let applied = world.set_appearance(&player_id, update);
            if applied {
                debug!(%player_id, "appearance changed");
            }
            applied
        }
    }
}

fn publish(world_tx: &broadcast::Sender<WorldUpdate>, world: &World, tick: u64) {
    // No receivers just means nobody is connected.
    let _ = world_tx.send(WorldUpdate::new(tick, world.snapshot()));
}
