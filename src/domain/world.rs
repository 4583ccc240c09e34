// Authoritative world: live entities keyed by player id plus the append-only mark list.

use super::appearance::{SizeClass, random_color, resolve_footprint};
use super::state::{Appearance, AppearanceUpdate, Entity, Intent, Mark, PlayerId, WorldSnapshot};
use super::systems::movement::{self, MovementConfig};
use super::tuning::ArenaTuning;
use rand::Rng;
use std::collections::HashMap;

/// Owned world state.
///
/// Not synchronized on its own; the world task owns the only instance and
/// applies mutations one at a time, which makes every operation atomic with
/// respect to `snapshot`.
#[derive(Debug)]
pub struct World {
    tuning: ArenaTuning,
    entities: HashMap<PlayerId, Entity>,
    marks: Vec<Mark>,
}

impl World {
    pub fn new(tuning: ArenaTuning) -> Self {
        Self {
            tuning,
            entities: HashMap::new(),
            marks: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &ArenaTuning {
        &self.tuning
    }

    /// Spawns a default entity for `id` at a random in-bounds position.
    pub fn create(&mut self, id: PlayerId) -> &Entity {
        self.create_with_rng(id, &mut rand::rng())
    }

    pub fn create_with_rng<R: Rng + ?Sized>(&mut self, id: PlayerId, rng: &mut R) -> &Entity {
        let size = SizeClass::default();
        let footprint = resolve_footprint(size, self.tuning.base_size);
        let entity = Entity {
            id: id.clone(),
            x: rng.random_range(0.0..=self.tuning.max_x(footprint)),
            y: rng.random_range(0.0..=self.tuning.max_y(footprint)),
            appearance: Appearance {
                color: random_color(rng),
                shape: Default::default(),
                size,
                footprint,
            },
            intent: Intent::default(),
        };

        // A reused id replaces the previous entity.
        self.entities.insert(id.clone(), entity);
        &self.entities[&id]
    }

    /// Removes the entity; returns false if it was already gone.
    pub fn remove(&mut self, id: &str) -> bool {
        self.entities.remove(id).is_some()
    }

    pub fn set_intent(&mut self, id: &str, intent: Intent) -> bool {
        match self.entities.get_mut(id) {
            Some(e) => {
                e.intent = intent;
                true
            }
            None => false,
        }
    }

    pub fn set_appearance(&mut self, id: &str, update: AppearanceUpdate) -> bool {
        let Some(e) = self.entities.get_mut(id) else {
            return false;
        };

        if let Some(shape) = update.shape {
            e.appearance.shape = shape;
        }
        if let Some(size) = update.size {
            e.appearance.size = size;
            e.appearance.footprint = resolve_footprint(size, self.tuning.base_size);
        }
        if let Some(color) = update.color {
            e.appearance.color = color;
        }
        true
    }

    /// Stamps a mark from the entity's current state; `None` if the id has no entity.
    pub fn place_mark(&mut self, id: &str) -> Option<&Mark> {
        let e = self.entities.get(id)?;
        self.marks.push(Mark::from(e));
        self.marks.last()
    }

    /// Advances every moving entity by one fixed step. Returns how many moved.
    pub fn step(&mut self, dt: f32) -> usize {
        let cfg = MovementConfig::from(&self.tuning);
        self.entities
            .values_mut()
            .map(|e| movement::tick_entity(e, dt, cfg))
            .filter(|moved| *moved)
            .count()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            players: self.entities.values().cloned().collect(),
            marks: self.marks.clone(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn player_count(&self) -> usize {
        self.entities.len()
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }
}
