// Domain-level entities, marks, intent and snapshot types.

use super::appearance::{Shape, SizeClass};

pub type PlayerId = String;

/// Last requested movement direction; each axis is always -1, 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    pub dx: i8,
    pub dy: i8,
}

impl Intent {
    /// Builds an intent from untrusted axis values, clamping each by sign.
    pub fn clamped(dx: f64, dy: f64) -> Self {
        Self {
            dx: unit_sign(dx),
            dy: unit_sign(dy),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

// Maps by sign, not magnitude: 0.2 is a full unit step. Intents are always
// one of -1, 0 or 1 per axis.
fn unit_sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        // Zero and NaN.
        0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub color: String,
    pub shape: Shape,
    pub size: SizeClass,
    // Cached from `size`; only the world's appearance setter updates it.
    pub footprint: f32,
}

/// Partial appearance change; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppearanceUpdate {
    pub shape: Option<Shape>,
    pub size: Option<SizeClass>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub appearance: Appearance,

    // Movement-only state (not sent to clients)
    pub intent: Intent,
}

/// Permanently placed copy of an entity's appearance and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub x: f32,
    pub y: f32,
    pub appearance: Appearance,
}

impl From<&Entity> for Mark {
    fn from(e: &Entity) -> Self {
        Self {
            x: e.x,
            y: e.y,
            appearance: e.appearance.clone(),
        }
    }
}

/// Point-in-time copy of the whole world.
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    pub players: Vec<Entity>,
    pub marks: Vec<Mark>,
}
