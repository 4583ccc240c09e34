use crate::domain::state::Entity;
use crate::domain::tuning::ArenaTuning;

#[derive(Debug, Clone, Copy)]
pub struct MovementConfig {
    pub speed: f32, // units/s

    pub field_width: f32,
    pub field_height: f32,
}

impl From<&ArenaTuning> for MovementConfig {
    fn from(tuning: &ArenaTuning) -> Self {
        Self {
            speed: tuning.speed,
            field_width: tuning.field_width,
            field_height: tuning.field_height,
        }
    }
}

/// Integrates the entity's held intent over one fixed step.
///
/// Idle entities are left untouched, including ones currently out of bounds
/// after growing; they are only re-clamped once they move again.
/// Returns whether the entity was integrated.
pub fn tick_entity(e: &mut Entity, dt: f32, cfg: MovementConfig) -> bool {
    if e.intent.is_idle() {
        return false;
    }

    let step = cfg.speed * dt;
    let intended_x = e.x + f32::from(e.intent.dx) * step;
    let intended_y = e.y + f32::from(e.intent.dy) * step;

    // Per-axis clamp: hitting one wall still allows sliding along it.
    let footprint = e.appearance.footprint;
    e.x = clamp_axis(intended_x, cfg.field_width - footprint);
    e.y = clamp_axis(intended_y, cfg.field_height - footprint);
    true
}

fn clamp_axis(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}
