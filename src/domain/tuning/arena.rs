/// Gameplay tuning for the shared field and the entities moving on it.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct ArenaTuning {
    /// Field width in units (pixels on the reference client).
    pub field_width: f32,

    /// Field height in units.
    pub field_height: f32,

    /// Footprint of a medium entity; the other size classes scale from it.
    pub base_size: f32,

    /// Movement speed in units per second along each axis.
    pub speed: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            base_size: 20.0,
            speed: 150.0,
        }
    }
}

impl ArenaTuning {
    /// Largest valid x for an entity with the given footprint.
    pub fn max_x(&self, footprint: f32) -> f32 {
        (self.field_width - footprint).max(0.0)
    }

    /// Largest valid y for an entity with the given footprint.
    pub fn max_y(&self, footprint: f32) -> f32 {
        (self.field_height - footprint).max(0.0)
    }
}
