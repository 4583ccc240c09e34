// Domain layer: core simulation types and rules.

pub mod appearance;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod world;

pub use appearance::{Shape, SizeClass};
pub use state::{Appearance, AppearanceUpdate, Entity, Intent, Mark, PlayerId, WorldSnapshot};
pub use world::World;
