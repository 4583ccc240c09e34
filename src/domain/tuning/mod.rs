// Gameplay tuning values, kept apart from runtime/server configuration.

pub mod arena;

pub use arena::ArenaTuning;
