// Per-tick simulation systems.

pub mod movement;
