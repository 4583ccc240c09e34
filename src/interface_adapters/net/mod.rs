// Network adapter for client WebSocket connections.

pub mod client;

pub use client::{spawn_world_serializer, upgrade, ws_handler};
