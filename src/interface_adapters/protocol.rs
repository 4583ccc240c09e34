// Wire protocol DTOs and conversions for public arena messages.

use crate::domain::appearance::{resolve_color, resolve_shape, resolve_size};
use crate::domain::{AppearanceUpdate, Entity, Intent, Mark, Shape, SizeClass};
use crate::use_cases::WorldUpdate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    // Identity for this connection, sent once and only to its owner.
    AssignId { id: String },
    // Full world state, sent to everyone.
    GameState(GameStateDto),
}

/// Messages the client sends to the server over the WebSocket.
///
/// Closed over the known message types; anything else is `Unrecognized`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Input(InputDto),
    PlaceBlock,
    SetAppearance(AppearanceDto),
    Unrecognized(String),
}

// Outer `{type, data}` shape shared by every client message.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl ClientMessage {
    /// Parses one text frame.
    ///
    /// Errors cover unparseable JSON and known types with missing or
    /// ill-typed fields; unknown types are not an error.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let msg = match envelope.kind.as_str() {
            "input" => ClientMessage::Input(serde_json::from_value(envelope.data)?),
            "placeBlock" => ClientMessage::PlaceBlock,
            "setAppearance" => {
                // `data` may be absent when nothing changes.
                let data = match envelope.data {
                    serde_json::Value::Null => AppearanceDto::default(),
                    data => serde_json::from_value(data)?,
                };
                ClientMessage::SetAppearance(data)
            }
            _ => ClientMessage::Unrecognized(envelope.kind),
        };
        Ok(msg)
    }
}

/// Movement intent; any number is accepted and clamped by sign.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputDto {
    pub dx: f64,
    pub dy: f64,
}

impl From<InputDto> for Intent {
    fn from(input: InputDto) -> Self {
        Intent::clamped(input.dx, input.dy)
    }
}

/// Requested appearance change; every field is optional.
///
/// Fields are read leniently: a value of the wrong JSON type is treated as
/// an unknown name instead of rejecting the whole message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceDto {
    #[serde(default)]
    pub shape: Option<FieldValue>,
    #[serde(default)]
    pub size_name: Option<FieldValue>,
    #[serde(default)]
    pub color: Option<FieldValue>,
}

/// One requested appearance field as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    fn text(field: &Option<FieldValue>) -> Option<&str> {
        match field {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    fn is_other(field: &Option<FieldValue>) -> bool {
        matches!(field, Some(FieldValue::Other(_)))
    }
}

impl From<AppearanceDto> for AppearanceUpdate {
    fn from(dto: AppearanceDto) -> Self {
        // Non-text shape and size take the unknown-name fallback; non-text color is omitted.
        let shape = if FieldValue::is_other(&dto.shape) {
            Some(Shape::default())
        } else {
            resolve_shape(FieldValue::text(&dto.shape))
        };
        let size = if FieldValue::is_other(&dto.size_name) {
            Some(SizeClass::default())
        } else {
            resolve_size(FieldValue::text(&dto.size_name))
        };
        Self {
            shape,
            size,
            color: resolve_color(FieldValue::text(&dto.color)),
        }
    }
}

/// Full world state as sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDto {
    // Keyed by player id; ordered for stable payloads.
    pub players: BTreeMap<String, PlayerStateDto>,
    pub drawn_blocks: Vec<BlockStateDto>,
}

impl From<WorldUpdate> for GameStateDto {
    fn from(update: WorldUpdate) -> Self {
        Self {
            players: update
                .players
                .iter()
                .map(|p| (p.id.clone(), PlayerStateDto::from(p)))
                .collect(),
            drawn_blocks: update.marks.iter().map(BlockStateDto::from).collect(),
        }
    }
}

/// Flattened entity state for wire transmission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub color: String,
    pub shape: &'static str,
    pub size_name: &'static str,
    pub actual_size: f32,
}

impl From<&Entity> for PlayerStateDto {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id.clone(),
            x: entity.x,
            y: entity.y,
            color: entity.appearance.color.clone(),
            shape: entity.appearance.shape.as_str(),
            size_name: entity.appearance.size.as_str(),
            actual_size: entity.appearance.footprint,
        }
    }
}

/// Flattened mark state for wire transmission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStateDto {
    pub x: f32,
    pub y: f32,
    pub color: String,
    pub shape: &'static str,
    pub size_name: &'static str,
    pub actual_size: f32,
}

impl From<&Mark> for BlockStateDto {
    fn from(mark: &Mark) -> Self {
        Self {
            x: mark.x,
            y: mark.y,
            color: mark.appearance.color.clone(),
            shape: mark.appearance.shape.as_str(),
            size_name: mark.appearance.size.as_str(),
            actual_size: mark.appearance.footprint,
        }
    }
}
