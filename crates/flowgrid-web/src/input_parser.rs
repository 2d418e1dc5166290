#![forbid(unsafe_code)]

//! JSON input parser for host-encoded drag and transition notifications.
//!
//! A JS host forwards each toolkit callback as a small JSON object and hands
//! the decoded [`HostEvent`] to [`FlowReorder::dispatch`]:
//!
//! ```json
//! {"kind":"drag-move","tile":3,"x":412.5,"y":130,"dx":1,"dy":0}
//! ```
//!
//! Kinds: `drag-start`, `drag-move`, `drag-end`, `drag-cancel`,
//! `transition-start`, `transition-end`, `transition-cancel`,
//! `tiles-changed`, `render`.
//!
//! [`FlowReorder::dispatch`]: crate::FlowReorder::dispatch

use flowgrid_core::{DragEvent, Point, TileId, TransitionEvent};
use serde::Deserialize;

use crate::config::FlowConfigError;
use crate::controller::HostEvent;

/// Errors from parsing host JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown event kind.
    UnknownKind(String),
    /// Well-formed configuration with an invalid value.
    Config(FlowConfigError),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownKind(kind) => write!(f, "unknown event kind: {kind}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for InputParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FlowConfigError> for InputParseError {
    fn from(err: FlowConfigError) -> Self {
        Self::Config(err)
    }
}

#[derive(Debug, Deserialize)]
struct RawHostEvent {
    kind: String,
    #[serde(default)]
    tile: Option<u64>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    dx: Option<f64>,
    #[serde(default)]
    dy: Option<f64>,
}

impl RawHostEvent {
    fn tile(&self) -> Result<TileId, InputParseError> {
        self.tile
            .map(TileId::new)
            .ok_or(InputParseError::MissingField("tile"))
    }
}

/// Parse one JSON-encoded host notification.
pub fn parse_host_event(json: &str) -> Result<HostEvent, InputParseError> {
    let raw: RawHostEvent =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let event = match raw.kind.as_str() {
        "drag-start" => HostEvent::Drag(DragEvent::Started { tile: raw.tile()? }),
        "drag-move" => parse_drag_move(&raw)?,
        "drag-end" => HostEvent::Drag(DragEvent::Ended { tile: raw.tile()? }),
        "drag-cancel" => HostEvent::Drag(DragEvent::Cancelled { tile: raw.tile()? }),
        "transition-start" => HostEvent::Transition(TransitionEvent::Started { tile: raw.tile()? }),
        "transition-end" => HostEvent::Transition(TransitionEvent::Ended { tile: raw.tile()? }),
        "transition-cancel" => {
            HostEvent::Transition(TransitionEvent::Cancelled { tile: raw.tile()? })
        }
        "tiles-changed" => HostEvent::TilesChanged,
        "render" => HostEvent::Rendered,
        other => return Err(InputParseError::UnknownKind(other.to_owned())),
    };
    Ok(event)
}

fn parse_drag_move(raw: &RawHostEvent) -> Result<HostEvent, InputParseError> {
    let tile = raw.tile()?;
    let x = raw.x.ok_or(InputParseError::MissingField("x"))?;
    let y = raw.y.ok_or(InputParseError::MissingField("y"))?;
    // A missing axis delta means no travel along it.
    let delta = Point::new(raw.dx.unwrap_or(0.0), raw.dy.unwrap_or(0.0));
    Ok(HostEvent::Drag(DragEvent::Moved {
        tile,
        pointer: Point::new(x, y),
        delta,
    }))
}
