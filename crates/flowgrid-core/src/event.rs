#![forbid(unsafe_code)]

//! Canonical host notification types.
//!
//! The drag-and-drop toolkit on the host side owns pointer capture and ghost
//! rendering; it forwards its lifecycle as [`DragEvent`] values. CSS
//! transition start/end notifications observed on the container are
//! forwarded as [`TransitionEvent`] values.
//!
//! # Design Notes
//!
//! - A gesture always arrives as `Started`, any number of `Moved`, then
//!   `Ended` or `Cancelled`.
//! - `Moved::delta` is the toolkit's direction of travel per axis; only its
//!   sign is used.

use crate::geometry::{Point, TileId};

/// Drag lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// A tile was picked up.
    Started { tile: TileId },

    /// The pointer moved while dragging `tile`.
    Moved {
        tile: TileId,
        /// Pointer position in client coordinates.
        pointer: Point,
        /// Direction of travel since the gesture started.
        delta: Point,
    },

    /// The tile was released.
    Ended { tile: TileId },

    /// The gesture was aborted (teardown, lost capture).
    Cancelled { tile: TileId },
}

impl DragEvent {
    /// The tile this event refers to.
    pub const fn tile(&self) -> TileId {
        match *self {
            Self::Started { tile }
            | Self::Moved { tile, .. }
            | Self::Ended { tile }
            | Self::Cancelled { tile } => tile,
        }
    }
}

/// CSS transition notification bubbled up to the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    Started { tile: TileId },
    Ended { tile: TileId },
    /// `transitioncancel`: the transition was interrupted and no end follows.
    Cancelled { tile: TileId },
}

impl TransitionEvent {
    pub const fn tile(&self) -> TileId {
        match *self {
            Self::Started { tile } | Self::Ended { tile } | Self::Cancelled { tile } => tile,
        }
    }
}
