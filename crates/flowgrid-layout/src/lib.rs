#![forbid(unsafe_code)]

//! Flow-grid reflow: layout cache, wrap-line detection, and ripple reordering.
//!
//! The engine works entirely on cached geometry. A host measures tiles once
//! per layout pass ([`LayoutCache::rebuild`]); every pointer move after that
//! is resolved into a [`ReflowStep`] and applied with [`reflow`], which
//! returns the translation every tile should show.

pub mod cache;
pub mod lines;
pub mod reorder;
pub mod shift;

pub use cache::{LayoutCache, MeasuredTile};
pub use flowgrid_core::{Offset3d, Point, TileId, TileRect};
pub use lines::{ContainerMetrics, DEFAULT_LINE_TOLERANCE, Line, WrapLineDetector};
pub use reorder::move_item_in_array;
pub use shift::{Axis, ReflowOutcome, ReflowStep, StepDelta, StepRejection, reflow};

use serde::{Deserialize, Serialize};

/// Cached state of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSnapshot {
    /// Identity of the rendered element.
    pub id: TileId,
    /// Where the tile currently appears, offset included.
    pub rect: TileRect,
    /// Translation accumulated since the last rebuild or commit.
    pub offset: Offset3d,
    /// Right margin measured at rebuild time.
    pub margin_right: f64,
}

impl TileSnapshot {
    /// Move the tile by `(dx, dy)`, keeping rect and offset in step.
    #[inline]
    #[must_use]
    pub fn shifted(self, dx: f64, dy: f64) -> Self {
        Self {
            rect: self.rect.translated(dx, dy),
            offset: self.offset.shifted(dx, dy),
            ..self
        }
    }
}
