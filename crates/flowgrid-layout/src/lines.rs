#![forbid(unsafe_code)]

//! Wrap-line detection.
//!
//! A *line* is the set of tiles sharing a top y-coordinate. Lines are never
//! stored; every query here derives them from cached geometry, so there is
//! no second copy of row membership that could drift from the rectangles.
//!
//! The right edge of the container is the wrap threshold. A tile wraps when
//! its right edge lies strictly beyond it: a tile ending exactly on the
//! threshold still fits.

use std::ops::Range;

use flowgrid_core::TileRect;
use serde::{Deserialize, Serialize};

use crate::TileSnapshot;

/// Default tolerance when comparing top edges of tiles: exact equality.
pub const DEFAULT_LINE_TOLERANCE: f64 = 0.0;

/// Container-level values measured once per layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerMetrics {
    /// Left edge of the container; reference when a line has no tiles.
    pub left: f64,
    /// Right edge of the container.
    pub threshold_x: f64,
    /// Spacing between adjacent tiles.
    pub gap: f64,
}

/// Pure line queries over cached geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WrapLineDetector {
    container: ContainerMetrics,
    tolerance: f64,
}

impl Default for WrapLineDetector {
    fn default() -> Self {
        Self::new(ContainerMetrics::default(), DEFAULT_LINE_TOLERANCE)
    }
}

/// One visual row: its top edge and the contiguous index range it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub y: f64,
    pub indices: Range<usize>,
}

impl WrapLineDetector {
    pub const fn new(container: ContainerMetrics, tolerance: f64) -> Self {
        Self {
            container,
            tolerance,
        }
    }

    #[inline]
    pub const fn container(&self) -> ContainerMetrics {
        self.container
    }

    #[inline]
    pub const fn threshold_x(&self) -> f64 {
        self.container.threshold_x
    }

    #[inline]
    pub const fn gap(&self) -> f64 {
        self.container.gap
    }

    #[inline]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Whether two top edges belong to the same line.
    #[inline]
    pub fn same_line(&self, a: f64, b: f64) -> bool {
        if self.tolerance == 0.0 {
            a == b
        } else {
            (a - b).abs() < self.tolerance
        }
    }

    /// Top edge shared by every tile on the same line as `tiles[index]`.
    pub fn line_of(&self, tiles: &[TileSnapshot], index: usize) -> Option<f64> {
        tiles.get(index).map(|tile| tile.rect.y)
    }

    /// True if the tile must wrap onto the next line.
    #[inline]
    pub fn crosses_threshold(&self, rect: &TileRect) -> bool {
        rect.right > self.container.threshold_x
    }

    /// Left edge a tile would take if placed right after `previous`.
    #[inline]
    pub fn pull_up_origin(&self, previous: &TileSnapshot) -> f64 {
        previous.rect.right + previous.margin_right + self.container.gap
    }

    /// True if `rect` sits below `line` and fits after `previous` without
    /// crossing the threshold.
    pub fn should_pull_up(&self, rect: &TileRect, line: f64, previous: &TileSnapshot) -> bool {
        !self.same_line(rect.y, line)
            && self.pull_up_origin(previous) + rect.width() <= self.container.threshold_x
    }

    /// Group tiles into lines, scanning in index order.
    ///
    /// A new line starts whenever a tile's top edge differs from the tile
    /// before it.
    pub fn lines(&self, tiles: &[TileSnapshot]) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::new();
        for (index, tile) in tiles.iter().enumerate() {
            match lines.last_mut() {
                Some(line) if self.same_line(line.y, tile.rect.y) => line.indices.end = index + 1,
                _ => lines.push(Line {
                    y: tile.rect.y,
                    indices: index..index + 1,
                }),
            }
        }
        lines
    }

    /// First tile (in index order) on the line at `y`.
    pub fn first_on_line<'a>(
        &self,
        tiles: &'a [TileSnapshot],
        y: f64,
    ) -> Option<&'a TileSnapshot> {
        tiles.iter().find(|tile| self.same_line(tile.rect.y, y))
    }
}
