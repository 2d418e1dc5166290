#![forbid(unsafe_code)]

//! Layout cache: the source of truth for tile geometry during a drag.
//!
//! [`LayoutCache`] holds one [`TileSnapshot`] per rendered tile. At rest it is
//! index-aligned with the item list. While a drag is in progress the engine
//! mutates it step by step; the tiles' visual transforms represent the
//! pending order until the drop commits it.
//!
//! # Invalidation
//!
//! The cache is rebuilt wholesale by [`LayoutCache::rebuild`] when the
//! component attaches or the number of tiles changes. Container metrics
//! (threshold and gap) are captured at that moment only; resizing the
//! container without changing the tile count leaves them stale.

use flowgrid_core::{Offset3d, TileId, TileRect};
use serde::{Deserialize, Serialize};

use crate::lines::{ContainerMetrics, DEFAULT_LINE_TOLERANCE, WrapLineDetector};
use crate::TileSnapshot;

/// A tile as measured by the host during a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredTile {
    pub id: TileId,
    pub rect: TileRect,
    pub margin_right: f64,
}

/// Cached geometry for every tile plus container metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutCache {
    tiles: Vec<TileSnapshot>,
    detector: WrapLineDetector,
    generation: u64,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_TOLERANCE)
    }
}

impl LayoutCache {
    /// Create an empty cache.
    pub fn new(line_tolerance: f64) -> Self {
        Self {
            tiles: Vec::new(),
            detector: WrapLineDetector::new(ContainerMetrics::default(), line_tolerance),
            generation: 0,
        }
    }

    /// Replace every entry with fresh measurements and zero offsets.
    pub fn rebuild(
        &mut self,
        measured: impl IntoIterator<Item = MeasuredTile>,
        container: ContainerMetrics,
    ) {
        self.tiles = measured
            .into_iter()
            .map(|m| TileSnapshot {
                id: m.id,
                rect: m.rect,
                offset: Offset3d::ZERO,
                margin_right: m.margin_right,
            })
            .collect();
        self.detector = WrapLineDetector::new(container, self.detector.tolerance());
        self.generation = self.generation.wrapping_add(1);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            tiles = self.tiles.len(),
            threshold_x = container.threshold_x,
            gap = container.gap,
            generation = self.generation,
            "layout cache rebuilt"
        );
    }

    /// Copy of the current entries, for rollback.
    pub fn snapshot(&self) -> Vec<TileSnapshot> {
        self.tiles.clone()
    }

    /// Restore entries previously taken with [`snapshot`](Self::snapshot).
    pub fn restore(&mut self, snapshot: Vec<TileSnapshot>) {
        self.tiles = snapshot;
    }

    #[inline]
    pub fn tiles(&self) -> &[TileSnapshot] {
        &self.tiles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&TileSnapshot> {
        self.tiles.get(index)
    }

    /// Current index of a tile.
    pub fn index_of(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.id == id)
    }

    /// Tile ids in cache order.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|tile| tile.id)
    }

    #[inline]
    pub const fn detector(&self) -> &WrapLineDetector {
        &self.detector
    }

    #[inline]
    pub const fn threshold_x(&self) -> f64 {
        self.detector.threshold_x()
    }

    #[inline]
    pub const fn gap(&self) -> f64 {
        self.detector.gap()
    }

    /// Number of rebuilds performed so far.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Zero every accumulated offset, keeping rectangles as they are.
    pub fn reset_offsets(&mut self) {
        for tile in &mut self.tiles {
            tile.offset = Offset3d::ZERO;
        }
    }

    pub(crate) fn replace_tiles(&mut self, tiles: Vec<TileSnapshot>) {
        debug_assert_eq!(tiles.len(), self.tiles.len());
        self.tiles = tiles;
    }
}
