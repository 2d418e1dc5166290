#![forbid(unsafe_code)]

//! Per-drag rollback state and transition bookkeeping.
//!
//! [`DragSession`] lives from drag-start to drop/cancel and holds everything
//! needed to undo the gesture. [`TransitionTracker`] outlives sessions: CSS
//! transitions triggered by one drag routinely finish after its drop, and
//! animations may only be re-enabled once every one of them has ended.

use flowgrid_core::TileId;
use flowgrid_layout::{TileSnapshot, move_item_in_array};
use rustc_hash::FxHashMap;

/// State of one drag gesture.
///
/// The committed item list is left untouched while the gesture runs; the
/// session carries the pending order and the cache entries to restore if the
/// gesture is abandoned.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession<T> {
    dragged: TileId,
    order: Vec<T>,
    pre_drag_tiles: Vec<TileSnapshot>,
    steps: usize,
}

impl<T: Clone> DragSession<T> {
    pub fn begin(dragged: TileId, items: &[T], tiles: Vec<TileSnapshot>) -> Self {
        Self {
            dragged,
            order: items.to_vec(),
            pre_drag_tiles: tiles,
            steps: 0,
        }
    }

    #[inline]
    pub const fn dragged(&self) -> TileId {
        self.dragged
    }

    /// Number of reorder steps applied during this gesture.
    #[inline]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Order the items would have if the tile were dropped now.
    #[inline]
    pub fn order(&self) -> &[T] {
        &self.order
    }

    /// Mirror one accepted cache step on the pending order.
    pub(crate) fn record_step(&mut self, from: usize, to: usize) {
        move_item_in_array(&mut self.order, from, to);
        self.steps += 1;
    }

    /// Consume the session on drop, yielding the order to commit.
    pub fn into_order(self) -> Vec<T> {
        self.order
    }

    /// Consume the session on cancel, yielding the cache entries to restore.
    pub fn into_pre_drag_tiles(self) -> Vec<TileSnapshot> {
        self.pre_drag_tiles
    }
}

/// Result of one transition notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Counted; this many transitions are still in flight.
    Pending(usize),
    /// The last in-flight transition ended; animations are enabled again.
    AllEnded,
    /// Not counted.
    Ignored(TransitionIgnoredReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionIgnoredReason {
    /// The event came from the tile under the pointer.
    DraggedTile,
    /// A start for a tile already in flight.
    DuplicateStart,
    /// An end with no matching start.
    UnmatchedEnd,
    /// Listeners are not attached.
    Detached,
}

/// Pending-transition counter and the "animations enabled" flag.
///
/// Starts are tallied per tile so an end can always be matched against the
/// tile that started it. The dragged tile's own starts are never tallied,
/// but an end for a transition it started before it was grabbed still
/// settles that transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTracker {
    dedupe: bool,
    in_flight: FxHashMap<TileId, usize>,
    count: usize,
    excluded: Option<TileId>,
    enabled: bool,
}

impl TransitionTracker {
    pub fn new(dedupe: bool, enabled: bool) -> Self {
        Self {
            dedupe,
            in_flight: FxHashMap::default(),
            count: 0,
            excluded: None,
            enabled,
        }
    }

    /// Whether hosts should currently render tiles with CSS transitions.
    #[inline]
    pub const fn animations_enabled(&self) -> bool {
        self.enabled
    }

    /// Transitions started and not yet ended.
    #[inline]
    pub const fn pending(&self) -> usize {
        self.count
    }

    /// Stop counting new transitions of `tile` (the one under the pointer).
    pub fn exclude(&mut self, tile: TileId) {
        self.excluded = Some(tile);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Re-enable animations if nothing is in flight.
    ///
    /// Returns `true` if the flag flipped.
    pub fn settle_if_idle(&mut self) -> bool {
        if !self.enabled && self.count == 0 {
            self.enabled = true;
            return true;
        }
        false
    }

    pub fn started(&mut self, tile: TileId) -> TransitionOutcome {
        if self.excluded == Some(tile) {
            return TransitionOutcome::Ignored(TransitionIgnoredReason::DraggedTile);
        }
        let running = self.in_flight.entry(tile).or_insert(0);
        if self.dedupe && *running > 0 {
            return TransitionOutcome::Ignored(TransitionIgnoredReason::DuplicateStart);
        }
        *running += 1;
        self.count += 1;
        TransitionOutcome::Pending(self.count)
    }

    pub fn ended(&mut self, tile: TileId) -> TransitionOutcome {
        let Some(running) = self.in_flight.get_mut(&tile) else {
            let reason = if self.excluded == Some(tile) {
                TransitionIgnoredReason::DraggedTile
            } else {
                TransitionIgnoredReason::UnmatchedEnd
            };
            return TransitionOutcome::Ignored(reason);
        };
        *running -= 1;
        if *running == 0 {
            self.in_flight.remove(&tile);
        }
        self.count -= 1;
        match self.count {
            0 => {
                self.enabled = true;
                TransitionOutcome::AllEnded
            }
            n => TransitionOutcome::Pending(n),
        }
    }
}
