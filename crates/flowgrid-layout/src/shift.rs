#![forbid(unsafe_code)]

//! Swap/shift engine: one reorder step per pointer move.
//!
//! A step moves the dragged tile from `from` to `to` in three phases:
//!
//! 1. **Ripple**: the dragged entry bubbles towards `to` one neighbour at a
//!    time. Each swap exchanges the pair's positions and, when the pair sits
//!    on different lines, shifts the rest of the affected line so it stays
//!    packed.
//! 2. **Repack**: a single pass over every tile in index order pushes tiles
//!    that now cross the wrap threshold onto the next line and pulls tiles
//!    back onto the line above when they fit there.
//! 3. **Reconcile**: the moved entries are written back into the cache by
//!    identity, then the cache is reordered with one array move.
//!
//! All offsets are cumulative pixel deltas added to each tile's running
//! [`Offset3d`].
//!
//! The repack is a single pass. When one move makes several lines overflow
//! at once, tiles later in the pass see positions that earlier fix-ups
//! already shifted, and the result is not always fully packed. Subsequent
//! moves in the same drag continue from whatever state the cache holds.

use flowgrid_core::{Offset3d, Point, TileId, TileRect};
use rustc_hash::FxHashMap;

use crate::cache::LayoutCache;
use crate::lines::WrapLineDetector;
use crate::reorder::move_item_in_array;
use crate::TileSnapshot;

/// Direction of one reorder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDelta {
    /// Towards higher indices (`+1`).
    Forward,
    /// Towards lower indices (`-1`).
    Backward,
}

impl StepDelta {
    /// Unit step from the sign of an axis delta; `None` for zero or NaN.
    pub fn from_axis(value: f64) -> Option<Self> {
        if value > 0.0 {
            Some(Self::Forward)
        } else if value < 0.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }

    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    #[inline]
    const fn neighbour(self, index: usize) -> usize {
        match self {
            Self::Forward => index + 1,
            Self::Backward => index - 1,
        }
    }
}

/// Axis whose pointer delta decides the step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Source and target share a line.
    Horizontal,
    /// Source and target are on different lines.
    Vertical,
}

/// Why a candidate step was not taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRejection {
    /// An index is outside the cache.
    IndexOutOfRange,
    /// Source and target are the same tile.
    SameIndex,
    /// The pointer did not move along the relevant axis.
    ZeroDelta,
    /// The pointer moves forward but the target is already behind the source.
    ForwardPastTarget,
    /// The pointer moves backward but the target is already ahead of the source.
    BackwardPastTarget,
}

/// A validated reorder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflowStep {
    pub from: usize,
    pub to: usize,
    pub axis: Axis,
    pub delta: StepDelta,
}

impl ReflowStep {
    /// Validate a step from the dragged tile's index, the hovered tile's
    /// index, and the drag toolkit's direction of travel.
    ///
    /// Sub-pixel jitter produces zero deltas and deltas pointing away from
    /// the target; both are rejected so the grid does not oscillate.
    pub fn resolve(
        cache: &LayoutCache,
        from: usize,
        to: usize,
        direction: Point,
    ) -> Result<Self, StepRejection> {
        let (Some(source), Some(target)) = (cache.get(from), cache.get(to)) else {
            return Err(StepRejection::IndexOutOfRange);
        };
        if from == to {
            return Err(StepRejection::SameIndex);
        }

        let axis = if cache.detector().same_line(source.rect.y, target.rect.y) {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let value = match axis {
            Axis::Horizontal => direction.x,
            Axis::Vertical => direction.y,
        };
        let delta = StepDelta::from_axis(value).ok_or(StepRejection::ZeroDelta)?;

        match delta {
            StepDelta::Forward if from > to => Err(StepRejection::ForwardPastTarget),
            StepDelta::Backward if from < to => Err(StepRejection::BackwardPastTarget),
            _ => Ok(Self {
                from,
                to,
                axis,
                delta,
            }),
        }
    }
}

/// Result of applying a step: every tile's new offset, in post-step order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflowOutcome {
    pub step: ReflowStep,
    pub tiles: Vec<TileSnapshot>,
}

impl ReflowOutcome {
    /// Offsets to present, skipping `exclude` (the tile under the pointer).
    pub fn transforms(
        &self,
        exclude: Option<TileId>,
    ) -> impl Iterator<Item = (TileId, Offset3d)> + '_ {
        self.tiles
            .iter()
            .filter(move |tile| Some(tile.id) != exclude)
            .map(|tile| (tile.id, tile.offset))
    }
}

/// Apply one validated step to the cache.
pub fn reflow(cache: &mut LayoutCache, step: ReflowStep) -> ReflowOutcome {
    let detector = *cache.detector();
    let mut work = cache.snapshot();

    ripple(&detector, &mut work, step);
    repack(&detector, &mut work);

    let by_id: FxHashMap<TileId, TileSnapshot> = work.iter().map(|t| (t.id, *t)).collect();
    let mut reconciled: Vec<TileSnapshot> = cache
        .tiles()
        .iter()
        .map(|tile| by_id.get(&tile.id).copied().unwrap_or(*tile))
        .collect();
    move_item_in_array(&mut reconciled, step.from, step.to);
    cache.replace_tiles(reconciled);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        from = step.from,
        to = step.to,
        delta = step.delta.sign(),
        axis = ?step.axis,
        "reflow step applied"
    );

    ReflowOutcome { step, tiles: work }
}

fn ripple(detector: &WrapLineDetector, work: &mut [TileSnapshot], step: ReflowStep) {
    let start = step.from.min(step.to);
    let end = step.from.max(step.to);
    match step.delta {
        StepDelta::Forward => {
            for index in start..end {
                swap_step(detector, work, index, step.delta);
            }
        }
        StepDelta::Backward => {
            for index in (start + 1..=end).rev() {
                swap_step(detector, work, index, step.delta);
            }
        }
    }
}

/// Horizontal offsets for the moving entry and its neighbour.
fn horizontal_offsets(current: &TileRect, sibling: &TileRect, delta: StepDelta) -> (f64, f64) {
    match delta {
        StepDelta::Forward => {
            // Neighbour starts the next line: jump to its left edge.
            let offset = if sibling.x < current.x {
                sibling.x - current.x
            } else {
                sibling.right - current.right
            };
            (offset, current.x - sibling.x)
        }
        StepDelta::Backward => {
            // Neighbour ends the previous line: it takes our left edge.
            let sibling_offset = if sibling.right > current.right {
                current.x - sibling.x
            } else {
                current.right - sibling.right
            };
            (sibling.x - current.x, sibling_offset)
        }
    }
}

fn swap_step(
    detector: &WrapLineDetector,
    work: &mut [TileSnapshot],
    index: usize,
    delta: StepDelta,
) {
    let other = delta.neighbour(index);
    let current = work[index];
    let sibling = work[other];

    let (offset_x, sibling_offset_x) = horizontal_offsets(&current.rect, &sibling.rect, delta);
    let offset_y = sibling.rect.y - current.rect.y;

    let moved = current.shifted(offset_x, offset_y);
    let sibling_moved = sibling.shifted(sibling_offset_x, -offset_y);

    if !detector.same_line(current.rect.y, sibling.rect.y) {
        let space = (moved.rect.right - sibling.rect.right) * delta.sign();
        let (line_y, skip) = match delta {
            StepDelta::Forward => (sibling.rect.y, sibling.id),
            StepDelta::Backward => (current.rect.y, current.id),
        };
        shift_line(detector, work, line_y, space, Some(skip));
    }

    work[index] = sibling_moved;
    work[other] = moved;
}

/// Shift every tile on the line at `line_y` horizontally by `space`.
fn shift_line(
    detector: &WrapLineDetector,
    work: &mut [TileSnapshot],
    line_y: f64,
    space: f64,
    skip: Option<TileId>,
) {
    if space == 0.0 {
        return;
    }
    for tile in work
        .iter_mut()
        .filter(|t| Some(t.id) != skip && detector.same_line(t.rect.y, line_y))
    {
        *tile = tile.shifted(space, 0.0);
    }
}

fn repack(detector: &WrapLineDetector, work: &mut [TileSnapshot]) {
    let Some(first) = work.first() else {
        return;
    };
    let mut line = first.rect.y;
    for index in 0..work.len() {
        let rect = work[index].rect;
        if detector.crosses_threshold(&rect) {
            line = push_below(detector, work, index);
        } else if !detector.same_line(rect.y, line) {
            line = pull_above(detector, work, index, line);
        }
    }
}

/// Move `work[index]` onto the next line, opening space there.
///
/// Returns the line the tile now sits on.
fn push_below(detector: &WrapLineDetector, work: &mut [TileSnapshot], index: usize) -> f64 {
    let current = work[index];
    let next = work.get(index + 1).copied();

    let (dx, dy) = match next {
        Some(next) => (next.rect.x - current.rect.x, next.rect.y - current.rect.y),
        None => {
            // Last tile: start a new line under the first tile before it on
            // its line, or at the container edge if it is alone there.
            let line_start = detector
                .first_on_line(&work[..index], current.rect.y)
                .map_or(detector.container().left, |t| t.rect.x);
            (
                line_start - current.rect.x,
                current.rect.bottom + detector.gap() - current.rect.y,
            )
        }
    };

    let moved = current.shifted(dx, dy);
    let line = next.map_or(moved.rect.y, |n| n.rect.y);
    let space = next.map_or(0.0, |n| moved.rect.right - n.rect.x + detector.gap());
    shift_line(detector, work, line, space, None);
    work[index] = moved;
    line
}

/// Pull `work[index]` onto the line of the tile before it if there is room.
///
/// Returns the line the scan continues on.
fn pull_above(
    detector: &WrapLineDetector,
    work: &mut [TileSnapshot],
    index: usize,
    line: f64,
) -> f64 {
    let current = work[index];
    let Some(previous) = index.checked_sub(1).map(|p| work[p]) else {
        return current.rect.y;
    };
    if !detector.should_pull_up(&current.rect, line, &previous) {
        return current.rect.y;
    }

    let origin = detector.pull_up_origin(&previous);
    if let Some(next) = work.get(index + 1).copied() {
        // Close the gap left on the old line.
        shift_line(
            detector,
            work,
            current.rect.y,
            current.rect.x - next.rect.x,
            Some(current.id),
        );
    }

    let rect = current.rect.moved_to(origin, previous.rect.y);
    work[index] = TileSnapshot {
        rect,
        offset: current
            .offset
            .shifted(rect.x - current.rect.x, rect.y - current.rect.y),
        ..current
    };
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MeasuredTile;
    use crate::lines::ContainerMetrics;

    const SIZE: f64 = 100.0;
    const GAP: f64 = 10.0;

    /// `count` equal tiles in a grid of `columns` columns.
    fn grid(count: u64, columns: u64) -> LayoutCache {
        let mut cache = LayoutCache::new(0.0);
        let measured = (0..count).map(|i| MeasuredTile {
            id: TileId::new(i),
            rect: TileRect::new(
                (i % columns) as f64 * (SIZE + GAP),
                (i / columns) as f64 * (SIZE + GAP),
                SIZE,
                SIZE,
            ),
            margin_right: 0.0,
        });
        let threshold = columns as f64 * SIZE + (columns - 1) as f64 * GAP;
        cache.rebuild(
            measured,
            ContainerMetrics {
                left: 0.0,
                threshold_x: threshold,
                gap: GAP,
            },
        );
        cache
    }

    fn ids(cache: &LayoutCache) -> Vec<u64> {
        cache.ids().map(TileId::get).collect()
    }

    fn offset_of(cache: &LayoutCache, id: u64) -> Offset3d {
        let index = cache.index_of(TileId::new(id)).expect("tile present");
        cache.tiles()[index].offset
    }

    #[test]
    fn step_delta_from_sign() {
        assert_eq!(StepDelta::from_axis(3.0), Some(StepDelta::Forward));
        assert_eq!(StepDelta::from_axis(-0.2), Some(StepDelta::Backward));
        assert_eq!(StepDelta::from_axis(0.0), None);
        assert_eq!(StepDelta::from_axis(f64::NAN), None);
    }

    #[test]
    fn resolve_picks_axis_from_lines() {
        let cache = grid(12, 4);
        let same_line = ReflowStep::resolve(&cache, 0, 2, Point::new(1.0, 0.0)).expect("step");
        assert_eq!(same_line.axis, Axis::Horizontal);

        let other_line = ReflowStep::resolve(&cache, 0, 5, Point::new(0.0, 1.0)).expect("step");
        assert_eq!(other_line.axis, Axis::Vertical);
        assert_eq!(other_line.delta, StepDelta::Forward);
    }

    #[test]
    fn resolve_rejects_jitter() {
        let cache = grid(12, 4);
        assert_eq!(
            ReflowStep::resolve(&cache, 0, 5, Point::new(1.0, 0.0)),
            Err(StepRejection::ZeroDelta)
        );
        assert_eq!(
            ReflowStep::resolve(&cache, 5, 0, Point::new(0.0, 1.0)),
            Err(StepRejection::ForwardPastTarget)
        );
        assert_eq!(
            ReflowStep::resolve(&cache, 0, 5, Point::new(0.0, -1.0)),
            Err(StepRejection::BackwardPastTarget)
        );
        assert_eq!(
            ReflowStep::resolve(&cache, 3, 3, Point::new(1.0, 1.0)),
            Err(StepRejection::SameIndex)
        );
        assert_eq!(
            ReflowStep::resolve(&cache, 3, 30, Point::new(1.0, 1.0)),
            Err(StepRejection::IndexOutOfRange)
        );
    }

    #[test]
    fn forward_step_across_lines() {
        let mut cache = grid(12, 4);
        let step = ReflowStep::resolve(&cache, 0, 5, Point::new(0.0, 1.0)).expect("step");
        let outcome = reflow(&mut cache, step);

        assert_eq!(ids(&cache), vec![1, 2, 3, 4, 5, 0, 6, 7, 8, 9, 10, 11]);
        assert_eq!(offset_of(&cache, 0), Offset3d::new(110.0, 110.0, 0.0));
        assert_eq!(offset_of(&cache, 4), Offset3d::new(330.0, -110.0, 0.0));
        assert_eq!(offset_of(&cache, 1), Offset3d::new(-110.0, 0.0, 0.0));
        assert_eq!(offset_of(&cache, 6), Offset3d::ZERO);

        let moved: Vec<u64> = outcome.tiles.iter().map(|t| t.id.get()).collect();
        assert_eq!(moved, ids(&cache));
    }

    #[test]
    fn backward_step_across_lines() {
        let mut cache = grid(12, 4);
        let step = ReflowStep::resolve(&cache, 5, 0, Point::new(0.0, -1.0)).expect("step");
        reflow(&mut cache, step);

        assert_eq!(ids(&cache), vec![5, 0, 1, 2, 3, 4, 6, 7, 8, 9, 10, 11]);
        assert_eq!(offset_of(&cache, 5), Offset3d::new(-110.0, -110.0, 0.0));
        assert_eq!(offset_of(&cache, 3), Offset3d::new(-330.0, 110.0, 0.0));
        assert_eq!(offset_of(&cache, 4), Offset3d::new(110.0, 0.0, 0.0));
    }

    #[test]
    fn rects_follow_offsets() {
        let original = grid(12, 4);
        let mut cache = original.clone();
        let step = ReflowStep::resolve(&cache, 2, 9, Point::new(0.0, 1.0)).expect("step");
        reflow(&mut cache, step);
        for tile in cache.tiles() {
            let start = original.tiles()[original.index_of(tile.id).expect("present")].rect;
            assert_eq!(tile.rect, start.translated(tile.offset.x, tile.offset.y));
            assert_eq!(tile.rect.width(), SIZE);
            assert_eq!(tile.rect.height(), SIZE);
        }
    }

    #[test]
    fn transforms_skip_dragged_tile() {
        let mut cache = grid(8, 4);
        let step = ReflowStep::resolve(&cache, 0, 1, Point::new(1.0, 0.0)).expect("step");
        let outcome = reflow(&mut cache, step);
        let applied: Vec<TileId> = outcome
            .transforms(Some(TileId::new(0)))
            .map(|(id, _)| id)
            .collect();
        assert_eq!(applied.len(), 7);
        assert!(!applied.contains(&TileId::new(0)));
    }

    #[test]
    fn wide_tile_wraps_to_next_line() {
        // Line 0: [a:100][b:200][c:100]  (right edge 430)
        // Line 1: [d:100]
        let mut cache = LayoutCache::new(0.0);
        let tiles = [
            (0, TileRect::new(0.0, 0.0, 100.0, 100.0)),
            (1, TileRect::new(110.0, 0.0, 200.0, 100.0)),
            (2, TileRect::new(320.0, 0.0, 100.0, 100.0)),
            (3, TileRect::new(0.0, 110.0, 100.0, 100.0)),
        ];
        cache.rebuild(
            tiles.iter().map(|&(id, rect)| MeasuredTile {
                id: TileId::new(id),
                rect,
                margin_right: 0.0,
            }),
            ContainerMetrics {
                left: 0.0,
                threshold_x: 430.0,
                gap: GAP,
            },
        );

        // Drag `a` past `b`: b moves to x=0, a lands at x=210 (right 310),
        // c stays on line 0.
        let step = ReflowStep::resolve(&cache, 0, 1, Point::new(1.0, 0.0)).expect("step");
        reflow(&mut cache, step);
        assert_eq!(ids(&cache), vec![1, 0, 2, 3]);
        let rects: Vec<TileRect> = cache.tiles().iter().map(|t| t.rect).collect();
        assert_eq!(rects[0].x, 0.0);
        assert_eq!(rects[1].x, 210.0);
        assert_eq!(rects[2].x, 320.0);
        assert_eq!(rects[3].y, 110.0);
    }

    #[test]
    fn overflowing_last_tile_opens_new_line() {
        // One line of two tiles where the second already overflows.
        let mut cache = LayoutCache::new(0.0);
        cache.rebuild(
            [
                MeasuredTile {
                    id: TileId::new(0),
                    rect: TileRect::new(0.0, 0.0, 100.0, 100.0),
                    margin_right: 0.0,
                },
                MeasuredTile {
                    id: TileId::new(1),
                    rect: TileRect::new(110.0, 0.0, 100.0, 100.0),
                    margin_right: 0.0,
                },
            ],
            ContainerMetrics {
                left: 0.0,
                threshold_x: 200.0,
                gap: GAP,
            },
        );
        let detector = *cache.detector();
        let mut work = cache.snapshot();
        repack(&detector, &mut work);
        assert_eq!(work[1].rect, TileRect::new(0.0, 110.0, 100.0, 100.0));
        assert_eq!(work[1].offset, Offset3d::new(-110.0, 110.0, 0.0));
    }

    #[test]
    fn lone_overflowing_tile_wraps_to_container_edge() {
        let mut cache = LayoutCache::new(0.0);
        cache.rebuild(
            [MeasuredTile {
                id: TileId::new(0),
                rect: TileRect::new(50.0, 0.0, 100.0, 100.0),
                margin_right: 0.0,
            }],
            ContainerMetrics {
                left: 0.0,
                threshold_x: 120.0,
                gap: GAP,
            },
        );
        let detector = *cache.detector();
        let mut work = cache.snapshot();
        repack(&detector, &mut work);
        assert_eq!(work[0].rect, TileRect::new(0.0, 110.0, 100.0, 100.0));
        assert_eq!(work[0].offset, Offset3d::new(-50.0, 110.0, 0.0));
    }

    #[test]
    fn tile_with_room_is_pulled_up() {
        // Line 0 has room for another tile; tile 2 sits alone on line 1.
        let mut cache = LayoutCache::new(0.0);
        cache.rebuild(
            [
                (0, TileRect::new(0.0, 0.0, 100.0, 100.0)),
                (1, TileRect::new(110.0, 0.0, 100.0, 100.0)),
                (2, TileRect::new(0.0, 110.0, 100.0, 100.0)),
            ]
            .into_iter()
            .map(|(id, rect)| MeasuredTile {
                id: TileId::new(id),
                rect,
                margin_right: 0.0,
            }),
            ContainerMetrics {
                left: 0.0,
                threshold_x: 430.0,
                gap: GAP,
            },
        );
        let detector = *cache.detector();
        let mut work = cache.snapshot();
        repack(&detector, &mut work);
        assert_eq!(work[2].rect, TileRect::new(220.0, 0.0, 100.0, 100.0));
        assert_eq!(work[2].offset, Offset3d::new(220.0, -110.0, 0.0));
    }

    #[test]
    fn packed_grid_is_stable_under_repack() {
        let cache = grid(12, 4);
        let detector = *cache.detector();
        let mut work = cache.snapshot();
        repack(&detector, &mut work);
        assert_eq!(work, cache.snapshot());
    }
}
