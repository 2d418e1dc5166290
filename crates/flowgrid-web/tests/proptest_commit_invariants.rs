//! Property tests for commit and rollback through the controller.
//!
//! Random hover streams are replayed against the in-memory page, then the
//! gesture is dropped or cancelled:
//! - a drop commits a permutation of the original items that matches the
//!   cached tile order,
//! - a cancel leaves items and cache exactly as before the gesture,
//! - a second reset is a no-op.

use flowgrid_core::{Point, TileId};
use flowgrid_web::{DragLogOutcome, FlowGridConfig, FlowReorder, MemoryBackend};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Point> {
    (-1i32..=1, -1i32..=1).prop_map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
}

fn gesture() -> impl Strategy<Value = (usize, usize, Vec<(usize, Point)>)> {
    (
        3usize..16,
        2usize..6,
        prop::collection::vec((0usize..16, direction()), 1..12),
    )
}

fn attached(count: usize, columns: usize) -> FlowReorder<u64, MemoryBackend> {
    let backend = MemoryBackend::uniform(count, columns, 100.0, 10.0);
    let mut flow = FlowReorder::new(backend, (0..count as u64).collect(), FlowGridConfig::default())
        .expect("default config is valid");
    assert!(flow.attach());
    flow
}

fn replay(
    flow: &mut FlowReorder<u64, MemoryBackend>,
    dragged: TileId,
    hovers: &[(usize, Point)],
) -> usize {
    let count = flow.items().len();
    let mut accepted = 0;
    for &(target, delta) in hovers {
        let target = TileId::new((target % count) as u64);
        let Some(pointer) = flow.backend().center_of(target) else {
            continue;
        };
        let before = flow.cache().index_of(dragged);
        let dispatch = flow.drag_moved(dragged, pointer, delta);
        if let DragLogOutcome::Reordered { from, to } = dispatch.outcome {
            assert_eq!(before, Some(from));
            assert_eq!(flow.cache().index_of(dragged), Some(to));
            accepted += 1;
        }
    }
    accepted
}

proptest! {
    #[test]
    fn drop_commits_a_permutation(
        (count, columns, hovers) in gesture(),
        dragged in 0usize..16,
    ) {
        let mut flow = attached(count, columns);
        let dragged = TileId::new((dragged % count) as u64);
        prop_assert!(flow.drag_started(dragged).is_applied());

        let accepted = replay(&mut flow, dragged, &hovers);
        let dispatch = flow.drag_ended(dragged);
        prop_assert_eq!(dispatch.outcome, DragLogOutcome::Committed { steps: accepted });

        let cached: Vec<u64> = flow.cache().ids().map(TileId::get).collect();
        prop_assert_eq!(flow.items(), cached.as_slice());

        let mut sorted = flow.items().to_vec();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..count as u64).collect::<Vec<_>>());
        prop_assert!(flow.cache().tiles().iter().all(|t| t.offset.is_zero()));
    }

    #[test]
    fn cancel_and_reset_restore_everything(
        (count, columns, hovers) in gesture(),
        dragged in 0usize..16,
    ) {
        let mut flow = attached(count, columns);
        let cache = flow.cache().clone();
        let dragged = TileId::new((dragged % count) as u64);

        flow.drag_started(dragged);
        replay(&mut flow, dragged, &hovers);
        prop_assert!(flow.drag_cancelled(dragged).is_applied());

        let expected = (0..count as u64).collect::<Vec<_>>();
        prop_assert_eq!(flow.items(), expected.as_slice());
        prop_assert_eq!(flow.cache(), &cache);

        prop_assert!(!flow.reset());
        prop_assert_eq!(flow.cache(), &cache);
        prop_assert!(!flow.is_dragging());
    }
}
