#![forbid(unsafe_code)]

//! In-place list reordering.

/// Move the element at `from` to `to`, shifting everything in between by one.
///
/// Both indices are clamped to the valid range, so a stale index moves the
/// element to the nearest end instead of panicking. Empty slices are left
/// untouched.
pub fn move_item_in_array<T>(items: &mut [T], from: usize, to: usize) {
    let Some(last) = items.len().checked_sub(1) else {
        return;
    };
    let from = from.min(last);
    let to = to.min(last);
    if from < to {
        items[from..=to].rotate_left(1);
    } else if from > to {
        items[to..=from].rotate_right(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_move_shifts_left() {
        let mut v = vec![0, 1, 2, 3, 4, 5, 6];
        move_item_in_array(&mut v, 0, 5);
        assert_eq!(v, vec![1, 2, 3, 4, 5, 0, 6]);
    }

    #[test]
    fn backward_move_shifts_right() {
        let mut v = vec![0, 1, 2, 3, 4, 5, 6];
        move_item_in_array(&mut v, 5, 0);
        assert_eq!(v, vec![5, 0, 1, 2, 3, 4, 6]);
    }

    #[test]
    fn same_index_is_noop() {
        let mut v = vec!['a', 'b', 'c'];
        move_item_in_array(&mut v, 1, 1);
        assert_eq!(v, vec!['a', 'b', 'c']);
    }

    #[test]
    fn out_of_range_indices_clamp() {
        let mut v = vec![0, 1, 2, 3];
        move_item_in_array(&mut v, 9, 0);
        assert_eq!(v, vec![3, 0, 1, 2]);

        let mut v = vec![0, 1, 2, 3];
        move_item_in_array(&mut v, 1, 40);
        assert_eq!(v, vec![0, 2, 3, 1]);
    }

    #[test]
    fn empty_slice_is_untouched() {
        let mut v: Vec<u8> = Vec::new();
        move_item_in_array(&mut v, 0, 3);
        assert!(v.is_empty());
    }
}
