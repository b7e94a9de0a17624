//! This module contains the kernel converting an arbitrarily nested list array
//! into COO (coordinate list) form.
//!
//! For an `N`-nested list array every leaf value gets `N + 1` coordinates: its
//! row, then its position inside each enclosing list down to its immediate
//! parent. The dense shape is the smallest bounding box containing every
//! coordinate.
//!
//! Levels are walked with an explicit loop rather than recursion. Each level
//! records, for every element it flattens into, the slot of its parent in the
//! previous level and its position inside that parent. The final pass composes
//! those per-level mappings bottom-up into interleaved coordinate tuples.

use crate::error::{ArrowListError, Result};
use crate::kernels::list_like::ListLike;

/// Coordinates and bounding shape of a nested list array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooParts {
    /// `(N + 1)` consecutive coordinates per leaf value, in flattening order.
    pub coords: Vec<i64>,
    /// Outer length, then the maximum list length observed at each level.
    pub dense_shape: Vec<i64>,
}

impl CooParts {
    /// Number of coordinates per leaf value (`N + 1`).
    pub fn rank(&self) -> usize {
        self.dense_shape.len()
    }

    /// Number of leaf values that received coordinates.
    pub fn num_values(&self) -> usize {
        self.coords.len() / self.rank().max(1)
    }
}

/// One flattened level: for each element reached at this level, the slot of
/// its parent in the previous level and its position inside that parent.
struct Level {
    parent_slots: Vec<usize>,
    positions: Vec<i64>,
}

/// Converts `list` (a `List`/`LargeList` view) into COO coordinates.
///
/// Nulls and empty lists contribute no coordinates at any level. Elements
/// stored under a null slot are unreachable and skipped as well.
pub fn coo_from_list(list: ListLike<'_>) -> Result<CooParts> {
    let outer_len = list.len();
    let mut dense_shape = vec![to_i64(outer_len)?];
    let mut levels: Vec<Level> = Vec::new();

    // Indices (into the current level's array) of the elements still reachable.
    let mut active: Vec<usize> = (0..outer_len).collect();
    let mut current = list;
    loop {
        let offsets = current.offsets();
        let mut next_active = Vec::with_capacity(offsets.span());
        let mut level = Level {
            parent_slots: Vec::with_capacity(offsets.span()),
            positions: Vec::with_capacity(offsets.span()),
        };
        let mut max_run = 0usize;

        for (slot, &element) in active.iter().enumerate() {
            if !current.is_valid(element) {
                continue;
            }
            let range = offsets.range(element);
            max_run = max_run.max(range.len());
            for (position, child) in range.enumerate() {
                next_active.push(child);
                level.parent_slots.push(slot);
                level.positions.push(position as i64);
            }
        }

        log::trace!(
            "coo: level {} flattened {} elements into {} (max run {})",
            levels.len(),
            active.len(),
            next_active.len(),
            max_run
        );
        dense_shape.push(to_i64(max_run)?);
        levels.push(level);

        let child = current.child().ok_or_else(|| {
            ArrowListError::TypeError(format!(
                "coo_from_list requires nested lists, found {}",
                current.as_array().data_type()
            ))
        })?;
        match ListLike::try_new_list(child.as_ref()) {
            Some(next) => {
                current = next;
                active = next_active;
            }
            None => break,
        }
    }

    Ok(CooParts {
        coords: compose_coordinates(&levels),
        dense_shape,
    })
}

/// Walks every leaf up through the recorded levels, writing its coordinates
/// innermost first into an interleaved `(N + 1)`-wide row.
fn compose_coordinates(levels: &[Level]) -> Vec<i64> {
    let Some(innermost) = levels.last() else {
        return Vec::new();
    };
    let width = levels.len() + 1;
    let num_leaves = innermost.positions.len();

    let mut coords = vec![0i64; num_leaves * width];
    for (leaf, row) in coords.chunks_exact_mut(width).enumerate() {
        let mut slot = leaf;
        for (depth, level) in levels.iter().enumerate().rev() {
            row[depth + 1] = level.positions[slot];
            slot = level.parent_slots[slot];
        }
        // The outermost active set is `0..outer_len`, so the slot is the row.
        row[0] = slot as i64;
    }
    coords
}

fn to_i64(value: usize) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| ArrowListError::Overflow(format!("{} does not fit an i64 coordinate", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int64Builder, LargeListBuilder, ListArray, ListBuilder};
    use arrow::datatypes::Int64Type;

    fn coo(array: &dyn Array) -> CooParts {
        coo_from_list(ListLike::try_new_list(array).unwrap()).unwrap()
    }

    #[test]
    fn test_one_level() {
        let list = ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
            Some(vec![Some(1), Some(2)]),
            Some(vec![]),
            Some(vec![Some(3)]),
            None,
        ]);
        let parts = coo(&list);
        assert_eq!(parts.coords, vec![0, 0, 0, 1, 2, 0]);
        assert_eq!(parts.dense_shape, vec![4, 2]);
        assert_eq!(parts.num_values(), 3);
    }

    #[test]
    fn test_two_levels_with_nulls_at_every_depth() {
        // [[[1], [2, 3]], None, [[4], None, []], [None]]
        let mut builder = ListBuilder::new(ListBuilder::new(Int64Builder::new()));
        builder.values().values().append_value(1);
        builder.values().append(true);
        builder.values().values().append_values(&[2, 3], &[true, true]);
        builder.values().append(true);
        builder.append(true);
        builder.append(false);
        builder.values().values().append_value(4);
        builder.values().append(true);
        builder.values().append(false);
        builder.values().append(true);
        builder.append(true);
        builder.values().append(false);
        builder.append(true);
        let list = builder.finish();

        let parts = coo(&list);
        assert_eq!(
            parts.coords,
            vec![
                0, 0, 0, //
                0, 1, 0, //
                0, 1, 1, //
                2, 0, 0,
            ]
        );
        assert_eq!(parts.dense_shape, vec![4, 3, 2]);
    }

    #[test]
    fn test_large_list_outer_level() {
        let mut builder = LargeListBuilder::new(Int64Builder::new());
        builder.append_value([Some(5), Some(6), Some(7)]);
        builder.append_value([Some(8)]);
        let list = builder.finish();

        let parts = coo(&list);
        assert_eq!(parts.coords, vec![0, 0, 0, 1, 0, 2, 1, 0]);
        assert_eq!(parts.dense_shape, vec![2, 3]);
    }

    #[test]
    fn test_sliced_input() {
        let list = ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
            Some(vec![Some(1), Some(2), Some(3)]),
            Some(vec![Some(4)]),
            Some(vec![Some(5), Some(6)]),
        ]);
        let sliced = list.slice(1, 2);
        let parts = coo(&sliced);
        assert_eq!(parts.coords, vec![0, 0, 1, 0, 1, 1]);
        assert_eq!(parts.dense_shape, vec![2, 2]);
    }

    #[test]
    fn test_empty_and_all_null() {
        let empty = ListArray::from_iter_primitive::<Int64Type, Vec<Option<i64>>, _>(Vec::new());
        let parts = coo(&empty);
        assert!(parts.coords.is_empty());
        assert_eq!(parts.dense_shape, vec![0, 0]);

        let all_null =
            ListArray::from_iter_primitive::<Int64Type, Vec<Option<i64>>, _>(vec![None, None]);
        let parts = coo(&all_null);
        assert!(parts.coords.is_empty());
        assert_eq!(parts.dense_shape, vec![2, 0]);
    }
}
