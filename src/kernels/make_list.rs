//! This module contains the kernel rebuilding a list array from a flat values
//! array and the (sorted) parent index of every value.
//!
//! It is the structural inverse of `parent_indices`. Parents that own no value
//! come out as null, not as empty lists.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanBufferBuilder, ListArray};
use arrow::buffer::{NullBuffer, OffsetBuffer, ScalarBuffer};
use arrow::datatypes::Field;

use crate::error::{ArrowListError, Result};

/// Builds a `List` array of length `num_parents` whose `i`-th element holds the
/// values whose parent index is `i`.
///
/// Preconditions (checked before any work is done):
/// - `parent_indices.len() == values.len()`;
/// - every index is in `[0, num_parents)`;
/// - indices are sorted non-decreasing.
///
/// Fails with `Overflow` if `num_parents` or the number of values does not fit
/// 32-bit list offsets.
pub fn make_list_from_parent_indices(
    num_parents: usize,
    parent_indices: &[i64],
    values: ArrayRef,
) -> Result<ListArray> {
    validate_parent_indices(num_parents, parent_indices, values.len())?;
    if num_parents > i32::MAX as usize {
        return Err(ArrowListError::Overflow(format!(
            "{} parents do not fit a 32-bit list array",
            num_parents
        )));
    }
    if values.len() > i32::MAX as usize {
        return Err(ArrowListError::Overflow(format!(
            "{} values do not fit 32-bit list offsets",
            values.len()
        )));
    }

    let mut offsets: Vec<i32> = Vec::with_capacity(num_parents + 1);
    offsets.push(0);
    let mut validity = BooleanBufferBuilder::new(num_parents);

    // `offsets.len() - 1` parents are closed; close every parent before the
    // current one. A parent is valid iff it received at least one value.
    let mut close_parents_until = |offsets: &mut Vec<i32>, parent: usize, end: i32| {
        while offsets.len() <= parent {
            let start = offsets[offsets.len() - 1];
            offsets.push(end);
            validity.append(end > start);
        }
    };

    for (position, &parent) in parent_indices.iter().enumerate() {
        close_parents_until(&mut offsets, parent as usize, position as i32);
    }
    close_parents_until(&mut offsets, num_parents, values.len() as i32);

    let nulls = NullBuffer::new(validity.finish());
    let nulls = (nulls.null_count() > 0).then_some(nulls);
    let field = Arc::new(Field::new("item", values.data_type().clone(), true));

    Ok(ListArray::try_new(
        field,
        OffsetBuffer::new(ScalarBuffer::from(offsets)),
        values,
        nulls,
    )?)
}

fn validate_parent_indices(
    num_parents: usize,
    parent_indices: &[i64],
    num_values: usize,
) -> Result<()> {
    if parent_indices.len() != num_values {
        return Err(ArrowListError::InvalidArgument(format!(
            "values_array must have the same length as parent_indices: {} vs {}",
            num_values,
            parent_indices.len()
        )));
    }

    let mut previous = 0i64;
    for (position, &parent) in parent_indices.iter().enumerate() {
        if parent < 0 || parent as u64 >= num_parents as u64 {
            return Err(ArrowListError::InvalidArgument(format!(
                "parent_indices[{}] = {} is out of range [0, {})",
                position, parent, num_parents
            )));
        }
        if parent < previous {
            return Err(ArrowListError::InvalidArgument(format!(
                "parent_indices must be sorted: parent_indices[{}] = {} follows {}",
                position, parent, previous
            )));
        }
        previous = parent;
    }
    Ok(())
}
