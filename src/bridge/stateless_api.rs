// In: src/bridge/stateless_api.rs

//! The stateless, `&dyn Array`-in / `ArrayRef`-out operations of arrowlist.
//!
//! Every function here (1) resolves the dynamic Arrow type into the concrete
//! variant a kernel needs, failing with `TypeError` if it cannot, (2) checks
//! the remaining preconditions, and (3) calls the pure kernel. No function
//! returns partial output; inputs are never modified.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Int64Array};
use arrow::datatypes::{DataType, Int32Type, Int64Type};

use crate::error::{ArrowListError, Result};
use crate::kernels::list_like::{get_nest_depth_and_value_type, is_leaf_type};
use crate::kernels::{
    binary_size, coo, element_lengths, fill_null_lists as fill_kernel, make_list, parent_indices,
    value_counts as value_counts_kernel, ListLike, Offsets,
};
use crate::null_handling::bitmap;

fn resolve_list_like<'a>(array: &'a dyn Array, operation: &str) -> Result<ListLike<'a>> {
    ListLike::try_new(array).ok_or_else(|| {
        ArrowListError::TypeError(format!(
            "{} expected a list-alike array (list, binary or string), got {}",
            operation,
            array.data_type()
        ))
    })
}

//==================================================================================
// 1. Structural Primitives
//==================================================================================

/// Gets the length of every element of a list-alike array (lists, binary and
/// string arrays).
///
/// Null and empty elements both have length 0 and the result has no nulls:
/// `[[1,2,3], [], None, [4,5]] => [3, 0, 0, 2]`. The result is `Int32` for
/// 32-bit offsets and `Int64` for 64-bit offsets.
pub fn get_element_lengths(array: &dyn Array) -> Result<ArrayRef> {
    let list_like = resolve_list_like(array, "get_element_lengths")?;
    log::debug!(
        "get_element_lengths: {} elements of type {}",
        array.len(),
        array.data_type()
    );
    Ok(match list_like.offsets() {
        Offsets::Small(offsets) => Arc::new(element_lengths::element_lengths::<Int32Type>(offsets)),
        Offsets::Large(offsets) => Arc::new(element_lengths::element_lengths::<Int64Type>(offsets)),
    })
}

/// Maps each element of the flattened `array` to the index of the list it
/// came from: `[[1,2,3], [], None, [4,5]] => [0, 0, 0, 3, 3]`.
pub fn get_flattened_array_parent_indices(array: &dyn Array) -> Result<ArrayRef> {
    let list_like = resolve_list_like(array, "get_flattened_array_parent_indices")?;
    log::debug!(
        "get_flattened_array_parent_indices: {} elements spanning {} children",
        array.len(),
        list_like.offsets().span()
    );
    Ok(match list_like.offsets() {
        Offsets::Small(offsets) => Arc::new(parent_indices::parent_indices::<Int32Type>(offsets)?),
        Offsets::Large(offsets) => Arc::new(parent_indices::parent_indices::<Int64Type>(offsets)?),
    })
}

/// Makes a `UInt8` array of the same length as `array` where element `i` is
/// `1` iff `array[i]` is null. See [`bitmap::as_bool_slice`] for a zero-copy
/// boolean view of the result.
pub fn get_array_null_bitmap_as_byte_array(array: &dyn Array) -> Result<ArrayRef> {
    log::debug!(
        "get_array_null_bitmap_as_byte_array: {} elements, {} nulls",
        array.len(),
        array.null_count()
    );
    Ok(Arc::new(bitmap::null_bitmap_as_bytes(array)))
}

/// Returns the total byte size of a binary or string array, i.e. the length of
/// the concatenation of all its (non-null) values.
pub fn get_binary_array_total_byte_size(array: &dyn Array) -> Result<u64> {
    let list_like = ListLike::try_new(array)
        .filter(ListLike::is_binary_like)
        .ok_or_else(|| {
            ArrowListError::TypeError(format!(
                "get_binary_array_total_byte_size expected a binary or string array, got {}",
                array.data_type()
            ))
        })?;
    match list_like.offsets() {
        Offsets::Small(offsets) => binary_size::total_byte_size(offsets, list_like.nulls()),
        Offsets::Large(offsets) => binary_size::total_byte_size(offsets, list_like.nulls()),
    }
}

//==================================================================================
// 2. Derived Operations
//==================================================================================

/// Counts the occurrences of each distinct value of `array`.
///
/// Returns a struct array `<values, counts>` with one row per distinct value,
/// null included as its own category. Values appear in order of first
/// occurrence.
pub fn value_counts(array: &ArrayRef) -> Result<ArrayRef> {
    log::debug!(
        "value_counts: {} elements of type {}",
        array.len(),
        array.data_type()
    );
    Ok(Arc::new(value_counts_kernel::value_counts(array)?))
}

/// Makes a list array from parent indices and values.
///
/// With `num_parents = 6`, `parent_indices = [0, 1, 1, 3, 3]` and
/// `values_array = [0, 1, 2, 3, 4]` the result is
/// `[[0], [1, 2], None, [3, 4], None, None]`.
///
/// `parent_indices` must be a null-free `Int64` array sorted in increasing
/// order with every index below `num_parents`; `values_array` must have the
/// same length as `parent_indices`.
pub fn make_list_array_from_parent_indices_and_values(
    num_parents: usize,
    parent_indices: &dyn Array,
    values_array: ArrayRef,
) -> Result<ArrayRef> {
    let indices: &Int64Array = parent_indices
        .as_primitive_opt::<Int64Type>()
        .ok_or_else(|| {
            ArrowListError::TypeError(format!(
                "parent_indices must be an Int64 array, got {}",
                parent_indices.data_type()
            ))
        })?;
    if indices.null_count() > 0 {
        return Err(ArrowListError::InvalidArgument(format!(
            "parent_indices must not contain nulls, found {}",
            indices.null_count()
        )));
    }
    log::debug!(
        "make_list_array_from_parent_indices_and_values: {} parents, {} values",
        num_parents,
        values_array.len()
    );
    let list = make_list::make_list_from_parent_indices(num_parents, indices.values(), values_array)?;
    Ok(Arc::new(list))
}

/// Converts a (possibly nested) list array into a COO sparse representation.
///
/// Returns `(coo_array, dense_shape_array)`, both `Int64`. For an `N`-nested
/// list array each value gets `N + 1` coordinates in `coo_array`;
/// `dense_shape_array` holds the size of the bounding box. Nulls and empty
/// lists are not distinguished. For `[[1, 2], [], [3], None]`:
/// `coo_array = [0, 0,  0, 1,  2, 0]`, `dense_shape_array = [4, 2]`.
pub fn coo_from_list_array(list_array: &dyn Array) -> Result<(ArrayRef, ArrayRef)> {
    let (depth, leaf_type) = get_nest_depth_and_value_type(list_array.data_type());
    if depth == 0 || !is_leaf_type(&leaf_type) {
        return Err(ArrowListError::TypeError(format!(
            "coo_from_list_array expected nested lists of a primitive or binary type, got {}",
            list_array.data_type()
        )));
    }
    let list = ListLike::try_new_list(list_array).ok_or_else(|| {
        ArrowListError::TypeError(format!(
            "coo_from_list_array could not read {} as a list array",
            list_array.data_type()
        ))
    })?;
    log::debug!(
        "coo_from_list_array: {} rows, nest depth {}, leaf type {}",
        list_array.len(),
        depth,
        leaf_type
    );

    let parts = coo::coo_from_list(list)?;
    Ok((
        Arc::new(Int64Array::from(parts.coords)),
        Arc::new(Int64Array::from(parts.dense_shape)),
    ))
}

/// Fills the null elements of `list_array` with the values of `fill_with`,
/// whose type must equal the list's value type.
pub fn fill_null_lists(list_array: &dyn Array, fill_with: &dyn Array) -> Result<ArrayRef> {
    log::debug!(
        "fill_null_lists: {} elements, {} nulls, fill length {}",
        list_array.len(),
        list_array.null_count(),
        fill_with.len()
    );
    match list_array.data_type() {
        DataType::List(_) => Ok(Arc::new(fill_kernel::fill_null_lists(
            list_array.as_list::<i32>(),
            fill_with,
        )?)),
        DataType::LargeList(_) => Ok(Arc::new(fill_kernel::fill_null_lists(
            list_array.as_list::<i64>(),
            fill_with,
        )?)),
        other => Err(ArrowListError::TypeError(format!(
            "fill_null_lists expected a list array, got {}",
            other
        ))),
    }
}
