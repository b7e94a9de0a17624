//! This module contains the kernel replacing every null element of a list
//! array with a copy of a fill list.
//!
//! The values array of the result interleaves contiguous runs of the input's
//! values with copies of the fill values; only the offsets and validity are
//! rebuilt. `MutableArrayData` copies each contiguous valid run in one extend.

use std::ops::Range;
use std::sync::Arc;

use arrow::array::{make_array, Array, GenericListArray, MutableArrayData, OffsetSizeTrait};
use arrow::buffer::{OffsetBuffer, ScalarBuffer};
use arrow::datatypes::ArrowNativeType;

use crate::error::{ArrowListError, Result};

const INPUT_VALUES: usize = 0;
const FILL_VALUES: usize = 1;

/// Returns `list` with every null element replaced by all of `fill_with`'s values.
///
/// `fill_with` must have the list's value type. An input without nulls is
/// returned as-is, sharing its buffers.
pub fn fill_null_lists<O: OffsetSizeTrait>(
    list: &GenericListArray<O>,
    fill_with: &dyn Array,
) -> Result<GenericListArray<O>> {
    let field = match list.data_type() {
        arrow::datatypes::DataType::List(field) | arrow::datatypes::DataType::LargeList(field) => {
            Arc::clone(field)
        }
        other => {
            return Err(ArrowListError::TypeError(format!(
                "fill_null_lists requires a list array, got {}",
                other
            )))
        }
    };
    if fill_with.data_type() != field.data_type() {
        return Err(ArrowListError::TypeError(format!(
            "fill_with must have the list value type {}, got {}",
            field.data_type(),
            fill_with.data_type()
        )));
    }

    let Some(nulls) = list.nulls().filter(|nulls| nulls.null_count() > 0) else {
        return Ok(list.clone());
    };

    let input_offsets = list.value_offsets();
    let fill_len = fill_with.len();
    let retained = input_offsets[input_offsets.len() - 1].as_usize() - input_offsets[0].as_usize();
    let capacity = retained + nulls.null_count() * fill_len;

    let values_data = list.values().to_data();
    let fill_data = fill_with.to_data();
    let mut values = MutableArrayData::new(vec![&values_data, &fill_data], false, capacity);

    let mut offsets: Vec<O> = Vec::with_capacity(list.len() + 1);
    offsets.push(O::usize_as(0));
    let mut written = 0usize;
    let mut pending: Option<Range<usize>> = None;

    for i in 0..list.len() {
        let (start, end) = (input_offsets[i].as_usize(), input_offsets[i + 1].as_usize());
        if nulls.is_valid(i) {
            pending = match pending {
                Some(run) if run.end == start => Some(run.start..end),
                Some(run) => {
                    values.extend(INPUT_VALUES, run.start, run.end);
                    Some(start..end)
                }
                None => Some(start..end),
            };
            written += end - start;
        } else {
            if let Some(run) = pending.take() {
                values.extend(INPUT_VALUES, run.start, run.end);
            }
            values.extend(FILL_VALUES, 0, fill_len);
            written += fill_len;
        }
        offsets.push(O::from_usize(written).ok_or_else(|| {
            ArrowListError::Overflow(format!(
                "filled values length {} does not fit the list offset type",
                written
            ))
        })?);
    }
    if let Some(run) = pending {
        values.extend(INPUT_VALUES, run.start, run.end);
    }

    Ok(GenericListArray::<O>::try_new(
        field,
        OffsetBuffer::new(ScalarBuffer::from(offsets)),
        make_array(values.freeze()),
        None,
    )?)
}
