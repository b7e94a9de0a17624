//! This module contains the kernel grouping an array's values into distinct
//! categories with their number of occurrences.
//!
//! Values are normalised through the Arrow row format (`arrow::row`), so one
//! code path handles every comparable type. Two values fall into the same group
//! iff their row encodings are byte-equal:
//! - all nulls form a single group;
//! - floats group by canonical bit pattern, so identical NaNs group together
//!   while `-0.0` and `+0.0` are separate groups;
//! - dictionary arrays group by their logical (decoded) value.
//!
//! Groups are emitted in order of first occurrence.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array, StructArray, UInt64Array};
use arrow::compute::take;
use arrow::datatypes::{DataType, Field, Fields};
use arrow::row::{RowConverter, SortField};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use crate::error::{ArrowListError, Result};

pub const VALUES_FIELD: &str = "values";
pub const COUNTS_FIELD: &str = "counts";

/// Returns a `{values, counts}` struct array with one row per distinct value.
pub fn value_counts(array: &ArrayRef) -> Result<StructArray> {
    if array.data_type().is_nested() {
        return Err(ArrowListError::TypeError(format!(
            "value_counts requires a hashable, comparable value type, got {}",
            array.data_type()
        )));
    }

    let converter = RowConverter::new(vec![SortField::new(array.data_type().clone())])?;
    let rows = converter.convert_columns(&[Arc::clone(array)])?;

    let mut groups = HashMap::with_capacity(rows.num_rows().min(1024));
    let mut first_seen: Vec<u64> = Vec::new();
    let mut counts: Vec<i64> = Vec::new();
    for i in 0..rows.num_rows() {
        match groups.entry(rows.row(i)) {
            Entry::Occupied(group) => counts[*group.get()] += 1,
            Entry::Vacant(slot) => {
                slot.insert(first_seen.len());
                first_seen.push(i as u64);
                counts.push(1);
            }
        }
    }

    log::trace!(
        "value_counts: {} rows grouped into {} distinct values",
        array.len(),
        counts.len()
    );

    let values = take(array.as_ref(), &UInt64Array::from(first_seen), None)?;
    let counts: ArrayRef = Arc::new(Int64Array::from(counts));
    Ok(StructArray::try_new(
        value_counts_fields(array.data_type()),
        vec![values, counts],
        None,
    )?)
}

/// The struct fields produced by [`value_counts`] for a given value type.
pub fn value_counts_fields(value_type: &DataType) -> Fields {
    Fields::from(vec![
        Field::new(VALUES_FIELD, value_type.clone(), true),
        Field::new(COUNTS_FIELD, DataType::Int64, false),
    ])
}
