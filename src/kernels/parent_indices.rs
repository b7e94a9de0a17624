//! This module contains the pure, stateless kernel that maps every flattened
//! child element back to the list element that owns it.
//!
//! It is the structural inverse of `make_list`: for offsets `o`, every child
//! position in `[o[i], o[i + 1])` maps to `i`.

use arrow::array::{ArrowPrimitiveType, OffsetSizeTrait, PrimitiveArray};
use arrow::datatypes::ArrowNativeType;

use crate::error::{ArrowListError, Result};

/// Computes the parent index of every child position spanned by `offsets`.
///
/// The output length equals `offsets.last() - offsets.first()`, it has no
/// nulls, and it is non-decreasing. Elements with no children never appear.
pub fn parent_indices<T>(offsets: &[T::Native]) -> Result<PrimitiveArray<T>>
where
    T: ArrowPrimitiveType,
    T::Native: OffsetSizeTrait,
{
    let total = match (offsets.first(), offsets.last()) {
        (Some(&first), Some(&last)) => (last - first).as_usize(),
        _ => 0,
    };

    let mut indices: Vec<T::Native> = Vec::with_capacity(total);
    for (parent, window) in offsets.windows(2).enumerate() {
        let run = (window[1] - window[0]).as_usize();
        if run == 0 {
            continue;
        }
        let parent = T::Native::from_usize(parent).ok_or_else(|| {
            ArrowListError::Overflow(format!(
                "parent index {} does not fit the {} output type",
                parent,
                T::DATA_TYPE
            ))
        })?;
        indices.extend(std::iter::repeat(parent).take(run));
    }

    Ok(PrimitiveArray::new(indices.into(), None))
}
