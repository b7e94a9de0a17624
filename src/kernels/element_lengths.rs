//! This module contains the pure, stateless kernel for per-element lengths of a
//! list-alike array.
//!
//! The length of element `i` is `offsets[i + 1] - offsets[i]`, read straight
//! from the offsets. Validity is never consulted, so a null element and an
//! empty element both report `0`.

use arrow::array::{ArrowPrimitiveType, OffsetSizeTrait, PrimitiveArray};

/// Computes the element lengths described by `offsets`.
///
/// The output has `offsets.len() - 1` entries, has no nulls, and keeps the
/// native width of the offsets (`i32` offsets give an `Int32Array`).
pub fn element_lengths<T>(offsets: &[T::Native]) -> PrimitiveArray<T>
where
    T: ArrowPrimitiveType,
    T::Native: OffsetSizeTrait,
{
    let lengths: Vec<T::Native> = offsets.windows(2).map(|w| w[1] - w[0]).collect();
    PrimitiveArray::new(lengths.into(), None)
}
