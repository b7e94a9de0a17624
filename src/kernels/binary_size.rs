//! This module contains the kernel summing the byte content of a binary or
//! string array.

use arrow::array::OffsetSizeTrait;
use arrow::buffer::NullBuffer;
use arrow::datatypes::ArrowNativeType;

use crate::error::{ArrowListError, Result};

/// Sums the byte lengths of every valid element described by `offsets`.
///
/// Null elements contribute `0` even if their offset range is not empty. The
/// total is accumulated in a `u64` with checked arithmetic.
pub fn total_byte_size<O: OffsetSizeTrait>(
    offsets: &[O],
    nulls: Option<&NullBuffer>,
) -> Result<u64> {
    let lengths = offsets.windows(2).map(|w| (w[1] - w[0]).as_usize() as u64);

    let mut total: u64 = 0;
    match nulls.filter(|nulls| nulls.null_count() > 0) {
        None => {
            for length in lengths {
                total = checked_add(total, length)?;
            }
        }
        Some(nulls) => {
            for (length, valid) in lengths.zip(nulls.iter()) {
                if valid {
                    total = checked_add(total, length)?;
                }
            }
        }
    }
    Ok(total)
}

fn checked_add(total: u64, length: u64) -> Result<u64> {
    total.checked_add(length).ok_or_else(|| {
        ArrowListError::Overflow(format!(
            "total byte size exceeds u64::MAX (accumulated {} + {})",
            total, length
        ))
    })
}
