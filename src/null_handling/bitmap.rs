// --- IN: src/null_handling/bitmap.rs ---

//! This module contains pure, stateless kernels for exposing an array's
//! validity as plain bytes.
//!
//! Arrow stores validity bit-packed with `1 = valid`. Numeric consumers want the
//! opposite: one byte per element with `1 = null`, so the buffer can be read as
//! a boolean mask without unpacking.

use arrow::array::{Array, UInt8Array};

use crate::error::Result;

/// Builds a `UInt8Array` of `array.len()` bytes where byte `i` is `1` iff
/// element `i` is null.
///
/// The array's *logical* nulls are used, so a `Null`-typed array (which has no
/// validity buffer) reports every position as null.
pub fn null_bitmap_as_bytes(array: &dyn Array) -> UInt8Array {
    match array.logical_nulls() {
        None => UInt8Array::from(vec![0u8; array.len()]),
        Some(nulls) => {
            let bytes: Vec<u8> = nulls.iter().map(|valid| u8::from(!valid)).collect();
            UInt8Array::from(bytes)
        }
    }
}

/// Reinterprets a byte mask produced by [`null_bitmap_as_bytes`] as `&[bool]`
/// without copying.
///
/// Every byte must be `0` or `1`; any other pattern is rejected.
pub fn as_bool_slice(mask: &UInt8Array) -> Result<&[bool]> {
    let bytes: &[u8] = mask.values();
    Ok(bytemuck::checked::try_cast_slice::<u8, bool>(bytes)?)
}
