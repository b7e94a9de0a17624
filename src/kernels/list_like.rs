//! This module contains the tagged-variant view over every "list-alike" Arrow
//! array the kernels accept.
//!
//! Binary and string arrays are treated as lists of bytes: they share the same
//! offsets/validity layout as `List`/`LargeList`, they simply have no child
//! array. Every kernel works on the borrowed offsets slice exposed here, so the
//! type dispatch happens exactly once, at the bridge boundary.

use std::ops::Range;

use arrow::array::{
    Array, ArrayRef, AsArray, BinaryArray, LargeBinaryArray, LargeListArray, LargeStringArray,
    ListArray, StringArray,
};
use arrow::buffer::NullBuffer;
use arrow::datatypes::DataType;

//==================================================================================
// 1. The List-Alike Variant
//==================================================================================

/// A borrowed, type-resolved view of a list-alike array.
#[derive(Debug, Clone, Copy)]
pub enum ListLike<'a> {
    List(&'a ListArray),
    LargeList(&'a LargeListArray),
    Binary(&'a BinaryArray),
    LargeBinary(&'a LargeBinaryArray),
    Utf8(&'a StringArray),
    LargeUtf8(&'a LargeStringArray),
}

/// The offsets of a list-alike array, at their native width.
///
/// Offsets are relative to the array's slice: `offsets.len() == array.len() + 1`.
#[derive(Debug, Clone, Copy)]
pub enum Offsets<'a> {
    Small(&'a [i32]),
    Large(&'a [i64]),
}

impl<'a> ListLike<'a> {
    /// Resolves `array` into a list-alike view, or `None` if its logical type
    /// has no offsets.
    pub fn try_new(array: &'a dyn Array) -> Option<Self> {
        match array.data_type() {
            DataType::List(_) => array.as_list_opt::<i32>().map(Self::List),
            DataType::LargeList(_) => array.as_list_opt::<i64>().map(Self::LargeList),
            DataType::Binary => array.as_binary_opt::<i32>().map(Self::Binary),
            DataType::LargeBinary => array.as_binary_opt::<i64>().map(Self::LargeBinary),
            DataType::Utf8 => array.as_string_opt::<i32>().map(Self::Utf8),
            DataType::LargeUtf8 => array.as_string_opt::<i64>().map(Self::LargeUtf8),
            _ => None,
        }
    }

    /// Resolves `array` into a view of a real list (`List` or `LargeList`).
    pub fn try_new_list(array: &'a dyn Array) -> Option<Self> {
        Self::try_new(array).filter(|list_like| list_like.child().is_some())
    }

    pub fn len(&self) -> usize {
        self.as_array().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_array(&self) -> &'a dyn Array {
        match *self {
            Self::List(a) => a,
            Self::LargeList(a) => a,
            Self::Binary(a) => a,
            Self::LargeBinary(a) => a,
            Self::Utf8(a) => a,
            Self::LargeUtf8(a) => a,
        }
    }

    pub fn nulls(&self) -> Option<&'a NullBuffer> {
        self.as_array().nulls()
    }

    pub fn is_valid(&self, i: usize) -> bool {
        self.nulls().map_or(true, |nulls| nulls.is_valid(i))
    }

    pub fn offsets(&self) -> Offsets<'a> {
        match *self {
            Self::List(a) => Offsets::Small(a.value_offsets()),
            Self::LargeList(a) => Offsets::Large(a.value_offsets()),
            Self::Binary(a) => Offsets::Small(a.value_offsets()),
            Self::LargeBinary(a) => Offsets::Large(a.value_offsets()),
            Self::Utf8(a) => Offsets::Small(a.value_offsets()),
            Self::LargeUtf8(a) => Offsets::Large(a.value_offsets()),
        }
    }

    /// The values array of a real list; `None` for binary and string arrays.
    pub fn child(&self) -> Option<&'a ArrayRef> {
        match *self {
            Self::List(a) => Some(a.values()),
            Self::LargeList(a) => Some(a.values()),
            _ => None,
        }
    }

    pub fn is_binary_like(&self) -> bool {
        self.child().is_none()
    }
}

impl<'a> Offsets<'a> {
    /// The range of child positions owned by element `i`.
    pub fn range(&self, i: usize) -> Range<usize> {
        match *self {
            Self::Small(o) => o[i] as usize..o[i + 1] as usize,
            Self::Large(o) => o[i] as usize..o[i + 1] as usize,
        }
    }

    /// Number of child positions spanned by the whole slice.
    pub fn span(&self) -> usize {
        match *self {
            Self::Small(o) => span_of(o),
            Self::Large(o) => span_of(o),
        }
    }
}

fn span_of<O: Copy + Into<i64>>(offsets: &[O]) -> usize {
    match (offsets.first(), offsets.last()) {
        (Some(&first), Some(&last)) => (last.into() - first.into()) as usize,
        _ => 0,
    }
}

//==================================================================================
// 2. Type Introspection
//==================================================================================

/// Returns how many `List`/`LargeList` levels wrap `data_type` and the
/// innermost (non-list) type.
///
/// `Int64` is depth 0, `List<Int64>` depth 1, `List<LargeList<Utf8>>` depth 2.
pub fn get_nest_depth_and_value_type(data_type: &DataType) -> (usize, DataType) {
    let mut depth = 0;
    let mut current = data_type;
    while let DataType::List(field) | DataType::LargeList(field) = current {
        depth += 1;
        current = field.data_type();
    }
    (depth, current.clone())
}

/// Whether `data_type` may sit at the bottom of a nested list: a primitive,
/// boolean or binary/string type.
pub fn is_leaf_type(data_type: &DataType) -> bool {
    data_type.is_primitive()
        || matches!(
            data_type,
            DataType::Boolean
                | DataType::Binary
                | DataType::LargeBinary
                | DataType::Utf8
                | DataType::LargeUtf8
        )
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
