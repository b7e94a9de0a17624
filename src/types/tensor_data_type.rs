//! This module defines the canonical, type-safe representation of the value
//! types a tensor produced from a list column can carry.

use crate::error::ArrowListError;
use arrow::datatypes::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The element type of a tensor built from an Arrow list column.
///
/// Only integer, floating point and binary leaves are tensor-compatible;
/// strings must be cast to binary first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TensorDataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    Binary,
}

impl TensorDataType {
    /// Converts an Arrow leaf `DataType` into a `TensorDataType`.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, ArrowListError> {
        match arrow_type {
            ArrowDataType::Int8 => Ok(Self::Int8),
            ArrowDataType::Int16 => Ok(Self::Int16),
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::UInt8 => Ok(Self::UInt8),
            ArrowDataType::UInt16 => Ok(Self::UInt16),
            ArrowDataType::UInt32 => Ok(Self::UInt32),
            ArrowDataType::UInt64 => Ok(Self::UInt64),
            ArrowDataType::Float16 => Ok(Self::Float16),
            ArrowDataType::Float32 => Ok(Self::Float32),
            ArrowDataType::Float64 => Ok(Self::Float64),
            ArrowDataType::Binary | ArrowDataType::LargeBinary => Ok(Self::Binary),
            dt => Err(ArrowListError::TypeError(format!(
                "Arrow type {} cannot be converted to a tensor value type",
                dt
            ))),
        }
    }

    /// Whether `arrow_type` can be the leaf of a tensor column.
    pub fn is_supported(arrow_type: &ArrowDataType) -> bool {
        Self::from_arrow_type(arrow_type).is_ok()
    }

    /// Returns `true` if the data type is a signed or unsigned integer.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float16 | Self::Float32 | Self::Float64)
    }
}

/// Provides the canonical string representation for a `TensorDataType`.
impl fmt::Display for TensorDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches the Arrow `DataType` debug names.
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_leaf_types() {
        assert_eq!(
            TensorDataType::from_arrow_type(&ArrowDataType::UInt16).unwrap(),
            TensorDataType::UInt16
        );
        assert_eq!(
            TensorDataType::from_arrow_type(&ArrowDataType::LargeBinary).unwrap(),
            TensorDataType::Binary
        );
        assert!(TensorDataType::Float32.is_float());
        assert!(TensorDataType::UInt64.is_integer());
        assert!(!TensorDataType::Binary.is_integer());
    }

    #[test]
    fn test_strings_and_booleans_are_not_tensor_types() {
        assert!(!TensorDataType::is_supported(&ArrowDataType::Utf8));
        assert!(!TensorDataType::is_supported(&ArrowDataType::Boolean));
    }
}
