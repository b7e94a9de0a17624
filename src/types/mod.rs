//! This module defines the strongly-typed data representations shared by the
//! tensor adapter and its configuration.
//!
//! It currently holds `TensorDataType`, the closed set of leaf value types a
//! list column must have to be converted into a tensor.

pub mod tensor_data_type;

// Re-export the main type(s) for easier access.
pub use tensor_data_type::TensorDataType;
