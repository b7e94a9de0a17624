//! This file is the root of the `arrowlist` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`bridge`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the stateless list-array operations, which are the main
//!     entry point for callers.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod observability;

pub mod bridge;
pub mod config;
pub mod error;
pub mod kernels;
pub mod null_handling;
pub mod tensor;
pub mod types;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use bridge::{
    coo_from_list_array, fill_null_lists, get_array_null_bitmap_as_byte_array,
    get_binary_array_total_byte_size, get_element_lengths, get_flattened_array_parent_indices,
    make_list_array_from_parent_indices_and_values, value_counts,
};
pub use config::TensorAdapterConfig;
pub use error::{ArrowListError, Result};
pub use observability::enable_verbose_logging;
pub use tensor::{Tensor, TensorAdapter, TypeSpec};
