//! This module is the public API for the pure structural kernels of arrowlist.
//!
//! Each kernel is a stateless function over borrowed Arrow data. The kernels
//! are generic over the offset width wherever offsets are involved; resolving
//! a `&dyn Array` into the right concrete type is the job of the `bridge`
//! layer, which dispatches through [`list_like::ListLike`].
//!
//! Layer 1 (single pass over one array's structure):
//! - `element_lengths`, `binary_size` (plus `null_handling::bitmap`).
//!
//! Layer 2 (derived from the Layer 1 concepts):
//! - `parent_indices`, `value_counts`, `make_list`, `coo`, `fill_null_lists`.

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod binary_size;
pub mod coo;
pub mod element_lengths;
pub mod fill_null_lists;
pub mod list_like;
pub mod make_list;
pub mod parent_indices;
pub mod value_counts;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use coo::CooParts;
pub use list_like::{get_nest_depth_and_value_type, ListLike, Offsets};
