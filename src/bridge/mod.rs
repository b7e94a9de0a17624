// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the sole public-facing API of the arrowlist library. It accepts
// dynamically typed Arrow arrays, resolves them into the concrete variants the
// pure `kernels` operate on, and wraps every result back into an `ArrayRef`.
//
// Data Flow:
//
//   1. [Caller]                      -> `&dyn Array` (any list-alike / flat array)
//         |
//         `-> calls ->
//
//   2. [Stateless API]               -> a. resolves `ListLike` / offset width (TypeError otherwise)
//         |                             b. validates preconditions (InvalidArgument otherwise)
//         |
//         `-> calls ->
//
//   3. [Kernels (generic over O)]    -> pure computation on borrowed offsets/values
//         |
//         `-> returns a freshly built Arrow array, owned by the caller
//
// Layer 1 (structural primitives): lengths, null bitmap, binary byte size.
// Layer 2 (derived operations):    parent indices, value counts, make list,
//                                  COO conversion, null list filling.
//
// ====================================================================================
pub mod stateless_api;

// --- Low-Level Stateless API ---
pub use stateless_api::{
    coo_from_list_array, fill_null_lists, get_array_null_bitmap_as_byte_array,
    get_binary_array_total_byte_size, get_element_lengths, get_flattened_array_parent_indices,
    make_list_array_from_parent_indices_and_values, value_counts,
};

#[cfg(test)]
mod tests;
