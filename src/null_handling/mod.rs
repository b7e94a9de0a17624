//! This module serves as the public API for all null-handling logic within the
//! arrowlist core.
//!
//! Arrow keeps validity apart from values as a bit-packed buffer. The helpers
//! here convert that buffer into forms numeric consumers can read directly.
//!
//! This module is PURE RUST and is completely decoupled from the bridge layer.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Kernels converting Arrow validity bitmaps into byte masks.
pub mod bitmap;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use bitmap::{as_bool_slice, null_bitmap_as_bytes};

//==================================================================================
// 3. Unit Tests (Module-level integration tests)
//==================================================================================
