// In: src/error.rs

//! This module defines the single, unified error type for the entire arrowlist library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArrowListError {
    // =========================================================================
    // === Semantic Errors (raised by the kernels' precondition checks)
    // =========================================================================
    /// The logical type of an input does not match what the operation requires.
    #[error("Type error: {0}")]
    TypeError(String),

    /// The input is well-typed but violates a documented precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A size or offset does not fit the representable range.
    #[error("Overflow: {0}")]
    Overflow(String),

    #[error("Invalid tensor adapter configuration: {0}")]
    Config(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error from the Serde JSON library, typically while parsing a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error from a checked byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl: CheckedCastError doesn't impl Error
}

pub type Result<T> = std::result::Result<T, ArrowListError>;

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::checked::CheckedCastError> for ArrowListError {
    fn from(err: bytemuck::checked::CheckedCastError) -> Self {
        ArrowListError::PodCast(format!("{:?}", err))
    }
}
