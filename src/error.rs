// In: src/error.rs

//! This module defines the single, unified error type for the tambak selective
//! decode engine. It uses the `thiserror` crate to provide ergonomic,
//! context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TambakError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("Unsupported data type for this operation: {0}")]
    UnsupportedType(String),

    /// The column's physical integer width cannot be decoded by the engine.
    /// Only 2, 4 and 8 byte signed integers are supported.
    #[error("Unsupported value size {0} bytes: expected 2, 4 or 8")]
    UnsupportedWidth(usize),

    #[error("Invalid row set: {0}")]
    InvalidRowSet(String),

    #[error("Null bitmap covers {actual} rows, but the batch has {expected}")]
    NullBitmapMismatch { expected: usize, actual: usize },

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error from the Serde JSON library, typically while loading a reader config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error

    // =========================================================================
    // === Low-Level Kernel Errors (raised by the decoding backends)
    // =========================================================================
    #[error("Buffer length mismatch: expected a multiple of {0}, got {1}")]
    BufferMismatch(usize, usize),

    #[error("Value stream exhausted: {0}")]
    TruncatedStream(String),

    #[error("RLE decoding error: {0}")]
    RleDecodeError(String),

    #[error("LEB128 decoding error: {0}")]
    Leb128DecodeError(String),

    #[error("Dictionary encoding/decoding failed: {0}")]
    DictionaryError(String),
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for TambakError {
    fn from(err: bytemuck::PodCastError) -> Self {
        TambakError::PodCast(err.to_string())
    }
}
