//! This module collects the streaming decode kernels that turn encoded stripe
//! bytes back into integer values.
//!
//! Unlike whole-buffer decoders, every kernel here is a cursor over its input:
//! it hands out one value at a time and can skip forward without producing
//! the skipped values. That is what lets a selective read pay only for the
//! rows it was asked for.
//!
//! Value streams carry non-null values only; a null row consumes nothing.

use serde::{Deserialize, Serialize};

use crate::error::TambakError;

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Variable-length integers (RLE run lengths).
pub mod leb128;

/// Fixed-width, little-endian values.
pub mod plain;

/// `(value, run_length)` pairs.
pub mod rle;

/// Dictionary of distinct values plus a stream of `u32` indices.
pub mod dictionary;

pub use dictionary::DictionaryDecoder;
pub use plain::PlainDecoder;
pub use rle::RleDecoder;

//==================================================================================
// 2. Shared Contract
//==================================================================================

/// The physical encoding of a column's value stream.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ColumnEncoding {
    /// **Default:** values stored one after another at their physical width.
    #[default]
    Direct,
    Rle,
    Dictionary,
}

/// A forward-only cursor over the non-null values of a column.
pub trait ValueStream<T> {
    /// Decodes the next value.
    fn next_value(&mut self) -> Result<T, TambakError>;

    /// Advances past `count` values without producing them.
    fn skip(&mut self, count: usize) -> Result<(), TambakError>;
}
