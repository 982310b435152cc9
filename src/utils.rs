//! This module provides a set of shared, low-level utility functions used by
//! the decoding kernels.
//!
//! Stripe buffers carry no alignment guarantee, so typed reads go through
//! `bytemuck`'s unaligned helpers rather than slice casts. All fixed-width
//! values on disk are little-endian.

use num_traits::PrimInt;

use crate::error::TambakError;

/// Decodes one little-endian `T` from exactly `size_of::<T>()` bytes.
#[inline]
pub fn decode_le<T: bytemuck::Pod + PrimInt>(bytes: &[u8]) -> T {
    T::from_le(bytemuck::pod_read_unaligned(bytes))
}

/// Reads the `index`-th fixed-width element of type `T` from an unaligned byte
/// buffer.
///
/// # Errors
/// Returns `TambakError::TruncatedStream` if the element lies past the end of
/// `bytes`.
#[inline]
pub fn read_unaligned<T: bytemuck::Pod + PrimInt>(
    bytes: &[u8],
    index: usize,
) -> Result<T, TambakError> {
    let size = std::mem::size_of::<T>();
    let start = index * size;
    bytes
        .get(start..start + size)
        .map(decode_le::<T>)
        .ok_or_else(|| {
            TambakError::TruncatedStream(format!(
                "element {} of {} bytes lies past buffer end ({} bytes)",
                index,
                size,
                bytes.len()
            ))
        })
}

/// Converts a typed slice into a little-endian byte vector.
pub fn typed_slice_to_bytes<T: bytemuck::Pod + PrimInt>(data: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(std::mem::size_of_val(data));
    for value in data {
        out.extend_from_slice(bytemuck::bytes_of(&value.to_le()));
    }
    out
}

/// Number of whole `T` elements stored in `bytes`.
///
/// # Errors
/// Returns `TambakError::BufferMismatch` if `bytes.len()` is not a multiple of
/// the size of `T`.
pub fn element_count<T>(bytes: &[u8]) -> Result<usize, TambakError> {
    let size = std::mem::size_of::<T>();
    if bytes.len() % size != 0 {
        return Err(TambakError::BufferMismatch(size, bytes.len()));
    }
    Ok(bytes.len() / size)
}
