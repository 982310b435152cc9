// --- IN: src/null_handling/bitmap.rs ---

//! This module contains pure, stateless helpers for consuming a batch's null
//! bitmap and for re-applying validity when surviving values are materialized
//! as an Arrow array. A set bit in a `NullBuffer` marks a valid row.

use arrow::array::PrimitiveArray;
use arrow::buffer::{NullBuffer, ScalarBuffer};
use arrow::datatypes::ArrowPrimitiveType;
use num_traits::NumCast;

use crate::error::TambakError;

//==================================================================================
// 1. Bitmap Queries
//==================================================================================

/// `true` if `row` is null. A missing bitmap means no row is null.
#[inline]
pub fn is_null(nulls: Option<&NullBuffer>, row: usize) -> bool {
    nulls.map_or(false, |n| n.is_null(row))
}

/// Number of valid (non-null) rows in `start..start + len`.
///
/// This is how many values the value stream holds for that range, since null
/// rows are not stored.
#[inline]
pub fn count_valid(nulls: Option<&NullBuffer>, start: usize, len: usize) -> usize {
    match nulls {
        None => len,
        Some(_) if len == 0 => 0,
        Some(n) => n.inner().slice(start, len).count_set_bits(),
    }
}

/// Builds a `NullBuffer` from per-value validity, or `None` when every value
/// is valid.
pub fn null_buffer_from_validity(validity: &[bool]) -> Option<NullBuffer> {
    if validity.iter().all(|&v| v) {
        None
    } else {
        Some(NullBuffer::from(validity.to_vec()))
    }
}

//==================================================================================
// 2. Array Assembly
//==================================================================================

/// Narrows widened `values` to `T::Native` and re-applies `validity` to build
/// a typed Arrow array.
///
/// # Errors
/// Returns `TambakError::InternalError` if a value does not fit `T::Native`,
/// and an Arrow error if `values` and `validity` differ in length.
pub fn assemble_primitive<T>(
    values: &[i64],
    validity: &[bool],
) -> Result<PrimitiveArray<T>, TambakError>
where
    T: ArrowPrimitiveType,
    T::Native: NumCast,
{
    let narrowed = values
        .iter()
        .map(|&v| {
            <T::Native as NumCast>::from(v).ok_or_else(|| {
                TambakError::InternalError(format!(
                    "value {} does not fit output type {:?}",
                    v,
                    T::DATA_TYPE
                ))
            })
        })
        .collect::<Result<Vec<T::Native>, TambakError>>()?;

    let array = PrimitiveArray::<T>::try_new(
        ScalarBuffer::from(narrowed),
        null_buffer_from_validity(validity),
    )?;
    Ok(array)
}
