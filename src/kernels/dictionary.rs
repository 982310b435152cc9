//! This module contains the streaming decoder for Dictionary Encoded integer
//! streams.
//!
//! ### On-Disk Format
//! 1.  **Dictionary Size (`u32`)**: The number of unique entries in the dictionary.
//! 2.  **Dictionary Bytes (`[u8]`)**: The tightly packed bytes of the unique values themselves.
//! 3.  **Indices (`[u32]`)**: One index per non-null value.
//!
//! The dictionary is parsed eagerly (it is small by construction); indices
//! are read lazily, so skipping is a cursor bump.

use num_traits::PrimInt;

use super::ValueStream;
use crate::error::TambakError;
use crate::utils::{decode_le, element_count, read_unaligned};

pub struct DictionaryDecoder<'a, T> {
    dictionary: Vec<T>,
    indices: &'a [u8],
    position: usize,
    len: usize,
}

impl<'a, T: bytemuck::Pod + PrimInt> DictionaryDecoder<'a, T> {
    pub fn new(input_bytes: &'a [u8]) -> Result<Self, TambakError> {
        let element_size = std::mem::size_of::<T>();
        let u32_size = std::mem::size_of::<u32>();

        let dict_len_bytes: [u8; 4] = input_bytes
            .get(..u32_size)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| {
                TambakError::DictionaryError(
                    "Truncated header: cannot read dictionary length".to_string(),
                )
            })?;
        let dict_len = u32::from_le_bytes(dict_len_bytes) as usize;

        let dict_end = u32_size + dict_len * element_size;
        let dict_bytes = input_bytes
            .get(u32_size..dict_end)
            .ok_or_else(|| TambakError::DictionaryError("Truncated dictionary data".to_string()))?;
        let dictionary: Vec<T> = dict_bytes
            .chunks_exact(element_size)
            .map(decode_le)
            .collect();

        let indices = &input_bytes[dict_end..];
        let len = element_count::<u32>(indices).map_err(|_| {
            TambakError::DictionaryError(
                "Corrupt indices data: length not a multiple of 4".to_string(),
            )
        })?;

        Ok(Self {
            dictionary,
            indices,
            position: 0,
            len,
        })
    }

    pub fn dictionary(&self) -> &[T] {
        &self.dictionary
    }

    pub fn remaining(&self) -> usize {
        self.len - self.position
    }
}

impl<T: bytemuck::Pod + PrimInt> ValueStream<T> for DictionaryDecoder<'_, T> {
    #[inline]
    fn next_value(&mut self) -> Result<T, TambakError> {
        let index = read_unaligned::<u32>(self.indices, self.position)? as usize;
        self.position += 1;
        self.dictionary.get(index).copied().ok_or_else(|| {
            TambakError::DictionaryError(format!(
                "Index {} out of range for dictionary of {} entries",
                index,
                self.dictionary.len()
            ))
        })
    }

    fn skip(&mut self, count: usize) -> Result<(), TambakError> {
        if count > self.remaining() {
            return Err(TambakError::TruncatedStream(format!(
                "cannot skip {} dictionary indices, only {} remain",
                count,
                self.remaining()
            )));
        }
        self.position += count;
        Ok(())
    }
}

/// Encodes `values` in the dictionary layout. Used to build test streams.
#[cfg(test)]
pub(crate) fn encode<T: bytemuck::Pod + PrimInt>(values: &[T]) -> Vec<u8> {
    let mut dictionary: Vec<T> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(values.len());
    for value in values {
        let index = match dictionary.iter().position(|d| d == value) {
            Some(i) => i,
            None => {
                dictionary.push(*value);
                dictionary.len() - 1
            }
        };
        indices.push(index as u32);
    }

    let mut out = Vec::new();
    out.extend_from_slice(&(dictionary.len() as u32).to_le_bytes());
    out.extend_from_slice(&crate::utils::typed_slice_to_bytes(&dictionary));
    out.extend_from_slice(&crate::utils::typed_slice_to_bytes(&indices));
    out
}
