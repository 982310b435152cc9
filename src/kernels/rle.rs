//! This module contains the streaming decoder for Run-Length Encoded (RLE)
//! integer streams.
//!
//! The on-disk format is a sequence of `(value, run_length)` pairs, where the
//! value is stored at its physical width and the `run_length` is
//! LEB128-encoded. Skipping consumes whole runs without expanding them, so a
//! sparse read over long runs touches each run header once.

use std::io::Cursor;

use num_traits::PrimInt;

use super::leb128;
use super::ValueStream;
use crate::error::TambakError;
use crate::utils::decode_le;

pub struct RleDecoder<'a, T> {
    cursor: Cursor<&'a [u8]>,
    current: T,
    remaining_in_run: u64,
}

impl<'a, T: bytemuck::Pod + PrimInt> RleDecoder<'a, T> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
            current: T::zeroed(),
            remaining_in_run: 0,
        }
    }

    /// Reads the next `(value, run_length)` header.
    fn load_run(&mut self) -> Result<(), TambakError> {
        let element_size = std::mem::size_of::<T>();
        let data = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        if start >= data.len() {
            return Err(TambakError::TruncatedStream(
                "RLE stream exhausted before all requested values were read".to_string(),
            ));
        }

        let value_bytes = data.get(start..start + element_size).ok_or_else(|| {
            TambakError::RleDecodeError("Truncated buffer: cannot read value".to_string())
        })?;
        self.current = decode_le(value_bytes);
        self.cursor.set_position((start + element_size) as u64);

        let run_length = leb128::decode_one::<u64>(&mut self.cursor)?;
        if run_length == 0 {
            return Err(TambakError::RleDecodeError(format!(
                "Zero-length run at byte offset {}",
                start
            )));
        }
        self.remaining_in_run = run_length;
        Ok(())
    }
}

impl<T: bytemuck::Pod + PrimInt> ValueStream<T> for RleDecoder<'_, T> {
    #[inline]
    fn next_value(&mut self) -> Result<T, TambakError> {
        if self.remaining_in_run == 0 {
            self.load_run()?;
        }
        self.remaining_in_run -= 1;
        Ok(self.current)
    }

    fn skip(&mut self, count: usize) -> Result<(), TambakError> {
        let mut count = count as u64;
        while count > 0 {
            if self.remaining_in_run == 0 {
                self.load_run()?;
            }
            let step = count.min(self.remaining_in_run);
            self.remaining_in_run -= step;
            count -= step;
        }
        Ok(())
    }
}

/// Encodes `values` in the RLE layout. Used to build test streams.
#[cfg(test)]
pub(crate) fn encode<T: bytemuck::Pod + PrimInt>(values: &[T]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut iter = values.iter().copied().peekable();
    while let Some(value) = iter.next() {
        let mut run: u64 = 1;
        while iter.peek() == Some(&value) {
            iter.next();
            run += 1;
        }
        out.extend_from_slice(bytemuck::bytes_of(&value.to_le()));
        leb128::encode_one(run, &mut out);
    }
    out
}
