//! Direct (plain) encoding: each non-null value stored at its physical width
//! in little-endian byte order. Skipping is a cursor bump.

use std::marker::PhantomData;

use num_traits::PrimInt;

use super::ValueStream;
use crate::error::TambakError;
use crate::utils::{element_count, read_unaligned};

pub struct PlainDecoder<'a, T> {
    data: &'a [u8],
    position: usize,
    len: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: bytemuck::Pod + PrimInt> PlainDecoder<'a, T> {
    pub fn new(data: &'a [u8]) -> Result<Self, TambakError> {
        Ok(Self {
            data,
            position: 0,
            len: element_count::<T>(data)?,
            _marker: PhantomData,
        })
    }

    /// Values not yet consumed or skipped.
    pub fn remaining(&self) -> usize {
        self.len - self.position
    }
}

impl<T: bytemuck::Pod + PrimInt> ValueStream<T> for PlainDecoder<'_, T> {
    #[inline]
    fn next_value(&mut self) -> Result<T, TambakError> {
        let value = read_unaligned::<T>(self.data, self.position)?;
        self.position += 1;
        Ok(value)
    }

    fn skip(&mut self, count: usize) -> Result<(), TambakError> {
        if count > self.remaining() {
            return Err(TambakError::TruncatedStream(format!(
                "cannot skip {} values, only {} remain",
                count,
                self.remaining()
            )));
        }
        self.position += count;
        Ok(())
    }
}
