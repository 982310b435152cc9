//! This module contains the panic-free kernel for LEB128 (Little-Endian Base
//! 128) variable-length unsigned integers. RLE streams use it for their run
//! lengths.

use num_traits::{PrimInt, Unsigned};
use std::io::Cursor;

use crate::error::TambakError;

/// Decodes a single unsigned integer from a LEB128 byte stream cursor.
pub fn decode_one<T>(cursor: &mut Cursor<&[u8]>) -> Result<T, TambakError>
where
    T: PrimInt + Unsigned,
{
    let mut result = T::zero();
    let mut shift = 0;
    let total_bits = std::mem::size_of::<T>() * 8;

    loop {
        let pos = cursor.position() as usize;
        let byte = *cursor
            .get_ref()
            .get(pos)
            .ok_or_else(|| TambakError::Leb128DecodeError("Unexpected end of buffer".to_string()))?;
        cursor.set_position((pos + 1) as u64);

        let seven_bit_payload = T::from(byte & 0x7F).ok_or_else(|| {
            TambakError::Leb128DecodeError("Failed to create 7-bit payload from byte".to_string())
        })?;
        result = result | (seven_bit_payload << shift);

        if byte & 0x80 == 0 {
            return Ok(result);
        }

        shift += 7;
        if shift >= total_bits {
            return Err(TambakError::Leb128DecodeError(
                "Integer overflow during decoding".to_string(),
            ));
        }
    }
}

/// Appends the LEB128 encoding of `value` to `buffer`. Used to build test
/// streams.
#[cfg(test)]
pub(crate) fn encode_one(mut value: u64, buffer: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buffer.push(byte);
            return;
        }
        buffer.push(byte | 0x80);
    }
}
