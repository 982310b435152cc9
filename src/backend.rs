//! The seam between the selective reader and the physical encodings.
//!
//! A decoding backend reconstructs values from stripe bytes and drives the
//! visitor it is handed. The reader is generic over its backend, so each
//! backend gets its own fully specialized decode loops.

use crate::error::TambakError;
use crate::extract::ExtractValues;
use crate::kernels::{ColumnEncoding, DictionaryDecoder, PlainDecoder, RleDecoder};
use crate::predicate::Predicate;
use crate::traits::DecodedInt;
use crate::visitor::ColumnVisitor;

pub trait DecodingBackend {
    /// Decodes the rows the visitor was built for, invoking it once per row
    /// in increasing row order.
    ///
    /// Every call starts from the beginning of the batch.
    fn read_with_visitor<T, P, E, const DENSE: bool>(
        &self,
        visitor: ColumnVisitor<'_, T, P, E, DENSE>,
    ) -> Result<(), TambakError>
    where
        T: DecodedInt,
        P: Predicate + ?Sized,
        E: ExtractValues;
}

/// The encoded value stream of one column for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedColumn {
    encoding: ColumnEncoding,
    data: Vec<u8>,
}

impl EncodedColumn {
    pub fn new(encoding: ColumnEncoding, data: Vec<u8>) -> Self {
        Self { encoding, data }
    }

    pub fn encoding(&self) -> ColumnEncoding {
        self.encoding
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl DecodingBackend for EncodedColumn {
    fn read_with_visitor<T, P, E, const DENSE: bool>(
        &self,
        visitor: ColumnVisitor<'_, T, P, E, DENSE>,
    ) -> Result<(), TambakError>
    where
        T: DecodedInt,
        P: Predicate + ?Sized,
        E: ExtractValues,
    {
        match self.encoding {
            ColumnEncoding::Direct => {
                visitor.visit_stream(&mut PlainDecoder::<T>::new(&self.data)?)
            }
            ColumnEncoding::Rle => visitor.visit_stream(&mut RleDecoder::<T>::new(&self.data)),
            ColumnEncoding::Dictionary => {
                visitor.visit_stream(&mut DictionaryDecoder::<T>::new(&self.data)?)
            }
        }
    }
}
