//! The fused per-row visitor handed to a decoding backend.
//!
//! A `ColumnVisitor` is monomorphized over four axes: the decoded integer
//! width `T`, the predicate type `P`, the extraction strategy `E`, and row-set
//! density `DENSE`. The per-row path therefore carries no runtime branching on
//! configuration; the only dynamic dispatch left is on the generic fallback
//! instantiations where `P = dyn Predicate` or the hook is `dyn`.

use std::marker::PhantomData;

use arrow::buffer::NullBuffer;

use crate::error::TambakError;
use crate::extract::ExtractValues;
use crate::kernels::ValueStream;
use crate::null_handling::bitmap;
use crate::predicate::Predicate;
use crate::row_set::RowSet;
use crate::traits::DecodedInt;

pub struct ColumnVisitor<'a, T, P: ?Sized, E, const DENSE: bool> {
    predicate: &'a P,
    rows: &'a [usize],
    nulls: Option<&'a NullBuffer>,
    extract: E,
    row_index: usize,
    _marker: PhantomData<T>,
}

impl<'a, T, P, E, const DENSE: bool> ColumnVisitor<'a, T, P, E, DENSE>
where
    T: DecodedInt,
    P: Predicate + ?Sized,
    E: ExtractValues,
{
    pub fn new(
        predicate: &'a P,
        rows: RowSet<'a>,
        nulls: Option<&'a NullBuffer>,
        extract: E,
    ) -> Self {
        debug_assert_eq!(rows.is_dense(), DENSE);
        Self {
            predicate,
            rows: rows.as_slice(),
            nulls,
            extract,
            row_index: 0,
            _marker: PhantomData,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Position of the next row to visit within the row set.
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn is_done(&self) -> bool {
        self.row_index >= self.rows.len()
    }

    /// Batch offset of the next row to visit.
    ///
    /// A dense set is `0..len`, so the offset is the position itself and the
    /// row set is never consulted.
    #[inline]
    pub fn current_row(&self) -> usize {
        if DENSE {
            self.row_index
        } else {
            self.rows[self.row_index]
        }
    }

    /// Tests `value` for the current row and hands survivors to the
    /// extraction strategy.
    #[inline]
    pub fn process_value(&mut self, value: T) {
        let row = self.current_row();
        let value: i64 = value.into();
        if self.predicate.test_int64(value) {
            self.extract.add_value(row, value);
        }
        self.row_index += 1;
    }

    /// Handles the current row as null.
    #[inline]
    pub fn process_null(&mut self) {
        let row = self.current_row();
        if self.predicate.test_null() {
            self.extract.add_null(row);
        }
        self.row_index += 1;
    }

    /// Drives the visitor over `stream`, visiting every row in the set once and
    /// in increasing order.
    ///
    /// Dense sets stream values sequentially. Sparse sets skip the values of
    /// unrequested rows in bulk, counting valid rows in each gap so null rows
    /// cost nothing.
    pub fn visit_stream<S>(mut self, stream: &mut S) -> Result<(), TambakError>
    where
        S: ValueStream<T>,
    {
        if DENSE {
            match self.nulls {
                None => {
                    while !self.is_done() {
                        let value = stream.next_value()?;
                        self.process_value(value);
                    }
                }
                Some(nulls) => {
                    while !self.is_done() {
                        if nulls.is_null(self.row_index) {
                            self.process_null();
                        } else {
                            let value = stream.next_value()?;
                            self.process_value(value);
                        }
                    }
                }
            }
            return Ok(());
        }

        // Next batch offset whose value has been neither read nor skipped.
        let mut position = 0;
        while !self.is_done() {
            let row = self.current_row();
            let gap = bitmap::count_valid(self.nulls, position, row - position);
            if gap > 0 {
                stream.skip(gap)?;
            }
            if bitmap::is_null(self.nulls, row) {
                self.process_null();
            } else {
                let value = stream.next_value()?;
                self.process_value(value);
            }
            position = row + 1;
        }
        Ok(())
    }
}
