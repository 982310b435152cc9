//! The selective integer column reader: the orchestrator that turns one
//! `read_common` call into exactly one fully specialized decode pass.
//!
//! Dispatch happens in three nested layers, each resolved once per call:
//! 1.  aggregate hook vs. predicate (`read_common`),
//! 2.  hook kind (`process_value_hook`) or predicate kind (`process_filter`),
//! 3.  physical width (`read_helper`), which builds the `ColumnVisitor` and
//!     hands it to the decoding backend.
//!
//! Row-set density is lifted to a const generic before layer 2, so every
//! combination ends in its own monomorphized decode loop.

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::buffer::NullBuffer;

use crate::backend::DecodingBackend;
use crate::error::TambakError;
use crate::extract::{
    DropValues, ExtractToHook, ExtractToReader, ExtractValues, ExtractionMode, ReaderOutput,
};
use crate::hook::{AggregateHook, HookKind, MaxHook, MinHook, SumHook};
use crate::null_handling::assemble_primitive;
use crate::predicate::{
    AlwaysTrue, BigintRange, BigintValuesUsingBitmask, BigintValuesUsingHashTable, IsNotNull,
    IsNull, NegatedBigintValuesUsingBitmask, NegatedBigintValuesUsingHashTable, Predicate,
    PredicateKind, ALWAYS_TRUE,
};
use crate::row_set::RowSet;
use crate::scan_spec::ScanSpec;
use crate::traits::DecodedInt;
use crate::types::PhysicalType;
use crate::visitor::ColumnVisitor;

//==================================================================================
// 1. The Reader
//==================================================================================

/// Format-independent selective reader for one integer column of one batch.
///
/// The reader owns the batch's decoding backend and null bitmap, and an
/// output buffer that each decode call overwrites. It keeps no predicate or
/// aggregate state between calls.
pub struct SelectiveIntegerColumnReader<B> {
    backend: B,
    physical_type: PhysicalType,
    num_rows: usize,
    nulls: Option<NullBuffer>,
    output: ReaderOutput,
}

impl<B: DecodingBackend> SelectiveIntegerColumnReader<B> {
    /// Creates a reader over a batch of `num_rows` rows.
    ///
    /// The physical type is not validated here: an unsupported width is a
    /// configuration error raised by the decode call that needs it.
    pub fn new(
        backend: B,
        physical_type: PhysicalType,
        num_rows: usize,
        nulls: Option<NullBuffer>,
    ) -> Result<Self, TambakError> {
        if let Some(n) = &nulls {
            if n.len() != num_rows {
                return Err(TambakError::NullBitmapMismatch {
                    expected: num_rows,
                    actual: n.len(),
                });
            }
        }
        Ok(Self {
            backend,
            physical_type,
            num_rows,
            nulls,
            output: ReaderOutput::default(),
        })
    }

    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Results of the last decode call.
    pub fn output(&self) -> &ReaderOutput {
        &self.output
    }

    /// Rows that survived the last decode call. Empty after a hook pushdown.
    pub fn output_rows(&self) -> &[usize] {
        self.output.rows()
    }

    /// Number of values materialized by the last decode call.
    pub fn num_values(&self) -> usize {
        self.output.num_values()
    }

    /// Decodes `rows` and materializes the survivors as an Arrow array of the
    /// column's physical type.
    ///
    /// Only `ToOutput` reads materialize values; after a `Drop` or hook read
    /// the array is empty.
    pub fn get_values(
        &mut self,
        rows: RowSet<'_>,
        spec: &mut ScanSpec<'_>,
    ) -> Result<ArrayRef, TambakError> {
        let physical_type = self.physical_type;
        self.get_int_values(rows, spec, physical_type)
    }

    /// Like [`get_values`](Self::get_values), but widens the output to
    /// `requested_type`. Narrowing is rejected before any decoding.
    pub fn get_int_values(
        &mut self,
        rows: RowSet<'_>,
        spec: &mut ScanSpec<'_>,
        requested_type: PhysicalType,
    ) -> Result<ArrayRef, TambakError> {
        if requested_type.value_size() < self.physical_type.value_size() {
            return Err(TambakError::UnsupportedType(format!(
                "cannot read a {} column as {}",
                self.physical_type, requested_type
            )));
        }
        self.read_common(rows, spec)?;
        self.assemble(requested_type)
    }

    /// The fused decode entry point.
    ///
    /// Performs exactly one decode pass over `rows` as configured by `spec`,
    /// replacing the reader's output. On error the output is cleared.
    pub fn read_common(
        &mut self,
        rows: RowSet<'_>,
        spec: &mut ScanSpec<'_>,
    ) -> Result<(), TambakError> {
        self.output.clear();
        let Some(last) = rows.last() else {
            return Ok(());
        };
        if last >= self.num_rows {
            return Err(TambakError::InvalidRowSet(format!(
                "row {} is past the end of a {}-row batch",
                last, self.num_rows
            )));
        }

        let dense = rows.is_dense();
        let predicate: &dyn Predicate = match spec.filter() {
            Some(p) => p,
            None => &ALWAYS_TRUE,
        };

        let Self {
            backend,
            physical_type,
            nulls,
            output,
            ..
        } = self;
        let ctx = DecodeContext {
            backend: &*backend,
            physical_type: *physical_type,
            nulls: nulls.as_ref(),
        };

        let mode = if !spec.keep_values() {
            ExtractionMode::Drop
        } else if spec.has_value_hook() {
            ExtractionMode::ToHook
        } else {
            ExtractionMode::ToOutput
        };
        log::debug!(
            "read_common: {} rows ({}), {:?}, predicate {:?}, width {}",
            rows.len(),
            if dense { "dense" } else { "sparse" },
            mode,
            predicate.kind(),
            ctx.physical_type
        );

        let result = match (mode, spec.value_hook_mut()) {
            (ExtractionMode::ToHook, Some(hook)) => {
                if dense {
                    ctx.process_value_hook::<true>(hook, rows)
                } else {
                    ctx.process_value_hook::<false>(hook, rows)
                }
            }
            (ExtractionMode::Drop, _) => {
                if dense {
                    ctx.process_filter::<_, true>(predicate, rows, DropValues::new(output))
                } else {
                    ctx.process_filter::<_, false>(predicate, rows, DropValues::new(output))
                }
            }
            _ => {
                if dense {
                    ctx.process_filter::<_, true>(predicate, rows, ExtractToReader::new(output))
                } else {
                    ctx.process_filter::<_, false>(predicate, rows, ExtractToReader::new(output))
                }
            }
        };

        if let Err(err) = result {
            self.output.clear();
            return Err(err);
        }

        log_metric!(
            "event" = "read_common",
            "mode" = format!("{:?}", mode),
            "rows" = rows.len(),
            "survivors" = self.output.rows().len()
        );
        Ok(())
    }

    fn assemble(&self, output_type: PhysicalType) -> Result<ArrayRef, TambakError> {
        match output_type {
            PhysicalType::Int16 => self.assemble_as::<i16>(),
            PhysicalType::Int32 => self.assemble_as::<i32>(),
            PhysicalType::Int64 => self.assemble_as::<i64>(),
            PhysicalType::Int8 => Err(TambakError::UnsupportedWidth(output_type.value_size())),
        }
    }

    fn assemble_as<T: DecodedInt>(&self) -> Result<ArrayRef, TambakError> {
        let array =
            assemble_primitive::<T::ArrowType>(self.output.values(), self.output.validity())?;
        Ok(Arc::new(array))
    }
}

//==================================================================================
// 2. Dispatch Layers
//==================================================================================

/// The parts of the reader a decode pass reads from, split from the output
/// buffer that the extraction strategy borrows mutably.
struct DecodeContext<'r, B> {
    backend: &'r B,
    physical_type: PhysicalType,
    nulls: Option<&'r NullBuffer>,
}

impl<B: DecodingBackend> DecodeContext<'_, B> {
    /// Selects the predicate specialization for a `Drop` or `ToOutput` pass.
    fn process_filter<E, const DENSE: bool>(
        &self,
        predicate: &dyn Predicate,
        rows: RowSet<'_>,
        mut extract: E,
    ) -> Result<(), TambakError>
    where
        E: ExtractValues,
    {
        match predicate.kind() {
            PredicateKind::AlwaysTrue => {
                self.read_as::<AlwaysTrue, E, DENSE>(predicate, rows, extract)
            }
            PredicateKind::IsNull if predicate.as_any().is::<IsNull>() => {
                self.filter_nulls(rows, true, &mut extract)
            }
            PredicateKind::IsNotNull => {
                if E::MODE == ExtractionMode::Drop && predicate.as_any().is::<IsNotNull>() {
                    self.filter_nulls(rows, false, &mut extract)
                } else {
                    self.read_as::<IsNotNull, E, DENSE>(predicate, rows, extract)
                }
            }
            PredicateKind::BigintRange => {
                self.read_as::<BigintRange, E, DENSE>(predicate, rows, extract)
            }
            PredicateKind::BigintValuesUsingHashTable => {
                self.read_as::<BigintValuesUsingHashTable, E, DENSE>(predicate, rows, extract)
            }
            PredicateKind::BigintValuesUsingBitmask => {
                self.read_as::<BigintValuesUsingBitmask, E, DENSE>(predicate, rows, extract)
            }
            PredicateKind::NegatedBigintValuesUsingHashTable => self
                .read_as::<NegatedBigintValuesUsingHashTable, E, DENSE>(predicate, rows, extract),
            PredicateKind::NegatedBigintValuesUsingBitmask => self
                .read_as::<NegatedBigintValuesUsingBitmask, E, DENSE>(predicate, rows, extract),
            _ => self.read_helper::<_, E, DENSE>(predicate, rows, extract),
        }
    }

    /// Binds the concrete predicate type `P`, or falls back to the generic
    /// path when the predicate reports `P`'s kind without being a `P`.
    fn read_as<P, E, const DENSE: bool>(
        &self,
        predicate: &dyn Predicate,
        rows: RowSet<'_>,
        extract: E,
    ) -> Result<(), TambakError>
    where
        P: Predicate + 'static,
        E: ExtractValues,
    {
        match predicate.as_any().downcast_ref::<P>() {
            Some(concrete) => self.read_helper::<P, E, DENSE>(concrete, rows, extract),
            None => {
                log::debug!(
                    "predicate reports {:?} but is a foreign type; using the generic path",
                    predicate.kind()
                );
                self.read_helper::<_, E, DENSE>(predicate, rows, extract)
            }
        }
    }

    /// Selects the hook specialization. The value predicate is not applied:
    /// the hook sees every row of the already selected row set.
    fn process_value_hook<const DENSE: bool>(
        &self,
        hook: &mut dyn AggregateHook,
        rows: RowSet<'_>,
    ) -> Result<(), TambakError> {
        match hook.kind() {
            HookKind::SumBigintToBigint => self.read_to_hook::<SumHook, DENSE>(hook, rows),
            HookKind::BigintMax => self.read_to_hook::<MaxHook, DENSE>(hook, rows),
            HookKind::BigintMin => self.read_to_hook::<MinHook, DENSE>(hook, rows),
            HookKind::Custom(_) => {
                self.read_helper::<_, _, DENSE>(&ALWAYS_TRUE, rows, ExtractToHook::new(hook))
            }
        }
    }

    fn read_to_hook<H, const DENSE: bool>(
        &self,
        hook: &mut dyn AggregateHook,
        rows: RowSet<'_>,
    ) -> Result<(), TambakError>
    where
        H: AggregateHook + 'static,
    {
        if let Some(concrete) = hook.as_any_mut().downcast_mut::<H>() {
            return self.read_helper::<_, _, DENSE>(
                &ALWAYS_TRUE,
                rows,
                ExtractToHook::new(concrete),
            );
        }
        log::debug!(
            "hook reports {:?} but is a foreign type; using the generic path",
            hook.kind()
        );
        self.read_helper::<_, _, DENSE>(&ALWAYS_TRUE, rows, ExtractToHook::new(hook))
    }

    /// Instantiates the visitor for the column's width and hands it to the
    /// backend. This is the innermost dispatch layer.
    fn read_helper<P, E, const DENSE: bool>(
        &self,
        predicate: &P,
        rows: RowSet<'_>,
        extract: E,
    ) -> Result<(), TambakError>
    where
        P: Predicate + ?Sized,
        E: ExtractValues,
    {
        match self.physical_type.value_size() {
            2 => self.backend.read_with_visitor(ColumnVisitor::<i16, P, E, DENSE>::new(
                predicate, rows, self.nulls, extract,
            )),
            4 => self.backend.read_with_visitor(ColumnVisitor::<i32, P, E, DENSE>::new(
                predicate, rows, self.nulls, extract,
            )),
            8 => self.backend.read_with_visitor(ColumnVisitor::<i64, P, E, DENSE>::new(
                predicate, rows, self.nulls, extract,
            )),
            other => Err(TambakError::UnsupportedWidth(other)),
        }
    }

    /// Evaluates `IsNull` (`is_null = true`) or `IsNotNull` from the null
    /// bitmap alone. The value stream is never touched.
    fn filter_nulls<E: ExtractValues>(
        &self,
        rows: RowSet<'_>,
        is_null: bool,
        extract: &mut E,
    ) -> Result<(), TambakError> {
        let store_nulls = E::MODE == ExtractionMode::ToOutput;
        let output = extract.output_mut().ok_or_else(|| {
            TambakError::InternalError(format!(
                "null filtering needs a reader output, but extraction is {:?}",
                E::MODE
            ))
        })?;

        match self.nulls {
            // Without a bitmap no row is null.
            None => {
                if !is_null {
                    for &row in rows.as_slice() {
                        output.push_row(row);
                    }
                }
            }
            Some(nulls) => {
                for &row in rows.as_slice() {
                    if nulls.is_null(row) != is_null {
                        continue;
                    }
                    if store_nulls {
                        output.push_null(row);
                    } else {
                        output.push_row(row);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod reader_tests;
