//! Extraction strategies: what happens to a row once it has passed the
//! predicate.
//!
//! The strategy is a type parameter of the visitor, so the per-row code for
//! storing, dropping or aggregating is fixed at compile time.

use crate::hook::AggregateHook;

/// Runtime label for an extraction strategy, used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionMode {
    /// Append value and validity to the reader's output buffer.
    ToOutput,
    /// Record only which rows survived.
    Drop,
    /// Feed the value to an aggregate hook.
    ToHook,
}

/// Receives the rows that survive the predicate.
pub trait ExtractValues {
    const MODE: ExtractionMode;

    fn add_value(&mut self, row: usize, value: i64);

    fn add_null(&mut self, row: usize);

    /// The reader output this strategy writes to, if any. Lets paths that
    /// never decode a value record survivors directly.
    fn output_mut(&mut self) -> Option<&mut ReaderOutput> {
        None
    }
}

//==================================================================================
// 1. Reader output buffer
//==================================================================================

/// The values a reader accumulated during its last decode call.
///
/// `values` and `validity` are parallel; `rows` lists the surviving batch
/// offsets in increasing order. In `Drop` mode only `rows` is filled. Values
/// are held widened to `i64` and narrowed again at assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderOutput {
    rows: Vec<usize>,
    values: Vec<i64>,
    validity: Vec<bool>,
    null_count: usize,
}

impl ReaderOutput {
    pub fn clear(&mut self) {
        self.rows.clear();
        self.values.clear();
        self.validity.clear();
        self.null_count = 0;
    }

    /// Surviving batch offsets.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn validity(&self) -> &[bool] {
        &self.validity
    }

    /// Number of materialized values, nulls included.
    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Values paired with their row, `None` for nulls.
    pub fn to_options(&self) -> Vec<Option<i64>> {
        self.values
            .iter()
            .zip(&self.validity)
            .map(|(&v, &valid)| valid.then_some(v))
            .collect()
    }

    #[inline]
    pub(crate) fn push_row(&mut self, row: usize) {
        self.rows.push(row);
    }

    #[inline]
    pub(crate) fn push_value(&mut self, row: usize, value: i64) {
        self.rows.push(row);
        self.values.push(value);
        self.validity.push(true);
    }

    #[inline]
    pub(crate) fn push_null(&mut self, row: usize) {
        self.rows.push(row);
        self.values.push(0);
        self.validity.push(false);
        self.null_count += 1;
    }
}

//==================================================================================
// 2. Strategies
//==================================================================================

/// Predicate-only evaluation: no value is stored.
pub struct DropValues<'a> {
    output: &'a mut ReaderOutput,
}

impl<'a> DropValues<'a> {
    pub fn new(output: &'a mut ReaderOutput) -> Self {
        Self { output }
    }
}

impl ExtractValues for DropValues<'_> {
    const MODE: ExtractionMode = ExtractionMode::Drop;

    #[inline]
    fn add_value(&mut self, row: usize, _value: i64) {
        self.output.push_row(row);
    }

    #[inline]
    fn add_null(&mut self, row: usize) {
        self.output.push_row(row);
    }

    fn output_mut(&mut self) -> Option<&mut ReaderOutput> {
        Some(&mut *self.output)
    }
}

/// Appends surviving values to the reader's own output.
pub struct ExtractToReader<'a> {
    output: &'a mut ReaderOutput,
}

impl<'a> ExtractToReader<'a> {
    pub fn new(output: &'a mut ReaderOutput) -> Self {
        Self { output }
    }
}

impl ExtractValues for ExtractToReader<'_> {
    const MODE: ExtractionMode = ExtractionMode::ToOutput;

    #[inline]
    fn add_value(&mut self, row: usize, value: i64) {
        self.output.push_value(row, value);
    }

    #[inline]
    fn add_null(&mut self, row: usize) {
        self.output.push_null(row);
    }

    fn output_mut(&mut self) -> Option<&mut ReaderOutput> {
        Some(&mut *self.output)
    }
}

/// Routes surviving values into an aggregate hook.
///
/// `H` is a concrete hook type on the specialized paths and
/// `dyn AggregateHook` on the generic one.
pub struct ExtractToHook<'a, H: AggregateHook + ?Sized> {
    hook: &'a mut H,
}

/// Hook extraction through dynamic dispatch.
pub type ExtractToGenericHook<'a> = ExtractToHook<'a, dyn AggregateHook + 'a>;

impl<'a, H: AggregateHook + ?Sized> ExtractToHook<'a, H> {
    pub fn new(hook: &'a mut H) -> Self {
        Self { hook }
    }
}

impl<H: AggregateHook + ?Sized> ExtractValues for ExtractToHook<'_, H> {
    const MODE: ExtractionMode = ExtractionMode::ToHook;

    #[inline]
    fn add_value(&mut self, row: usize, value: i64) {
        self.hook.add_value(row, value);
    }

    #[inline]
    fn add_null(&mut self, row: usize) {
        self.hook.add_null(row);
    }
}
