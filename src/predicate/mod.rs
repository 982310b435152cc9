//! Value predicates evaluated inline while a column is decoded.
//!
//! Every predicate reports a [`PredicateKind`] discriminant. The column reader
//! uses it to pick a statically specialized decode path for the concrete
//! predicate types defined in this module; any other implementation is still
//! honored through the dynamically dispatched fallback path.

use std::any::Any;
use std::fmt;

mod values;

pub use values::{
    create_bigint_values, create_negated_bigint_values, BigintValuesUsingBitmask,
    BigintValuesUsingHashTable, NegatedBigintValuesUsingBitmask,
    NegatedBigintValuesUsingHashTable,
};

/// Discriminant used to select a predicate specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    AlwaysTrue,
    IsNull,
    IsNotNull,
    BigintRange,
    BigintValuesUsingHashTable,
    BigintValuesUsingBitmask,
    NegatedBigintValuesUsingHashTable,
    NegatedBigintValuesUsingBitmask,
    BigintMultiRange,
    /// Kinds defined outside this crate. Always served by the generic path.
    Custom(u32),
}

/// A test over a decoded value (widened to `i64`) and its null-ness.
pub trait Predicate: fmt::Debug {
    fn kind(&self) -> PredicateKind;

    /// Returns `true` if a non-null row holding `value` survives.
    fn test_int64(&self, value: i64) -> bool;

    /// Returns `true` if a null row survives.
    fn test_null(&self) -> bool;

    /// Exposes the concrete type so the reader can bind a specialization.
    fn as_any(&self) -> &dyn Any;
}

//==================================================================================
// 1. Null-only predicates
//==================================================================================

/// Passes every row, null or not. Zero-sized; see [`ALWAYS_TRUE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysTrue;

/// The shared sentinel used when a scan has no predicate configured.
pub static ALWAYS_TRUE: AlwaysTrue = AlwaysTrue;

impl Predicate for AlwaysTrue {
    fn kind(&self) -> PredicateKind {
        PredicateKind::AlwaysTrue
    }

    #[inline]
    fn test_int64(&self, _value: i64) -> bool {
        true
    }

    #[inline]
    fn test_null(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsNull;

impl Predicate for IsNull {
    fn kind(&self) -> PredicateKind {
        PredicateKind::IsNull
    }

    #[inline]
    fn test_int64(&self, _value: i64) -> bool {
        false
    }

    #[inline]
    fn test_null(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsNotNull;

impl Predicate for IsNotNull {
    fn kind(&self) -> PredicateKind {
        PredicateKind::IsNotNull
    }

    #[inline]
    fn test_int64(&self, _value: i64) -> bool {
        true
    }

    #[inline]
    fn test_null(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//==================================================================================
// 2. Range predicates
//==================================================================================

/// Inclusive `[lower, upper]` range over signed 64-bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigintRange {
    lower: i64,
    upper: i64,
    null_allowed: bool,
}

impl BigintRange {
    pub fn new(lower: i64, upper: i64, null_allowed: bool) -> Self {
        Self {
            lower,
            upper,
            null_allowed,
        }
    }

    /// A range matching exactly one value.
    pub fn single_value(value: i64, null_allowed: bool) -> Self {
        Self::new(value, value, null_allowed)
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }

    pub fn is_single_value(&self) -> bool {
        self.lower == self.upper
    }
}

impl Predicate for BigintRange {
    fn kind(&self) -> PredicateKind {
        PredicateKind::BigintRange
    }

    #[inline]
    fn test_int64(&self, value: i64) -> bool {
        value >= self.lower && value <= self.upper
    }

    #[inline]
    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Disjunction of non-overlapping ranges, sorted by lower bound.
///
/// The reader has no specialization for this kind; it runs through the
/// generic path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigintMultiRange {
    ranges: Vec<BigintRange>,
    null_allowed: bool,
}

impl BigintMultiRange {
    pub fn new(mut ranges: Vec<BigintRange>, null_allowed: bool) -> Self {
        ranges.sort_by_key(|r| r.lower);
        Self {
            ranges,
            null_allowed,
        }
    }

    pub fn ranges(&self) -> &[BigintRange] {
        &self.ranges
    }
}

impl Predicate for BigintMultiRange {
    fn kind(&self) -> PredicateKind {
        PredicateKind::BigintMultiRange
    }

    fn test_int64(&self, value: i64) -> bool {
        // Find the last range starting at or below `value`.
        let idx = self.ranges.partition_point(|r| r.lower <= value);
        idx > 0 && self.ranges[idx - 1].test_int64(value)
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
