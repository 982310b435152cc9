//! Set-membership predicates over signed 64-bit values, and the factories that
//! choose between the hash-table and bitmask representations.

use std::any::Any;

use bitvec::prelude::*;
use hashbrown::HashSet;

use super::{BigintRange, Predicate, PredicateKind};
use crate::error::TambakError;

/// A bitmask is used when its span is at most this many bits...
const BITMASK_MIN_SPAN: i128 = 2048;
/// ...or at most this many bits per distinct value.
const BITMASK_BITS_PER_VALUE: i128 = 256;

//==================================================================================
// 1. Hash-table backed sets
//==================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigintValuesUsingHashTable {
    min: i64,
    max: i64,
    values: HashSet<i64>,
    null_allowed: bool,
}

impl BigintValuesUsingHashTable {
    pub fn new(values: &[i64], null_allowed: bool) -> Result<Self, TambakError> {
        let (min, max) = min_max(values)?;
        Ok(Self {
            min,
            max,
            values: values.iter().copied().collect(),
            null_allowed,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max && self.values.contains(&value)
    }
}

impl Predicate for BigintValuesUsingHashTable {
    fn kind(&self) -> PredicateKind {
        PredicateKind::BigintValuesUsingHashTable
    }

    #[inline]
    fn test_int64(&self, value: i64) -> bool {
        self.contains(value)
    }

    #[inline]
    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Complement of [`BigintValuesUsingHashTable`]. Null handling is independent
/// of the wrapped set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegatedBigintValuesUsingHashTable {
    inner: BigintValuesUsingHashTable,
    null_allowed: bool,
}

impl NegatedBigintValuesUsingHashTable {
    pub fn new(values: &[i64], null_allowed: bool) -> Result<Self, TambakError> {
        Ok(Self {
            inner: BigintValuesUsingHashTable::new(values, false)?,
            null_allowed,
        })
    }
}

impl Predicate for NegatedBigintValuesUsingHashTable {
    fn kind(&self) -> PredicateKind {
        PredicateKind::NegatedBigintValuesUsingHashTable
    }

    #[inline]
    fn test_int64(&self, value: i64) -> bool {
        !self.inner.contains(value)
    }

    #[inline]
    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//==================================================================================
// 2. Bitmask backed sets
//==================================================================================

/// One bit per value in `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigintValuesUsingBitmask {
    min: i64,
    max: i64,
    bitmask: BitVec<u64, Lsb0>,
    null_allowed: bool,
}

impl BigintValuesUsingBitmask {
    pub fn new(values: &[i64], null_allowed: bool) -> Result<Self, TambakError> {
        let (min, max) = min_max(values)?;
        let span = max as i128 - min as i128 + 1;
        if !use_bitmask(span, values.len()) {
            return Err(TambakError::InvalidPredicate(format!(
                "value span [{}, {}] is too wide for a bitmask of {} values",
                min,
                max,
                values.len()
            )));
        }
        let span = usize::try_from(span).map_err(|_| {
            TambakError::InvalidPredicate(format!(
                "value span [{}, {}] is too wide for a bitmask",
                min, max
            ))
        })?;

        let mut bitmask = bitvec![u64, Lsb0; 0; span];
        for &value in values {
            bitmask.set((value as i128 - min as i128) as usize, true);
        }
        Ok(Self {
            min,
            max,
            bitmask,
            null_allowed,
        })
    }

    #[inline]
    fn contains(&self, value: i64) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        let offset = (value as i128 - self.min as i128) as usize;
        self.bitmask.get(offset).map_or(false, |bit| *bit)
    }
}

impl Predicate for BigintValuesUsingBitmask {
    fn kind(&self) -> PredicateKind {
        PredicateKind::BigintValuesUsingBitmask
    }

    #[inline]
    fn test_int64(&self, value: i64) -> bool {
        self.contains(value)
    }

    #[inline]
    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegatedBigintValuesUsingBitmask {
    inner: BigintValuesUsingBitmask,
    null_allowed: bool,
}

impl NegatedBigintValuesUsingBitmask {
    pub fn new(values: &[i64], null_allowed: bool) -> Result<Self, TambakError> {
        Ok(Self {
            inner: BigintValuesUsingBitmask::new(values, false)?,
            null_allowed,
        })
    }
}

impl Predicate for NegatedBigintValuesUsingBitmask {
    fn kind(&self) -> PredicateKind {
        PredicateKind::NegatedBigintValuesUsingBitmask
    }

    #[inline]
    fn test_int64(&self, value: i64) -> bool {
        !self.inner.contains(value)
    }

    #[inline]
    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//==================================================================================
// 3. Factories
//==================================================================================

/// Builds the cheapest predicate matching exactly `values`.
///
/// A contiguous run of values becomes a [`BigintRange`]; a narrow span a
/// bitmask; anything else a hash table.
pub fn create_bigint_values(
    values: &[i64],
    null_allowed: bool,
) -> Result<Box<dyn Predicate>, TambakError> {
    let (distinct, min, max) = distinct_sorted(values)?;
    let span = max as i128 - min as i128 + 1;

    if span == distinct.len() as i128 {
        return Ok(Box::new(BigintRange::new(min, max, null_allowed)));
    }
    if use_bitmask(span, distinct.len()) {
        return Ok(Box::new(BigintValuesUsingBitmask::new(&distinct, null_allowed)?));
    }
    Ok(Box::new(BigintValuesUsingHashTable::new(&distinct, null_allowed)?))
}

/// Builds a predicate matching every value except `values`.
pub fn create_negated_bigint_values(
    values: &[i64],
    null_allowed: bool,
) -> Result<Box<dyn Predicate>, TambakError> {
    let (distinct, min, max) = distinct_sorted(values)?;
    let span = max as i128 - min as i128 + 1;

    if use_bitmask(span, distinct.len()) {
        return Ok(Box::new(NegatedBigintValuesUsingBitmask::new(
            &distinct,
            null_allowed,
        )?));
    }
    Ok(Box::new(NegatedBigintValuesUsingHashTable::new(
        &distinct,
        null_allowed,
    )?))
}

fn use_bitmask(span: i128, distinct: usize) -> bool {
    span <= BITMASK_MIN_SPAN || span <= distinct as i128 * BITMASK_BITS_PER_VALUE
}

fn min_max(values: &[i64]) -> Result<(i64, i64), TambakError> {
    let min = values.iter().copied().min();
    let max = values.iter().copied().max();
    match (min, max) {
        (Some(min), Some(max)) => Ok((min, max)),
        _ => Err(TambakError::InvalidPredicate(
            "a value set needs at least one value".to_string(),
        )),
    }
}

fn distinct_sorted(values: &[i64]) -> Result<(Vec<i64>, i64, i64), TambakError> {
    let (min, max) = min_max(values)?;
    let mut distinct = values.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    Ok((distinct, min, max))
}
