//! Streaming aggregate hooks that decoded values can be pushed into directly,
//! bypassing materialization.
//!
//! A hook owns its accumulator state; the reader only feeds it one
//! `(row, value)` pair per selected non-null row.

use std::any::Any;

/// Discriminant used to select a hook specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    SumBigintToBigint,
    BigintMax,
    BigintMin,
    /// Kinds defined outside this crate. Always served by the generic path.
    Custom(u32),
}

/// A streaming accumulator fed during decode.
pub trait AggregateHook {
    fn kind(&self) -> HookKind;

    /// Accumulates the value decoded for `row`.
    fn add_value(&mut self, row: usize, value: i64);

    /// Called for null rows. Most aggregates ignore nulls.
    fn add_null(&mut self, _row: usize) {}

    /// Exposes the concrete type so the reader can bind a specialization.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// 64-bit integer sum. Overflow wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SumHook {
    sum: i64,
    count: usize,
}

impl SumHook {
    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Number of values accumulated.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl AggregateHook for SumHook {
    fn kind(&self) -> HookKind {
        HookKind::SumBigintToBigint
    }

    #[inline]
    fn add_value(&mut self, _row: usize, value: i64) {
        self.sum = self.sum.wrapping_add(value);
        self.count += 1;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Running minimum (`IS_MIN = true`) or maximum of 64-bit integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinMaxHook<const IS_MIN: bool> {
    current: Option<i64>,
}

pub type MinHook = MinMaxHook<true>;
pub type MaxHook = MinMaxHook<false>;

impl<const IS_MIN: bool> MinMaxHook<IS_MIN> {
    /// `None` until a value has been accumulated.
    pub fn value(&self) -> Option<i64> {
        self.current
    }
}

impl<const IS_MIN: bool> AggregateHook for MinMaxHook<IS_MIN> {
    fn kind(&self) -> HookKind {
        if IS_MIN {
            HookKind::BigintMin
        } else {
            HookKind::BigintMax
        }
    }

    #[inline]
    fn add_value(&mut self, _row: usize, value: i64) {
        self.current = Some(match self.current {
            None => value,
            Some(current) if IS_MIN => current.min(value),
            Some(current) => current.max(value),
        });
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
