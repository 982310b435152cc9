//! Row sets: the ordered, batch-relative row offsets a single decode call
//! visits.

use crate::error::TambakError;

/// A borrowed, strictly increasing sequence of row offsets within one batch.
///
/// The set is owned by the caller for the duration of one decode call. It is
/// validated once at construction so the decode loops can index it without
/// re-checking ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSet<'a> {
    rows: &'a [usize],
}

impl<'a> RowSet<'a> {
    /// Wraps `rows`, checking that the offsets are strictly increasing.
    pub fn new(rows: &'a [usize]) -> Result<Self, TambakError> {
        if let Some(pos) = rows.windows(2).position(|w| w[0] >= w[1]) {
            return Err(TambakError::InvalidRowSet(format!(
                "row offsets must be strictly increasing, but rows[{}] = {} is followed by {}",
                pos,
                rows[pos],
                rows[pos + 1]
            )));
        }
        Ok(Self { rows })
    }

    pub fn as_slice(&self) -> &'a [usize] {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<usize> {
        self.rows.last().copied()
    }

    /// `true` when the set is exactly `0..len`.
    ///
    /// Because offsets are strictly increasing, the last offset equals
    /// `len - 1` only if there are no gaps. An empty set is never dense.
    #[inline]
    pub fn is_dense(&self) -> bool {
        match self.rows.last() {
            Some(&last) => last == self.rows.len() - 1,
            None => false,
        }
    }
}
