//! Per-call scan configuration: what the caller wants done with the rows a
//! reader decodes.

use std::fmt;

use crate::hook::AggregateHook;
use crate::predicate::Predicate;

/// Borrowed, per-call configuration for a selective read.
///
/// The predicate and hook stay owned by the caller. The hook is borrowed
/// mutably for the lifetime of the spec, so no other code can touch it while
/// a decode that references it is in flight.
pub struct ScanSpec<'a> {
    filter: Option<&'a dyn Predicate>,
    value_hook: Option<&'a mut dyn AggregateHook>,
    keep_values: bool,
}

impl Default for ScanSpec<'_> {
    fn default() -> Self {
        Self {
            filter: None,
            value_hook: None,
            keep_values: true,
        }
    }
}

impl<'a> ScanSpec<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: &'a dyn Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Pushes values into `hook` instead of materializing them. Only honored
    /// while values are kept.
    pub fn with_value_hook(mut self, hook: &'a mut dyn AggregateHook) -> Self {
        self.value_hook = Some(hook);
        self
    }

    /// `false` when the column is read only to narrow the row selection.
    pub fn with_keep_values(mut self, keep_values: bool) -> Self {
        self.keep_values = keep_values;
        self
    }

    pub fn filter(&self) -> Option<&'a dyn Predicate> {
        self.filter
    }

    pub fn has_value_hook(&self) -> bool {
        self.value_hook.is_some()
    }

    pub fn value_hook_mut(&mut self) -> Option<&mut (dyn AggregateHook + 'a)> {
        self.value_hook.as_deref_mut()
    }

    pub fn keep_values(&self) -> bool {
        self.keep_values
    }
}

impl fmt::Debug for ScanSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanSpec")
            .field("filter", &self.filter)
            .field(
                "value_hook",
                &self.value_hook.as_ref().map(|hook| hook.kind()),
            )
            .field("keep_values", &self.keep_values)
            .finish()
    }
}
