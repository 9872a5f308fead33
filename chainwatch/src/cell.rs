//! Shared, write-once timestamp cells
//!
//! A cell holds a single tick value and may be referenced by several
//! stopwatches at once; that aliasing is what lets one interval's stop double
//! as another's start without an extra clock read. The write-once discipline
//! (a set only succeeds while the cell is unset) is the invariant that makes
//! the sharing safe, and it is enforced here rather than at the call sites.
//!
//! Cells are never exposed outside the crate; all access goes through the
//! stopwatch accessors.

use crate::clock;
use crate::types::Ticks;
use std::cell::Cell;
use std::rc::Rc;

/// A reference-counted, single-assignment tick container. `0` means "unset".
#[derive(Clone, Debug)]
pub(crate) struct TimestampCell {
    inner: Rc<Cell<Ticks>>,
}

impl TimestampCell {
    /// Create a cell with no recorded timestamp
    pub(crate) fn unset() -> Self {
        Self {
            inner: Rc::new(Cell::new(0)),
        }
    }

    /// Create a cell pre-set to the given tick value
    pub(crate) fn with_value(ticks: Ticks) -> Self {
        Self {
            inner: Rc::new(Cell::new(ticks)),
        }
    }

    /// Create a cell pre-set to the current clock reading
    pub(crate) fn now() -> Self {
        Self::with_value(clock::now())
    }

    pub(crate) fn get(&self) -> Ticks {
        self.inner.get()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.inner.get() != 0
    }

    /// Record the current clock reading. Succeeds only while the cell is
    /// unset; returns whether the write happened.
    pub(crate) fn mark_now(&self) -> bool {
        if self.is_set() {
            return false;
        }
        self.inner.set(clock::now());
        true
    }

    /// True if both handles alias the same underlying slot
    pub(crate) fn shares_slot_with(&self, other: &TimestampCell) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
