//! Interval stopwatch with shareable endpoints
//!
//! Different assumptions than a general-purpose stopwatch, in exchange for
//! lower overhead when timing consecutive or nested code regions:
//! - a stopwatch is started at construction and can never be restarted or
//!   reused; `stop()` is the only mutator and is idempotent
//! - a stopwatch can share its start timestamp with another one (the child
//!   relationship), or use another's stop timestamp as its own start (the
//!   sibling relationship), so adjacent intervals need no extra clock read
//! - a stopwatch can be constructed from ticks, milliseconds, a duration, or
//!   an external `Instant`; such a watch represents a fixed time region
//!
//! Endpoints are aliased, not copied. A sibling created before its
//! predecessor stops still starts at exactly the right instant, because both
//! watches reference the same cell.

use crate::cell::TimestampCell;
use crate::clock::{self, TICKS_PER_MILLISECOND};
use crate::types::{Result, Ticks, TimerError};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// A half-open time interval `[start, stop)` backed by two shared timestamp
/// cells.
///
/// Cloning does not copy the interval: a clone is a second handle onto the
/// same pair of cells, so stopping either handle stops both. This is what
/// lets callers hand a stopwatch to a tracker while keeping control of it.
#[derive(Clone, Debug)]
pub struct Stopwatch {
    start: TimestampCell,
    stop: TimestampCell,
}

impl Stopwatch {
    /// Create a started stopwatch with freshly allocated endpoints
    pub fn new() -> Self {
        Self {
            start: TimestampCell::now(),
            stop: TimestampCell::unset(),
        }
    }

    /// Create a stopwatch that shares this one's start timestamp.
    ///
    /// The child begins at the same instant as its parent; stopping is
    /// independent.
    pub fn create_child(&self) -> Stopwatch {
        Stopwatch {
            start: self.start.clone(),
            stop: TimestampCell::unset(),
        }
    }

    /// Create a stopwatch whose start timestamp is this one's stop timestamp.
    ///
    /// The sibling begins the instant this watch stops, with no clock read of
    /// its own. Until then it reports inactive.
    pub fn create_sibling(&self) -> Stopwatch {
        Stopwatch {
            start: self.stop.clone(),
            stop: TimestampCell::unset(),
        }
    }

    /// Create a sibling that also shares its stop timestamp with `parent`:
    /// it starts when this watch stops and ends exactly when the parent ends.
    ///
    /// Returns [`TimerError::MissingArgument`] when no parent is supplied.
    pub fn create_last_sibling(&self, parent: Option<&Stopwatch>) -> Result<Stopwatch> {
        let parent = parent.ok_or(TimerError::MissingArgument("parent"))?;
        Ok(self.last_sibling(parent))
    }

    /// Infallible last-sibling constructor for callers that already hold the
    /// parent.
    pub(crate) fn last_sibling(&self, parent: &Stopwatch) -> Stopwatch {
        Stopwatch {
            start: self.stop.clone(),
            stop: parent.stop.clone(),
        }
    }

    /// Create a completed stopwatch spanning the given tick count
    pub fn from_ticks(ticks: Ticks) -> Self {
        Self {
            start: TimestampCell::unset(),
            stop: TimestampCell::with_value(ticks),
        }
    }

    /// Create a completed stopwatch spanning the given number of milliseconds
    pub fn from_millis(millis: u64) -> Self {
        Self::from_ticks(millis * TICKS_PER_MILLISECOND)
    }

    /// Create a completed stopwatch spanning the given duration
    pub fn from_duration(duration: Duration) -> Self {
        Self::from_ticks(clock::duration_to_ticks(duration))
    }

    /// Adopt a running external timer.
    ///
    /// The returned stopwatch is active and back-dated so its elapsed time
    /// matches the age of `instant`; it is not synchronized with the instant
    /// in any way afterwards.
    pub fn from_instant(instant: Instant) -> Self {
        let elapsed = clock::duration_to_ticks(instant.elapsed());
        // instants older than the process tick origin clamp to the origin
        let start = clock::now().saturating_sub(elapsed).max(1);
        Self {
            start: TimestampCell::with_value(start),
            stop: TimestampCell::unset(),
        }
    }

    /// Record the stop timestamp, ending the interval.
    ///
    /// Returns `true` if the watch was running before the call, `false` if it
    /// was already stopped (in which case nothing is written).
    pub fn stop(&self) -> bool {
        self.stop.mark_now()
    }

    /// True while the interval is open: started but not yet stopped
    pub fn is_active(&self) -> bool {
        self.start.is_set() && !self.stop.is_set()
    }

    /// Duration tracked by the stopwatch, in ticks.
    ///
    /// A stopped watch reports its fixed span; a running watch reports the
    /// time since its start; a watch that has not started yet reports 0.
    pub fn elapsed_ticks(&self) -> Ticks {
        // once the stop cell is set the start cell is known to be resolved,
        // so the common (stopped) case is checked first
        if self.stop.is_set() {
            self.stop.get().saturating_sub(self.start.get())
        } else if self.start.is_set() {
            clock::now().saturating_sub(self.start.get())
        } else {
            0
        }
    }

    /// Duration tracked by the stopwatch, in whole milliseconds
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_ticks() / TICKS_PER_MILLISECOND
    }

    /// Duration tracked by the stopwatch
    pub fn elapsed(&self) -> Duration {
        clock::ticks_to_duration(self.elapsed_ticks())
    }

    /// Approximate calendar time at which the stopwatch started, or `None` if
    /// it has not started yet.
    ///
    /// Accurate over short intervals; the monotonic and calendar clocks drift
    /// apart over long runs.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        if self.start.is_set() {
            Some(clock::approximate_date_time(self.start.get()))
        } else {
            None
        }
    }

    /// Approximate calendar time at which the stopwatch stopped, or `None` if
    /// it has not stopped yet.
    ///
    /// Accurate over short intervals; the monotonic and calendar clocks drift
    /// apart over long runs.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        if self.stop.is_set() {
            Some(clock::approximate_date_time(self.stop.get()))
        } else {
            None
        }
    }

    /// Borrow a guard that stops the watch when dropped, for block-scoped
    /// timing
    pub fn guard(&self) -> StopGuard<'_> {
        StopGuard { watch: self }
    }

    /// True if both handles reference the same pair of cells
    pub(crate) fn same_interval(&self, other: &Stopwatch) -> bool {
        self.start.shares_slot_with(&other.start) && self.stop.shares_slot_with(&other.stop)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped handle that stops its stopwatch on every exit path
pub struct StopGuard<'a> {
    watch: &'a Stopwatch,
}

impl StopGuard<'_> {
    /// Stop the guarded stopwatch early; the eventual drop becomes a no-op
    pub fn stop(&self) -> bool {
        self.watch.stop()
    }

    /// Direct access to the guarded stopwatch
    pub fn watch(&self) -> &Stopwatch {
        self.watch
    }
}

impl Drop for StopGuard<'_> {
    fn drop(&mut self) {
        self.watch.stop();
    }
}
