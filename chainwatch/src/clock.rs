//! Process-local monotonic tick source
//!
//! Ticks are nanoseconds measured from a lazily captured process origin
//! (`Instant`). Tick `0` is reserved for "unset" timestamp cells, so the
//! clock never hands it out.
//!
//! Calendar conversion works by reading both clocks once and offsetting:
//! calendar(T) = now_utc - (now_ticks - T). That is accurate for short
//! intervals; over long runs the two clocks drift apart, which is accepted.

use crate::types::Ticks;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Number of ticks in one millisecond
pub const TICKS_PER_MILLISECOND: Ticks = 1_000_000;

static ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Read the monotonic clock. Never returns 0.
pub(crate) fn now() -> Ticks {
    let ticks = ORIGIN.get_or_init(Instant::now).elapsed().as_nanos() as Ticks;
    // the very first read can land on the origin itself
    ticks.max(1)
}

/// Convert a tick count to a wall-clock duration
pub(crate) fn ticks_to_duration(ticks: Ticks) -> Duration {
    Duration::from_nanos(ticks)
}

/// Convert a wall-clock duration to ticks
pub(crate) fn duration_to_ticks(duration: Duration) -> Ticks {
    duration.as_nanos() as Ticks
}

/// Estimate the calendar time at which `tick` was recorded
pub(crate) fn approximate_date_time(tick: Ticks) -> DateTime<Utc> {
    let now_ticks = now();
    let now_utc = Utc::now();
    // `tick` is always in the past, so the offset is non-negative
    now_utc - ChronoDuration::nanoseconds(now_ticks.saturating_sub(tick) as i64)
}
