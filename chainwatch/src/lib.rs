//! Chainwatch - chained interval stopwatches and an event hierarchy tracker
//!
//! A low-overhead primitive for instrumenting code paths with nested and
//! sequential timing regions. The core trick is that stopwatches share their
//! endpoint timestamps by reference: one interval's stop event doubles as the
//! next interval's start event, so chaining regions costs no extra clock
//! reads and stays correct even when a region is stopped later than expected.
//!
//! # Architecture
//!
//! - [`Stopwatch`] - a single-use interval `[start, stop)` whose endpoints
//!   can be aliased with other stopwatches (child, sibling, last-sibling
//!   relationships)
//! - [`TimedEvent`] - a stopwatch plus one-shot completion behaviors
//! - [`EventTracker`] - a stack machine handing out events for nested or
//!   sequential scopes while keeping their start/stop linkage consistent
//! - [`TimingModeller`] - maps a fixed hierarchy up front and replays it
//!   through a single advancement handle
//!
//! The library is single-threaded and synchronous by design: no operation
//! blocks, suspends, or is safe to share across threads.
//!
//! # Example Usage
//!
//! ```
//! use chainwatch::EventTracker;
//!
//! let mut tracker = EventTracker::new();
//!
//! let parse = tracker.new_event();
//! // ... parse input ...
//!
//! // starts at the instant `parse` stops, no clock read needed
//! let process = tracker.next_event();
//! process.when_complete(|e| {
//!     log::info!("processing took {} ms", e.time_data().elapsed_millis());
//! });
//! // ... process ...
//!
//! let total = tracker.complete();
//! assert!(!total.time_data().is_active());
//! ```

// Public modules
pub mod event;
pub mod modeller;
pub mod stopwatch;
pub mod tracker;
pub mod types;

// Re-export main types for convenience
pub use event::{Event, TimedEvent};
pub use modeller::{ModelAdvancer, TimingModeller};
pub use stopwatch::{StopGuard, Stopwatch};
pub use tracker::EventTracker;
pub use types::{Result, Ticks, TimerError};

// Internal modules (not exposed in public API)
mod cell;
mod clock;

pub use clock::TICKS_PER_MILLISECOND;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
