//! Chainwatch-log - `log`-facade integration for the chainwatch tracker
//!
//! Wraps an [`EventTracker`] so that every event it hands out carries a log
//! target, a log level, and a shared set of behaviors. Creation behaviors run
//! the moment an event is constructed; completion behaviors are attached with
//! `when_complete` and fire when the event stops. Stock behaviors live in
//! [`behaviors`].
//!
//! # Example Usage
//!
//! ```
//! use chainwatch_log::{behaviors, LoggedTracker};
//! use log::Level;
//!
//! let mut tracker = LoggedTracker::new("pipeline");
//! tracker.on_completion(behaviors::log_elapsed());
//!
//! let _parse = tracker.new_event(Level::Debug);
//! // ... parse input ...
//! let _process = tracker.next_event(Level::Info);
//! // ... process ...
//!
//! // logs "pipeline: event completed in N ms" per event
//! tracker.complete();
//! ```

pub mod behaviors;

use chainwatch::{Event, EventTracker, Stopwatch, TimedEvent};
use log::Level;
use std::rc::Rc;

/// A behavior applied to events handed out by a [`LoggedTracker`].
///
/// Receives the event, the tracker's log target, and the level the event was
/// created at.
pub type EventBehavior = Rc<dyn Fn(&TimedEvent, &'static str, Level)>;

/// An [`EventTracker`] whose events log through a fixed target.
///
/// Behaviors registered on the tracker apply to every event created through
/// the leveled constructors. Events created before a behavior is registered
/// are not retrofitted.
pub struct LoggedTracker {
    tracker: EventTracker,
    target: &'static str,
    creation_behaviors: Vec<EventBehavior>,
    completion_behaviors: Vec<EventBehavior>,
}

impl LoggedTracker {
    /// Create a tracker whose events log under `target`
    pub fn new(target: &'static str) -> Self {
        Self {
            tracker: EventTracker::new(),
            target,
            creation_behaviors: Vec::new(),
            completion_behaviors: Vec::new(),
        }
    }

    /// The log target events are emitted under
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Run `behavior` immediately for every event created from now on
    pub fn on_creation(&mut self, behavior: EventBehavior) -> &mut Self {
        self.creation_behaviors.push(behavior);
        self
    }

    /// Run `behavior` when any event created from now on completes
    pub fn on_completion(&mut self, behavior: EventBehavior) -> &mut Self {
        self.completion_behaviors.push(behavior);
        self
    }

    /// See [`EventTracker::next_event`]
    pub fn next_event(&mut self, level: Level) -> Event {
        let event = self.tracker.next_event();
        self.decorate(event, level)
    }

    /// See [`EventTracker::new_event`]
    pub fn new_event(&mut self, level: Level) -> Event {
        let event = self.tracker.new_event();
        self.decorate(event, level)
    }

    /// See [`EventTracker::add_custom_event`]
    pub fn add_custom_event(&mut self, level: Level, watch: Stopwatch) -> Event {
        let event = self.tracker.add_custom_event(watch);
        self.decorate(event, level)
    }

    /// See [`EventTracker::push_first_event`]
    pub fn push_first_event(&mut self, level: Level) -> Event {
        let event = self.tracker.push_first_event();
        self.decorate(event, level)
    }

    /// See [`EventTracker::push_event`]
    pub fn push_event(&mut self, level: Level) -> Event {
        let event = self.tracker.push_event();
        self.decorate(event, level)
    }

    /// See [`EventTracker::push_custom_event`]
    pub fn push_custom_event(&mut self, level: Level, watch: Stopwatch) -> Event {
        let event = self.tracker.push_custom_event(watch);
        self.decorate(event, level)
    }

    /// See [`EventTracker::pop_last_event`]
    pub fn pop_last_event(&mut self, level: Level) -> Event {
        let event = self.tracker.pop_last_event();
        self.decorate(event, level)
    }

    /// See [`EventTracker::pop_event`]. Pop-side operations return events
    /// that were already decorated on creation, so no level is taken.
    pub fn pop_event(&mut self) -> Event {
        self.tracker.pop_event()
    }

    /// See [`EventTracker::pop_to_event`]
    pub fn pop_to_event(&mut self, target: &Event) -> Event {
        self.tracker.pop_to_event(target)
    }

    /// See [`EventTracker::pop_complete`]
    pub fn pop_complete(&mut self, target: &Event) -> Event {
        self.tracker.pop_complete(target)
    }

    /// See [`EventTracker::complete_event`]
    pub fn complete_event(&mut self) -> Event {
        self.tracker.complete_event()
    }

    /// See [`EventTracker::complete`]
    pub fn complete(&mut self) -> Event {
        self.tracker.complete()
    }

    /// See [`EventTracker::stack_size`]
    pub fn stack_size(&self) -> usize {
        self.tracker.stack_size()
    }

    /// See [`EventTracker::setup_event`]
    pub fn setup_event(&self) -> Event {
        self.tracker.setup_event()
    }

    /// See [`EventTracker::before_first_event`]
    pub fn before_first_event(&self) -> Event {
        self.tracker.before_first_event()
    }

    /// See [`EventTracker::total_event`]
    pub fn total_event(&self) -> Event {
        self.tracker.total_event()
    }

    /// Access the wrapped tracker for operations without logging concerns
    pub fn tracker_mut(&mut self) -> &mut EventTracker {
        &mut self.tracker
    }

    fn decorate(&self, event: Event, level: Level) -> Event {
        let target = self.target;
        for behavior in &self.completion_behaviors {
            let behavior = Rc::clone(behavior);
            event.when_complete(move |e| behavior(e, target, level));
        }
        for behavior in &self.creation_behaviors {
            behavior(&event, target, level);
        }
        event
    }
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
