//! Event hierarchy tracker
//!
//! A stack machine over timed events that models nested or sequential timing
//! scopes. The tracker keeps a "current" event plus a stack of suspended
//! ancestors, and hands out events whose stopwatches deliberately alias
//! timestamp cells: a `next_event` starts exactly where its predecessor
//! stopped, a `push_first_event` child starts with its parent, and a
//! `pop_last_event` sibling ends with its parent - all without extra clock
//! reads.
//!
//! The bottom of the stack is the permanent "total" scope. It is held in its
//! own field rather than as a stack entry, so no operation can pop it by
//! construction; the effective stack depth is `suspended.len() + 1`.
//!
//! No operation fails. Every transition first completes the current event
//! (idempotent) before touching the stack, so out-of-order calls cannot
//! corrupt the hierarchy.

use crate::event::{Event, TimedEvent};
use crate::stopwatch::Stopwatch;
use std::rc::Rc;

/// Tracks a consistent hierarchy of timed events for one logical unit of
/// work.
///
/// Construct one tracker per unit of work; the tracker takes no ambient
/// state. Time spent constructing the tracker is captured in
/// [`EventTracker::setup_event`], and time between construction and the first
/// real event in [`EventTracker::before_first_event`].
pub struct EventTracker {
    current: Event,
    /// suspended ancestors, innermost last; never contains the total scope
    suspended: Vec<Event>,
    setup: Event,
    before_first: Event,
    total: Event,
}

impl EventTracker {
    pub fn new() -> Self {
        let setup_watch = Stopwatch::new();
        // the total scope starts the instant setup ends, and before-first
        // starts together with it
        let total_watch = setup_watch.create_sibling();
        let before_first_watch = total_watch.create_child();

        let setup = TimedEvent::new(setup_watch);
        let total = TimedEvent::new(total_watch);
        let before_first = TimedEvent::new(before_first_watch);

        let tracker = Self {
            current: Rc::clone(&before_first),
            suspended: Vec::new(),
            setup,
            before_first,
            total,
        };
        tracker.setup.complete();
        log::debug!("event tracker ready, setup took {} ticks", tracker.setup.time_data().elapsed_ticks());
        tracker
    }

    /// Time spent constructing the tracker
    pub fn setup_event(&self) -> Event {
        Rc::clone(&self.setup)
    }

    /// Time between constructing the tracker and the first real event
    pub fn before_first_event(&self) -> Event {
        Rc::clone(&self.before_first)
    }

    /// Timing inclusive of tracker setup and the wait for the first event.
    /// Generally less useful than [`EventTracker::total_event`].
    pub fn setup_inclusive_total_event(&self) -> Event {
        Rc::clone(&self.total)
    }

    /// The total time between the first event and the completion of the last
    /// event, computed fresh on each call.
    pub fn total_event(&self) -> Event {
        // starts when before-first stops, ends when the total scope ends
        TimedEvent::new(
            self.before_first
                .time_data()
                .last_sibling(self.total.time_data()),
        )
    }

    /// Current stack depth, including the permanent total scope. Primarily a
    /// diagnostic and test hook.
    pub fn stack_size(&self) -> usize {
        self.suspended.len() + 1
    }

    /// Complete the current event and start a new one at the instant the
    /// previous one stopped.
    ///
    /// If the previous event was stopped before this call, the new event
    /// still begins at that earlier stop; the gap is not lost.
    pub fn next_event(&mut self) -> Event {
        self.current.complete();
        self.current = TimedEvent::new(self.current.time_data().create_sibling());
        Rc::clone(&self.current)
    }

    /// Complete the current event and start an independently timed one whose
    /// start is the clock reading of this call.
    pub fn new_event(&mut self) -> Event {
        self.current.complete();
        self.current = TimedEvent::new(Stopwatch::new());
        Rc::clone(&self.current)
    }

    /// Complete the current event and adopt a caller-supplied stopwatch as
    /// the new current event.
    ///
    /// The event is managed like any other, but its timing follows whatever
    /// state the supplied stopwatch is in.
    pub fn add_custom_event(&mut self, watch: Stopwatch) -> Event {
        self.current.complete();
        self.current = TimedEvent::new(watch);
        Rc::clone(&self.current)
    }

    /// Suspend the current event and enter a child scope that shares its
    /// start instant, avoiding a clock read.
    pub fn push_first_event(&mut self) -> Event {
        self.leave_before_first();
        let child = self.current.time_data().create_child();
        self.push_scope(child)
    }

    /// Suspend the current event and enter a child scope with independent
    /// timing (its own clock read).
    pub fn push_event(&mut self) -> Event {
        self.leave_before_first();
        self.push_scope(Stopwatch::new())
    }

    /// Suspend the current event and enter a child scope defined by a
    /// caller-supplied stopwatch.
    pub fn push_custom_event(&mut self, watch: Stopwatch) -> Event {
        self.leave_before_first();
        self.push_scope(watch)
    }

    /// Complete the current event and leave its scope through a synthesized
    /// "last sibling": an event starting where the current one stopped and
    /// ending exactly when the enclosing scope ends.
    ///
    /// The returned event and the enclosing scope are completion-linked:
    /// whichever finishes first drags the other to completion. The enclosing
    /// scope becomes current; the return value is the synthesized event.
    pub fn pop_last_event(&mut self) -> Event {
        self.current.complete();
        let next = match self.suspended.pop() {
            Some(event) => event,
            // cannot pop below the root scope
            None => Rc::clone(&self.current),
        };

        let result = TimedEvent::new(self.current.time_data().last_sibling(next.time_data()));

        // link the completion behaviors between the two so they coincide
        next.link_held(&result);
        result.link_tracked(&next);

        log::trace!("pop_last_event, depth {}", self.stack_size());
        self.current = next;
        result
    }

    /// Complete the current event and resume the scope on top of the stack.
    ///
    /// At the root this is a no-op on the stack: the current event is still
    /// completed and returned.
    pub fn pop_event(&mut self) -> Event {
        self.current.complete();
        if let Some(next) = self.suspended.pop() {
            self.current = next;
            log::trace!("pop_event, depth {}", self.stack_size());
        }
        Rc::clone(&self.current)
    }

    /// Pop scopes, completing each visited event, until `target` (compared by
    /// identity) becomes current. The target itself is not completed.
    ///
    /// If the target is not on the path, every scope down to the root is
    /// popped.
    pub fn pop_to_event(&mut self, target: &Event) -> Event {
        self.pop_to_event_plus(target, 0)
    }

    /// Like [`EventTracker::pop_to_event`], then pop `extra_pops` more levels
    pub fn pop_to_event_plus(&mut self, target: &Event, mut extra_pops: usize) -> Event {
        if self.suspended.is_empty() {
            self.current.complete();
            return Rc::clone(&self.current);
        }
        let mut found = false;
        loop {
            if Rc::ptr_eq(&self.current, target) {
                found = true;
            }
            if found {
                if extra_pops == 0 {
                    break;
                }
                extra_pops -= 1;
            }

            self.current.complete();
            match self.suspended.pop() {
                Some(next) => self.current = next,
                None => break,
            }
        }
        log::trace!("pop_to_event, depth {}", self.stack_size());
        Rc::clone(&self.current)
    }

    /// Pop through and including `target`, landing on its parent scope. The
    /// target is completed in the process, the parent is not.
    pub fn pop_complete(&mut self, target: &Event) -> Event {
        self.pop_to_event_plus(target, 1)
    }

    /// Complete the current event without any stack movement
    pub fn complete_event(&mut self) -> Event {
        self.current.complete();
        Rc::clone(&self.current)
    }

    /// Complete the current event, every suspended scope, and the total
    /// scope; returns the computed [`EventTracker::total_event`].
    pub fn complete(&mut self) -> Event {
        self.current.complete();
        while let Some(next) = self.suspended.pop() {
            self.current = next;
            // some of these may already be linked-complete, but completion is
            // idempotent so completing again is safe
            self.current.complete();
        }

        self.total.complete();
        log::debug!("tracker complete, total {} ms", self.total_event().time_data().elapsed_millis());
        self.total_event()
    }

    /// Nesting inside the before-first region is not meaningful, so push
    /// operations first advance onto a real event.
    fn leave_before_first(&mut self) {
        if Rc::ptr_eq(&self.current, &self.before_first) {
            self.next_event();
        }
    }

    fn push_scope(&mut self, watch: Stopwatch) -> Event {
        self.suspended.push(Rc::clone(&self.current));
        self.current = TimedEvent::new(watch);
        log::trace!("push, depth {}", self.stack_size());
        Rc::clone(&self.current)
    }
}

impl Default for EventTracker {
    fn default() -> Self {
        Self::new()
    }
}
