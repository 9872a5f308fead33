//! Timed events: a stopwatch plus deferred completion behaviors
//!
//! An event owns one stopwatch and an ordered list of behaviors that fire
//! exactly once each when the event completes. A cursor tracks how far the
//! list has been fired, so behaviors registered after completion has already
//! begun (including from inside another behavior) still run on the next
//! completion pass.
//!
//! Completion itself is reserved for the tracker (`pub(crate)`); consumers
//! observe events through [`TimedEvent::time_data`] and register behaviors
//! through [`TimedEvent::when_complete`], but cannot force-complete events
//! they did not create.

use crate::stopwatch::Stopwatch;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Shared handle to a timed event
pub type Event = Rc<TimedEvent>;

type CompletionFn = Rc<dyn Fn(&TimedEvent)>;

/// A completion subscription between two events whose lifetimes are tied
/// together.
///
/// The surviving scope holds its synthesized last-sibling strongly so the
/// sibling's behaviors stay alive even when the caller discards the handle;
/// the reverse direction is weak to avoid a reference cycle.
enum CompletionPartner {
    Held(Event),
    Tracked(Weak<TimedEvent>),
}

impl CompletionPartner {
    fn upgrade(&self) -> Option<Event> {
        match self {
            CompletionPartner::Held(event) => Some(Rc::clone(event)),
            CompletionPartner::Tracked(weak) => weak.upgrade(),
        }
    }
}

/// An event with a duration: it has both a start and an end, and carries
/// behaviors to run once the end is recorded.
pub struct TimedEvent {
    watch: Stopwatch,
    behaviors: RefCell<Vec<CompletionFn>>,
    /// index of the first behavior that has not fired yet
    fired: Cell<usize>,
    partners: RefCell<Vec<CompletionPartner>>,
    /// index of the first partner not yet propagated to
    propagated: Cell<usize>,
}

impl TimedEvent {
    pub(crate) fn new(watch: Stopwatch) -> Event {
        Rc::new(Self {
            watch,
            behaviors: RefCell::new(Vec::new()),
            fired: Cell::new(0),
            partners: RefCell::new(Vec::new()),
            propagated: Cell::new(0),
        })
    }

    /// Read-only timing data for the event
    pub fn time_data(&self) -> &Stopwatch {
        &self.watch
    }

    /// Register a behavior to run when the event completes. Returns the event
    /// for chaining.
    ///
    /// Behaviors fire in registration order, each at most once. Registering
    /// during completion is allowed; the new behavior fires before the
    /// completion call returns.
    pub fn when_complete(&self, behavior: impl Fn(&TimedEvent) + 'static) -> &Self {
        self.behaviors.borrow_mut().push(Rc::new(behavior));
        self
    }

    /// Tie `partner`'s completion to this event's, keeping the partner alive
    pub(crate) fn link_held(&self, partner: &Event) {
        self.partners
            .borrow_mut()
            .push(CompletionPartner::Held(Rc::clone(partner)));
    }

    /// Tie `partner`'s completion to this event's without owning it
    pub(crate) fn link_tracked(&self, partner: &Event) {
        self.partners
            .borrow_mut()
            .push(CompletionPartner::Tracked(Rc::downgrade(partner)));
    }

    /// Stop the underlying stopwatch, drag linked partners to completion, and
    /// fire all not-yet-fired behaviors in registration order.
    ///
    /// Safe to call multiple times: later calls stop nothing, but partners
    /// linked and behaviors registered since the previous call are still
    /// picked up. Each partner is propagated to exactly once, which is what
    /// keeps the mutual back-link from recursing forever.
    pub(crate) fn complete(&self) {
        self.watch.stop();
        self.propagate_pending();
        self.fire_pending();
    }

    fn propagate_pending(&self) {
        loop {
            let next = {
                let partners = self.partners.borrow();
                let index = self.propagated.get();
                if index >= partners.len() {
                    break;
                }
                self.propagated.set(index + 1);
                partners[index].upgrade()
            };
            // borrow released: the partner's completion may re-enter ours
            if let Some(partner) = next {
                partner.complete();
            }
        }
    }

    fn fire_pending(&self) {
        loop {
            let next = {
                let behaviors = self.behaviors.borrow();
                let index = self.fired.get();
                if index >= behaviors.len() {
                    break;
                }
                self.fired.set(index + 1);
                Rc::clone(&behaviors[index])
            };
            // borrow released: the behavior may register further behaviors
            // or re-enter completion
            next(self);
        }
    }
}

impl std::fmt::Debug for TimedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedEvent")
            .field("watch", &self.watch)
            .field("behaviors", &self.behaviors.borrow().len())
            .field("fired", &self.fired.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fresh_event() -> Event {
        TimedEvent::new(Stopwatch::new())
    }

    #[test]
    fn test_complete_stops_the_watch() {
        let event = fresh_event();
        assert!(event.time_data().is_active());
        event.complete();
        assert!(!event.time_data().is_active());
    }

    #[test]
    fn test_behaviors_fire_in_registration_order() {
        let event = fresh_event();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            event.when_complete(move |_| order.borrow_mut().push(tag));
        }

        event.complete();
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_behaviors_fire_at_most_once() {
        let event = fresh_event();
        let count = Rc::new(Cell::new(0));
        {
            let count = Rc::clone(&count);
            event.when_complete(move |_| count.set(count.get() + 1));
        }

        event.complete();
        event.complete();
        event.complete();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_late_registration_fires_on_next_completion() {
        let event = fresh_event();
        event.complete();

        let count = Rc::new(Cell::new(0));
        {
            let count = Rc::clone(&count);
            event.when_complete(move |_| count.set(count.get() + 1));
        }
        assert_eq!(count.get(), 0, "registration alone must not fire");

        // second completion stops nothing but fires the late behavior
        event.complete();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_registration_from_inside_a_behavior_fires_in_the_same_pass() {
        let event = fresh_event();
        let count = Rc::new(Cell::new(0));
        {
            let count = Rc::clone(&count);
            event.when_complete(move |e| {
                let count = Rc::clone(&count);
                e.when_complete(move |_| count.set(count.get() + 1));
            });
        }

        event.complete();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_linked_partners_complete_each_other_once() {
        let a = fresh_event();
        let b = fresh_event();
        a.link_held(&b);
        b.link_tracked(&a);

        let fired = Rc::new(Cell::new(0));
        {
            let fired = Rc::clone(&fired);
            b.when_complete(move |_| fired.set(fired.get() + 1));
        }

        // completing a drags b along; the back-link must not recurse forever
        a.complete();
        assert!(!a.time_data().is_active());
        assert!(!b.time_data().is_active());
        assert_eq!(fired.get(), 1);

        b.complete();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_partner_linked_after_completion_propagates_on_next_pass() {
        let a = fresh_event();
        a.complete();

        // linkage installed once a is already complete
        let b = fresh_event();
        a.link_held(&b);
        b.link_tracked(&a);
        assert!(b.time_data().is_active());

        let fired = Rc::new(Cell::new(0));
        {
            let fired = Rc::clone(&fired);
            b.when_complete(move |_| fired.set(fired.get() + 1));
        }

        a.complete();
        assert!(!b.time_data().is_active());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_held_partner_outlives_the_callers_handle() {
        let a = fresh_event();
        let fired = Rc::new(Cell::new(0));
        {
            let b = fresh_event();
            let fired = Rc::clone(&fired);
            b.when_complete(move |_| fired.set(fired.get() + 1));
            a.link_held(&b);
            // caller drops its handle to b here
        }

        a.complete();
        assert_eq!(fired.get(), 1);
    }
}
