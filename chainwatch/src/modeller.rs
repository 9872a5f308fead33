//! Pre-planned timing hierarchies
//!
//! The tracker builds its hierarchy as the instrumented code runs. The
//! modeller is the opposite mode: map a complete hierarchy up front, then
//! replay it sequentially through repeated calls to a single advancement
//! handle. Useful when the shape of the timed region is fixed and the
//! instrumentation points should stay trivial.
//!
//! Once the advancement handle has been generated the modeller is finalized;
//! every later mapping call is rejected with
//! [`TimerError::ModellerFinalized`].

use crate::stopwatch::Stopwatch;
use crate::types::{Result, TimerError};

/// Maps a timing hierarchy up front for sequential replay.
///
/// Three timers exist from the start: `setup` (time spent mapping, stopped
/// when construction finishes), `total` (the whole modelled hierarchy), and
/// `before_start` (time until the first advancement call).
pub struct TimingModeller {
    setup: Stopwatch,
    total: Stopwatch,
    before_start: Stopwatch,
    /// open scopes, innermost last; the total scope is always at the bottom
    parents: Vec<Stopwatch>,
    /// replay sequence handed to the advancer, in visit order
    sequence: Vec<Stopwatch>,
    /// `None` once the advancement handle has been generated
    current: Option<Stopwatch>,
}

impl TimingModeller {
    pub fn new() -> Self {
        let setup = Stopwatch::new();
        let total = setup.create_sibling();
        let before_start = total.create_child();

        let modeller = Self {
            current: Some(before_start.clone()),
            parents: vec![total.clone()],
            sequence: vec![before_start.clone()],
            setup,
            total,
            before_start,
        };
        modeller.setup.stop();
        log::debug!("timing modeller ready");
        modeller
    }

    /// Time spent creating the modeller
    pub fn setup_timer(&self) -> &Stopwatch {
        &self.setup
    }

    /// Time spent during the entire modelled hierarchy
    pub fn total_timer(&self) -> &Stopwatch {
        &self.total
    }

    /// Time spent before the advancement handle was first used
    pub fn before_start_timer(&self) -> &Stopwatch {
        &self.before_start
    }

    /// Map a timer sequential to the previous one. One advancement call is
    /// required per mapped timer to stop it.
    pub fn add_next(&mut self) -> Result<Stopwatch> {
        let next = self.current()?.create_sibling();
        self.current = Some(next.clone());
        self.sequence.push(next.clone());
        Ok(next)
    }

    /// Map a timer that is the first child of the current scope, entering
    /// that scope. The child replaces its parent in the replay sequence
    /// because both start at the same instant.
    pub fn push_child(&mut self) -> Result<Stopwatch> {
        let current = self.current()?.clone();
        let child = current.create_child();
        self.parents.push(current);
        self.current = Some(child.clone());
        if let Some(last) = self.sequence.last_mut() {
            *last = child.clone();
        }
        Ok(child)
    }

    /// Map a timer that is the last child of the current scope: it starts
    /// when the previous timer stops and ends when the scope's parent ends.
    /// The scope is left automatically and no advancement call is consumed;
    /// the timer is never returned by the advancement handle.
    pub fn pop_next(&mut self) -> Result<Stopwatch> {
        let current = self.current()?;
        let parent = self
            .parents
            .last()
            .ok_or(TimerError::MissingArgument("parent"))?;
        let last = current.last_sibling(parent);
        self.current = Some(last.clone());
        self.pop()?;
        Ok(last)
    }

    /// Move up to the parent scope without mapping a timer. Saturates at the
    /// total scope.
    pub fn pop(&mut self) -> Result<()> {
        self.current()?;
        // never leave the total scope
        let at_root = self
            .parents
            .last()
            .is_some_and(|parent| parent.same_interval(&self.total));
        if at_root {
            return Ok(());
        }
        if let Some(parent) = self.parents.pop() {
            self.current = Some(parent.clone());
            self.sequence.push(parent);
        }
        Ok(())
    }

    /// Generate the advancement handle, closing the mapped hierarchy and
    /// finalizing the modeller.
    ///
    /// The first advancement call stops the before-start timer and returns
    /// the first mapped timer; each later call stops the previously returned
    /// timer and returns the next one. Once the sequence is exhausted every
    /// call returns the total timer, which is left for the caller to stop at
    /// the point the hierarchy truly ends.
    pub fn advancer(&mut self) -> Result<ModelAdvancer> {
        self.current()?;
        while self.parents.len() > 1 {
            self.pop()?;
        }
        self.current = None;

        let mut items = std::mem::take(&mut self.sequence).into_iter();
        // the sequence always begins with the before-start timer; the
        // advancer tracks it as the implicit previous timer instead
        items.next();

        log::debug!("timing modeller finalized");
        Ok(ModelAdvancer {
            items,
            previous: Some(self.before_start.clone()),
            total: self.total.clone(),
        })
    }

    fn current(&self) -> Result<&Stopwatch> {
        self.current.as_ref().ok_or(TimerError::ModellerFinalized)
    }
}

impl Default for TimingModeller {
    fn default() -> Self {
        Self::new()
    }
}

/// Replays a mapped hierarchy one timer at a time
pub struct ModelAdvancer {
    items: std::vec::IntoIter<Stopwatch>,
    previous: Option<Stopwatch>,
    total: Stopwatch,
}

impl ModelAdvancer {
    /// Stop the previously returned timer and return the next mapped one;
    /// returns the total timer (unstopped) once the sequence is exhausted.
    pub fn advance(&mut self) -> Stopwatch {
        match self.items.next() {
            Some(next) => {
                if let Some(previous) = self.previous.replace(next.clone()) {
                    previous.stop();
                }
                next
            }
            None => {
                if let Some(previous) = self.previous.take() {
                    previous.stop();
                }
                self.total.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_is_stopped_after_construction() {
        let modeller = TimingModeller::new();
        assert!(!modeller.setup_timer().is_active());
        assert!(modeller.total_timer().is_active());
    }

    #[test]
    fn test_flat_sequence_replay() -> Result<()> {
        let mut modeller = TimingModeller::new();
        let a = modeller.add_next()?;
        let b = modeller.add_next()?;

        let mut advancer = modeller.advancer()?;

        let first = advancer.advance();
        assert!(first.same_interval(&a));
        assert!(!modeller.before_start_timer().is_active());
        assert!(a.is_active());

        let second = advancer.advance();
        assert!(second.same_interval(&b));
        assert!(!a.is_active());
        assert!(b.is_active());

        // exhausted: b is stopped and the total comes back unstopped
        let tail = advancer.advance();
        assert!(tail.same_interval(modeller.total_timer()));
        assert!(!b.is_active());
        assert!(tail.is_active());

        tail.stop();
        assert!(!modeller.total_timer().is_active());
        Ok(())
    }

    #[test]
    fn test_nested_child_replaces_parent_in_replay() -> Result<()> {
        let mut modeller = TimingModeller::new();
        let parent = modeller.add_next()?;
        let child = modeller.push_child()?;
        let tail = modeller.pop_next()?;
        let after = modeller.add_next()?;

        let mut advancer = modeller.advancer()?;

        // the child stands in for its parent: both start together
        let first = advancer.advance();
        assert!(first.same_interval(&child));
        assert!(parent.is_active());

        // leaving the scope resumes the parent, then moves on
        let second = advancer.advance();
        assert!(second.same_interval(&parent));
        assert!(!child.is_active());

        let third = advancer.advance();
        assert!(third.same_interval(&after));
        assert!(!parent.is_active());
        // the pop_next timer ends with its parent, never via advance
        assert!(!tail.is_active());
        Ok(())
    }

    #[test]
    fn test_pop_saturates_at_the_total_scope() -> Result<()> {
        let mut modeller = TimingModeller::new();
        modeller.pop()?;
        modeller.pop()?;
        // still usable afterwards
        modeller.add_next()?;
        Ok(())
    }

    #[test]
    fn test_finalized_modeller_rejects_mapping_calls() {
        let mut modeller = TimingModeller::new();
        modeller.add_next().expect("not finalized yet");
        let _advancer = modeller.advancer().expect("first finalization");

        assert!(matches!(modeller.add_next(), Err(TimerError::ModellerFinalized)));
        assert!(matches!(modeller.push_child(), Err(TimerError::ModellerFinalized)));
        assert!(matches!(modeller.pop_next(), Err(TimerError::ModellerFinalized)));
        assert!(matches!(modeller.pop(), Err(TimerError::ModellerFinalized)));
        assert!(matches!(modeller.advancer(), Err(TimerError::ModellerFinalized)));
    }
}
