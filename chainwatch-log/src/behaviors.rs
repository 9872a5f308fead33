//! Stock behaviors for [`LoggedTracker`](crate::LoggedTracker)

use crate::EventBehavior;
use std::rc::Rc;

/// Logs "event completed in N ms" at the event's level when it stops.
///
/// Register with
/// [`LoggedTracker::on_completion`](crate::LoggedTracker::on_completion).
pub fn log_elapsed() -> EventBehavior {
    Rc::new(|event, target, level| {
        log::log!(
            target: target,
            level,
            "event completed in {} ms",
            event.time_data().elapsed_millis()
        );
    })
}

/// Logs "event started" at the event's level the moment it is created.
///
/// Register with
/// [`LoggedTracker::on_creation`](crate::LoggedTracker::on_creation).
pub fn log_started() -> EventBehavior {
    Rc::new(|_event, target, level| {
        log::log!(target: target, level, "event started");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoggedTracker;
    use log::Level;

    #[test]
    fn test_stock_behaviors_run_without_panicking() {
        let mut tracker = LoggedTracker::new("behaviors");
        tracker.on_creation(log_started());
        tracker.on_completion(log_elapsed());

        tracker.new_event(Level::Trace);
        tracker.next_event(Level::Trace);
        tracker.complete();
        assert_eq!(tracker.stack_size(), 1);
    }
}
