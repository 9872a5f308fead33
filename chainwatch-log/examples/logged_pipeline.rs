//! Logged pipeline demo
//!
//! The same pipeline shape as the core crate's nested_scopes example, but
//! every phase logs its own lifecycle through the `log` facade instead of
//! being reported by hand.
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example logged_pipeline

use chainwatch_log::{behaviors, LoggedTracker};
use log::Level;
use std::thread::sleep;
use std::time::Duration;

fn busy(millis: u64) {
    sleep(Duration::from_millis(millis));
}

fn main() {
    env_logger::init();

    let mut tracker = LoggedTracker::new("pipeline");
    tracker.on_creation(behaviors::log_started());
    tracker.on_completion(behaviors::log_elapsed());

    tracker.new_event(Level::Debug);
    busy(30);

    tracker.next_event(Level::Info);
    tracker.push_first_event(Level::Debug);
    busy(20);
    tracker.next_event(Level::Debug);
    busy(40);
    tracker.pop_last_event(Level::Debug);

    tracker.next_event(Level::Debug);
    busy(10);

    let total = tracker.complete();
    println!(
        "pipeline finished in {} ms",
        total.time_data().elapsed_millis()
    );
}
