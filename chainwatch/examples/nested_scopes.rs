//! Nested timing scopes demo
//!
//! Simulates a small three-phase pipeline (load, two-stage transform, store)
//! and prints how the tracker partitions the wall time between phases. Run
//! with RUST_LOG=trace to also see the tracker's own stack transitions.
//!
//! Usage:
//!   cargo run --example nested_scopes

use chainwatch::{Event, EventTracker};
use std::thread::sleep;
use std::time::Duration;

fn busy(millis: u64) {
    sleep(Duration::from_millis(millis));
}

fn report(label: &str, event: &Event) {
    println!("  {:<18} {:>5} ms", label, event.time_data().elapsed_millis());
}

fn main() {
    env_logger::init();

    let mut tracker = EventTracker::new();

    let load = tracker.new_event();
    busy(30);

    // the transform phase starts at the exact instant loading stopped
    let transform = tracker.next_event();
    let stage_a = tracker.push_first_event();
    busy(20);
    let stage_b = tracker.next_event();
    busy(40);
    // stage_b's stop doubles as the end of the whole transform phase
    let tail = tracker.pop_last_event();

    let store = tracker.next_event();
    busy(10);

    let total = tracker.complete();

    println!("pipeline timing:");
    report("load", &load);
    report("transform", &transform);
    report("  stage a", &stage_a);
    report("  stage b", &stage_b);
    report("  tail", &tail);
    report("store", &store);
    report("total", &total);
    println!(
        "tracker overhead: setup {} ticks",
        tracker.setup_event().time_data().elapsed_ticks()
    );
}
