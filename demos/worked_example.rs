//! The worked example: a one-hour window, two keys, three checkpoints.
//!
//! This example shows how to:
//! 1. Build a map around a clock you control
//! 2. Insert values and read them back within the window
//! 3. Watch keys expire and the average follow them
//! 4. Share the map between threads
//!
//! Run with: cargo run --example worked_example

use chrono::Duration;
use std::thread;

use windowed_map::{Lookup, ManualClock, SharedWindowedMap, WindowedMap};

fn main() {
    println!("Windowed Map - Worked Example");
    println!("=============================");
    println!();

    let clock = ManualClock::at_epoch();
    let mut map = match WindowedMap::with_clock(60 * 60 * 1000, clock.clone()) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Error creating map: {e}");
            std::process::exit(1);
        }
    };

    // 0:00:00 and 0:05:00
    map.put("foo", 42);
    clock.advance(Duration::minutes(5));
    map.put("bar", 76);

    // 0:50:00
    clock.advance(Duration::minutes(45));
    report("0:50:00", &mut map);

    // 1:02:00, foo is 62 minutes old
    clock.advance(Duration::minutes(12));
    report("1:02:00", &mut map);

    // 1:06:00, bar is 61 minutes old
    clock.advance(Duration::minutes(4));
    report("1:06:00", &mut map);

    println!();
    println!("{}", map.stats().summary());

    // The same map behind a lock, written from several threads.
    println!();
    println!("Shared map");
    println!("----------");
    let shared = SharedWindowedMap::new(map);
    let writers: Vec<_> = (1..=3)
        .map(|n| {
            let shared = shared.clone();
            thread::spawn(move || shared.put(format!("worker-{n}"), n * 10))
        })
        .collect();
    for writer in writers {
        if writer.join().is_err() {
            eprintln!("A writer thread panicked");
        }
    }
    println!("average after three writers: {}", shared.get_average());
}

fn report(label: &str, map: &mut WindowedMap<ManualClock>) {
    let describe = |lookup: Lookup| match lookup {
        Lookup::Live(value) => value.to_string(),
        Lookup::Expired => "nothing (expired)".to_string(),
        Lookup::Absent => "nothing (absent)".to_string(),
    };

    println!(
        "[{label}] foo = {}, bar = {}, average = {}",
        describe(map.lookup("foo")),
        describe(map.lookup("bar")),
        map.get_average()
    );
}
