//! Readers sampling the counter while another thread plays the tick interrupt.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use systime::sleep::sleep_ms;
use systime::{Millis, NoHeartbeat, TickCounter};


const TICKS: Millis = 2_000_000;


#[test]
fn test_readers_never_observe_torn_or_decreasing_values() {
    static COUNTER: TickCounter = TickCounter::new();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last = COUNTER.now();
                let mut samples = 0u64;
                while !done.load(Ordering::Acquire) {
                    let current = COUNTER.now();
                    assert!(current >= last, "counter went backwards: {} -> {}", last, current);
                    assert!(current <= TICKS, "counter beyond the number of ticks: {}", current);
                    last = current;
                    samples += 1;
                }
                samples
            })
        })
        .collect();

    let ticker = thread::spawn(|| {
        for _ in 0..TICKS {
            COUNTER.on_tick(&mut NoHeartbeat);
        }
    });
    ticker.join().unwrap();
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(COUNTER.now(), TICKS);
}


#[test]
fn test_readers_across_wraparound() {
    static COUNTER: TickCounter = TickCounter::starting_at(Millis::MAX - 50_000);
    let start = COUNTER.now();
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            // compare elapsed time instead of raw values since the raw value wraps
            let mut last_elapsed = 0;
            while !done.load(Ordering::Acquire) {
                let elapsed = COUNTER.elapsed_since(start);
                assert!(elapsed >= last_elapsed, "elapsed went backwards: {} -> {}", last_elapsed, elapsed);
                last_elapsed = elapsed;
            }
        })
    };

    for _ in 0..100_000 {
        COUNTER.on_tick(&mut NoHeartbeat);
    }
    done.store(true, Ordering::Release);
    reader.join().unwrap();

    assert_eq!(COUNTER.now(), 100_000 - 50_000 - 1);
    assert_eq!(COUNTER.elapsed_since(start), 100_000);
}


#[test]
fn test_sleep_with_live_ticker() {
    static COUNTER: TickCounter = TickCounter::new();
    let done = Arc::new(AtomicBool::new(false));

    let ticker = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                COUNTER.on_tick(&mut NoHeartbeat);
                thread::sleep(Duration::from_micros(20));
            }
        })
    };

    for &duration in &[0, 1, 10, 100] {
        let start = COUNTER.now();
        sleep_ms(&COUNTER, duration);
        assert!(COUNTER.elapsed_since(start) >= duration);
    }

    done.store(true, Ordering::Release);
    ticker.join().unwrap();
}


#[test]
#[ignore = "performs 2**32 ticks"]
fn test_full_wraparound_returns_to_start() {
    let counter = TickCounter::starting_at(12_345);
    for _ in 0..=Millis::MAX {
        counter.on_tick(&mut NoHeartbeat);
    }
    assert_eq!(counter.now(), 12_345);
}
