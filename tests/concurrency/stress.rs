//! Stress Tests
//!
//! Heavy-workload tests for concurrency. All marked #[ignore] for opt-in execution.
//! Run with: cargo test --test concurrency stress -- --ignored

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

fn bump(value: &Value) -> Value {
    let n: u64 = value.as_str().and_then(|s| s.parse().ok()).unwrap_or(0);
    Value::from((n + 1).to_string())
}

/// Many threads hammering a handful of counters
#[test]
#[ignore]
fn stress_many_counters() {
    const THREADS: usize = 16;
    const PER_THREAD: u64 = 2_000;
    const COUNTERS: u32 = 4;

    let db = Database::new();
    let barrier = Arc::new(Barrier::new(THREADS));
    let start = Instant::now();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut session = Session::new(db);
                let key = t as u32 % COUNTERS;
                barrier.wait();
                for _ in 0..PER_THREAD {
                    session.cas_update(key, &RetryConfig::new(), bump).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let per_counter = THREADS as u64 / COUNTERS as u64 * PER_THREAD;
    for key in 0..COUNTERS {
        assert_eq!(
            db.entry(Key::new(key)).value,
            Value::from(per_counter.to_string())
        );
    }

    let stats = db.stats();
    println!(
        "{} commits, {} aborts in {:?}",
        stats.committed,
        stats.aborted,
        start.elapsed()
    );
}

/// Backoff still converges under heavy contention
#[test]
#[ignore]
fn stress_counter_with_backoff() {
    const THREADS: usize = 8;
    const PER_THREAD: u64 = 200;

    let db = Database::new();
    let retry = RetryConfig::new().with_base_delay_ms(1).with_max_delay_ms(4);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let db = Arc::clone(&db);
            let retry = retry.clone();
            thread::spawn(move || {
                let mut session = Session::new(db);
                for _ in 0..PER_THREAD {
                    session.cas_update(0, &retry, bump).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = THREADS as u64 * PER_THREAD;
    assert_eq!(db.entry(Key::new(0)).value, Value::from(total.to_string()));
}
