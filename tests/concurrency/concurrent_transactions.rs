//! Concurrent Transaction Tests
//!
//! Whole batches racing on overlapping keys stay atomic.

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

/// Every thread writes the same value to all keys at once; afterwards all
/// keys must agree, since batches never interleave.
#[test]
fn multi_key_writes_never_interleave() {
    const THREADS: usize = 6;
    const ROUNDS: usize = 200;
    let keys = [10u32, 11, 12, 13];

    let db = Database::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut session = Session::new(db);
                barrier.wait();
                for round in 0..ROUNDS {
                    let tag = format!("t{}r{}", t, round);
                    let batch = keys
                        .iter()
                        .fold(TxnBuilder::new(), |b, k| b.write(*k, tag.as_str()));
                    let result = session.execute(batch).unwrap();
                    assert_eq!(result.status, Status::Ok);

                    let observed = session
                        .execute(keys.iter().fold(TxnBuilder::new(), |b, k| b.read(*k)))
                        .unwrap();
                    let first = &observed.results[0];
                    assert!(observed
                        .results
                        .iter()
                        .all(|r| r.value == first.value && r.version == first.version));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = (THREADS * ROUNDS) as u64;
    for entry in snapshot(&db, &keys) {
        assert_eq!(entry.version, Version::new(total));
    }
}

/// A pair of keys transferred between under a version guard keeps its sum
#[test]
fn guarded_transfers_preserve_the_total() {
    const THREADS: usize = 4;
    const TRANSFERS: usize = 100;

    let db = Database::new();
    seed(&db, &[(1, "500"), (2, "500")]);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut session = Session::new(db);
                let (from, to) = if t % 2 == 0 { (1u32, 2u32) } else { (2, 1) };
                barrier.wait();
                let mut done = 0;
                while done < TRANSFERS {
                    let a = session.read(from).unwrap();
                    let b = session.read(to).unwrap();
                    let a_n: i64 = a.value.as_str().unwrap().parse().unwrap();
                    let b_n: i64 = b.value.as_str().unwrap().parse().unwrap();

                    let batch = TxnBuilder::new()
                        .read_expecting_version(from, a.version)
                        .read_expecting_version(to, b.version)
                        .write(from, (a_n - 1).to_string())
                        .write(to, (b_n + 1).to_string());
                    if session.execute(batch).unwrap().status == Status::Ok {
                        done += 1;
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let sum: i64 = snapshot(&db, &[1, 2])
        .iter()
        .map(|e| e.value.as_str().unwrap().parse::<i64>().unwrap())
        .sum();
    assert_eq!(sum, 1000);
}

/// Blind writes all commit; the last version equals the number of writes
#[test]
fn blind_writes_all_commit() {
    const THREADS: usize = 8;
    const WRITES: usize = 250;

    let db = Database::new();
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                let mut session = Session::new(db);
                for i in 0..WRITES {
                    session.write(0, format!("{}:{}", t, i)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        db.entry(Key::new(0)).version,
        Version::new((THREADS * WRITES) as u64)
    );
    assert_eq!(db.stats().aborted, 0);
}
