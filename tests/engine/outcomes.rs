//! Outcome Shaping Tests
//!
//! Which operations appear in a result, and with what:
//! - Version preconditions, alone and combined with values
//! - Unconditioned reads mixed with writes
//! - Duplicate writes in one batch
//! - The reset flag

use crate::common::*;

// ============================================================================
// Version preconditions
// ============================================================================

#[test]
fn version_precondition_on_fresh_key() {
    let db = Database::new();

    let result = exec(
        &db,
        TxnBuilder::new()
            .read_expecting_version(1, Version::ZERO)
            .write(1, "0"),
    );
    assert_eq!(result.status, Status::Ok);

    // Second initialization attempt sees version 1
    let result = exec(
        &db,
        TxnBuilder::new()
            .read_expecting_version(1, Version::ZERO)
            .write(1, "0"),
    );
    assert_eq!(result.status, Status::Abort);
    assert_eq!(result.results, vec![value_op(1, "0", 1)]);
}

#[test]
fn value_and_version_must_both_hold() {
    let db = Database::new();
    seed(&db, &[(1, "a"), (1, "a")]);

    let stale = exec(
        &db,
        TxnBuilder::new()
            .read_expecting(1, "a", Version::new(1))
            .write(1, "b"),
    );
    assert_eq!(stale.status, Status::Abort);
    assert_eq!(stale.results, vec![value_op(1, "a", 2)]);

    let current = exec(
        &db,
        TxnBuilder::new()
            .read_expecting(1, "a", Version::new(2))
            .write(1, "b"),
    );
    assert_eq!(current.status, Status::Ok);
}

// ============================================================================
// Mixed batches
// ============================================================================

#[test]
fn unconditioned_reads_are_not_echoed_with_writes() {
    let db = Database::new();
    seed(&db, &[(1, "a")]);

    let result = exec(&db, TxnBuilder::new().read(1).write(2, "b").read(1));
    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.results, vec![updated_op(2, "b", 1)]);
}

#[test]
fn unconditioned_reads_are_not_reported_on_abort() {
    let db = Database::new();
    seed(&db, &[(1, "a")]);

    let result = exec(
        &db,
        TxnBuilder::new()
            .read(1)
            .read_expecting_value(1, "z")
            .write(1, "b"),
    );
    assert_eq!(result.status, Status::Abort);
    assert_eq!(result.results, vec![value_op(1, "a", 1)]);
}

#[test]
fn reads_see_state_before_the_batch_writes() {
    let db = Database::new();

    // The write to key 1 comes first but validation sees the old state
    let result = exec(
        &db,
        TxnBuilder::new()
            .write(1, "new")
            .read_expecting_value(1, "new"),
    );
    assert_eq!(result.status, Status::Abort);
    assert_eq!(result.results, vec![value_op(1, "", 0)]);
}

#[test]
fn pure_read_echoes_conditional_and_plain_reads() {
    let db = Database::new();
    seed(&db, &[(1, "a"), (2, "b")]);

    let result = exec(
        &db,
        TxnBuilder::new()
            .read_expecting_value(2, "b")
            .read(1)
            .read(99),
    );
    assert_eq!(result.status, Status::Ok);
    assert_eq!(
        result.results,
        vec![value_op(2, "b", 1), value_op(1, "a", 1), value_op(99, "", 0)]
    );
}

#[test]
fn duplicate_writes_last_value_wins_one_bump() {
    let db = Database::new();

    let result = exec(&db, TxnBuilder::new().write(1, "first").write(1, "second"));
    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.results.len(), 2);
    assert!(result.results.iter().all(|op| op.kind == ResultKind::Updated));

    let entry = db.entry(Key::new(1));
    assert_eq!(entry.value, Value::from("second"));
    assert_eq!(entry.version, Version::new(1));
}

#[test]
fn embedded_nul_bytes_are_content() {
    let db = Database::new();
    let value = Value::new(b"a\0b".to_vec());

    exec(&db, vec![Operation::write(1, value.clone())]);
    assert_eq!(db.entry(Key::new(1)).value, value);

    let result = exec(&db, TxnBuilder::new().read_expecting_value(1, "a"));
    assert_eq!(result.status, Status::Abort);
}

// ============================================================================
// Reset flag
// ============================================================================

#[test]
fn reset_clears_before_the_batch() {
    let db = Database::new();
    seed(&db, &[(1, "a"), (2, "b")]);

    let result = db
        .execute(&request(TxnBuilder::new().read_expecting_version(1, Version::ZERO)).with_reset(true))
        .unwrap();
    assert_eq!(result.status, Status::Ok);
    assert!(db.entry(Key::new(2)).is_unwritten());
    assert_eq!(db.stats().keys, 0);
}

#[test]
fn reset_ignored_on_rejected_request() {
    let db = Database::new();
    seed(&db, &[(1, "a")]);

    let result = db
        .execute(&request(Vec::<Operation>::new()).with_reset(true))
        .unwrap();
    assert_eq!(result.status, Status::BadRequest);
    assert_eq!(db.entry(Key::new(1)).value, Value::from("a"));
}

#[test]
fn reset_with_failed_precondition_changes_nothing() {
    let db = Database::new();
    seed(&db, &[(1, "a"), (1, "b")]);
    let before = snapshot(&db, &[1, 2]);

    let result = db
        .execute(
            &request(
                TxnBuilder::new()
                    .read_expecting_value(1, "nope")
                    .write(2, "x"),
            )
            .with_reset(true),
        )
        .unwrap();

    assert_eq!(result.status, Status::Abort);
    assert_eq!(result.results, vec![value_op(1, "", 0)]);
    assert_eq!(snapshot(&db, &[1, 2]), before);
    assert_eq!(db.stats().keys, 1);
}

#[test]
fn rewrite_after_reset_gets_a_higher_version() {
    let db = Database::new();
    seed(&db, &[(1, "a"), (1, "b"), (2, "c")]);
    let stale = db.entry(Key::new(1)).version;

    let result = db
        .execute(&request(TxnBuilder::new().read(5)).with_reset(true))
        .unwrap();
    assert_eq!(result.status, Status::Ok);
    assert!(db.entry(Key::new(1)).is_unwritten());

    let result = exec(&db, TxnBuilder::new().write(1, "d"));
    assert!(result.results[0].version > stale);

    // A guard taken before the reset can no longer match
    let result = exec(
        &db,
        TxnBuilder::new()
            .read_expecting_version(1, stale)
            .write(1, "e"),
    );
    assert_eq!(result.status, Status::Abort);
}
