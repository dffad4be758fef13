//! Literal Scenarios
//!
//! Fixed request sequences with fully specified expected responses.

use crate::common::*;

#[test]
fn write_then_read_back() {
    let db = Database::new();

    let result = exec(&db, TxnBuilder::new().write(1, "a"));
    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.results, vec![updated_op(1, "a", 1)]);

    let result = exec(&db, TxnBuilder::new().read(1));
    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.results, vec![value_op(1, "a", 1)]);
}

#[test]
fn conditional_write_commits_when_value_matches() {
    let db = Database::new();
    seed(&db, &[(1, "a")]);

    let result = exec(&db, TxnBuilder::new().read_expecting_value(1, "a").write(1, "x"));
    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.results, vec![updated_op(1, "x", 2)]);
}

#[test]
fn conditional_write_aborts_with_real_value() {
    let db = Database::new();
    seed(&db, &[(1, "a")]);

    let result = exec(
        &db,
        TxnBuilder::new().read_expecting_value(1, "notthesame").write(1, "x"),
    );
    assert_eq!(result.status, Status::Abort);
    assert_eq!(result.results, vec![value_op(1, "a", 1)]);
    assert_eq!(db.entry(Key::new(1)).value, Value::from("a"));
}

#[test]
fn abort_reports_only_the_wrong_read() {
    let db = Database::new();
    seed(&db, &[(1, "a"), (2, "b")]);

    let result = exec(
        &db,
        TxnBuilder::new()
            .read_expecting_value(1, "a")
            .read_expecting_value(2, "wrong")
            .write(3, "x"),
    );
    assert_eq!(result.status, Status::Abort);
    assert_eq!(result.results, vec![value_op(2, "b", 1)]);
    assert!(db.entry(Key::new(3)).is_unwritten());
}

#[test]
fn two_nops_are_rejected() {
    let db = Database::new();
    seed(&db, &[(0, "keep")]);
    let before = snapshot(&db, &[0]);

    let result = exec(&db, TxnBuilder::new().nop(0).nop(0));
    assert_eq!(result.status, Status::BadRequest);
    assert!(result.results.is_empty());
    assert_eq!(snapshot(&db, &[0]), before);
}

#[test]
fn top_of_twenty_bit_range() {
    let db = Database::new();

    assert_eq!(
        exec(&db, TxnBuilder::new().write(KEY_20_BITS, "20bits")).status,
        Status::Ok
    );
    let result = exec(&db, TxnBuilder::new().read(KEY_20_BITS));
    assert_eq!(result.results, vec![value_op(KEY_20_BITS, "20bits", 1)]);

    let result = exec(&db, TxnBuilder::new().write(KEY_20_BITS, ""));
    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.results, vec![updated_op(KEY_20_BITS, "", 2)]);

    let result = exec(&db, TxnBuilder::new().read(KEY_20_BITS));
    assert_eq!(result.results, vec![value_op(KEY_20_BITS, "", 2)]);
}

// ============================================================================
// Basic protocol walk-through
// ============================================================================

#[test]
fn multi_read_multi_write_walkthrough() {
    let db = Database::new();
    seed(&db, &[(1, "a"), (2, "b"), (3, "c")]);

    let result = exec(&db, TxnBuilder::new().read(1).read(2));
    assert_eq!(result.results, vec![value_op(1, "a", 1), value_op(2, "b", 1)]);

    let result = exec(&db, TxnBuilder::new().write(4, "hello").write(5, "world"));
    assert_eq!(
        result.results,
        vec![updated_op(4, "hello", 1), updated_op(5, "world", 1)]
    );

    let result = exec(
        &db,
        TxnBuilder::new()
            .read_expecting_value(1, "a")
            .read_expecting_value(2, "b")
            .write(3, "c2")
            .write(4, "d"),
    );
    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.results, vec![updated_op(3, "c2", 2), updated_op(4, "d", 2)]);

    let result = exec(
        &db,
        TxnBuilder::new()
            .read_expecting_value(1, "wrong")
            .read_expecting_value(2, "wrong")
            .write(3, "x"),
    );
    assert_eq!(result.status, Status::Abort);
    assert_eq!(result.results, vec![value_op(1, "a", 1), value_op(2, "b", 1)]);
}
