//! Counter Increment Tests
//!
//! Concurrent clients incrementing one decimal counter over TCP.

use crate::common::*;

#[tokio::test]
async fn first_initializer_wins() {
    let (addr, _db) = start_server().await;
    let mut a = Client::connect(addr).await.unwrap();
    let mut b = Client::connect(addr).await.unwrap();

    assert!(a.initialize_counter(0).await.unwrap());
    assert!(!b.initialize_counter(0).await.unwrap());
    assert_eq!(b.read(0).await.unwrap(), value_op(0, "0", 1));
}

#[tokio::test]
async fn single_client_counts_sequentially() {
    let (addr, _db) = start_server().await;
    let mut client = Client::connect(addr).await.unwrap();
    client.initialize_counter(0).await.unwrap();

    for expected in 1..=5u64 {
        let outcome = client.increment(0).await.unwrap();
        assert_eq!(outcome.value, expected);
        assert_eq!(outcome.attempts, 1);
    }
}

#[tokio::test]
async fn non_numeric_counter_is_an_error() {
    let (addr, db) = start_server().await;
    seed(&db, &[(4, "abc")]);
    let mut client = Client::connect(addr).await.unwrap();

    let err = client.increment(4).await.unwrap_err();
    assert!(matches!(err, gotthard::net::ClientError::NotACounter { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_clients_lose_no_increments() {
    const CLIENTS: usize = 5;
    const COUNT: u64 = 40;

    let (addr, db) = start_server().await;
    let reports = run_increment_clients(addr, CLIENTS, COUNT, Key::new(0))
        .await
        .unwrap();

    assert_eq!(reports.len(), CLIENTS);
    let total = CLIENTS as u64 * COUNT;
    assert_eq!(reports.iter().map(|r| r.last_value).max(), Some(total));
    assert!(reports.iter().all(|r| r.attempts >= COUNT));

    let entry = db.entry(Key::new(0));
    assert_eq!(entry.value, Value::from(total.to_string()));
    // One version for the initialization, one per increment
    assert_eq!(entry.version, Version::new(total + 1));
}
