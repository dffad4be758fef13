//! Framing Tests
//!
//! Raw frames on a bare socket: the hello greeting, hand-built request
//! bodies, malformed bodies and the reset flag.

use crate::common::*;
use gotthard::net::{decode_hello, decode_response, read_frame, write_frame, FLAG_RESET};
use tokio::net::TcpStream;

/// Connect without the client library, returning the greeted id
async fn raw_connect(addr: std::net::SocketAddr) -> (TcpStream, ClientId) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let hello = read_frame(&mut stream).await.unwrap().expect("no hello");
    let id = decode_hello(&hello).unwrap();
    (stream, id)
}

fn header(flags: u8, client_id: u32, request_id: u32, op_count: u8) -> Vec<u8> {
    let mut body = vec![flags];
    body.extend_from_slice(&client_id.to_be_bytes());
    body.extend_from_slice(&request_id.to_be_bytes());
    body.push(0);
    body.push(op_count);
    body
}

fn push_op(body: &mut Vec<u8>, code: u8, key: u32, version: Option<u64>, value: Option<&str>) {
    body.push(code);
    body.extend_from_slice(&key.to_be_bytes());
    let presence = u8::from(value.is_some()) | (u8::from(version.is_some()) << 1);
    body.push(presence);
    if let Some(version) = version {
        body.extend_from_slice(&version.to_be_bytes());
    }
    if let Some(value) = value {
        body.extend_from_slice(&(value.len() as u16).to_be_bytes());
        body.extend_from_slice(value.as_bytes());
    }
}

async fn round_trip(stream: &mut TcpStream, body: &[u8]) -> TxnResult {
    write_frame(stream, body).await.unwrap();
    let reply = read_frame(stream).await.unwrap().expect("connection closed");
    decode_response(&reply).unwrap()
}

// ============================================================================
// Greeting
// ============================================================================

#[tokio::test]
async fn each_connection_gets_a_distinct_id() {
    let (addr, _db) = start_server().await;
    let a = Client::connect(addr).await.unwrap();
    let b = Client::connect(addr).await.unwrap();
    assert_ne!(a.client_id(), b.client_id());
}

#[tokio::test]
async fn server_overrides_claimed_client_id() {
    let (addr, _db) = start_server().await;
    let (mut stream, id) = raw_connect(addr).await;

    let mut body = header(0, 9999, 5, 1);
    push_op(&mut body, 1, 1, None, None);
    let result = round_trip(&mut stream, &body).await;

    assert_eq!(result.client_id, id);
    assert_eq!(result.request_id, RequestId(5));
    assert_eq!(result.status, Status::Ok);
}

// ============================================================================
// Hand-built requests
// ============================================================================

#[tokio::test]
async fn value_code_in_request_is_a_conditional_read() {
    let (addr, db) = start_server().await;
    seed(&db, &[(1, "a")]);
    let (mut stream, id) = raw_connect(addr).await;

    let mut body = header(0, id.0, 1, 2);
    push_op(&mut body, 3, 1, None, Some("zzz"));
    push_op(&mut body, 2, 1, None, Some("x"));
    let result = round_trip(&mut stream, &body).await;

    assert_eq!(result.status, Status::Abort);
    assert_eq!(result.results, vec![value_op(1, "a", 1)]);
}

#[tokio::test]
async fn unknown_code_is_rejected() {
    let (addr, db) = start_server().await;
    let (mut stream, id) = raw_connect(addr).await;

    let mut body = header(0, id.0, 1, 2);
    push_op(&mut body, 2, 1, None, Some("x"));
    push_op(&mut body, 77, 1, None, None);
    let result = round_trip(&mut stream, &body).await;

    assert_eq!(result.status, Status::BadRequest);
    assert!(db.entry(Key::new(1)).is_unwritten());
}

#[tokio::test]
async fn write_without_value_is_answered_badreq() {
    let (addr, _db) = start_server().await;
    let (mut stream, id) = raw_connect(addr).await;

    let mut body = header(0, id.0, 3, 1);
    push_op(&mut body, 2, 1, None, None);
    let result = round_trip(&mut stream, &body).await;

    assert_eq!(result.status, Status::BadRequest);
    assert_eq!(result.request_id, RequestId(3));
}

#[tokio::test]
async fn truncated_body_is_answered_badreq_and_connection_survives() {
    let (addr, _db) = start_server().await;
    let (mut stream, id) = raw_connect(addr).await;

    // Header promises two operations, body carries one
    let mut body = header(0, id.0, 8, 2);
    push_op(&mut body, 1, 1, None, None);
    let result = round_trip(&mut stream, &body).await;
    assert_eq!(result.status, Status::BadRequest);
    assert_eq!(result.request_id, RequestId(8));

    let mut body = header(0, id.0, 9, 1);
    push_op(&mut body, 1, 1, None, None);
    let result = round_trip(&mut stream, &body).await;
    assert_eq!(result.status, Status::Ok);
}

#[tokio::test]
async fn unreadable_header_closes_the_connection() {
    let (addr, _db) = start_server().await;
    let (mut stream, _id) = raw_connect(addr).await;

    write_frame(&mut stream, &[0, 0, 0]).await.unwrap();
    assert!(matches!(read_frame(&mut stream).await, Ok(None) | Err(_)));
}

// ============================================================================
// Reset flag
// ============================================================================

#[tokio::test]
async fn reset_flag_clears_before_executing() {
    let (addr, db) = start_server().await;
    seed(&db, &[(1, "a"), (2, "b")]);
    let (mut stream, id) = raw_connect(addr).await;

    let mut body = header(FLAG_RESET, id.0, 1, 1);
    push_op(&mut body, 1, 1, Some(0), None);
    let result = round_trip(&mut stream, &body).await;

    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.results, vec![value_op(1, "", 0)]);
    assert!(db.entry(Key::new(2)).is_unwritten());
}

#[tokio::test]
async fn client_reset_clears_the_store() {
    let (addr, db) = start_server().await;
    let mut client = Client::connect(addr).await.unwrap();
    client.write(5, "v").await.unwrap();

    client.reset().await.unwrap();
    assert_eq!(db.stats().keys, 0);
    assert_eq!(client.read(5).await.unwrap().version, Version::ZERO);
}
