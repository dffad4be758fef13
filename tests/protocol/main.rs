//! Protocol Integration Tests
//!
//! A real server on an ephemeral port, driven over TCP.

#[path = "../common/mod.rs"]
mod common;

mod framing;
mod increment;
