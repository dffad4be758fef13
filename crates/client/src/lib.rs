//! Async client for the Gotthard wire protocol
//!
//! ```no_run
//! # async fn demo() -> gotthard_client::Result<()> {
//! use gotthard_client::Client;
//!
//! let mut client = Client::connect("127.0.0.1:1234").await?;
//! client.write(1, "hello").await?;
//! let current = client.read(1).await?;
//! assert_eq!(current.value.as_str(), Some("hello"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod stress;

pub use client::{Client, IncrementOutcome};
pub use error::{Error, Result};
pub use stress::{run_increment_clients, ClientReport};
