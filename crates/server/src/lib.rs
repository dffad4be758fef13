//! TCP front end for the Gotthard engine
//!
//! One tokio task per connection. Each task registers a client id, greets
//! the peer with a hello frame, and then answers request frames in order
//! until the peer disconnects.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connection;
pub mod error;
pub mod server;

pub use config::{ServerConfig, DEFAULT_LISTEN};
pub use connection::serve_connection;
pub use error::{Result, ServerError};
pub use server::Server;
