//! Binary wire protocol for Gotthard
//!
//! Every message travels as one length-prefixed frame:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────┐
//! │ Length (u32 BE)  │ Body (Length bytes, at most 64 KiB)      │
//! └──────────────────┴──────────────────────────────────────────┘
//!
//! Body:
//! ┌──────────┬───────────────┬────────────────┬────────────┬──────────────┬─────────┐
//! │ Flags (1)│ ClientId (4)  │ RequestId (4)  │ Status (1) │ OpCount (1)  │ Ops ... │
//! └──────────┴───────────────┴────────────────┴────────────┴──────────────┴─────────┘
//!
//! Op:
//! ┌──────────┬──────────┬──────────────┬────────────────┬─────────────────────────────┐
//! │ Code (1) │ Key (4)  │ Presence (1) │ [Version (8)]  │ [ValueLen (2) + Value bytes] │
//! └──────────┴──────────┴──────────────┴────────────────┴─────────────────────────────┘
//! ```
//!
//! All integers are big-endian. A server opens every connection with a
//! hello frame carrying the client id it assigned.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod frame;
pub mod header;
pub mod message;

pub use error::{DecodeError, EncodeError};
pub use frame::{read_frame, write_frame, MAX_FRAME_LEN};
pub use header::{
    Header, FLAG_HELLO, FLAG_RESET, FLAG_RESPONSE, HEADER_LEN, PRESENCE_VALUE, PRESENCE_VERSION,
};
pub use message::{
    decode_hello, decode_request, decode_response, encode_hello, encode_request, encode_response,
};
