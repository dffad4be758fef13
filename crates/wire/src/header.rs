//! Message header and low-level body cursor

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use gotthard_core::{ClientId, RequestId};

use crate::error::{DecodeError, EncodeError};

/// Set on every server-to-client message
pub const FLAG_RESPONSE: u8 = 0x80;
/// Set on the greeting that carries the assigned client id
pub const FLAG_HELLO: u8 = 0x40;
/// Set on requests that clear the store before executing
pub const FLAG_RESET: u8 = 0x20;

/// Presence bit: the operation carries a value
pub const PRESENCE_VALUE: u8 = 0x01;
/// Presence bit: the operation carries a version
pub const PRESENCE_VERSION: u8 = 0x02;

/// Size of the fixed body header in bytes
pub const HEADER_LEN: usize = gotthard_core::MESSAGE_HEADER_LEN;

/// Fixed-size body header (11 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Direction and request flags
    pub flags: u8,
    /// Client the message belongs to
    pub client_id: ClientId,
    /// Request being answered or submitted
    pub request_id: RequestId,
    /// Raw status byte (0 on requests)
    pub status: u8,
    /// Number of operations that follow
    pub op_count: u8,
}

impl Header {
    /// True for server-to-client messages
    pub fn is_response(&self) -> bool {
        self.flags & FLAG_RESPONSE != 0
    }

    /// True for the connection greeting
    pub fn is_hello(&self) -> bool {
        self.flags & FLAG_HELLO != 0
    }

    /// True if the request asks for a store reset
    pub fn is_reset(&self) -> bool {
        self.flags & FLAG_RESET != 0
    }

    /// Parse the header at the start of `body`
    ///
    /// Lets a server answer a malformed request with BADREQ as long as
    /// this much of it is readable.
    pub fn peek(body: &[u8]) -> Result<Header, DecodeError> {
        BodyReader::new(body).header()
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.write_u8(self.flags)?;
        out.write_u32::<BigEndian>(self.client_id.0)?;
        out.write_u32::<BigEndian>(self.request_id.0)?;
        out.write_u8(self.status)?;
        out.write_u8(self.op_count)?;
        Ok(())
    }
}

/// Cursor over a message body that reports truncation precisely
pub(crate) struct BodyReader<'a> {
    buf: &'a [u8],
}

impl<'a> BodyReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        BodyReader { buf }
    }

    fn ensure(&self, needed: usize) -> Result<(), DecodeError> {
        if self.buf.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                remaining: self.buf.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        self.ensure(1)?;
        Ok(self.buf.read_u8()?)
    }

    pub(crate) fn u16(&mut self) -> Result<u16, DecodeError> {
        self.ensure(2)?;
        Ok(self.buf.read_u16::<BigEndian>()?)
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        self.ensure(4)?;
        Ok(self.buf.read_u32::<BigEndian>()?)
    }

    pub(crate) fn u64(&mut self) -> Result<u64, DecodeError> {
        self.ensure(8)?;
        Ok(self.buf.read_u64::<BigEndian>()?)
    }

    pub(crate) fn bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure(len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    pub(crate) fn header(&mut self) -> Result<Header, DecodeError> {
        Ok(Header {
            flags: self.u8()?,
            client_id: ClientId(self.u32()?),
            request_id: RequestId(self.u32()?),
            status: self.u8()?,
            op_count: self.u8()?,
        })
    }

    pub(crate) fn finish(self) -> Result<(), DecodeError> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes(self.buf.len()))
        }
    }
}
