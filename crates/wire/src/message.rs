//! Request, response and hello encoding
//!
//! Bodies only; [`crate::frame`] adds the length prefix.

use byteorder::{BigEndian, WriteBytesExt};
use gotthard_core::{
    ClientId, Key, OpCode, Operation, ReadOp, RequestId, ResultKind, ResultOp, Status, TxnRequest,
    TxnResult, Value, Version, WriteOp,
};

use crate::error::{DecodeError, EncodeError};
use crate::header::{
    BodyReader, Header, FLAG_HELLO, FLAG_RESET, FLAG_RESPONSE, PRESENCE_VALUE, PRESENCE_VERSION,
};

/// Operation fields as they appear on the wire
struct RawOp<'a> {
    code: u8,
    key: Key,
    version: Option<Version>,
    value: Option<&'a [u8]>,
}

fn op_count(len: usize) -> Result<u8, EncodeError> {
    u8::try_from(len).map_err(|_| EncodeError::TooManyOperations(len))
}

fn write_op(
    out: &mut Vec<u8>,
    code: u8,
    key: Key,
    version: Option<Version>,
    value: Option<&Value>,
) -> Result<(), EncodeError> {
    let mut presence = 0u8;
    if value.is_some() {
        presence |= PRESENCE_VALUE;
    }
    if version.is_some() {
        presence |= PRESENCE_VERSION;
    }

    out.write_u8(code)?;
    out.write_u32::<BigEndian>(key.as_u32())?;
    out.write_u8(presence)?;
    if let Some(version) = version {
        out.write_u64::<BigEndian>(version.as_u64())?;
    }
    if let Some(value) = value {
        let len = u16::try_from(value.len()).map_err(|_| EncodeError::ValueTooLong {
            key,
            len: value.len(),
        })?;
        out.write_u16::<BigEndian>(len)?;
        out.extend_from_slice(value.as_bytes());
    }
    Ok(())
}

fn read_op<'a>(reader: &mut BodyReader<'a>) -> Result<RawOp<'a>, DecodeError> {
    let code = reader.u8()?;
    let key = Key::new(reader.u32()?);
    let presence = reader.u8()?;
    let version = if presence & PRESENCE_VERSION != 0 {
        Some(Version::new(reader.u64()?))
    } else {
        None
    };
    let value = if presence & PRESENCE_VALUE != 0 {
        let len = usize::from(reader.u16()?);
        Some(reader.bytes(len)?)
    } else {
        None
    };
    Ok(RawOp {
        code,
        key,
        version,
        value,
    })
}

/// Encode a client request body
pub fn encode_request(request: &TxnRequest) -> Result<Vec<u8>, EncodeError> {
    let header = Header {
        flags: if request.reset { FLAG_RESET } else { 0 },
        client_id: request.client_id,
        request_id: request.request_id,
        status: 0,
        op_count: op_count(request.operations.len())?,
    };

    let mut out = Vec::with_capacity(64);
    header.write_to(&mut out)?;
    for op in &request.operations {
        match op {
            Operation::Read(read) => write_op(
                &mut out,
                OpCode::Read.as_u8(),
                read.key,
                read.expected_version,
                read.expected_value.as_ref(),
            )?,
            Operation::Write(write) => write_op(
                &mut out,
                OpCode::Write.as_u8(),
                write.key,
                None,
                Some(&write.value),
            )?,
            Operation::Unsupported { code, key } => write_op(&mut out, *code, *key, None, None)?,
        }
    }
    Ok(out)
}

/// Decode a client request body
///
/// Unknown operation codes decode to [`Operation::Unsupported`] so that the
/// engine, not the codec, decides how to answer them.
pub fn decode_request(body: &[u8]) -> Result<TxnRequest, DecodeError> {
    let mut reader = BodyReader::new(body);
    let header = reader.header()?;
    if header.is_response() || header.is_hello() {
        return Err(DecodeError::UnexpectedDirection {
            flags: header.flags,
        });
    }

    let mut operations = Vec::with_capacity(usize::from(header.op_count));
    for _ in 0..header.op_count {
        let raw = read_op(&mut reader)?;
        let op = match OpCode::try_from(raw.code) {
            Ok(OpCode::Read) => Operation::Read(ReadOp {
                key: raw.key,
                expected_value: raw.value.map(Value::from),
                expected_version: raw.version,
            }),
            // A client stating what it believes the value to be
            Ok(OpCode::Value) => {
                let value = raw.value.ok_or(DecodeError::MissingField {
                    key: raw.key,
                    field: "value",
                })?;
                Operation::Read(ReadOp {
                    key: raw.key,
                    expected_value: Some(Value::from(value)),
                    expected_version: raw.version,
                })
            }
            Ok(OpCode::Write) => {
                let value = raw.value.ok_or(DecodeError::MissingField {
                    key: raw.key,
                    field: "value",
                })?;
                Operation::Write(WriteOp {
                    key: raw.key,
                    value: Value::from(value),
                })
            }
            _ => Operation::Unsupported {
                code: raw.code,
                key: raw.key,
            },
        };
        operations.push(op);
    }
    reader.finish()?;

    Ok(TxnRequest {
        client_id: header.client_id,
        request_id: header.request_id,
        reset: header.is_reset(),
        operations,
    })
}

/// Encode a server response body
pub fn encode_response(result: &TxnResult) -> Result<Vec<u8>, EncodeError> {
    let header = Header {
        flags: FLAG_RESPONSE,
        client_id: result.client_id,
        request_id: result.request_id,
        status: result.status.as_u8(),
        op_count: op_count(result.results.len())?,
    };

    let mut out = Vec::with_capacity(64);
    header.write_to(&mut out)?;
    for op in &result.results {
        write_op(
            &mut out,
            op.kind.op_code().as_u8(),
            op.key,
            Some(op.version),
            Some(&op.value),
        )?;
    }
    Ok(out)
}

/// Decode a server response body
pub fn decode_response(body: &[u8]) -> Result<TxnResult, DecodeError> {
    let mut reader = BodyReader::new(body);
    let header = reader.header()?;
    if !header.is_response() || header.is_hello() {
        return Err(DecodeError::UnexpectedDirection {
            flags: header.flags,
        });
    }
    let status = Status::try_from(header.status).map_err(DecodeError::InvalidStatus)?;

    let mut results = Vec::with_capacity(usize::from(header.op_count));
    for _ in 0..header.op_count {
        let raw = read_op(&mut reader)?;
        let kind = OpCode::try_from(raw.code)
            .ok()
            .and_then(|code| ResultKind::try_from(code).ok())
            .ok_or(DecodeError::InvalidResultKind(raw.code))?;
        let value = raw.value.ok_or(DecodeError::MissingField {
            key: raw.key,
            field: "value",
        })?;
        let version = raw.version.ok_or(DecodeError::MissingField {
            key: raw.key,
            field: "version",
        })?;
        results.push(ResultOp {
            key: raw.key,
            kind,
            value: Value::from(value),
            version,
        });
    }
    reader.finish()?;

    Ok(TxnResult {
        status,
        client_id: header.client_id,
        request_id: header.request_id,
        results,
    })
}

/// Encode the greeting that tells a new connection its client id
pub fn encode_hello(client_id: ClientId) -> Result<Vec<u8>, EncodeError> {
    let header = Header {
        flags: FLAG_RESPONSE | FLAG_HELLO,
        client_id,
        request_id: RequestId(0),
        status: Status::Ok.as_u8(),
        op_count: 0,
    };
    let mut out = Vec::with_capacity(crate::header::HEADER_LEN);
    header.write_to(&mut out)?;
    Ok(out)
}

/// Decode the greeting, returning the assigned client id
pub fn decode_hello(body: &[u8]) -> Result<ClientId, DecodeError> {
    let mut reader = BodyReader::new(body);
    let header = reader.header()?;
    if !header.is_response() || !header.is_hello() {
        return Err(DecodeError::UnexpectedDirection {
            flags: header.flags,
        });
    }
    reader.finish()?;
    Ok(header.client_id)
}
