//! Length-prefixed framing over async byte streams

use byteorder::{BigEndian, ByteOrder};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{DecodeError, EncodeError};

pub use gotthard_core::MAX_FRAME_LEN;

/// Read one frame body
///
/// Returns `Ok(None)` if the peer closed the stream cleanly between frames.
/// A close in the middle of a frame is `DecodeError::Truncated`.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, DecodeError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        let n = reader.read(&mut len_buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(DecodeError::Truncated {
                needed: len_buf.len(),
                remaining: filled,
            });
        }
        filled += n;
    }

    let len = BigEndian::read_u32(&len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(DecodeError::FrameTooLarge {
            len,
            max: MAX_FRAME_LEN,
        });
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            DecodeError::Truncated {
                needed: len,
                remaining: 0,
            }
        } else {
            DecodeError::Io(e)
        }
    })?;
    Ok(Some(body))
}

/// Write one frame and flush it
pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<(), EncodeError>
where
    W: AsyncWrite + Unpin,
{
    if body.len() > MAX_FRAME_LEN {
        return Err(EncodeError::FrameTooLarge {
            len: body.len(),
            max: MAX_FRAME_LEN,
        });
    }

    let mut len_buf = [0u8; 4];
    BigEndian::write_u32(&mut len_buf, body.len() as u32);
    writer.write_all(&len_buf).await?;
    writer.write_all(body).await?;
    writer.flush().await?;
    Ok(())
}
