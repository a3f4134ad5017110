//! Length-prefixed message framing: a 4-byte big-endian length header
//! followed by a bincode-encoded payload, generic over any
//! `Serialize`/`DeserializeOwned` payload.

use crate::error::{NetError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Frames above this size are rejected rather than read into memory; agent
/// RPC payloads (slice configs, performance metrics) are small.
const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

pub async fn write_frame<W: AsyncWrite + Unpin, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    let payload = bincode::serialize(value)
        .map_err(|e| NetError::Protocol { addr: String::new(), message: e.to_string() })?;
    if payload.len() > MAX_FRAME_BYTES {
        return Err(NetError::FrameTooLarge(payload.len()));
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_frame<R: AsyncRead + Unpin, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(NetError::FrameTooLarge(len));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    bincode::deserialize(&payload)
        .map_err(|e| NetError::Protocol { addr: String::new(), message: e.to_string() })
}
