//! Line framing
//!
//! One JSON document per newline-terminated line, in both directions. The
//! framing lives here so server and client cannot disagree on it.

use serde::Serialize;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Serialize a message and write it as one line.
pub async fn write_message<T, W>(writer: &mut W, message: &T) -> io::Result<()>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(message)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    line.push(b'\n');

    writer.write_all(&line).await?;
    writer.flush().await
}

/// Read one line. `None` means the peer closed the connection.
///
/// Parsing is left to the caller so a malformed line can be answered with a
/// structured error instead of dropping the connection.
pub async fn read_line<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut line = String::new();
    let read = reader.read_line(&mut line).await?;

    if read == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}
