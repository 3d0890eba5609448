// SPDX-License-Identifier: MIT OR Apache-2.0
//! Byte pump: copies a source into a sink on its own task.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tracing::debug;

/// Chunk size used by [`copy_bytes`] and the merge legs.
pub const COPY_BUF_SIZE: usize = 8 * 1024;

/// Copy `reader` into `writer` until EOF, returning the number of bytes
/// moved.
///
/// Reads in [`COPY_BUF_SIZE`] chunks, writing each chunk fully before the
/// next read. Interrupted reads are retried; any other I/O error ends the
/// copy and is returned. The writer is flushed on normal completion.
pub async fn copy_bytes<R, W>(mut reader: R, mut writer: W) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n]).await?;
        total += n as u64;
    }
    writer.flush().await?;
    Ok(total)
}

/// An active drain: a spawned task copying one source into one sink.
///
/// The task starts immediately and ends on source EOF or the first I/O
/// error; it is never restarted. Dropping the `Pump` detaches the task
/// without stopping it — once a stream must be drained, it stays drained.
pub struct Pump {
    handle: JoinHandle<io::Result<u64>>,
}

impl Pump {
    /// Spawn a pump copying `reader` into `writer`.
    pub fn spawn<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let handle = tokio::spawn(async move {
            let result = copy_bytes(reader, writer).await;
            if let Err(ref error) = result {
                debug!(target: "forkwire.pump", %error, "pump stopped on I/O error");
            }
            result
        });
        Self { handle }
    }

    /// Returns `true` once the copy task has completed.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Detach the pump; it runs to completion on its own.
    pub fn detach(self) {}

    /// Wait for the pump to finish, returning the bytes copied or the error
    /// that stopped it.
    pub async fn join(self) -> io::Result<u64> {
        self.handle.await.unwrap_or_else(|e| Err(io::Error::other(e)))
    }
}

impl std::fmt::Debug for Pump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pump")
            .field("finished", &self.is_finished())
            .finish()
    }
}
