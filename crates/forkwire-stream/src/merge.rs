// SPDX-License-Identifier: MIT OR Apache-2.0
//! Two-to-one fan-in of independent byte sources.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tokio::sync::mpsc;
use tracing::debug;

use super::pump::COPY_BUF_SIZE;

const CHANNEL_CAPACITY: usize = 256;

/// Combines two byte sources into one, yielding chunks in best-effort
/// arrival order.
///
/// Each upstream is drained by its own internal leg task, so neither
/// producer can stall while the other is idle. No interleaving fidelity is
/// promised across the two inputs — two independent pipes carry no common
/// clock, and the observed order is whatever order the legs deliver. Bytes
/// within one input keep their order. The merged stream reaches EOF only
/// after both upstreams have.
pub struct MergeReader {
    rx: mpsc::Receiver<Vec<u8>>,
    chunk: Vec<u8>,
    pos: usize,
}

impl MergeReader {
    /// Start draining `a` and `b`, exposing the fan-in as a single reader.
    pub fn spawn<A, B>(a: A, b: B) -> Self
    where
        A: AsyncRead + Send + Unpin + 'static,
        B: AsyncRead + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(drain_leg(a, tx.clone()));
        tokio::spawn(drain_leg(b, tx));
        Self {
            rx,
            chunk: Vec::new(),
            pos: 0,
        }
    }
}

async fn drain_leg<R: AsyncRead + Unpin>(mut reader: R, tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => {
                debug!(target: "forkwire.merge", %error, "merge leg stopped on I/O error");
                break;
            }
        }
    }
}

impl AsyncRead for MergeReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }
        loop {
            if this.pos < this.chunk.len() {
                let n = buf.remaining().min(this.chunk.len() - this.pos);
                buf.put_slice(&this.chunk[this.pos..this.pos + n]);
                this.pos += n;
                return Poll::Ready(Ok(()));
            }
            match this.rx.poll_recv(cx) {
                Poll::Ready(Some(chunk)) => {
                    this.chunk = chunk;
                    this.pos = 0;
                }
                Poll::Ready(None) => return Poll::Ready(Ok(())),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl std::fmt::Debug for MergeReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeReader")
            .field("buffered", &(self.chunk.len() - self.pos))
            .finish()
    }
}
