// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read- and write-tees that mirror a primary stream into a shared sink.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use super::mirror::MirrorSender;

/// `AsyncRead` wrapper that forwards every chunk read from the primary
/// source into a mirror channel.
///
/// The forward is a non-blocking enqueue: a slow, failed, or absent mirror
/// sink never delays the primary consumer. EOF and read errors pass through
/// untouched.
pub struct TeeReader<R> {
    inner: R,
    mirror: MirrorSender,
}

impl<R> TeeReader<R> {
    /// Tee `inner`, mirroring every chunk it yields into `mirror`.
    pub fn new(inner: R, mirror: MirrorSender) -> Self {
        Self { inner, mirror }
    }

    /// Consume the tee and return the primary source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for TeeReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                let fresh = &buf.filled()[before..];
                if !fresh.is_empty() {
                    let _ = this.mirror.send(fresh);
                }
                Poll::Ready(Ok(()))
            }
            other => other,
        }
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for TeeReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeeReader").field("inner", &self.inner).finish_non_exhaustive()
    }
}

/// `AsyncWrite` wrapper that forwards every successfully written chunk into
/// a mirror channel.
///
/// The mirror only ever sees the prefix the primary sink accepted, so both
/// destinations observe the same bytes. Mirror failures never propagate;
/// flush and shutdown affect the primary sink only.
pub struct TeeWriter<W> {
    inner: W,
    mirror: MirrorSender,
}

impl<W> TeeWriter<W> {
    /// Tee `inner`, mirroring every accepted chunk into `mirror`.
    pub fn new(inner: W, mirror: MirrorSender) -> Self {
        Self { inner, mirror }
    }

    /// Consume the tee and return the primary sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for TeeWriter<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(Ok(n)) => {
                if n > 0 {
                    let _ = this.mirror.send(&buf[..n]);
                }
                Poll::Ready(Ok(n))
            }
            other => other,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

impl<W: std::fmt::Debug> std::fmt::Debug for TeeWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeeWriter").field("inner", &self.inner).finish_non_exhaustive()
    }
}
