// SPDX-License-Identifier: MIT OR Apache-2.0
//! `AsyncWrite` adapter over a mirror channel.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

use super::mirror::MirrorSender;

/// Write half of a sink shared through a [`Mirror`](super::Mirror).
///
/// Writes enqueue without blocking; the task draining the channel performs
/// the real writes. `shutdown` releases the underlying sender so the
/// draining task can observe close once every other sender is gone; writes
/// after shutdown, or after the draining task has gone away, fail with
/// `BrokenPipe`.
pub struct ChannelWriter {
    sender: Option<MirrorSender>,
}

impl ChannelWriter {
    /// Wrap `sender` as an `AsyncWrite`.
    pub fn new(sender: MirrorSender) -> Self {
        Self {
            sender: Some(sender),
        }
    }
}

impl AsyncWrite for ChannelWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &self.get_mut().sender {
            Some(sender) if sender.send(buf) => Poll::Ready(Ok(buf.len())),
            _ => Poll::Ready(Err(io::ErrorKind::BrokenPipe.into())),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.get_mut().sender = None;
        Poll::Ready(Ok(()))
    }
}

impl std::fmt::Debug for ChannelWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelWriter")
            .field("open", &self.sender.is_some())
            .finish()
    }
}
