// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared helpers for forkwire integration tests.
#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::AsyncWrite;

use forkwire::LaunchSpec;

/// Spec running `script` under the POSIX shell.
pub fn sh(script: &str) -> LaunchSpec {
    LaunchSpec::new(["sh", "-c", script])
}

/// In-memory sink whose contents stay inspectable after the write half has
/// been handed to the orchestrator.
#[derive(Clone, Default)]
pub struct SharedSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().unwrap().clone()
    }

    pub fn string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.buf.lock().unwrap().len()
    }
}

impl AsyncWrite for SharedSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Poll `cond` until it holds, panicking after a few seconds.
pub async fn eventually(cond: impl Fn() -> bool, what: &str) {
    for _ in 0..500 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}
