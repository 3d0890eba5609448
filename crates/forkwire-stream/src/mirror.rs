// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single-owner forwarder for a shared mirror sink.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Cloneable sending half of a [`Mirror`].
///
/// Sends enqueue without blocking and without failing toward the producer;
/// once the forwarder task is gone the bytes are silently dropped.
#[derive(Clone)]
pub struct MirrorSender {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl MirrorSender {
    /// Queue a copy of `bytes` for the mirror sink.
    ///
    /// Returns `false` when the forwarder task has already gone away.
    pub fn send(&self, bytes: &[u8]) -> bool {
        self.tx.send(bytes.to_vec()).is_ok()
    }
}

impl std::fmt::Debug for MirrorSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorSender")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Owns a sink on a dedicated task so several producers can share it
/// without aliasing it.
///
/// Producers hold [`MirrorSender`] clones; the task write-alls and flushes
/// each queued chunk in arrival order. After the first sink failure the
/// task keeps draining the queue without writing, so a bad mirror sink
/// never slows or fails a producer. The task ends once every sender is
/// dropped.
pub struct Mirror {
    sender: MirrorSender,
    task: JoinHandle<()>,
}

impl Mirror {
    /// Spawn the forwarder task owning `sink`.
    pub fn spawn<W>(mut sink: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let task = tokio::spawn(async move {
            let mut failed = false;
            while let Some(chunk) = rx.recv().await {
                if failed {
                    continue;
                }
                if let Err(error) = sink.write_all(&chunk).await {
                    warn!(target: "forkwire.mirror", %error, "mirror sink write failed; discarding further output");
                    failed = true;
                    continue;
                }
                if let Err(error) = sink.flush().await {
                    warn!(target: "forkwire.mirror", %error, "mirror sink flush failed; discarding further output");
                    failed = true;
                }
            }
        });
        Self {
            sender: MirrorSender { tx },
            task,
        }
    }

    /// A new sending handle for this mirror.
    pub fn sender(&self) -> MirrorSender {
        self.sender.clone()
    }

    /// Release this handle's own sender and wait for the forwarder to drain
    /// its queue and exit.
    ///
    /// Completes only after every other [`MirrorSender`] has been dropped.
    pub async fn finish(self) {
        let Self { sender, task } = self;
        drop(sender);
        let _ = task.await;
    }

    /// Detach the forwarder; it keeps running until all senders are gone.
    pub fn detach(self) {}
}

impl std::fmt::Debug for Mirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mirror")
            .field("finished", &self.task.is_finished())
            .finish()
    }
}
