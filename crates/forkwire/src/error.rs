// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for fork operations.

use thiserror::Error;

/// Errors from launching and managing a forked child process.
///
/// Launch-time failures surface here synchronously. I/O failures inside the
/// background drains do not: they end the affected drain and are reported
/// through `tracing` only, so the primary data path is never broken by a
/// best-effort mirror.
#[derive(Debug, Error)]
pub enum ForkError {
    /// The argument vector was empty (possibly after sparse filtering).
    #[error("empty argument vector")]
    EmptyArgv,

    /// The child process could not be created.
    #[error("failed to spawn child process: {0}")]
    Spawn(#[source] std::io::Error),

    /// A raw stdio handle was missing on the spawned child.
    #[error("child {0} handle unavailable")]
    Stdio(&'static str),

    /// Waiting for (or polling) the child's termination failed.
    #[error("failed to wait for child: {0}")]
    Wait(#[source] std::io::Error),

    /// The child has not terminated yet.
    #[error("child process is still running")]
    StillRunning,

    /// Delivering the kill request failed.
    #[error("failed to kill child: {0}")]
    Kill(#[source] std::io::Error),
}
