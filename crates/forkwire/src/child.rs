// SPDX-License-Identifier: MIT OR Apache-2.0
//! Caller-facing handle over a wired child process.

use std::fmt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Child;

use crate::error::ForkError;

/// Boxed read endpoint (child stdout/stderr, possibly teed or merged).
pub type ByteSource = Box<dyn AsyncRead + Send + Unpin>;

/// Boxed write endpoint (child stdin, possibly teed, or a caller sink).
pub type ByteSink = Box<dyn AsyncWrite + Send + Unpin>;

/// Handle over a forked child whose stdio has been wired per the caller's
/// [`ChildIo`](crate::ChildIo).
///
/// The stream accessors hand out the wired endpoints — teed, merged, or
/// raw, per the launch parameters — never a second alias of a raw OS pipe.
/// Each endpoint can be taken exactly once; lifecycle operations remain
/// available regardless.
pub struct ForkedChild {
    child: Child,
    stdin: Option<ByteSink>,
    stdout: Option<ByteSource>,
    stderr: Option<ByteSource>,
}

impl ForkedChild {
    pub(crate) fn new(
        child: Child,
        stdin: ByteSink,
        stdout: ByteSource,
        stderr: ByteSource,
    ) -> Self {
        Self {
            child,
            stdin: Some(stdin),
            stdout: Some(stdout),
            stderr: Some(stderr),
        }
    }

    /// Take the wired stdin sink.
    ///
    /// When the launch forwarded a caller source into the child, writes to
    /// this sink are also echoed into the caller's stdout sink (if one was
    /// supplied); otherwise this is the child's raw stdin and dropping it
    /// closes the child's input.
    pub fn take_stdin(&mut self) -> Option<ByteSink> {
        self.stdin.take()
    }

    /// Take the wired stdout source.
    pub fn take_stdout(&mut self) -> Option<ByteSource> {
        self.stdout.take()
    }

    /// Take the wired stderr source.
    ///
    /// Inert (immediate EOF) when the launch folded stderr into stdout: the
    /// merge already owns the real stream.
    pub fn take_stderr(&mut self) -> Option<ByteSource> {
        self.stderr.take()
    }

    /// OS pid, while the child has not been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the child to terminate and return its exit code.
    ///
    /// Returns `-1` when the child was terminated by a signal.
    pub async fn wait(&mut self) -> Result<i32, ForkError> {
        let status = self.child.wait().await.map_err(ForkError::Wait)?;
        Ok(status.code().unwrap_or(-1))
    }

    /// Exit code of the terminated child; never blocks.
    ///
    /// Returns [`ForkError::StillRunning`] before termination. After
    /// termination, repeated calls keep returning the same code.
    pub fn exit_code(&mut self) -> Result<i32, ForkError> {
        match self.child.try_wait().map_err(ForkError::Wait)? {
            Some(status) => Ok(status.code().unwrap_or(-1)),
            None => Err(ForkError::StillRunning),
        }
    }

    /// Request forcible termination without waiting for it to take effect.
    ///
    /// Background drains are not cancelled here: the child's death closes
    /// its pipes, and each drain ends on the EOF or error it then observes.
    pub fn start_kill(&mut self) -> Result<(), ForkError> {
        self.child.start_kill().map_err(ForkError::Kill)
    }

    /// Kill the child and wait for it to be reaped.
    pub async fn kill(&mut self) -> Result<(), ForkError> {
        self.child.kill().await.map_err(ForkError::Kill)
    }
}

impl fmt::Debug for ForkedChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForkedChild")
            .field("id", &self.child.id())
            .field("stdin_taken", &self.stdin.is_none())
            .field("stdout_taken", &self.stdout.is_none())
            .field("stderr_taken", &self.stderr.is_none())
            .finish()
    }
}
