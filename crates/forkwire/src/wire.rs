// SPDX-License-Identifier: MIT OR Apache-2.0
//! The wiring orchestrator: builds the drain/tee/merge topology around a
//! freshly spawned child and keeps every OS pipe drained.

use std::process::Stdio;

use forkwire_stream::{ChannelWriter, MergeReader, Mirror, Pump, TeeReader, TeeWriter};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};
use tracing::debug;

use crate::child::{ByteSink, ByteSource, ForkedChild};
use crate::error::ForkError;
use crate::spec::LaunchSpec;

/// Caller-supplied stream endpoints for a fork.
///
/// `stdin` is a source the orchestrator forwards into the child. `stdout`
/// and `stderr` are sinks the child's output is mirrored into. All three
/// are optional; each combination selects a different wiring (see the
/// crate-level docs and [`fork_async`] / [`fork_sync`]).
#[derive(Default)]
pub struct ChildIo {
    /// Source forwarded into the child's stdin.
    pub stdin: Option<ByteSource>,
    /// Sink receiving the child's stdout — and its stderr too when the
    /// launch folds the streams.
    pub stdout: Option<ByteSink>,
    /// Sink receiving the child's stderr. Receives nothing when the launch
    /// folds stderr into stdout.
    pub stderr: Option<ByteSink>,
}

impl ChildIo {
    /// Endpoints with nothing supplied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward `source` into the child's stdin.
    pub fn stdin(mut self, source: impl AsyncRead + Send + Unpin + 'static) -> Self {
        self.stdin = Some(Box::new(source));
        self
    }

    /// Mirror the child's stdout into `sink`.
    pub fn stdout(mut self, sink: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        self.stdout = Some(Box::new(sink));
        self
    }

    /// Mirror the child's stderr into `sink`.
    pub fn stderr(mut self, sink: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        self.stderr = Some(Box::new(sink));
        self
    }
}

impl std::fmt::Debug for ChildIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildIo")
            .field("stdin", &self.stdin.is_some())
            .field("stdout", &self.stdout.is_some())
            .field("stderr", &self.stderr.is_some())
            .finish()
    }
}

#[derive(Clone, Copy)]
enum Mode {
    Sync,
    Async,
}

struct Wired {
    child: Child,
    stdin: ByteSink,
    stdout: ByteSource,
    stderr: ByteSource,
    drains: Vec<Pump>,
    mirrors: Vec<Mirror>,
}

fn inert_source() -> ByteSource {
    Box::new(tokio::io::empty())
}

/// Mirror selection: a caller sink always gets a forwarder; in sync mode a
/// missing sink still needs one over a discard target, because the drain
/// must exist either way.
fn spawn_mirror(sink: Option<ByteSink>, mode: Mode) -> Option<Mirror> {
    match (sink, mode) {
        (Some(sink), _) => Some(Mirror::spawn(sink)),
        (None, Mode::Sync) => Some(Mirror::spawn(tokio::io::sink())),
        (None, Mode::Async) => None,
    }
}

/// Wire one output stream: sync gets a dedicated pump into the mirror and
/// an inert handle slot; async gets a read-tee when a mirror exists, the
/// raw source otherwise.
fn wire_output(
    raw: ByteSource,
    mode: Mode,
    mirror: Option<&Mirror>,
    drains: &mut Vec<Pump>,
) -> ByteSource {
    match (mode, mirror) {
        (Mode::Sync, Some(mirror)) => {
            drains.push(Pump::spawn(raw, ChannelWriter::new(mirror.sender())));
            inert_source()
        }
        (Mode::Sync, None) => {
            drains.push(Pump::spawn(raw, tokio::io::sink()));
            inert_source()
        }
        (Mode::Async, Some(mirror)) => Box::new(TeeReader::new(raw, mirror.sender())),
        (Mode::Async, None) => raw,
    }
}

fn wire(spec: LaunchSpec, io: ChildIo, mode: Mode) -> Result<Wired, ForkError> {
    if spec.argv.is_empty() {
        return Err(ForkError::EmptyArgv);
    }

    let mut cmd = Command::new(&spec.argv[0]);
    cmd.args(&spec.argv[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(env) = &spec.env {
        // Full replacement, never a merge with the inherited environment.
        cmd.env_clear();
        cmd.envs(env);
    }
    if let Some(dir) = &spec.current_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(ForkError::Spawn)?;
    debug!(target: "forkwire.wire", pid = ?child.id(), argv0 = %spec.argv[0], "child spawned");

    let raw_stdin = child.stdin.take().ok_or(ForkError::Stdio("stdin"))?;
    let raw_stdout: ByteSource =
        Box::new(child.stdout.take().ok_or(ForkError::Stdio("stdout"))?);
    let raw_stderr: ByteSource =
        Box::new(child.stderr.take().ok_or(ForkError::Stdio("stderr"))?);

    let ChildIo {
        stdin: in_source,
        stdout: out_sink,
        stderr: err_sink,
    } = io;

    let mut drains = Vec::new();
    let mut mirrors = Vec::new();

    let stdout_mirror = spawn_mirror(out_sink, mode);

    let (stdout, stderr) = if spec.redirect_error_stream {
        // The merge owns the only drains of both raw streams; the stderr
        // slot goes inert and a caller stderr sink receives nothing.
        drop(err_sink);
        let merged: ByteSource = Box::new(MergeReader::spawn(raw_stdout, raw_stderr));
        let stdout = wire_output(merged, mode, stdout_mirror.as_ref(), &mut drains);
        (stdout, inert_source())
    } else {
        let stdout = wire_output(raw_stdout, mode, stdout_mirror.as_ref(), &mut drains);
        let stderr_mirror = spawn_mirror(err_sink, mode);
        let stderr = wire_output(raw_stderr, mode, stderr_mirror.as_ref(), &mut drains);
        mirrors.extend(stderr_mirror);
        (stdout, stderr)
    };

    let stdin: ByteSink = match in_source {
        Some(source) => {
            // One feed task owns the raw stdin so the forward pump and the
            // handle's accessor can share it without aliasing.
            let feed = Mirror::spawn(raw_stdin);
            Pump::spawn(source, ChannelWriter::new(feed.sender())).detach();
            let accessor: ByteSink = match (mode, &stdout_mirror) {
                // Echo policy: programmatic stdin writes are also mirrored
                // into the caller's stdout sink.
                (Mode::Async, Some(mirror)) => Box::new(TeeWriter::new(
                    ChannelWriter::new(feed.sender()),
                    mirror.sender(),
                )),
                (Mode::Async, None) => Box::new(ChannelWriter::new(feed.sender())),
                // Sync mode exposes no accessor; the feed closes the
                // child's stdin once the forwarded source reaches EOF.
                (Mode::Sync, _) => Box::new(tokio::io::sink()),
            };
            feed.detach();
            accessor
        }
        None => match mode {
            Mode::Async => Box::new(raw_stdin),
            // Nothing will ever write in sync mode: close stdin now so the
            // child sees EOF instead of waiting on input that cannot come.
            Mode::Sync => {
                drop(raw_stdin);
                Box::new(tokio::io::sink())
            }
        },
    };

    mirrors.extend(stdout_mirror);

    Ok(Wired {
        child,
        stdin,
        stdout,
        stderr,
        drains,
        mirrors,
    })
}

/// Fork a non-blocking child process.
///
/// Every background drain the wiring needs is started before the handle is
/// returned. The caller interacts with the child only through the handle's
/// wired endpoints:
///
/// - with a `stdout`/`stderr` sink supplied, the matching handle source is
///   a read-tee — the handle reader and the sink both receive every byte;
/// - with no sink, the handle source is the raw stream and the caller is
///   solely responsible for draining it;
/// - with `redirect_error_stream`, the stdout source yields the merged
///   stdout+stderr stream and the stderr source is inert.
pub async fn fork_async(spec: LaunchSpec, io: ChildIo) -> Result<ForkedChild, ForkError> {
    let Wired {
        child,
        stdin,
        stdout,
        stderr,
        drains,
        mirrors,
    } = wire(spec, io, Mode::Async)?;
    for drain in drains {
        drain.detach();
    }
    for mirror in mirrors {
        mirror.detach();
    }
    Ok(ForkedChild::new(child, stdin, stdout, stderr))
}

/// Fork a child process and resolve once it has terminated.
///
/// Both output streams are drained for the child's whole lifetime — into
/// the caller's sinks when supplied, into a discard target otherwise — so a
/// child that writes more than the OS pipe buffers cannot stall the wait.
/// By the time this returns, every caller sink has received all of its
/// bytes. Returns the child's exit code (`-1` for death by signal).
pub async fn fork_sync(spec: LaunchSpec, io: ChildIo) -> Result<i32, ForkError> {
    let Wired {
        mut child,
        stdin,
        stdout,
        stderr,
        drains,
        mirrors,
    } = wire(spec, io, Mode::Sync)?;
    // Sync wiring leaves the handle endpoints inert.
    drop((stdin, stdout, stderr));

    let status = child.wait().await.map_err(ForkError::Wait)?;
    for drain in drains {
        // Drain failures were already logged by the pump; the mirrored
        // output is best-effort by contract.
        let _ = drain.join().await;
    }
    for mirror in mirrors {
        mirror.finish().await;
    }
    Ok(status.code().unwrap_or(-1))
}
