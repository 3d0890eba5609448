// SPDX-License-Identifier: MIT OR Apache-2.0
//! Launch parameters for a forked child process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A request to start a child process: argument vector, environment,
/// working directory, and stderr folding.
///
/// `argv[0]` is the program; the vector is handed to the OS as-is. The spec
/// is consumed once by [`fork_async`](crate::fork_async) /
/// [`fork_sync`](crate::fork_sync), which reject an empty argv with
/// [`ForkError::EmptyArgv`](crate::ForkError::EmptyArgv) before any process
/// is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchSpec {
    /// Full argument vector, program at index 0.
    pub argv: Vec<String>,
    /// Replacement environment. `Some` replaces the inherited environment
    /// entirely — it is never merged with it. `None` inherits.
    pub env: Option<BTreeMap<String, String>>,
    /// Working directory override.
    pub current_dir: Option<PathBuf>,
    /// Fold stderr into the stdout stream.
    pub redirect_error_stream: bool,
}

impl LaunchSpec {
    /// Build a spec from a full argument vector.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Build a spec from an argument vector with optional entries, dropping
    /// every `None`.
    ///
    /// Convenient when the vector is assembled from pieces that may be
    /// absent (conditional flags, optional values).
    pub fn from_sparse<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::new(argv.into_iter().flatten())
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    /// Replace the child's environment with exactly `env`.
    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Set one variable in the replacement environment, switching the spec
    /// from inheriting to replacing if it was not already.
    pub fn env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the child's working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Fold the child's stderr into its stdout stream.
    pub fn redirect_error_stream(mut self, redirect: bool) -> Self {
        self.redirect_error_stream = redirect;
        self
    }
}
