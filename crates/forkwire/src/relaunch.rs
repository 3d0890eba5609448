// SPDX-License-Identifier: MIT OR Apache-2.0
//! Argument-vector assembly for relaunching a managed runtime.
//!
//! Pure string assembly — nothing here creates a process. The produced
//! vector feeds [`LaunchSpec::new`](crate::LaunchSpec::new).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[cfg(windows)]
const CLASSPATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
const CLASSPATH_SEPARATOR: char = ':';

/// The current process's properties, filtered for forwarding to a child
/// runtime.
///
/// Environment pairs whose key or value is empty or contains whitespace are
/// excluded — they cannot survive `-D<key>=<value>` assembly intact. Values
/// are trimmed before the check.
pub fn forwarded_properties() -> BTreeMap<String, String> {
    std::env::vars()
        .filter_map(|(key, value)| {
            let value = value.trim().to_owned();
            let clean = !key.is_empty()
                && !value.is_empty()
                && !key.contains(char::is_whitespace)
                && !value.contains(char::is_whitespace);
            clean.then_some((key, value))
        })
        .collect()
}

/// Builder for the argument vector that relaunches a managed runtime:
///
/// `[runtime, ...runtime_args, "-D<key>=<value>"..., "-cp", <classpath>,
/// entry_point, ...args]`
///
/// Explicit properties are layered over [`forwarded_properties`], explicit
/// entries winning on key collision. Classpath entries are joined with the
/// platform path-list separator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaunchCommand {
    /// Runtime executable, argv\[0\] of the produced vector.
    pub runtime: PathBuf,
    /// Arguments for the runtime itself, ahead of the properties.
    pub runtime_args: Vec<String>,
    /// Explicit properties layered over the forwarded set.
    pub properties: BTreeMap<String, String>,
    /// Classpath entries, joined in order.
    pub classpath: Vec<PathBuf>,
    /// Entry-point identifier handed to the runtime.
    pub entry_point: String,
    /// Program arguments, after the entry point.
    pub args: Vec<String>,
}

impl RelaunchCommand {
    /// Start a command for `runtime` launching `entry_point`.
    pub fn new(runtime: impl Into<PathBuf>, entry_point: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
            runtime_args: Vec::new(),
            properties: BTreeMap::new(),
            classpath: Vec::new(),
            entry_point: entry_point.into(),
            args: Vec::new(),
        }
    }

    /// Start a command that relaunches the current executable.
    pub fn current(entry_point: impl Into<String>) -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?, entry_point))
    }

    /// Append one runtime argument.
    pub fn runtime_arg(mut self, arg: impl Into<String>) -> Self {
        self.runtime_args.push(arg.into());
        self
    }

    /// Set one explicit property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Append one classpath entry.
    pub fn classpath_entry(mut self, entry: impl Into<PathBuf>) -> Self {
        self.classpath.push(entry.into());
        self
    }

    /// Append one program argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Assemble the argument vector.
    pub fn into_argv(self) -> Vec<String> {
        let mut properties = forwarded_properties();
        properties.extend(self.properties);

        let mut argv = Vec::with_capacity(
            1 + self.runtime_args.len() + properties.len() + 3 + self.args.len(),
        );
        argv.push(self.runtime.to_string_lossy().into_owned());
        argv.extend(self.runtime_args);
        for (key, value) in properties {
            argv.push(format!("-D{key}={value}"));
        }
        argv.push("-cp".to_owned());
        argv.push(join_classpath(&self.classpath));
        argv.push(self.entry_point);
        argv.extend(self.args);
        argv
    }
}

fn join_classpath(entries: &[PathBuf]) -> String {
    let mut joined = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            joined.push(CLASSPATH_SEPARATOR);
        }
        joined.push_str(&entry.to_string_lossy());
    }
    joined
}
