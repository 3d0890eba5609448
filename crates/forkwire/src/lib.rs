// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod child;
pub mod error;
pub mod pid;
pub mod relaunch;
pub mod spec;
pub mod wire;

pub use child::{ByteSink, ByteSource, ForkedChild};
pub use error::ForkError;
pub use pid::current_pid;
pub use relaunch::{RelaunchCommand, forwarded_properties};
pub use spec::LaunchSpec;
pub use wire::{ChildIo, fork_async, fork_sync};
