// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod chan;
pub mod merge;
pub mod mirror;
pub mod pump;
pub mod tee;

pub use chan::ChannelWriter;
pub use merge::MergeReader;
pub use mirror::{Mirror, MirrorSender};
pub use pump::{COPY_BUF_SIZE, Pump, copy_bytes};
pub use tee::{TeeReader, TeeWriter};
