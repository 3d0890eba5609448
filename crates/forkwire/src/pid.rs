// SPDX-License-Identifier: MIT OR Apache-2.0
//! Process-identity query.

/// The pid of the current process.
///
/// A pure, stateless query with no process-wide caching. Returns `-1` in
/// the (theoretical) case where the platform value does not fit an `i32`;
/// it never panics.
pub fn current_pid() -> i32 {
    i32::try_from(std::process::id()).unwrap_or(-1)
}
