// SPDX-License-Identifier: MIT OR Apache-2.0
//! LaunchSpec construction, sparse filtering, and serde round-trips.

use forkwire::LaunchSpec;
use std::collections::BTreeMap;

#[test]
fn new_collects_argv_in_order() {
    let spec = LaunchSpec::new(["prog", "-a", "-b"]);
    assert_eq!(spec.argv, ["prog", "-a", "-b"]);
    assert!(spec.env.is_none());
    assert!(spec.current_dir.is_none());
    assert!(!spec.redirect_error_stream);
}

#[test]
fn from_sparse_drops_absent_entries() {
    let verbose = false;
    let spec = LaunchSpec::from_sparse([
        Some("prog"),
        verbose.then_some("-v"),
        Some("input.txt"),
        None,
    ]);
    assert_eq!(spec.argv, ["prog", "input.txt"]);
}

#[test]
fn from_sparse_of_nothing_is_empty() {
    let spec = LaunchSpec::from_sparse(Vec::<Option<String>>::new());
    assert!(spec.argv.is_empty());
}

#[test]
fn env_var_switches_to_replacement() {
    let spec = LaunchSpec::new(["prog"]).env_var("KEY", "value");
    let env = spec.env.expect("replacement env");
    assert_eq!(env.get("KEY").map(String::as_str), Some("value"));
}

#[test]
fn env_replaces_wholesale() {
    let mut env = BTreeMap::new();
    env.insert("ONLY".to_owned(), "this".to_owned());
    let spec = LaunchSpec::new(["prog"]).env_var("DROPPED", "x").env(env);
    let env = spec.env.expect("replacement env");
    assert_eq!(env.len(), 1);
    assert!(env.contains_key("ONLY"));
}

#[test]
fn builder_chain_composes() {
    let spec = LaunchSpec::new(["prog"])
        .arg("--flag")
        .current_dir("/tmp")
        .redirect_error_stream(true);
    assert_eq!(spec.argv, ["prog", "--flag"]);
    assert_eq!(spec.current_dir.as_deref(), Some(std::path::Path::new("/tmp")));
    assert!(spec.redirect_error_stream);
}

#[test]
fn serde_round_trip_preserves_spec() {
    let spec = LaunchSpec::new(["prog", "-x"])
        .env_var("A", "1")
        .current_dir("/work")
        .redirect_error_stream(true);

    let json = serde_json::to_string(&spec).expect("serialize");
    let back: LaunchSpec = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, spec);
}
