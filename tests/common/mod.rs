//! Shared test utilities for the starwars test suite.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

use starwars::modules::ModuleParams;

/// Build module params from key/value pairs
pub fn make_params(entries: &[(&str, serde_json::Value)]) -> ModuleParams {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Write a module arguments file the way the host does
pub fn args_file(args: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", args).unwrap();
    file
}

/// The module binary, isolated from the caller's configuration
pub fn starwars_cmd() -> Command {
    let mut cmd = Command::cargo_bin("starwars").unwrap();
    cmd.env("STARWARS_CONFIG", "/nonexistent/starwars.toml")
        .env_remove("STARWARS_SCHEME")
        .env_remove("STARWARS_OUTPUT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Run the binary on an args file and parse its stdout
pub fn run_args(args: serde_json::Value) -> (i32, serde_json::Value) {
    let file = args_file(args);
    let output = starwars_cmd().arg(file.path()).output().unwrap();
    let code = output.status.code().unwrap_or(-1);
    let json = serde_json::from_slice(&output.stdout).unwrap();
    (code, json)
}
