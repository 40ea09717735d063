//! CLI tests for the starwars binary module
//!
//! This test suite runs the compiled binary the way the automation host does
//! (a single arguments file) and the way a user does (flags), covering:
//! - Result JSON shape and exit codes
//! - Check mode short circuit
//! - Argument spec failures
//! - Configuration defaults
//! - Documentation and listing output

mod common;

use std::io::Write;

use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::NamedTempFile;

use common::{args_file, run_args, starwars_cmd};

// ============================================================================
// Host invocation
// ============================================================================

#[test]
fn test_args_file_success() {
    let (code, result) = run_args(json!({"movie": 1, "scheme": "released"}));

    assert_eq!(code, 0);
    assert_eq!(result["changed"], false);
    assert_eq!(result["title"], "Episode IV – A New Hope");
    assert_eq!(result["trilogy"], "Original");
    assert_eq!(result["trilogy_sequence"], 1);
    assert!(result.get("failed").is_none());
}

#[test]
fn test_args_file_default_scheme_is_chronological() {
    let (code, result) = run_args(json!({"movie": 1}));

    assert_eq!(code, 0);
    assert_eq!(result["title"], "Episode I – The Phantom Menace");
    assert_eq!(result["trilogy"], "Prequel");
    assert_eq!(result["invocation"]["module_args"]["scheme"], "chronological");
}

#[test]
fn test_args_file_out_of_range() {
    let (code, result) = run_args(json!({"movie": 10, "scheme": "released"}));

    assert_eq!(code, 1);
    assert_eq!(result["failed"], true);
    assert_eq!(result["msg"], "Movie number must be 1 to 9");
    assert_eq!(result["title"], "");
    assert_eq!(result["trilogy_sequence"], 0);
}

#[test]
fn test_args_file_invalid_scheme() {
    let (code, result) = run_args(json!({"movie": 1, "scheme": "alternate"}));

    assert_eq!(code, 1);
    assert_eq!(result["msg"], "Scheme must be 'chronological' or 'released'");
}

#[test]
fn test_args_file_check_mode() {
    let (code, result) = run_args(json!({
        "movie": 0,
        "_ansible_check_mode": true,
        "_ansible_diff": false
    }));

    assert_eq!(code, 0);
    assert_eq!(result["changed"], false);
    assert_eq!(result["title"], "");
    assert_eq!(result["trilogy"], "");
}

#[test]
fn test_args_file_missing_movie() {
    let (code, result) = run_args(json!({"scheme": "released"}));

    assert_eq!(code, 1);
    assert_eq!(result["msg"], "missing required arguments: movie");
}

#[test]
fn test_args_file_unsupported_parameter() {
    let (code, result) = run_args(json!({"movie": 1, "episode": 4}));

    assert_eq!(code, 1);
    assert!(result["msg"]
        .as_str()
        .unwrap()
        .starts_with("Unsupported parameters for (movie) module: episode."));
}

#[test]
fn test_args_file_not_found() {
    let output = starwars_cmd()
        .arg("/nonexistent/starwars/args.json")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["failed"], true);
    assert!(result["msg"]
        .as_str()
        .unwrap()
        .contains("Failed to read module arguments"));
}

#[test]
fn test_args_file_malformed() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "movie=1 scheme=released").unwrap();

    starwars_cmd()
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""failed":true"#));
}

#[test]
fn test_stdout_is_only_json_with_verbose_logging() {
    let file = args_file(json!({"movie": 2}));
    let output = starwars_cmd().arg("-vvv").arg(file.path()).output().unwrap();
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["title"], "Episode II – Attack of the Clones");
}

// ============================================================================
// Direct invocation
// ============================================================================

#[test]
fn test_direct_invocation_json() {
    starwars_cmd()
        .args(["--movie", "4", "--scheme", "released"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Episode I – The Phantom Menace"));
}

#[test]
fn test_direct_invocation_human() {
    starwars_cmd()
        .args(["--movie", "7", "--scheme", "released", "-o", "human"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ok: [localhost] => Episode VII – The Force Awakens (Sequel #1)",
        ));
}

#[test]
fn test_direct_invocation_negative_number() {
    starwars_cmd()
        .args(["--movie", "-1", "-o", "human"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Movie number must be 1 to 9"));
}

#[test]
fn test_direct_check_mode() {
    starwars_cmd()
        .args(["--movie", "42", "--check", "-o", "human"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(check mode)"));
}

#[test]
fn test_no_arguments_fails_with_json() {
    starwars_cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no module arguments given"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_module_defaults() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[module_defaults.movie]\nscheme = \"released\"").unwrap();

    let file = args_file(json!({"movie": 1}));
    let output = starwars_cmd()
        .arg("--config")
        .arg(config.path())
        .arg(file.path())
        .output()
        .unwrap();

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["title"], "Episode IV – A New Hope");
}

#[test]
fn test_env_scheme_default_yields_to_explicit() {
    let file = args_file(json!({"movie": 1, "scheme": "chronological"}));
    let output = starwars_cmd()
        .env("STARWARS_SCHEME", "released")
        .arg(file.path())
        .output()
        .unwrap();

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["title"], "Episode I – The Phantom Menace");
}

// ============================================================================
// Documentation and listing
// ============================================================================

#[test]
fn test_doc_output() {
    starwars_cmd()
        .arg("--doc")
        .assert()
        .success()
        .stdout(predicate::str::contains("module: movie"))
        .stdout(predicate::str::contains("trilogy_sequence"))
        .stdout(predicate::str::contains("Fred van Zwieten (@fvzwieten)"))
        .stdout(predicate::str::contains("supported_by: community"));
}

#[test]
fn test_list_released_human() {
    starwars_cmd()
        .args(["--list", "--scheme", "released", "-o", "human"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MOVIES [released]"))
        .stdout(predicate::str::contains("Episode IV – A New Hope"));
}

#[test]
fn test_list_json() {
    let output = starwars_cmd().arg("--list").output().unwrap();
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(result["scheme"], "chronological");
    assert_eq!(result["movies"].as_array().unwrap().len(), 9);
    assert_eq!(result["movies"][0]["title"], "Episode I – The Phantom Menace");
    assert_eq!(result["movies"][0]["id"], 4);
}

#[test]
fn test_list_invalid_scheme() {
    starwars_cmd()
        .args(["--list", "--scheme", "alternate"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Scheme must be 'chronological' or 'released'",
        ));
}
