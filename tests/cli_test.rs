//! CLI surface tests
//!
//! The program takes one initial prompt argument; with no argument it must
//! print usage and exit non-zero without touching the network.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_missing_prompt_prints_usage_and_fails() {
    Command::cargo_bin("oa")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("PROMPT"));
}

#[test]
fn test_help_lists_options() {
    Command::cargo_bin("oa")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PROMPT"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_missing_api_key_is_a_clear_error() {
    Command::cargo_bin("oa")
        .unwrap()
        .arg("hello")
        .env_remove("OPENAI_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}
