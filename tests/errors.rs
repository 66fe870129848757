use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command { Command::cargo_bin("brainguck").unwrap() }

#[test]
fn test_unmatched_close_bracket_error() {
    cargo_bin()
        .timeout(Duration::from_secs(2)).arg("run").arg("+]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unmatched bracket ']'")
            .and(predicate::str::contains("at instruction 1"))
            .and(predicate::str::contains("1 bytes processed")));
}

#[test]
fn test_unclosed_loop_is_reported() {
    cargo_bin()
        .timeout(Duration::from_secs(2)).arg("run").arg("+[")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unmatched bracket '['")
            .and(predicate::str::contains("2 bytes processed")));
}

#[test]
fn test_pointer_overflow_error() {
    cargo_bin()
        .timeout(Duration::from_secs(2)).arg("run").arg("--tape-size").arg("2").arg(">>")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pointer out of bounds"));
}

#[test]
fn test_left_of_zero_is_not_an_error() {
    cargo_bin()
        .arg("run").arg("<<<+.")
        .assert()
        .success()
        .stdout("\u{1}");
}

#[test]
fn test_invalid_characters_are_ignored() {
    cargo_bin()
        .arg("run").arg("+a+b.")
        .assert()
        .success()
        .stdout("\u{2}");
}

#[test]
fn test_zero_tape_size_is_usage_error() {
    cargo_bin()
        .arg("run").arg("--tape-size").arg("0").arg("+")
        .assert()
        .code(2);
}

#[test]
fn test_unallocatable_tape_size_is_usage_error() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .arg("run").arg("--tape-size").arg(usize::MAX.to_string()).arg("+")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cannot allocate a tape"));
}

#[test]
fn test_verbose_count_printed_on_failure() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run").arg("-v").arg("++]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unmatched bracket ']'")
            .and(predicate::str::contains("2 bytes read.")));
}

#[test]
fn test_step_limit_aborts() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .arg("run").arg("--max-steps").arg("1000").arg("+[]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Execution aborted: step limit exceeded (1000)"));
}

#[test]
fn test_step_limit_from_env() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .env("BRAINGUCK_MAX_STEPS", "50")
        .arg("run").arg("+[]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit exceeded (50)"));
}

#[test]
fn test_timeout_aborts_infinite_loop() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .env("BRAINGUCK_TIMEOUT_MS", "100")
        .arg("run").arg("+[]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Execution aborted: wall-clock timeout exceeded"))
        .stdout(predicate::str::contains("Execution aborted").not());
}
