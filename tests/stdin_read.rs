// Exercises the ',' (input) instruction by providing bytes on stdin.
use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command { Command::cargo_bin("brainguck").unwrap() }

#[test]
fn reads_from_stdin_and_echoes_byte() {
    cargo_bin()
        .arg("run").arg(",.")
        .write_stdin("a")
        .assert()
        .success()
        .stdout("a");
}

#[test]
fn input_is_consumed_one_byte_per_comma() {
    cargo_bin()
        .arg("run").arg(",.,,.")
        .write_stdin("xyz")
        .assert()
        .success()
        .stdout("xz");
}

#[test]
fn exhausted_stdin_fails_with_processed_count() {
    cargo_bin()
        .arg("run").arg("-v").arg("+.,.")
        .write_stdin("")
        .assert()
        .code(1)
        .stdout("\u{1}")
        .stderr(predicate::str::contains("input exhausted")
            .and(predicate::str::contains("2 bytes processed"))
            .and(predicate::str::contains("2 bytes read.")));
}

#[test]
fn skipped_comma_reads_nothing() {
    cargo_bin()
        .arg("run").arg("[,],.")
        .write_stdin("q")
        .assert()
        .success()
        .stdout("q");
}

#[test]
fn raw_bytes_pass_through_unchanged() {
    cargo_bin()
        .arg("run").arg(",.")
        .write_stdin(vec![0xffu8])
        .assert()
        .success()
        .stdout(vec![0xffu8]);
}
