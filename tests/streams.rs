use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command { Command::cargo_bin("brainguck").unwrap() }

#[test]
fn test_stdout_only_for_program_output() {
    cargo_bin()
        .arg("run").arg("-v").arg("-d").arg("+++.")
        .assert()
        .success()
        .stdout("\u{3}")
        .stderr(predicate::str::contains("bytes read."));
}

#[test]
fn test_config_file_sets_tape_size() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("brainguck.toml");
    std::fs::write(&path, "[interpreter]\ntape_size = 1\n").unwrap();
    cargo_bin()
        .env("BRAINGUCK_CONFIG", &path)
        .arg("run").arg(">")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pointer out of bounds"));
}

#[test]
fn test_flag_beats_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("brainguck.toml");
    std::fs::write(&path, "[interpreter]\ntape_size = 1\n").unwrap();
    cargo_bin()
        .env("BRAINGUCK_CONFIG", &path)
        .arg("run").arg("--tape-size").arg("4").arg(">+.")
        .assert()
        .success()
        .stdout("\u{1}");
}
