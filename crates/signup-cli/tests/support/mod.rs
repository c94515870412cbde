#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("signup");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env_remove("RUST_LOG");
    (command, temp_home)
}

pub fn config_dir(home: &Path) -> PathBuf {
    home.join(".config").join("signup")
}

pub fn write_config(home: &Path, contents: &str) {
    let dir = config_dir(home);
    fs::create_dir_all(&dir).expect("create config dir");
    fs::write(dir.join("config.toml"), contents).expect("write config");
}

pub fn diagnostics_logs(home: &Path) -> Vec<PathBuf> {
    let dir = config_dir(home).join("diagnostics");
    let mut logs: Vec<PathBuf> = fs::read_dir(&dir)
        .expect("diagnostics dir")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect();
    logs.sort();

    assert!(!logs.is_empty(), "expected at least one diagnostics log");
    for log in &logs {
        let name = log
            .file_name()
            .and_then(|name| name.to_str())
            .expect("diagnostics filename utf8");
        let stem = name
            .strip_suffix(".log")
            .unwrap_or_else(|| panic!("diagnostics file should end with .log: {name}"));
        assert!(
            !stem.is_empty() && stem.chars().all(|character| character.is_ascii_digit()),
            "diagnostics filename must be <timestamp>.log, got: {name}"
        );
    }
    logs
}
