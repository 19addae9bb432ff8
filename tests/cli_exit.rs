// tests/cli_exit.rs - Exit code tests against the real binary
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn layerguard(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_layerguard"))
        .args(args)
        .env("LAYERGUARD_PATH", root)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute layerguard")
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(root: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=ci", "-c", "user.email=ci@example.com"])
        .args(args)
        .current_dir(root)
        .status()
        .expect("git failed to start");
    assert!(status.success(), "git {args:?} failed");
}

/// Repository with one commit touching `files`, plus a stand-in for cflow that
/// prints a fixed call tree.
#[cfg(unix)]
fn repo_with_commit(files: &[(&str, &str)], layers: &str, call_tree: &str) -> TempDir {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    fs::write(root.join("layers.json"), layers).unwrap();

    let tool = root.join("fake-cflow.sh");
    fs::write(&tool, format!("#!/bin/sh\ncat <<'TREE'\n{call_tree}\nTREE\n")).unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
    fs::write(
        root.join("layerguard.toml"),
        format!("[graph]\nprogram = \"{}\"\n", tool.display()),
    )
    .unwrap();

    git(root, &["init", "-q"]);
    let names: Vec<&str> = files.iter().map(|(rel, _)| *rel).collect();
    let mut add = vec!["add", "--"];
    add.extend(names);
    git(root, &add);
    git(root, &["commit", "-q", "-m", "Add modules"]);
    dir
}

#[test]
fn test_missing_layer_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let out = layerguard(dir.path(), &["-c", "HEAD"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("layers.json"));
}

#[test]
fn test_malformed_layer_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("layers.json"), r#"{"a.c": "top"}"#).unwrap();
    let out = layerguard(dir.path(), &["-c", "HEAD"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_invalid_settings_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("layers.json"), "{}").unwrap();
    fs::write(dir.path().join("layerguard.toml"), "[graph\n").unwrap();
    let out = layerguard(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_help_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    let out = layerguard(dir.path(), &["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--assert"));
}

#[cfg(unix)]
#[test]
fn test_exit_0_when_commit_touches_no_layered_file() {
    if !git_available() {
        return;
    }
    let dir = repo_with_commit(&[("README.md", "docs\n")], r#"{"core/low.c": 0}"#, "");
    let out = layerguard(dir.path(), &["--assert"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty(), "no report expected");
}

#[cfg(unix)]
#[test]
fn test_assert_mode_fails_after_printing_report() {
    if !git_available() {
        return;
    }
    let tree = "\
low() <void low (void) at core/low.c:1>:
    high() <void high (void) at app/high.c:1>";
    let dir = repo_with_commit(
        &[("core/low.c", "void low(void) {}\n"), ("app/high.c", "void high(void) {}\n")],
        r#"{"core/low.c": 0, "app/high.c": 1}"#,
        tree,
    );

    let out = layerguard(dir.path(), &["--assert"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(4));
    assert!(stdout.contains("BACK_CALL"));
    assert!(stdout.contains("BCVI"));

    let relaxed = layerguard(dir.path(), &[]);
    assert_eq!(relaxed.status.code(), Some(0));
}

#[cfg(unix)]
#[test]
fn test_json_report_is_parseable() {
    if !git_available() {
        return;
    }
    let tree = "\
top() <void top (void) at app/top.c:1>:
    base() <void base (void) at core/base.c:1>";
    let dir = repo_with_commit(
        &[("app/top.c", "void top(void) {}\n"), ("core/base.c", "void base(void) {}\n")],
        r#"{"core/base.c": 0, "app/top.c": 2}"#,
        tree,
    );

    let out = layerguard(dir.path(), &["--format", "json"]);
    assert_eq!(out.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["classification"]["skip_calls"][0]["edge"]["caller"], "app/top.c");
    assert_eq!(value["subject"], "Add modules");
}
