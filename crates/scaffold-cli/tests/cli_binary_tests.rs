//! Tests that run the compiled `scaffold` binary and check exit codes and output

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use tempfile::TempDir;

/// Run the binary with an isolated config directory
fn scaffold(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scaffold"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("SCAFFOLD_DEFAULT_POLICY")
        .env_remove("SCAFFOLD_LOG")
        .output()
        .expect("Failed to run scaffold")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_create_success_prints_summary() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let destination = out.path().join("demo");

    let output = scaffold(
        home.path(),
        &["create", "basic", destination.to_str().unwrap(), "--set", "projectName=demo"],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Files written: 6"), "stdout: {}", text);
    assert!(text.contains(destination.to_str().unwrap()));
}

#[test]
fn test_create_json_output() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let destination = out.path().join("demo");

    let output = scaffold(
        home.path(),
        &[
            "create",
            "basic",
            destination.to_str().unwrap(),
            "--set",
            "projectName=demo",
            "--json",
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], serde_json::Value::Bool(true));
    assert_eq!(value["dry_run"], serde_json::Value::Bool(false));
    assert_eq!(value["files"][0]["outcome"], "written");
}

#[test]
fn test_missing_variable_exit_code() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let output = scaffold(
        home.path(),
        &["create", "basic", out.path().join("x").to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(3));
    let text = stderr(&output);
    assert!(text.contains("MissingVariableError"), "stderr: {}", text);
    assert!(text.contains("projectName"));
}

#[test]
fn test_unknown_template_exit_code() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let output = scaffold(home.path(), &["create", "rails", out.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("NotFoundError"));
}

#[test]
fn test_conflict_exit_code_lists_path() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("README.md"), "mine").unwrap();

    let output = scaffold(
        home.path(),
        &["create", "basic", out.path().to_str().unwrap(), "--set", "projectName=demo"],
    );

    assert_eq!(output.status.code(), Some(4));
    let text = stderr(&output);
    assert!(text.contains("ConflictError"), "stderr: {}", text);
    assert!(text.contains("README.md"));
    assert!(!out.path().join("index.js").exists());
}

#[test]
fn test_config_file_default_policy() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("README.md"), "mine").unwrap();
    let config = home.path().join("custom.toml");
    fs::write(&config, "default_policy = \"skip\"\n").unwrap();

    let output = scaffold(
        home.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "create",
            "basic",
            out.path().to_str().unwrap(),
            "--set",
            "projectName=demo",
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(out.path().join("README.md")).unwrap(), "mine");
    assert!(out.path().join("index.js").exists());
}

#[test]
fn test_env_default_policy() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("README.md"), "mine").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_scaffold"))
        .args([
            "create",
            "basic",
            out.path().to_str().unwrap(),
            "--set",
            "projectName=demo",
        ])
        .env("XDG_CONFIG_HOME", home.path())
        .env("SCAFFOLD_DEFAULT_POLICY", "overwrite")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(fs::read_to_string(out.path().join("README.md"))
        .unwrap()
        .starts_with("# demo"));
}

#[test]
fn test_missing_config_file_exit_code() {
    let home = TempDir::new().unwrap();

    let output = scaffold(
        home.path(),
        &["--config", home.path().join("absent.toml").to_str().unwrap(), "list"],
    );

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_list_shows_bundled_templates() {
    let home = TempDir::new().unwrap();

    let output = scaffold(home.path(), &["list"]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    for id in ["basic", "express", "fastapi"] {
        assert!(text.contains(id), "missing {} in: {}", id, text);
    }
}

#[test]
fn test_dry_run_writes_nothing() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let destination = out.path().join("demo");

    let output = scaffold(
        home.path(),
        &[
            "--dry-run",
            "create",
            "basic",
            destination.to_str().unwrap(),
            "--set",
            "projectName=demo",
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("(dry-run)"));
    assert!(!destination.exists());
}

/// Template whose second file is larger than the file size limit below
#[cfg(unix)]
fn write_bulk_template(root: &Path) {
    let dir = root.join("bulk");
    fs::create_dir_all(dir.join("files")).unwrap();
    fs::write(
        dir.join("template.yaml"),
        "id: bulk\nfiles:\n  - small.txt\n  - big.txt\n",
    )
    .unwrap();
    fs::write(dir.join("files/small.txt"), "small").unwrap();
    fs::write(dir.join("files/big.txt"), "x".repeat(4 * 1024 * 1024)).unwrap();
}

/// Run the binary with writes capped well below 4 MiB
#[cfg(unix)]
fn scaffold_with_file_limit(config_home: &Path, args: &[&str]) -> Output {
    Command::new("/bin/sh")
        .arg("-c")
        .arg(r#"trap '' XFSZ; ulimit -f 1024; exec "$0" "$@""#)
        .arg(env!("CARGO_BIN_EXE_scaffold"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("SCAFFOLD_DEFAULT_POLICY")
        .env_remove("SCAFFOLD_LOG")
        .output()
        .expect("Failed to run scaffold")
}

#[cfg(unix)]
#[test]
fn test_failed_overwrite_restores_original() {
    let home = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();
    write_bulk_template(templates.path());
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("big.txt"), "original").unwrap();

    let output = scaffold_with_file_limit(
        home.path(),
        &[
            "--templates-dir",
            templates.path().to_str().unwrap(),
            "create",
            "bulk",
            out.path().to_str().unwrap(),
            "--policy",
            "overwrite",
        ],
    );

    assert_eq!(output.status.code(), Some(5), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(out.path().join("big.txt")).unwrap(), "original");
    assert!(!out.path().join("small.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_failed_create_leaves_no_partial_file() {
    let home = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();
    write_bulk_template(templates.path());
    let out = TempDir::new().unwrap();
    let destination = out.path().join("fresh");

    let output = scaffold_with_file_limit(
        home.path(),
        &[
            "--templates-dir",
            templates.path().to_str().unwrap(),
            "create",
            "bulk",
            destination.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(5), "stderr: {}", stderr(&output));
    assert!(!destination.join("big.txt").exists());
    assert!(!destination.exists());
}
