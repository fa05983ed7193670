use super::test_helpers::{create_stacked_repo, mark_initialized};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Run the `sk` binary with an isolated config file
fn run_sk(args: &[&str], cwd: &Path, config: &Path, stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sk"))
        .args(args)
        .current_dir(cwd)
        .env("STACKSCOPE_CONFIG", config)
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("sk should start");

    if let Some(input) = stdin {
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
    } else {
        drop(child.stdin.take());
    }

    child.wait_with_output().unwrap()
}

#[test]
fn test_parse_reads_stdin() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.json");
    let report = "\x1b[32m◯ feature-b\x1b[0m\n◉ feature-a\n◯ main\nUntracked branches:\n◯ stray\n";

    let output = run_sk(&["parse"], tmp.path(), &config, Some(report));
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["branches"],
        serde_json::json!(["feature-b", "feature-a", "main"])
    );
    assert_eq!(value["currentBranch"], "feature-a");
    assert_eq!(value["parentBranch"], "main");
}

#[test]
fn test_snapshot_json_without_tool() {
    let (tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);
    let config = tmp.path().join("config.json");

    let set = run_sk(
        &["config", "set", "tool.program", "stackscope-no-such-tool"],
        &repo_path,
        &config,
        None,
    );
    assert!(set.status.success(), "{}", String::from_utf8_lossy(&set.stderr));

    let output = run_sk(&["snapshot", "--json"], &repo_path, &config, None);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["available"], false);
    assert_eq!(value["reason"], "tool_not_installed");
    assert_eq!(value["branches"], serde_json::json!([]));
}

#[test]
fn test_config_rejects_unknown_key() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.json");

    let output = run_sk(&["config", "get", "tool.nope"], tmp.path(), &config, None);
    assert!(!output.status.success());
    assert!(!config.exists());
}
