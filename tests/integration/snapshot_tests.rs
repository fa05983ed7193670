use super::test_helpers::{
    commit_file, create_stacked_repo, create_test_git_repo, git, mark_initialized, FakeTool,
};
use stackscope::git::{GitCliProbe, LibGitProbe, ProcessRunner, RepositoryProbe};
use stackscope::stack::{
    FileStatus, GraphiteCli, SnapshotBuilder, StackSnapshot, UnavailableReason,
};
use std::path::Path;
use std::time::Duration;

const STACK_REPORT: &str = "◯ feature-b\n◉ feature-a\n◯ main\n";

fn cli_probe() -> GitCliProbe<ProcessRunner> {
    GitCliProbe::new(ProcessRunner, "git", Duration::from_secs(10))
}

async fn build<P: RepositoryProbe>(probe: P, tool: FakeTool, repo_path: &Path) -> StackSnapshot {
    SnapshotBuilder::new(tool, probe)
        .build(repo_path, repo_path)
        .await
}

/// Both backends must agree on every snapshot
async fn build_both(tool_report: &str, repo_path: &Path) -> StackSnapshot {
    let from_cli = build(cli_probe(), FakeTool::with_report(tool_report), repo_path).await;
    let from_libgit = build(LibGitProbe, FakeTool::with_report(tool_report), repo_path).await;
    assert_eq!(from_cli, from_libgit);
    from_cli
}

#[tokio::test]
async fn test_clean_stack_snapshot() {
    let (_tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);

    let snapshot = build_both(STACK_REPORT, &repo_path).await;

    assert!(snapshot.available);
    assert_eq!(snapshot.reason, None);
    assert_eq!(snapshot.current_branch.as_deref(), Some("feature-a"));
    assert_eq!(snapshot.parent_branch.as_deref(), Some("main"));
    assert_eq!(snapshot.uncommitted_count, 0);

    let names: Vec<&str> = snapshot.branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["feature-b", "feature-a", "main"]);
    assert_eq!(snapshot.trunk().map(|b| b.name.as_str()), Some("main"));
    assert!(snapshot.branches.iter().all(|b| !b.needs_restack));

    assert_eq!(snapshot.current_layer_files.len(), 1);
    assert_eq!(snapshot.current_layer_files[0].path, "a.txt");
    assert_eq!(snapshot.current_layer_files[0].status, FileStatus::Added);
}

#[tokio::test]
async fn test_trunk_advance_flags_first_layer() {
    let (_tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);

    git(&repo_path, &["checkout", "main"]);
    commit_file(&repo_path, "hotfix.txt", "fix\n", "Hotfix on trunk");
    git(&repo_path, &["checkout", "feature-a"]);

    let snapshot = build_both(STACK_REPORT, &repo_path).await;

    let restack: Vec<&str> = snapshot
        .branches_needing_restack()
        .map(|b| b.name.as_str())
        .collect();
    assert_eq!(restack, ["feature-a"]);

    // The merge-base diff ignores what trunk gained
    assert_eq!(snapshot.current_layer_files.len(), 1);
    assert_eq!(snapshot.current_layer_files[0].path, "a.txt");
}

#[tokio::test]
async fn test_uncommitted_changes_are_counted() {
    let (_tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);

    std::fs::write(repo_path.join("a.txt"), "edited\n").unwrap();
    std::fs::write(repo_path.join("scratch.txt"), "untracked\n").unwrap();

    let snapshot = build_both(STACK_REPORT, &repo_path).await;
    assert_eq!(snapshot.uncommitted_count, 2);
}

#[tokio::test]
async fn test_renamed_file_in_current_layer() {
    let (_tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);

    git(&repo_path, &["checkout", "feature-b"]);
    git(&repo_path, &["mv", "a.txt", "moved.txt"]);
    git(&repo_path, &["commit", "-m", "Move a"]);

    let report = "◉ feature-b\n◯ feature-a\n◯ main\n";
    let snapshot = build_both(report, &repo_path).await;

    assert_eq!(snapshot.parent_branch.as_deref(), Some("feature-a"));
    let mut files: Vec<(String, FileStatus)> = snapshot
        .current_layer_files
        .iter()
        .map(|f| (f.path.clone(), f.status))
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        files,
        [
            ("b.txt".to_string(), FileStatus::Added),
            ("moved.txt".to_string(), FileStatus::Renamed),
        ]
    );
}

#[tokio::test]
async fn test_current_branch_from_probe_when_report_has_no_marker() {
    let (_tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);

    let snapshot = build_both("◯ feature-b\n◯ feature-a\n◯ main\n", &repo_path).await;
    assert!(snapshot.available);
    assert_eq!(snapshot.current_branch.as_deref(), Some("feature-a"));
}

#[tokio::test]
async fn test_checked_out_branch_outside_stack() {
    let (_tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);
    git(&repo_path, &["checkout", "-b", "unrelated"]);

    let snapshot = build_both("◯ feature-b\n◯ feature-a\n◯ main\n", &repo_path).await;
    assert!(!snapshot.available);
    assert_eq!(
        snapshot.reason,
        Some(UnavailableReason::CurrentBranchNotInStack)
    );
}

#[tokio::test]
async fn test_uninitialized_repository() {
    let (_tmp, repo_path) = create_stacked_repo();

    let snapshot = build_both(STACK_REPORT, &repo_path).await;
    assert_eq!(snapshot, StackSnapshot::unavailable(UnavailableReason::NotInitialized));
}

#[tokio::test]
async fn test_trunk_only_report() {
    let (_tmp, repo_path) = create_test_git_repo();
    mark_initialized(&repo_path);

    let snapshot = build_both("◉ main\n", &repo_path).await;
    assert_eq!(snapshot.reason, Some(UnavailableReason::NoStackBranches));
    assert!(snapshot.branches.is_empty());
}

#[tokio::test]
async fn test_missing_tool_and_failed_report() {
    let (_tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);

    let missing = build(cli_probe(), FakeTool::missing(), &repo_path).await;
    assert_eq!(missing.reason, Some(UnavailableReason::ToolNotInstalled));

    let failing = FakeTool {
        available: true,
        report: None,
    };
    let failed = build(cli_probe(), failing, &repo_path).await;
    assert_eq!(failed.reason, Some(UnavailableReason::LogFailed));
}

#[tokio::test]
async fn test_linked_worktree_uses_shared_metadata() {
    let (tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);

    let worktree = tmp.path().join("wt");
    git(
        &repo_path,
        &["worktree", "add", worktree.to_str().unwrap(), "feature-b"],
    );

    let report = "◉ feature-b\n◯ feature-a\n◯ main\n";
    let snapshot = SnapshotBuilder::new(FakeTool::with_report(report), cli_probe())
        .build(&worktree, &worktree)
        .await;

    assert!(snapshot.available);
    assert_eq!(snapshot.current_branch.as_deref(), Some("feature-b"));
    assert_eq!(snapshot.parent_branch.as_deref(), Some("feature-a"));
    assert_eq!(snapshot.current_layer_files[0].path, "b.txt");
}

#[tokio::test]
async fn test_snapshot_json_shape() {
    let (_tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);

    let snapshot = build(cli_probe(), FakeTool::with_report(STACK_REPORT), &repo_path).await;
    let value = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(value["available"], true);
    assert_eq!(value["currentBranch"], "feature-a");
    assert_eq!(value["parentBranch"], "main");
    assert_eq!(value["uncommittedCount"], 0);
    assert_eq!(value["branches"][2]["isTrunk"], true);
    assert_eq!(value["currentLayerFiles"][0]["status"], "added");
    assert!(value.get("reason").is_none());
}

/// A `gt` stand-in that answers `--version` and hangs on everything else
#[cfg(unix)]
fn hanging_tool(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("slow-gt");
    std::fs::write(
        &script,
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo 1.0.0; exit 0; fi\nexec sleep 5\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[tokio::test]
async fn test_report_timeout_is_log_failed() {
    let (tmp, repo_path) = create_stacked_repo();
    mark_initialized(&repo_path);

    let script = hanging_tool(tmp.path());
    let tool = GraphiteCli::new(ProcessRunner, script.to_string_lossy())
        .with_timeouts(Duration::from_millis(300), Duration::from_secs(5));

    let started = std::time::Instant::now();
    let snapshot = SnapshotBuilder::new(tool, cli_probe())
        .build(&repo_path, &repo_path)
        .await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(snapshot, StackSnapshot::unavailable(UnavailableReason::LogFailed));
}
