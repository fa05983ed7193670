use stackscope::errors::{Result, StackscopeError};
use stackscope::stack::StackTool;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const MARKER: &str = ".graphite_repo_config";

/// Run git in `repo_path`, panicking with stderr on failure
pub fn git(repo_path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .expect("Git command should start");

    if !output.status.success() {
        panic!(
            "Git command failed: git {}\nStderr: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create test git repository on `main` with one commit
pub fn create_test_git_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().join("repo");
    std::fs::create_dir(&repo_path).unwrap();

    let git_commands = [
        vec!["init"],
        vec!["symbolic-ref", "HEAD", "refs/heads/main"],
        vec!["config", "user.name", "Test User"],
        vec!["config", "user.email", "test@example.com"],
        vec!["config", "core.autocrlf", "false"], // Prevent line ending issues
        vec!["config", "commit.gpgsign", "false"],
    ];
    for cmd_args in &git_commands {
        git(&repo_path, cmd_args);
    }

    commit_file(&repo_path, "README.md", "# Test Repository\n", "Initial commit");
    (temp_dir, repo_path)
}

/// Write `name` and commit it on the checked-out branch
pub fn commit_file(repo_path: &Path, name: &str, content: &str, message: &str) {
    std::fs::write(repo_path.join(name), content).unwrap();
    git(repo_path, &["add", "."]);
    git(repo_path, &["commit", "-m", message]);
}

/// main <- feature-a <- feature-b, with feature-a checked out
pub fn create_stacked_repo() -> (TempDir, PathBuf) {
    let (temp_dir, repo_path) = create_test_git_repo();

    git(&repo_path, &["checkout", "-b", "feature-a"]);
    commit_file(&repo_path, "a.txt", "layer a\n", "Add a");
    git(&repo_path, &["checkout", "-b", "feature-b"]);
    commit_file(&repo_path, "b.txt", "layer b\n", "Add b");
    git(&repo_path, &["checkout", "feature-a"]);

    (temp_dir, repo_path)
}

/// Write the Graphite metadata marker into `.git/`
pub fn mark_initialized(repo_path: &Path) {
    std::fs::write(repo_path.join(".git").join(MARKER), "{}").unwrap();
}

/// Stack tool returning a canned report
pub struct FakeTool {
    pub available: bool,
    pub report: Option<String>,
}

impl FakeTool {
    pub fn with_report(report: &str) -> Self {
        Self {
            available: true,
            report: Some(report.to_string()),
        }
    }

    pub fn missing() -> Self {
        Self {
            available: false,
            report: None,
        }
    }
}

impl StackTool for FakeTool {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn stack_report(&self, _worktree: &Path) -> Result<String> {
        self.report
            .clone()
            .ok_or_else(|| StackscopeError::command_failed("gt", Some(1), "log failed"))
    }

    fn metadata_marker(&self) -> &str {
        MARKER
    }
}
