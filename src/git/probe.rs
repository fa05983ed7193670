use crate::errors::Result;
use crate::git::runner::CommandRunner;
use std::fmt::Display;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// One line of `git diff --name-status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameStatusEntry {
    /// Current location of the file (the new path for renames and copies)
    pub path: String,
    /// Raw status code such as `M`, `A`, `R100`
    pub status_code: String,
}

/// Read-only view of live repository state
pub trait RepositoryProbe: Send + Sync {
    /// Checked-out branch, `None` for a detached HEAD
    fn current_branch_name(
        &self,
        worktree: &Path,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Whether `ancestor` is reachable from `descendant`
    fn is_ancestor(
        &self,
        worktree: &Path,
        ancestor: &str,
        descendant: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Paths changed on `to` since it diverged from `from`
    fn name_status_diff(
        &self,
        worktree: &Path,
        from: &str,
        to: &str,
    ) -> impl Future<Output = Result<Vec<NameStatusEntry>>> + Send;

    /// Number of staged, unstaged and untracked entries
    fn working_tree_change_count(
        &self,
        worktree: &Path,
    ) -> impl Future<Output = Result<usize>> + Send;
}

/// Await a fallible probe call, substituting `fallback` on error.
pub async fn or_fallback<T, E, F>(label: &str, call: F, fallback: T) -> T
where
    E: Display,
    F: Future<Output = std::result::Result<T, E>>,
{
    match call.await {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("{} failed, using fallback: {}", label, e);
            fallback
        }
    }
}

/// Parse tab-separated `--name-status` output
pub fn parse_name_status(output: &str) -> Vec<NameStatusEntry> {
    let mut entries = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let mut parts = line.split('\t');
        let status_code = parts.next().unwrap_or("").trim();
        if status_code.is_empty() {
            continue;
        }

        let first = parts.next();
        let second = parts.next();
        let is_rename_or_copy = matches!(
            status_code.chars().next().map(|c| c.to_ascii_uppercase()),
            Some('R') | Some('C')
        );
        let path = if is_rename_or_copy {
            second.or(first)
        } else {
            first
        };

        let Some(path) = path.filter(|p| !p.is_empty()) else {
            continue;
        };

        entries.push(NameStatusEntry {
            path: path.to_string(),
            status_code: status_code.to_string(),
        });
    }

    entries
}

/// Count entries in `git status --porcelain` output
pub fn count_porcelain_entries(output: &str) -> usize {
    output.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Probe backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitCliProbe<R> {
    runner: R,
    program: String,
    timeout: Duration,
}

impl<R: CommandRunner> GitCliProbe<R> {
    pub fn new(runner: R, program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            runner,
            program: program.into(),
            timeout,
        }
    }

    async fn git(&self, worktree: &Path, args: &[&str]) -> Result<String> {
        self.runner
            .run(&self.program, args, worktree, self.timeout)
            .await
    }
}

impl<R: CommandRunner> RepositoryProbe for GitCliProbe<R> {
    async fn current_branch_name(&self, worktree: &Path) -> Result<Option<String>> {
        let branch = self
            .git(worktree, &["rev-parse", "--abbrev-ref", "HEAD"])
            .await?;
        let branch = branch.trim();

        // `rev-parse --abbrev-ref` prints the literal HEAD when detached
        if branch.is_empty() || branch == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(branch.to_string()))
        }
    }

    async fn is_ancestor(&self, worktree: &Path, ancestor: &str, descendant: &str) -> Result<bool> {
        match self
            .git(worktree, &["merge-base", "--is-ancestor", ancestor, descendant])
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.exit_code() == Some(1) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn name_status_diff(
        &self,
        worktree: &Path,
        from: &str,
        to: &str,
    ) -> Result<Vec<NameStatusEntry>> {
        let range = format!("{from}...{to}");
        let output = self
            .git(worktree, &["diff", "--name-status", &range])
            .await?;
        Ok(parse_name_status(&output))
    }

    async fn working_tree_change_count(&self, worktree: &Path) -> Result<usize> {
        let output = self.git(worktree, &["status", "--porcelain"]).await?;
        Ok(count_porcelain_entries(&output))
    }
}
