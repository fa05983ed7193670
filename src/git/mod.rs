pub mod backend;
pub mod probe;
pub mod repository;
pub mod runner;

pub use backend::RepositoryBackend;
pub use probe::{or_fallback, GitCliProbe, NameStatusEntry, RepositoryProbe};
pub use repository::{GitRepository, LibGitProbe};
pub use runner::{CommandRunner, ProcessRunner};

use crate::errors::{Result, StackscopeError};
use std::path::{Path, PathBuf};

/// Resolve the per-worktree git directory from a workdir path.
/// Handles both normal repos (.git is a directory) and linked worktrees (.git
/// is a file containing `gitdir: <path>`).
pub fn resolve_git_dir(workdir: &Path) -> Result<PathBuf> {
    let git_path = workdir.join(".git");
    if git_path.is_dir() {
        Ok(git_path)
    } else if git_path.is_file() {
        let content = std::fs::read_to_string(&git_path)
            .map_err(|e| StackscopeError::config(format!("Failed to read .git file: {e}")))?;
        let gitdir = content
            .lines()
            .find_map(|line| line.strip_prefix("gitdir:"))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StackscopeError::config("Invalid .git file format"))?;
        let resolved = if Path::new(gitdir).is_absolute() {
            PathBuf::from(gitdir)
        } else {
            workdir.join(gitdir)
        };
        Ok(resolved)
    } else {
        Err(StackscopeError::config(format!(
            "Not a git repository: {}",
            git_path.display()
        )))
    }
}

/// Whether the stacked-diff tool has written its metadata marker for this
/// repository. The marker lives in `.git/`; for a linked worktree the
/// `gitdir:` indirection is followed.
pub fn is_stack_initialized(repo_path: &Path, marker: &str) -> bool {
    if repo_path.join(".git").join(marker).exists() {
        return true;
    }

    let git_dir = match resolve_git_dir(repo_path) {
        Ok(git_dir) => git_dir,
        Err(e) => {
            tracing::debug!("No git dir for {}: {}", repo_path.display(), e);
            return false;
        }
    };
    if git_dir.join(marker).exists() {
        return true;
    }

    common_git_dir(&git_dir).is_some_and(|common| common.join(marker).exists())
}

/// Shared git dir named by a linked worktree's `commondir` file
fn common_git_dir(git_dir: &Path) -> Option<PathBuf> {
    let content = std::fs::read_to_string(git_dir.join("commondir")).ok()?;
    let common = content.trim();
    if common.is_empty() {
        return None;
    }
    Some(git_dir.join(common))
}

/// Check if a directory is a Git repository
pub fn is_git_repository(path: &Path) -> bool {
    path.join(".git").exists() || git2::Repository::discover(path).is_ok()
}

/// Find the root of the Git repository
pub fn find_repository_root(start_path: &Path) -> Result<PathBuf> {
    let repo = git2::Repository::discover(start_path).map_err(StackscopeError::Git)?;

    let workdir = repo.workdir().ok_or_else(|| {
        StackscopeError::config("Repository has no working directory (bare repo?)")
    })?;

    Ok(workdir.to_path_buf())
}
