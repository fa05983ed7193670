use crate::errors::{Result, StackscopeError};
use crate::git::probe::{NameStatusEntry, RepositoryProbe};
use git2::{Delta, DiffFindOptions, Oid, Repository, StatusOptions};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository exposing the read-only queries stack
/// snapshots need
pub struct GitRepository {
    repo: Repository,
    path: PathBuf,
}

impl GitRepository {
    /// Open the Git repository containing the given path
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .map_err(|e| StackscopeError::config(format!("Not a git repository: {}", e)))?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| StackscopeError::config("Repository has no working directory"))?
            .to_path_buf();

        Ok(Self {
            repo,
            path: workdir,
        })
    }

    /// Working directory root
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checked-out branch name, `None` when HEAD is detached
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Ok(None);
        }
        Ok(head.shorthand().map(|name| name.to_string()))
    }

    fn resolve_commit(&self, reference: &str) -> Result<Oid> {
        let object = self.repo.revparse_single(reference)?;
        let commit = object.peel_to_commit()?;
        Ok(commit.id())
    }

    /// Same semantics as `git merge-base --is-ancestor`: a commit counts as
    /// its own ancestor
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let ancestor = self.resolve_commit(ancestor)?;
        let descendant = self.resolve_commit(descendant)?;

        if ancestor == descendant {
            return Ok(true);
        }
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }

    /// Changes on `to` since its merge base with `from` (`from...to`)
    pub fn name_status_diff(&self, from: &str, to: &str) -> Result<Vec<NameStatusEntry>> {
        let from = self.resolve_commit(from)?;
        let to = self.resolve_commit(to)?;
        let base = self.repo.merge_base(from, to)?;

        let base_tree = self.repo.find_commit(base)?.tree()?;
        let to_tree = self.repo.find_commit(to)?.tree()?;

        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&to_tree), None)?;
        let mut find = DiffFindOptions::new();
        find.renames(true).copies(true);
        diff.find_similar(Some(&mut find))?;

        let mut entries = Vec::new();
        for delta in diff.deltas() {
            let status_code = match delta.status() {
                Delta::Added => "A",
                Delta::Deleted => "D",
                Delta::Renamed => "R",
                Delta::Copied => "C",
                Delta::Typechange => "T",
                _ => "M",
            };

            let file = if delta.status() == Delta::Deleted {
                delta.old_file()
            } else {
                delta.new_file()
            };
            let Some(path) = file.path() else {
                continue;
            };

            entries.push(NameStatusEntry {
                path: path.to_string_lossy().into_owned(),
                status_code: status_code.to_string(),
            });
        }

        Ok(entries)
    }

    /// Staged, unstaged and untracked entries, matching `git status --porcelain`
    pub fn change_count(&self) -> Result<usize> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .filter(|entry| !entry.status().is_ignored())
            .count())
    }
}

/// Probe that answers in-process through libgit2
#[derive(Debug, Clone, Copy, Default)]
pub struct LibGitProbe;

impl LibGitProbe {
    async fn with_repo<T, F>(worktree: &Path, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&GitRepository) -> Result<T> + Send + 'static,
    {
        let path = worktree.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let repo = GitRepository::open(&path)?;
            query(&repo)
        })
        .await?
    }
}

impl RepositoryProbe for LibGitProbe {
    async fn current_branch_name(&self, worktree: &Path) -> Result<Option<String>> {
        Self::with_repo(worktree, |repo| repo.current_branch()).await
    }

    async fn is_ancestor(&self, worktree: &Path, ancestor: &str, descendant: &str) -> Result<bool> {
        let ancestor = ancestor.to_string();
        let descendant = descendant.to_string();
        Self::with_repo(worktree, move |repo| repo.is_ancestor(&ancestor, &descendant)).await
    }

    async fn name_status_diff(
        &self,
        worktree: &Path,
        from: &str,
        to: &str,
    ) -> Result<Vec<NameStatusEntry>> {
        let from = from.to_string();
        let to = to.to_string();
        Self::with_repo(worktree, move |repo| repo.name_status_diff(&from, &to)).await
    }

    async fn working_tree_change_count(&self, worktree: &Path) -> Result<usize> {
        Self::with_repo(worktree, |repo| repo.change_count()).await
    }
}
