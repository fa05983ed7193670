use crate::config::{GitSettings, ProbeBackend};
use crate::errors::Result;
use crate::git::probe::{GitCliProbe, NameStatusEntry, RepositoryProbe};
use crate::git::repository::LibGitProbe;
use crate::git::runner::ProcessRunner;
use std::path::Path;

/// Repository probe chosen by configuration
#[derive(Debug, Clone)]
pub enum RepositoryBackend {
    Cli(GitCliProbe<ProcessRunner>),
    LibGit(LibGitProbe),
}

impl RepositoryBackend {
    pub fn from_settings(settings: &GitSettings) -> Self {
        match settings.backend {
            ProbeBackend::Cli => RepositoryBackend::Cli(GitCliProbe::new(
                ProcessRunner,
                settings.program.clone(),
                settings.timeout(),
            )),
            ProbeBackend::Libgit2 => RepositoryBackend::LibGit(LibGitProbe),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RepositoryBackend::Cli(_) => "git cli",
            RepositoryBackend::LibGit(_) => "libgit2",
        }
    }
}

impl RepositoryProbe for RepositoryBackend {
    async fn current_branch_name(&self, worktree: &Path) -> Result<Option<String>> {
        match self {
            RepositoryBackend::Cli(probe) => probe.current_branch_name(worktree).await,
            RepositoryBackend::LibGit(probe) => probe.current_branch_name(worktree).await,
        }
    }

    async fn is_ancestor(&self, worktree: &Path, ancestor: &str, descendant: &str) -> Result<bool> {
        match self {
            RepositoryBackend::Cli(probe) => probe.is_ancestor(worktree, ancestor, descendant).await,
            RepositoryBackend::LibGit(probe) => {
                probe.is_ancestor(worktree, ancestor, descendant).await
            }
        }
    }

    async fn name_status_diff(
        &self,
        worktree: &Path,
        from: &str,
        to: &str,
    ) -> Result<Vec<NameStatusEntry>> {
        match self {
            RepositoryBackend::Cli(probe) => probe.name_status_diff(worktree, from, to).await,
            RepositoryBackend::LibGit(probe) => probe.name_status_diff(worktree, from, to).await,
        }
    }

    async fn working_tree_change_count(&self, worktree: &Path) -> Result<usize> {
        match self {
            RepositoryBackend::Cli(probe) => probe.working_tree_change_count(worktree).await,
            RepositoryBackend::LibGit(probe) => probe.working_tree_change_count(worktree).await,
        }
    }
}
