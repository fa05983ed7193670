use crate::config::Settings;
use crate::git::backend::RepositoryBackend;
use crate::git::probe::{or_fallback, RepositoryProbe};
use crate::git::runner::ProcessRunner;
use crate::git::is_stack_initialized;
use crate::stack::lineage::{needs_restack, parent_of};
use crate::stack::parser::parse_stack_output;
use crate::stack::snapshot::{BranchRow, FileChange, FileStatus, StackSnapshot, UnavailableReason};
use crate::stack::tool::{GraphiteCli, StackTool};
use futures::future::join_all;
use std::path::Path;
use tracing::{debug, info};

/// Combines the stack tool's report with live repository state into a
/// [`StackSnapshot`]
pub struct SnapshotBuilder<T, P> {
    tool: T,
    probe: P,
}

impl SnapshotBuilder<GraphiteCli<ProcessRunner>, RepositoryBackend> {
    /// Builder wired to real processes as described by `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        let tool = GraphiteCli::new(ProcessRunner, settings.tool.program.clone())
            .with_timeouts(settings.tool.timeout(), settings.tool.probe_timeout())
            .with_metadata_marker(settings.tool.metadata_marker.clone());
        let probe = RepositoryBackend::from_settings(&settings.git);
        Self::new(tool, probe)
    }
}

impl<T: StackTool, P: RepositoryProbe> SnapshotBuilder<T, P> {
    pub fn new(tool: T, probe: P) -> Self {
        Self { tool, probe }
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Derive the stack snapshot for `worktree_path`, whose stack metadata
    /// lives in `repo_path`. Every failure becomes an unavailable snapshot.
    pub async fn build(&self, repo_path: &Path, worktree_path: &Path) -> StackSnapshot {
        match self.try_build(repo_path, worktree_path).await {
            Ok(snapshot) => snapshot,
            Err(reason) => {
                info!(
                    "No stack for {}: {} ({})",
                    worktree_path.display(),
                    reason,
                    reason.explanation()
                );
                StackSnapshot::unavailable(reason)
            }
        }
    }

    async fn try_build(
        &self,
        repo_path: &Path,
        worktree_path: &Path,
    ) -> Result<StackSnapshot, UnavailableReason> {
        if !self.tool.is_available().await {
            return Err(UnavailableReason::ToolNotInstalled);
        }

        if !is_stack_initialized(repo_path, self.tool.metadata_marker()) {
            return Err(UnavailableReason::NotInitialized);
        }

        let report = self.tool.stack_report(worktree_path).await.map_err(|e| {
            debug!("Stack report failed: {}", e);
            UnavailableReason::LogFailed
        })?;

        let parsed = parse_stack_output(&report);
        debug!(
            "Parsed {} branches (current: {:?}, trunk: {:?})",
            parsed.branches.len(),
            parsed.current_branch,
            parsed.trunk_branch
        );

        let trunk = parsed
            .resolved_trunk()
            .ok_or(UnavailableReason::EmptyStack)?
            .to_string();

        if parsed.branches.iter().all(|name| *name == trunk) {
            return Err(UnavailableReason::NoStackBranches);
        }

        let current = match parsed.current_branch.clone() {
            Some(current) => Some(current),
            None => {
                or_fallback(
                    "current branch lookup",
                    self.probe.current_branch_name(worktree_path),
                    None,
                )
                .await
            }
        };
        let current = current
            .filter(|name| parsed.branches.contains(name))
            .ok_or(UnavailableReason::CurrentBranchNotInStack)?;

        let branches = parsed.branches;
        let parent = parent_of(&branches, Some(current.as_str())).map(str::to_string);

        let (current_layer_files, uncommitted_count, rows) = tokio::join!(
            self.current_layer_files(worktree_path, parent.as_deref(), &current),
            or_fallback(
                "working tree status",
                self.probe.working_tree_change_count(worktree_path),
                0,
            ),
            self.branch_rows(worktree_path, &branches, &current, &trunk),
        );

        Ok(StackSnapshot::available(
            rows,
            current,
            parent,
            current_layer_files,
            uncommitted_count,
        ))
    }

    async fn current_layer_files(
        &self,
        worktree_path: &Path,
        parent: Option<&str>,
        current: &str,
    ) -> Vec<FileChange> {
        let Some(parent) = parent else {
            return Vec::new();
        };

        let entries = or_fallback(
            "current layer diff",
            self.probe.name_status_diff(worktree_path, parent, current),
            Vec::new(),
        )
        .await;

        entries
            .into_iter()
            .map(|entry| FileChange {
                status: FileStatus::from_code(&entry.status_code),
                path: entry.path,
            })
            .collect()
    }

    async fn branch_rows(
        &self,
        worktree_path: &Path,
        branches: &[String],
        current: &str,
        trunk: &str,
    ) -> Vec<BranchRow> {
        let rows = branches.iter().enumerate().map(|(idx, name)| async move {
            let is_trunk = name == trunk;
            let restack = match branches.get(idx + 1) {
                Some(parent) if !is_trunk => {
                    needs_restack(&self.probe, worktree_path, parent, name).await
                }
                _ => false,
            };

            BranchRow {
                name: name.clone(),
                is_current: name == current,
                is_trunk,
                needs_restack: restack,
            }
        });

        join_all(rows).await
    }
}
