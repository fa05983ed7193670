//! Parent/child relationships derived from the report order.
//!
//! `gt log short --stack` prints a single stack from tip to trunk, so the
//! branch printed after `b` is `b`'s parent. Sibling stacks interleaved in the
//! same listing would break this; no graph edges are parsed to confirm it.

use crate::git::probe::RepositoryProbe;
use std::path::Path;

/// Immediate parent (toward trunk) of `current`, `None` for trunk or an
/// unknown branch
pub fn parent_of<'a>(branches: &'a [String], current: Option<&str>) -> Option<&'a str> {
    let current = current?;
    let idx = branches.iter().position(|name| name == current)?;
    branches.get(idx + 1).map(String::as_str)
}

/// `from` followed by each successive parent down to trunk
pub fn lineage_chain<'a>(branches: &'a [String], from: &str) -> Vec<&'a str> {
    match branches.iter().position(|name| name == from) {
        Some(idx) => branches[idx..].iter().map(String::as_str).collect(),
        None => Vec::new(),
    }
}

/// Whether `branch` no longer contains `parent`'s history.
///
/// Any probe failure (missing ref, unreadable repo, timeout) reports a
/// restack as needed.
pub async fn needs_restack<P: RepositoryProbe>(
    probe: &P,
    worktree: &Path,
    parent: &str,
    branch: &str,
) -> bool {
    match probe.is_ancestor(worktree, parent, branch).await {
        Ok(contains_parent) => !contains_parent,
        Err(e) => {
            tracing::debug!(
                "Ancestry check {} -> {} failed, flagging restack: {}",
                parent,
                branch,
                e
            );
            true
        }
    }
}
