use serde::{Deserialize, Serialize};
use std::fmt;

/// Why no usable stack could be derived for a worktree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The stacked-diff CLI could not be launched
    ToolNotInstalled,
    /// The repository has no stack metadata marker
    NotInitialized,
    /// The stack report command failed
    LogFailed,
    /// The report listed no branches at all
    EmptyStack,
    /// Only the trunk branch was reported
    NoStackBranches,
    /// The checked-out branch is not part of the reported stack
    CurrentBranchNotInStack,
}

impl UnavailableReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnavailableReason::ToolNotInstalled => "tool_not_installed",
            UnavailableReason::NotInitialized => "not_initialized",
            UnavailableReason::LogFailed => "log_failed",
            UnavailableReason::EmptyStack => "empty_stack",
            UnavailableReason::NoStackBranches => "no_stack_branches",
            UnavailableReason::CurrentBranchNotInStack => "current_branch_not_in_stack",
        }
    }

    /// Human-readable explanation suitable for a panel or terminal
    pub fn explanation(&self) -> &'static str {
        match self {
            UnavailableReason::ToolNotInstalled => {
                "The Graphite CLI (gt) is not installed or could not be launched"
            }
            UnavailableReason::NotInitialized => {
                "This repository has not been initialized with Graphite (run 'gt init')"
            }
            UnavailableReason::LogFailed => "Graphite could not report the current stack",
            UnavailableReason::EmptyStack => "Graphite reported no branches",
            UnavailableReason::NoStackBranches => {
                "Only the trunk branch is tracked; create a branch with 'gt create'"
            }
            UnavailableReason::CurrentBranchNotInStack => {
                "The checked-out branch is not tracked in this stack"
            }
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a file differs between two refs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Deleted,
    Renamed,
    Modified,
}

impl FileStatus {
    /// Map a raw `--name-status` code. Total: unknown codes are `Modified`.
    pub fn from_code(code: &str) -> Self {
        match code.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => FileStatus::Added,
            Some('D') => FileStatus::Deleted,
            Some('R') | Some('C') => FileStatus::Renamed,
            _ => FileStatus::Modified,
        }
    }

    /// Single-letter marker used in terminal output
    pub fn marker(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Modified => 'M',
        }
    }
}

/// A path changed in the current layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub status: FileStatus,
}

/// One branch of the stack as shown in the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRow {
    pub name: String,
    pub is_current: bool,
    pub is_trunk: bool,
    pub needs_restack: bool,
}

/// Render-ready view of the stack for one worktree.
///
/// Either fully populated (`available == true`) or fully empty with a
/// `reason`. Construct unavailable snapshots with [`StackSnapshot::unavailable`]
/// so the empty half is never partially filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSnapshot {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailableReason>,
    pub branches: Vec<BranchRow>,
    pub current_branch: Option<String>,
    pub parent_branch: Option<String>,
    pub current_layer_files: Vec<FileChange>,
    pub uncommitted_count: usize,
}

impl StackSnapshot {
    pub fn unavailable(reason: UnavailableReason) -> Self {
        Self {
            available: false,
            reason: Some(reason),
            branches: Vec::new(),
            current_branch: None,
            parent_branch: None,
            current_layer_files: Vec::new(),
            uncommitted_count: 0,
        }
    }

    pub fn available(
        branches: Vec<BranchRow>,
        current_branch: String,
        parent_branch: Option<String>,
        current_layer_files: Vec<FileChange>,
        uncommitted_count: usize,
    ) -> Self {
        Self {
            available: true,
            reason: None,
            branches,
            current_branch: Some(current_branch),
            parent_branch,
            current_layer_files,
            uncommitted_count,
        }
    }

    /// The row flagged as trunk, if any
    pub fn trunk(&self) -> Option<&BranchRow> {
        self.branches.iter().find(|row| row.is_trunk)
    }

    /// Rows that have drifted from their parent
    pub fn branches_needing_restack(&self) -> impl Iterator<Item = &BranchRow> {
        self.branches.iter().filter(|row| row.needs_restack)
    }
}
