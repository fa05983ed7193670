use crate::cli::output::Output;
use crate::config::{config_file_path, load_settings, Settings};
use crate::errors::{Result, StackscopeError};
use crate::git::runner::ProcessRunner;
use crate::git::{
    find_repository_root, is_git_repository, is_stack_initialized, RepositoryBackend,
    RepositoryProbe,
};
use crate::stack::{GraphiteCli, SnapshotBuilder, StackTool};
use std::env;
use std::path::{Path, PathBuf};

/// Check tool availability and repository setup
pub async fn run() -> Result<()> {
    Output::section("Stackscope Doctor");

    let settings = load_settings()?;
    let builder = SnapshotBuilder::from_settings(&settings);
    let mut issues_found = 0;

    issues_found += check_configuration(&settings)?;
    issues_found += check_stack_tool(builder.tool()).await;

    let current_dir = env::current_dir()
        .map_err(|e| StackscopeError::config(format!("Could not get current directory: {e}")))?;
    match check_git_repository(&current_dir, builder.probe()).await {
        Some(repo_root) => issues_found += check_stack_metadata(&repo_root, builder.tool()),
        None => issues_found += 1,
    }

    print_summary(issues_found);
    Ok(())
}

fn check_configuration(settings: &Settings) -> Result<u32> {
    Output::section("Configuration");

    let path = config_file_path()?;
    if path.exists() {
        Output::success(format!("Config file: {}", path.display()));
    } else {
        Output::info(format!("No config file at {}, using defaults", path.display()));
    }
    Output::sub_item(format!("Git backend: {}", settings.git.backend));
    Output::sub_item(format!("Stack tool: {}", settings.tool.program));

    Ok(0)
}

async fn check_stack_tool(tool: &GraphiteCli<ProcessRunner>) -> u32 {
    Output::section("Stack tool");

    if tool.is_available().await {
        Output::success(format!("'{}' responds to --version", tool.program()));
        0
    } else {
        Output::error(format!("'{}' is not installed or not on PATH", tool.program()));
        Output::solution("Install the Graphite CLI or set tool.program");
        1
    }
}

async fn check_git_repository(current_dir: &Path, probe: &RepositoryBackend) -> Option<PathBuf> {
    Output::section("Git repository");

    if !is_git_repository(current_dir) {
        Output::error("Not in a Git repository");
        Output::solution("Navigate to a Git repository or run 'git init'");
        return None;
    }

    let repo_root = match find_repository_root(current_dir) {
        Ok(root) => root,
        Err(e) => {
            Output::error(format!("Git repository error: {e}"));
            return None;
        }
    };
    Output::success(format!("Repository found at: {}", repo_root.display()));

    match probe.current_branch_name(&repo_root).await {
        Ok(Some(branch)) => Output::success(format!("Current branch: {branch}")),
        Ok(None) => Output::warning("Detached HEAD state"),
        Err(e) => Output::warning(format!("Could not read current branch ({}): {e}", probe.name())),
    }

    Some(repo_root)
}

fn check_stack_metadata<T: StackTool>(repo_root: &Path, tool: &T) -> u32 {
    Output::section("Stack metadata");

    let marker = tool.metadata_marker();
    if is_stack_initialized(repo_root, marker) {
        Output::success(format!("Found {marker}"));
        0
    } else {
        Output::error(format!("Missing {marker} in the git directory"));
        Output::solution("Run 'gt init' in this repository");
        1
    }
}

fn print_summary(issues_found: u32) {
    Output::section("Summary");
    if issues_found == 0 {
        Output::success("Ready to show stacks");
    } else {
        Output::warning(format!("{issues_found} issue(s) found"));
    }
}
