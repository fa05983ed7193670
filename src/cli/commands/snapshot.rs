use crate::cli::output::Output;
use crate::config::load_settings;
use crate::errors::{Result, StackscopeError};
use crate::git::find_repository_root;
use crate::stack::{SnapshotBuilder, StackSnapshot};
use crate::utils::spinner::Spinner;
use std::env;
use std::path::{Path, PathBuf};

/// Build and print the stack snapshot for a worktree
pub async fn run(repo: Option<PathBuf>, worktree: Option<PathBuf>, json: bool) -> Result<()> {
    let (repo_path, worktree_path) = resolve_paths(repo, worktree)?;
    let settings = load_settings()?;

    tracing::debug!(
        "Building snapshot for worktree {} (repo {}, backend {})",
        worktree_path.display(),
        repo_path.display(),
        settings.git.backend
    );

    let spinner = if json {
        Spinner::hidden()
    } else {
        Spinner::new("Reading stack...")
    };
    let builder = SnapshotBuilder::from_settings(&settings);
    let snapshot = builder.build(&repo_path, &worktree_path).await;
    spinner.stop();

    print_snapshot(&snapshot, json)
}

fn print_snapshot(snapshot: &StackSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        Output::snapshot(snapshot);
    }
    Ok(())
}

/// Repo defaults to the repository enclosing the cwd; worktree defaults to
/// the repo.
fn resolve_paths(repo: Option<PathBuf>, worktree: Option<PathBuf>) -> Result<(PathBuf, PathBuf)> {
    let repo_path = match repo {
        Some(path) => path,
        None => {
            let current_dir = env::current_dir().map_err(|e| {
                StackscopeError::config(format!("Could not get current directory: {e}"))
            })?;
            find_repository_root(&current_dir)?
        }
    };
    let worktree_path = worktree.unwrap_or_else(|| repo_path.clone());

    ensure_directory(&repo_path)?;
    ensure_directory(&worktree_path)?;
    Ok((repo_path, worktree_path))
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(StackscopeError::validation(format!(
            "Not a directory: {}",
            path.display()
        )))
    }
}
