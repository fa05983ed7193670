use crate::errors::Result;
use crate::git::runner::CommandRunner;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Arguments that print the current stack, including untracked branches,
/// without prompting
pub const STACK_LOG_ARGS: [&str; 5] = [
    "log",
    "short",
    "--stack",
    "--show-untracked",
    "--no-interactive",
];

/// Metadata file Graphite writes into the git dir on `gt init`
pub const GRAPHITE_METADATA_MARKER: &str = ".graphite_repo_config";

/// The external stacked-diff CLI
pub trait StackTool: Send + Sync {
    /// Whether the tool can be launched at all
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    /// Text rendering of the stack containing the worktree's branch
    fn stack_report(&self, worktree: &Path) -> impl Future<Output = Result<String>> + Send;

    /// File whose presence in the git dir marks an initialized repository
    fn metadata_marker(&self) -> &str;
}

/// Graphite's `gt` driven through a command runner.
///
/// Availability is probed once per instance; later calls reuse the answer.
#[derive(Debug)]
pub struct GraphiteCli<R> {
    runner: R,
    program: String,
    timeout: Duration,
    probe_timeout: Duration,
    metadata_marker: String,
    available: OnceCell<bool>,
}

impl<R: CommandRunner> GraphiteCli<R> {
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(5),
            metadata_marker: GRAPHITE_METADATA_MARKER.to_string(),
            available: OnceCell::new(),
        }
    }

    pub fn with_timeouts(mut self, timeout: Duration, probe_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn with_metadata_marker(mut self, marker: impl Into<String>) -> Self {
        self.metadata_marker = marker.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn probe_version(&self) -> bool {
        let cwd = std::env::temp_dir();
        match self
            .runner
            .run(&self.program, &["--version"], &cwd, self.probe_timeout)
            .await
        {
            Ok(version) => {
                tracing::debug!("{} is available ({})", self.program, version.trim());
                true
            }
            Err(e) => {
                tracing::info!("{} is not available: {}", self.program, e);
                false
            }
        }
    }
}

impl<R: CommandRunner> StackTool for GraphiteCli<R> {
    async fn is_available(&self) -> bool {
        *self
            .available
            .get_or_init(|| self.probe_version())
            .await
    }

    async fn stack_report(&self, worktree: &Path) -> Result<String> {
        self.runner
            .run(&self.program, &STACK_LOG_ARGS, worktree, self.timeout)
            .await
    }

    fn metadata_marker(&self) -> &str {
        &self.metadata_marker
    }
}
