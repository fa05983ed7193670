/// Stackscope Error Types
#[derive(Debug, thiserror::Error)]
pub enum StackscopeError {
    /// libgit2 errors
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// External command exited unsuccessfully
    #[error("Command `{program}` failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// External command exceeded its time budget
    #[error("Command `{program}` timed out after {timeout:?}")]
    Timeout {
        program: String,
        timeout: std::time::Duration,
    },

    /// Blocking task failed to complete
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl StackscopeError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        StackscopeError::Config(msg.into())
    }

    pub fn validation<S: Into<String>>(msg: S) -> Self {
        StackscopeError::Validation(msg.into())
    }

    pub fn command_failed<S: Into<String>>(program: S, code: Option<i32>, stderr: S) -> Self {
        StackscopeError::CommandFailed {
            program: program.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Exit code of a failed external command, if that is what this error is
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            StackscopeError::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StackscopeError>;
