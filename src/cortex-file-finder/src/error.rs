//! Error types for per-root search operations.

use std::path::PathBuf;

/// Result type alias for per-root search operations.
pub type FinderResult<T> = std::result::Result<T, FinderError>;

/// Errors that can occur while searching a single root.
///
/// None of these reach the caller of [`crate::FileFinder::find`]: a failing
/// root is logged and its contribution dropped.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// The root identifier is neither a `file://` URI nor an absolute path.
    #[error("Invalid search root '{0}'")]
    InvalidRoot(String),

    /// The root directory does not exist.
    #[error("Root directory does not exist: {0}")]
    RootNotFound(PathBuf),

    /// The listing tool could not be launched.
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The listing tool reported an error on stderr.
    #[error("'{program}' failed: {stderr}")]
    ToolFailed { program: String, stderr: String },

    /// In-process traversal failed.
    #[error("Walk failed: {0}")]
    Walk(String),

    /// A background task panicked or was aborted.
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// I/O error while reading tool output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FinderError {
    /// Creates a new `InvalidRoot` error.
    pub fn invalid_root(root: impl Into<String>) -> Self {
        Self::InvalidRoot(root.into())
    }

    /// Creates a new `RootNotFound` error.
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound(path.into())
    }

    /// Creates a new `Spawn` error.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates a new `ToolFailed` error.
    pub fn tool_failed(program: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::ToolFailed {
            program: program.into(),
            stderr: stderr.into(),
        }
    }
}

impl From<ignore::Error> for FinderError {
    fn from(err: ignore::Error) -> Self {
        Self::Walk(err.to_string())
    }
}
