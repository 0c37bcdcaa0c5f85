use thiserror::Error;

/// Unified error type for nightly-bump operations
#[derive(Error, Debug)]
pub enum NightlyError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Version file has no {0} declaration")]
    MissingVersionField(String),

    #[error("Version file declares {0} more than once")]
    DuplicateVersionField(String),

    #[error("Repository has no commits")]
    EmptyHistory,

    #[error("HEAD is detached; a branch must be checked out to push")]
    DetachedHead,

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Push failed: {0}")]
    Push(String),

    #[error("Failed to restore remote URL: {0}")]
    RemoteRestore(String),

    #[error("Credentials are required unless running with --dry-run")]
    MissingCredentials,
}

/// Convenience type alias for Results in nightly-bump
pub type Result<T> = std::result::Result<T, NightlyError>;

impl NightlyError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        NightlyError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        NightlyError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        NightlyError::Remote(msg.into())
    }

    pub fn commit(msg: impl Into<String>) -> Self {
        NightlyError::Commit(msg.into())
    }

    pub fn push(msg: impl Into<String>) -> Self {
        NightlyError::Push(msg.into())
    }

    pub fn remote_restore(msg: impl Into<String>) -> Self {
        NightlyError::RemoteRestore(msg.into())
    }
}
