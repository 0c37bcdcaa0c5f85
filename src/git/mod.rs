//! Git operations abstraction layer
//!
//! The nightly workflow talks to version control only through the
//! [Repository] trait. Implementations:
//!
//! - [repository::Git2Repository]: a real repository opened with the `git2` crate
//! - [mock::MockRepository]: an in-memory repository that records every call
//!
//! ```rust,no_run
//! # use nightly_bump::git::{Git2Repository, Repository};
//! # fn example() -> nightly_bump::Result<()> {
//! let repo = Git2Repository::open(".")?;
//! for subject in repo.recent_subjects(20)? {
//!     println!("{}", subject);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{MockRepository, RecordedCall};
pub use repository::Git2Repository;

use std::path::{Path, PathBuf};

use crate::config::AuthorConfig;
use crate::credentials::Credentials;
use crate::domain::CommitSubject;
use crate::error::Result;

/// One line of working-tree status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Short status code in `git status --short` style, e.g. `M`, `A`, `??`
    pub code: String,
    /// Path relative to the work directory
    pub path: String,
}

/// Version-control operations used by the nightly workflow
///
/// Every method returns [crate::error::Result]; implementations map their
/// underlying errors (like `git2::Error`) onto the matching
/// [crate::error::NightlyError] variant.
pub trait Repository {
    /// Root of the working tree. Configured paths are relative to it.
    fn workdir(&self) -> Result<PathBuf>;

    /// Subjects of the newest `limit` commits reachable from HEAD, newest first.
    ///
    /// Returns an empty list for a repository without commits.
    fn recent_subjects(&self, limit: usize) -> Result<Vec<CommitSubject>>;

    /// Subject of the HEAD commit, `None` for a repository without commits.
    fn head_subject(&self) -> Result<Option<CommitSubject>> {
        Ok(self.recent_subjects(1)?.into_iter().next())
    }

    /// Name of the checked-out branch.
    ///
    /// # Errors
    /// * `NightlyError::DetachedHead` when HEAD does not point to a branch
    fn current_branch(&self) -> Result<String>;

    /// Configured URL of `remote`.
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Persists a new URL for `remote` in the repository configuration.
    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()>;

    /// Working-tree status, including untracked files.
    fn status(&self) -> Result<Vec<StatusEntry>>;

    /// Adds a work-directory-relative path to the index.
    fn stage(&self, path: &Path) -> Result<()>;

    /// Commits the index on top of HEAD and returns the new commit id.
    ///
    /// Uses `author` when given, the repository's configured signature otherwise.
    fn commit(&self, message: &str, author: Option<&AuthorConfig>) -> Result<String>;

    /// Pushes `branch` to the branch of the same name on `remote`.
    fn push(&self, remote: &str, branch: &str, credentials: Option<&Credentials>) -> Result<()>;

    /// Records `remote/branch` as the upstream of the local `branch`.
    fn set_upstream(&self, remote: &str, branch: &str) -> Result<()>;
}
