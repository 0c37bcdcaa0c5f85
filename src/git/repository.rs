use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use git2::{Cred, CredentialType, Oid, Repository as Git2Repo, Signature, Status, StatusOptions};

use crate::config::AuthorConfig;
use crate::credentials::{redact_url, Credentials};
use crate::domain::CommitSubject;
use crate::error::{NightlyError, Result};
use crate::git::StatusEntry;

/// Authentication attempts before a push gives up on rejected credentials.
const MAX_AUTH_ATTEMPTS: u32 = 3;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    fn signature(&self, author: Option<&AuthorConfig>) -> Result<Signature<'static>> {
        let signature = match author {
            Some(author) => Signature::now(&author.name, &author.email),
            None => self.repo.signature(),
        };
        signature.map_err(|e| NightlyError::commit(format!("No commit identity available: {}", e)))
    }

    fn head_parent(&self) -> Result<Option<git2::Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| NightlyError::config("Repository is bare; a working tree is required"))
    }

    fn recent_subjects(&self, limit: usize) -> Result<Vec<CommitSubject>> {
        if self.head_parent()?.is_none() {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;

        let mut subjects = Vec::with_capacity(limit);
        for oid_result in revwalk.take(limit) {
            let oid: Oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            let summary = commit.summary_bytes().unwrap_or_default();
            subjects.push(CommitSubject::new(String::from_utf8_lossy(summary)));
        }

        Ok(subjects)
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().map_err(|e| match e.code() {
            git2::ErrorCode::UnbornBranch => NightlyError::EmptyHistory,
            _ => NightlyError::Git(e),
        })?;

        if !head.is_branch() {
            return Err(NightlyError::DetachedHead);
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or(NightlyError::DetachedHead)
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let found = self
            .repo
            .find_remote(remote)
            .map_err(|e| NightlyError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        found
            .url()
            .map(str::to_string)
            .ok_or_else(|| NightlyError::remote(format!("Remote '{}' has no valid URL", remote)))
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        self.repo.remote_set_url(remote, url).map_err(|e| {
            NightlyError::remote(format!(
                "Cannot set URL of remote '{}' to {}: {}",
                remote,
                redact_url(url),
                e
            ))
        })
    }

    fn status(&self) -> Result<Vec<StatusEntry>> {
        let mut options = StatusOptions::new();
        options.include_untracked(true).recurse_untracked_dirs(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .filter(|entry| !entry.status().contains(Status::IGNORED))
            .map(|entry| StatusEntry {
                code: status_code(entry.status()).to_string(),
                path: String::from_utf8_lossy(entry.path_bytes()).into_owned(),
            })
            .collect())
    }

    fn stage(&self, path: &Path) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_path(path).map_err(|e| {
            NightlyError::commit(format!("Cannot stage {}: {}", path.display(), e))
        })?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str, author: Option<&AuthorConfig>) -> Result<String> {
        let sig = self.signature(author)?;

        let mut index = self.repo.index()?;
        let tree_oid = index.write_tree()?;
        let tree = self.repo.find_tree(tree_oid)?;

        let parent = self.head_parent()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .map_err(|e| NightlyError::commit(e.to_string()))?;

        Ok(oid.to_string())
    }

    fn push(&self, remote: &str, branch: &str, credentials: Option<&Credentials>) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| NightlyError::remote(format!("Cannot find remote: {}", e)))?;

        let attempts = Cell::new(0u32);
        let rejected = RefCell::new(None);
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            attempts.set(attempts.get() + 1);
            if attempts.get() > MAX_AUTH_ATTEMPTS {
                return Err(git2::Error::from_str("authentication rejected"));
            }

            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(creds) = credentials {
                    return Cred::userpass_plaintext(&creds.username, creds.secret());
                }
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                if let Ok(cred) = Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")) {
                    return Ok(cred);
                }
            }

            Cred::default()
        });

        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                *rejected.borrow_mut() = Some(format!("{} rejected: {}", refname, status));
            }
            Ok(())
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => NightlyError::push(format!("network error: {}", e)),
                git2::ErrorClass::Http => NightlyError::push(format!("HTTP error: {}", e)),
                _ => NightlyError::push(format!("cannot push '{}': {}", branch, e)),
            })?;

        drop(push_options);
        match rejected.into_inner() {
            Some(reason) => Err(NightlyError::push(reason)),
            None => Ok(()),
        }
    }

    fn set_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        let mut config = self.repo.config()?;
        config.set_str(&format!("branch.{}.remote", branch), remote)?;
        config.set_str(
            &format!("branch.{}.merge", branch),
            &format!("refs/heads/{}", branch),
        )?;
        Ok(())
    }
}

/// Maps git2 status flags to `git status --short` codes.
fn status_code(status: Status) -> &'static str {
    if status.contains(Status::CONFLICTED) {
        "UU"
    } else if status.contains(Status::WT_NEW) {
        "??"
    } else if status.intersects(Status::INDEX_NEW) {
        "A"
    } else if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
        "D"
    } else if status.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
        "R"
    } else if status.intersects(Status::INDEX_TYPECHANGE | Status::WT_TYPECHANGE) {
        "T"
    } else {
        "M"
    }
}
