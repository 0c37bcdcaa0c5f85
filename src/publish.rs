//! Committing the bumped version file and pushing it.
//!
//! The credential-bearing remote URL only exists while the push runs:
//! [RemoteUrlGuard] puts the original URL back on success, on a failed push
//! and when unwinding.

use std::path::Path;

use crate::boundary::BoundaryWarning;
use crate::config::AuthorConfig;
use crate::credentials::{redact_url, Credentials};
use crate::error::{NightlyError, Result};
use crate::git::Repository;

/// Everything needed to commit and push one bump
#[derive(Debug, Clone)]
pub struct PublishRequest<'a> {
    pub remote: &'a str,
    pub branch: &'a str,
    /// Work-directory-relative path of the version file
    pub version_file: &'a Path,
    /// Files this run writes besides the version file; not reported as dirty
    pub artifacts: Vec<&'a Path>,
    pub message: String,
    pub credentials: Option<&'a Credentials>,
    pub author: Option<&'a AuthorConfig>,
}

/// Outcome of a successful publish
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    pub commit: String,
    pub warnings: Vec<BoundaryWarning>,
}

/// Remote URL replaced for the lifetime of the guard
pub struct RemoteUrlGuard<'r, R: Repository + ?Sized> {
    repo: &'r R,
    remote: String,
    original: String,
    restored: bool,
}

impl<'r, R: Repository + ?Sized> RemoteUrlGuard<'r, R> {
    /// Points `remote` at `url`, remembering the URL it had before.
    pub fn replace(repo: &'r R, remote: &str, url: &str) -> Result<Self> {
        let original = repo.remote_url(remote)?;
        repo.set_remote_url(remote, url)?;
        log::debug!("Remote '{}' temporarily set to {}", remote, redact_url(url));

        Ok(RemoteUrlGuard {
            repo,
            remote: remote.to_string(),
            original,
            restored: false,
        })
    }

    /// Puts the original URL back, reporting failure.
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        self.repo
            .set_remote_url(&self.remote, &self.original)
            .map_err(|e| NightlyError::remote_restore(format!("remote '{}': {}", self.remote, e)))?;
        log::debug!("Remote '{}' restored to {}", self.remote, self.original);
        Ok(())
    }
}

impl<R: Repository + ?Sized> Drop for RemoteUrlGuard<'_, R> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.repo.set_remote_url(&self.remote, &self.original) {
            log::error!(
                "Remote '{}' still holds credentials; restore it to {} manually: {}",
                self.remote,
                self.original,
                e
            );
        }
    }
}

/// Stages, commits and pushes the version file.
///
/// Steps run in order: status report, stage, commit, credential URL swap,
/// push, URL restore, upstream. The first failing step aborts with its error,
/// except that the original remote URL is always put back once it was swapped.
pub fn publish<R: Repository + ?Sized>(
    repo: &R,
    request: &PublishRequest<'_>,
) -> Result<PublishReport> {
    let mut warnings = Vec::new();

    if let Some(warning) = report_status(repo, request.version_file, &request.artifacts)? {
        warnings.push(warning);
    }

    repo.stage(request.version_file)?;
    let commit = repo.commit(&request.message, request.author)?;
    log::info!("Committed {}: {}", short_id(&commit), request.message);

    let url = repo.remote_url(request.remote)?;
    log::info!("Pushing '{}' to {}", request.branch, redact_url(&url));

    match request.credentials.map(|c| (c, c.inject_into(&url))) {
        Some((credentials, Some(push_url))) => {
            let guard = RemoteUrlGuard::replace(repo, request.remote, &push_url)?;
            let pushed = repo.push(request.remote, request.branch, Some(credentials));
            let restored = guard.restore();

            if let Err(restore_err) = restored {
                if let Err(push_err) = pushed {
                    log::error!("Push also failed: {}", push_err);
                }
                return Err(restore_err);
            }
            pushed?;
        }
        Some((credentials, None)) => {
            warnings.push(BoundaryWarning::CredentialsNotInjected {
                remote: request.remote.to_string(),
                url: redact_url(&url),
            });
            repo.push(request.remote, request.branch, Some(credentials))?;
        }
        None => repo.push(request.remote, request.branch, None)?,
    }

    if let Err(e) = repo.set_upstream(request.remote, request.branch) {
        warnings.push(BoundaryWarning::UpstreamNotRecorded {
            branch: request.branch.to_string(),
            reason: e.to_string(),
        });
    }

    Ok(PublishReport { commit, warnings })
}

fn report_status<R: Repository + ?Sized>(
    repo: &R,
    version_file: &Path,
    artifacts: &[&Path],
) -> Result<Option<BoundaryWarning>> {
    let expected: Vec<String> = std::iter::once(version_file)
        .chain(artifacts.iter().copied())
        .map(|path| path.to_string_lossy().replace('\\', "/"))
        .collect();
    let mut unrelated = Vec::new();

    for entry in repo.status()? {
        log::debug!("status: {:>2} {}", entry.code, entry.path);
        if !expected.contains(&entry.path) {
            unrelated.push(entry.path);
        }
    }

    if unrelated.is_empty() {
        Ok(None)
    } else {
        Ok(Some(BoundaryWarning::DirtyWorkingTree { paths: unrelated }))
    }
}

fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}
