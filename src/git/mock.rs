use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::AuthorConfig;
use crate::credentials::Credentials;
use crate::domain::CommitSubject;
use crate::error::{NightlyError, Result};
use crate::git::{Repository, StatusEntry};

/// A mutating call received by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    SetRemoteUrl { remote: String, url: String },
    Stage { path: PathBuf },
    Commit { message: String },
    /// `url` is the remote URL configured at the time of the push
    Push {
        remote: String,
        branch: String,
        url: String,
    },
    SetUpstream { remote: String, branch: String },
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    workdir: PathBuf,
    subjects: RefCell<Vec<CommitSubject>>,
    branch: Option<String>,
    remotes: RefCell<HashMap<String, String>>,
    status: Vec<StatusEntry>,
    fail_push: Option<String>,
    fail_set_url_to: Option<String>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            subjects: RefCell::new(Vec::new()),
            branch: Some("main".to_string()),
            remotes: RefCell::new(HashMap::new()),
            status: Vec::new(),
            fail_push: None,
            fail_set_url_to: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Add a commit on top of the history
    pub fn add_commit(&mut self, subject: &str) {
        self.subjects
            .get_mut()
            .insert(0, CommitSubject::from_message(subject));
    }

    pub fn set_branch(&mut self, branch: Option<&str>) {
        self.branch = branch.map(str::to_string);
    }

    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.get_mut().insert(name.into(), url.into());
    }

    pub fn add_status(&mut self, code: &str, path: &str) {
        self.status.push(StatusEntry {
            code: code.to_string(),
            path: path.to_string(),
        });
    }

    /// Make every push fail with `reason`
    pub fn fail_push(&mut self, reason: impl Into<String>) {
        self.fail_push = Some(reason.into());
    }

    /// Make setting a remote to exactly `url` fail
    pub fn fail_set_url_to(&mut self, url: impl Into<String>) {
        self.fail_set_url_to = Some(url.into());
    }

    /// Mutating calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn recent_subjects(&self, limit: usize) -> Result<Vec<CommitSubject>> {
        Ok(self.subjects.borrow().iter().take(limit).cloned().collect())
    }

    fn current_branch(&self) -> Result<String> {
        if self.subjects.borrow().is_empty() {
            return Err(NightlyError::EmptyHistory);
        }
        self.branch.clone().ok_or(NightlyError::DetachedHead)
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.remotes
            .borrow()
            .get(remote)
            .cloned()
            .ok_or_else(|| NightlyError::remote(format!("Cannot find remote '{}'", remote)))
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        if self.fail_set_url_to.as_deref() == Some(url) {
            return Err(NightlyError::remote(format!(
                "Cannot set URL of remote '{}'",
                remote
            )));
        }
        self.remote_url(remote)?;
        self.remotes
            .borrow_mut()
            .insert(remote.to_string(), url.to_string());
        self.record(RecordedCall::SetRemoteUrl {
            remote: remote.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    fn status(&self) -> Result<Vec<StatusEntry>> {
        Ok(self.status.clone())
    }

    fn stage(&self, path: &Path) -> Result<()> {
        self.record(RecordedCall::Stage {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn commit(&self, message: &str, _author: Option<&AuthorConfig>) -> Result<String> {
        self.subjects
            .borrow_mut()
            .insert(0, CommitSubject::from_message(message));
        self.record(RecordedCall::Commit {
            message: message.to_string(),
        });
        Ok(format!("{:040x}", self.subjects.borrow().len()))
    }

    fn push(&self, remote: &str, branch: &str, _credentials: Option<&Credentials>) -> Result<()> {
        let url = self.remote_url(remote)?;
        self.record(RecordedCall::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
            url,
        });
        match &self.fail_push {
            Some(reason) => Err(NightlyError::push(reason.clone())),
            None => Ok(()),
        }
    }

    fn set_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(RecordedCall::SetUpstream {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_history_newest_first() {
        let mut repo = MockRepository::new("/tmp/work");
        repo.add_commit("first commit");
        repo.add_commit("second commit");

        let subjects = repo.recent_subjects(20).unwrap();
        assert_eq!(subjects[0].as_str(), "second commit");
        assert_eq!(
            repo.head_subject().unwrap().unwrap().as_str(),
            "second commit"
        );
    }

    #[test]
    fn test_mock_commit_becomes_head() {
        let mut repo = MockRepository::new("/tmp/work");
        repo.add_commit("first commit");
        repo.commit("bump", None).unwrap();
        assert_eq!(repo.head_subject().unwrap().unwrap().as_str(), "bump");
    }

    #[test]
    fn test_mock_push_records_current_url() {
        let mut repo = MockRepository::new("/tmp/work");
        repo.add_remote("origin", "https://example.com/repo.git");
        repo.push("origin", "main", None).unwrap();

        assert_eq!(
            repo.calls(),
            vec![RecordedCall::Push {
                remote: "origin".to_string(),
                branch: "main".to_string(),
                url: "https://example.com/repo.git".to_string(),
            }]
        );
    }

    #[test]
    fn test_mock_unknown_remote() {
        let repo = MockRepository::new("/tmp/work");
        assert!(repo.set_remote_url("origin", "x").is_err());
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_mock_empty_history() {
        let repo = MockRepository::new("/tmp/work");
        assert!(matches!(
            repo.current_branch(),
            Err(NightlyError::EmptyHistory)
        ));
    }
}
