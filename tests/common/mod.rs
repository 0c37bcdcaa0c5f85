// Scratch repositories for end-to-end tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Repository, Signature};
use tempfile::TempDir;

pub const CMAKE: &str = "# IntegrationBus version\n\
set(IB_VERSION_MAJOR 1)\n\
set(IB_VERSION_MINOR 2)\n\
set(IB_VERSION_PATCH 7)\n";

pub const VERSION_FILE: &str = "cmake/IntegrationBusVersion.cmake";

/// A working repository with a bare `origin` next to it
pub struct Workspace {
    pub work: TempDir,
    pub origin: TempDir,
    pub repo: Repository,
}

impl Workspace {
    /// Repository whose history is one import commit plus `subjects`, oldest first
    pub fn new(subjects: &[&str]) -> Self {
        let work = tempfile::tempdir().unwrap();
        let origin = tempfile::tempdir().unwrap();

        let repo = Repository::init(work.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Developer").unwrap();
            config.set_str("user.email", "dev@example.com").unwrap();
        }

        Repository::init_bare(origin.path()).unwrap();
        repo.remote("origin", origin.path().to_str().unwrap())
            .unwrap();

        let workspace = Workspace { work, origin, repo };
        workspace.write(VERSION_FILE, CMAKE);
        workspace.commit_all("Import IntegrationBus sources");
        for (i, subject) in subjects.iter().enumerate() {
            workspace.write(&format!("src/change{}.txt", i), subject);
            workspace.commit_all(subject);
        }
        workspace
    }

    pub fn path(&self) -> &Path {
        self.work.path()
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.work.path().join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.file(relative)).unwrap()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.file(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn commit_all(&self, message: &str) {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("Developer", "dev@example.com").unwrap();

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    pub fn head_subject(&self) -> String {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        head.summary().unwrap_or("").to_string()
    }

    pub fn branch(&self) -> String {
        self.repo.head().unwrap().shorthand().unwrap().to_string()
    }

    pub fn origin_url(&self) -> String {
        self.repo
            .find_remote("origin")
            .unwrap()
            .url()
            .unwrap()
            .to_string()
    }

    /// Commit id of `branch` in the bare origin, if it was pushed
    pub fn origin_head(&self, branch: &str) -> Option<git2::Oid> {
        let origin = Repository::open_bare(self.origin.path()).unwrap();
        let reference = origin
            .find_reference(&format!("refs/heads/{}", branch))
            .ok()?;
        reference.target()
    }

    pub fn local_head(&self) -> git2::Oid {
        self.repo.head().unwrap().target().unwrap()
    }
}
