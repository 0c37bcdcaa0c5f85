//! Domain logic - pure rules about versions and commit subjects, independent of git operations

pub mod commit;
pub mod version;

pub use commit::CommitSubject;
pub use version::VersionTriple;
