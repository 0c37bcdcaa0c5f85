//! Plain-text artifacts handed to the rest of the nightly pipeline.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::changelog::Changelog;
use crate::domain::VersionTriple;
use crate::error::{NightlyError, Result};

/// Overwrites `path` with the rendered changelog.
pub fn write_changelog(path: &Path, changelog: &Changelog) -> Result<()> {
    fs::write(path, changelog.render())?;
    log::info!(
        "Wrote changelog with {} entries to {}",
        changelog.len(),
        path.display()
    );
    Ok(())
}

/// Overwrites `path` with `major.minor.patch`, without a trailing newline.
pub fn write_version(path: &Path, version: &VersionTriple) -> Result<()> {
    fs::write(path, version.to_string())?;
    log::info!("Wrote version {} to {}", version, path.display());
    Ok(())
}

/// Reads the version a previous run published, if the file exists.
pub fn read_version(path: &Path) -> Result<Option<VersionTriple>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match VersionTriple::parse(&text) {
        Ok(version) => Ok(Some(version)),
        Err(NightlyError::Version(msg)) => Err(NightlyError::version(format!(
            "{} from a previous run: {}",
            path.display(),
            msg
        ))),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommitSubject;

    #[test]
    fn test_write_version_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_version_number.txt");
        fs::write(&path, "0.9.99-old-and-longer\n").unwrap();

        write_version(&path, &VersionTriple::new(1, 2, 8)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1.2.8");
    }

    #[test]
    fn test_read_version_written_by_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_version_number.txt");
        assert_eq!(read_version(&path).unwrap(), None);

        write_version(&path, &VersionTriple::new(1, 2, 8)).unwrap();
        assert_eq!(
            read_version(&path).unwrap(),
            Some(VersionTriple::new(1, 2, 8))
        );
    }

    #[test]
    fn test_read_version_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_version_number.txt");
        fs::write(&path, "nightly\n").unwrap();

        let err = read_version(&path).unwrap_err();
        assert!(matches!(err, NightlyError::Version(_)));
        assert!(err.to_string().contains("new_version_number.txt"));
    }

    #[test]
    fn test_write_changelog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("changelog.txt");
        let subjects = vec![CommitSubject::from("Add Ethernet demo")];
        let changelog = Changelog::from_subjects(&subjects, "-- managed-build", 5);

        write_changelog(&path, &changelog).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<ul><li>Add Ethernet demo\n</li></ul>"
        );
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("v.txt");
        assert!(write_version(&path, &VersionTriple::new(1, 0, 0)).is_err());
    }
}
