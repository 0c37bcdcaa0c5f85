use crate::error::{NightlyError, Result};
use std::fmt;

/// Release number of a nightly build
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionTriple {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionTriple {
    /// Create a new version triple
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        VersionTriple {
            major,
            minor,
            patch,
        }
    }

    /// Parse "major.minor.patch", as written to the version output file
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = semver::Version::parse(text.trim())
            .map_err(|e| NightlyError::version(format!("Invalid version '{}': {}", text, e)))?;
        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(NightlyError::version(format!(
                "Version '{}' carries a pre-release or build suffix",
                text.trim()
            )));
        }

        let component = |value: u64, name: &str| {
            u32::try_from(value).map_err(|_| {
                NightlyError::version(format!("{} component {} is out of range", name, value))
            })
        };

        Ok(VersionTriple {
            major: component(parsed.major, "major")?,
            minor: component(parsed.minor, "minor")?,
            patch: component(parsed.patch, "patch")?,
        })
    }

    /// Next nightly version: patch + 1, major and minor untouched
    pub fn bump_patch(&self) -> Result<Self> {
        let patch = self.patch.checked_add(1).ok_or_else(|| {
            NightlyError::version(format!("patch number {} cannot be incremented", self.patch))
        })?;

        Ok(VersionTriple { patch, ..*self })
    }

    /// Checks that `self` is a strictly newer release than `previous`.
    pub fn ensure_follows(&self, previous: &VersionTriple) -> Result<()> {
        if self.to_semver() > previous.to_semver() {
            Ok(())
        } else {
            Err(NightlyError::version(format!(
                "version {} does not follow {}",
                self, previous
            )))
        }
    }

    fn to_semver(&self) -> semver::Version {
        semver::Version::new(
            u64::from(self.major),
            u64::from(self.minor),
            u64::from(self.patch),
        )
    }
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
