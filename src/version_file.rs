//! Reading and bumping the CMake version file.
//!
//! The file declares the release number as three statements:
//!
//! ```cmake
//! set(IB_VERSION_MAJOR 1)
//! set(IB_VERSION_MINOR 2)
//! set(IB_VERSION_PATCH 7)
//! ```
//!
//! Each key must be declared exactly once. Bumping rewrites only the digits
//! of the PATCH value; every other byte of the file is preserved.

use std::fs;
use std::ops::Range;
use std::path::Path;

use regex::Regex;

use crate::domain::VersionTriple;
use crate::error::{NightlyError, Result};

/// One of the three version fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionField {
    Major,
    Minor,
    Patch,
}

impl VersionField {
    const ALL: [VersionField; 3] = [VersionField::Major, VersionField::Minor, VersionField::Patch];

    fn suffix(&self) -> &'static str {
        match self {
            VersionField::Major => "MAJOR",
            VersionField::Minor => "MINOR",
            VersionField::Patch => "PATCH",
        }
    }

    /// CMake variable name for this field, e.g. `IB_VERSION_PATCH`
    pub fn key(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.suffix())
    }
}

/// A parsed version file, ready to be bumped
#[derive(Debug, Clone)]
pub struct VersionFile {
    text: String,
    version: VersionTriple,
    patch_span: Range<usize>,
}

/// Result of a patch bump: new file contents and the version they declare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpedVersionFile {
    pub text: String,
    pub previous: VersionTriple,
    pub version: VersionTriple,
}

impl VersionFile {
    /// Reads and parses the version file at `path`.
    pub fn load(path: &Path, prefix: &str) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            NightlyError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read version file {}: {}", path.display(), e),
            ))
        })?;
        Self::parse(text, prefix)
    }

    /// Parses version file contents.
    ///
    /// # Errors
    /// * `MissingVersionField` if a key is not declared
    /// * `DuplicateVersionField` if a key is declared twice
    /// * `Version` if a value is not a `u32`
    pub fn parse(text: impl Into<String>, prefix: &str) -> Result<Self> {
        let text = text.into();
        let mut spans: [Option<Range<usize>>; 3] = [None, None, None];

        let patterns = VersionField::ALL
            .iter()
            .map(|field| {
                let pattern = format!(
                    r"^\s*set\(\s*{}\s+([^)\s]*)\s*\)",
                    regex::escape(&field.key(prefix))
                );
                Regex::new(&pattern).map_err(|e| NightlyError::config(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            for (slot, (field, re)) in VersionField::ALL.iter().zip(&patterns).enumerate() {
                let Some(value) = re.captures(line).and_then(|caps| caps.get(1)) else {
                    continue;
                };
                if spans[slot].is_some() {
                    return Err(NightlyError::DuplicateVersionField(field.key(prefix)));
                }
                spans[slot] = Some(offset + value.start()..offset + value.end());
            }
            offset += line.len();
        }

        let mut values = [0u32; 3];
        for (slot, field) in VersionField::ALL.iter().enumerate() {
            let span = spans[slot]
                .clone()
                .ok_or_else(|| NightlyError::MissingVersionField(field.key(prefix)))?;
            let raw = &text[span];
            values[slot] = raw.parse::<u32>().map_err(|_| {
                NightlyError::version(format!(
                    "{} value '{}' is not a version number",
                    field.key(prefix),
                    raw
                ))
            })?;
        }

        let patch_span = spans[2]
            .clone()
            .ok_or_else(|| NightlyError::MissingVersionField(VersionField::Patch.key(prefix)))?;

        Ok(VersionFile {
            text,
            version: VersionTriple::new(values[0], values[1], values[2]),
            patch_span,
        })
    }

    /// Version currently declared by the file
    pub fn version(&self) -> VersionTriple {
        self.version
    }

    /// Increments PATCH by one and returns the rewritten file.
    pub fn bump_patch(&self) -> Result<BumpedVersionFile> {
        let version = self.version.bump_patch()?;

        let mut text = String::with_capacity(self.text.len() + 1);
        text.push_str(&self.text[..self.patch_span.start]);
        text.push_str(&version.patch.to_string());
        text.push_str(&self.text[self.patch_span.end..]);

        Ok(BumpedVersionFile {
            text,
            previous: self.version,
            version,
        })
    }
}

impl BumpedVersionFile {
    /// Overwrites `path` with the bumped contents.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.text)?;
        log::info!(
            "Bumped {} from {} to {}",
            path.display(),
            self.previous,
            self.version
        );
        Ok(())
    }
}
