//! Changelog of the commits made since the last nightly bump.
//!
//! The document is a flat HTML list consumed by the nightly build page:
//! `<ul><li>subject\n</li>...</ul>`.

use std::fmt;

use crate::domain::CommitSubject;

/// Entries collected from recent history, newest first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Changelog {
    entries: Vec<String>,
}

impl Changelog {
    /// Collects entries from newest-first subjects.
    ///
    /// Stops at the first subject carrying `marker`; skips subjects with
    /// `min_len` characters or fewer.
    pub fn from_subjects<'a, I>(subjects: I, marker: &str, min_len: usize) -> Self
    where
        I: IntoIterator<Item = &'a CommitSubject>,
    {
        let entries = subjects
            .into_iter()
            .take_while(|subject| !subject.is_automated(marker))
            .filter(|subject| subject.is_substantial(min_len))
            .map(|subject| subject.as_str().to_string())
            .collect();

        Changelog { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Renders the markup written to the changelog file
    pub fn render(&self) -> String {
        let mut out = String::from("<ul>");
        for entry in &self.entries {
            out.push_str("<li>");
            out.push_str(entry);
            out.push_str("\n</li>");
        }
        out.push_str("</ul>");
        out
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
