//! Loop guard: stops a run triggered by the tool's own bump commit.

use crate::domain::CommitSubject;
use crate::error::{NightlyError, Result};

/// Outcome of inspecting the newest commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    /// Newest commit is a nightly bump; carries its subject for reporting
    Skip { subject: String },
}

/// Decides whether a run may continue, given the newest commit subject.
///
/// # Errors
/// * `NightlyError::EmptyHistory` when there is no commit at all
pub fn check_head(subject: Option<&CommitSubject>, marker: &str) -> Result<GuardDecision> {
    let subject = subject.ok_or(NightlyError::EmptyHistory)?;

    if subject.is_automated(marker) {
        Ok(GuardDecision::Skip {
            subject: subject.to_string(),
        })
    } else {
        Ok(GuardDecision::Proceed)
    }
}
