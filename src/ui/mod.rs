//! User interface module: run summaries built on the formatting helpers.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_changelog, display_error, display_status, display_success,
    format_skip, format_version_change,
};

use crate::cli::orchestration::{WorkflowOutcome, WorkflowResult};

/// Prints the end-of-run report for a workflow outcome.
pub fn display_summary(outcome: &WorkflowOutcome) {
    match outcome {
        WorkflowOutcome::Skipped { subject } => display_status(&format_skip(subject)),
        WorkflowOutcome::DryRun(result) => {
            display_changelog(&result.changelog);
            display_warnings(result);
            display_status("Dry run, nothing was written:");
            display_success(&format!(
                "  would write version {}",
                format_version_change(&result.previous, &result.version)
            ));
            display_success(&format!(
                "  would commit \"{}\" on '{}'",
                result.message, result.branch
            ));
            display_success(&format!(
                "  would push '{}' to '{}'",
                result.branch, result.remote
            ));
        }
        WorkflowOutcome::Completed(result) => {
            display_warnings(result);
            display_success(&format!(
                "Published nightly version {} on '{}'",
                format_version_change(&result.previous, &result.version),
                result.branch
            ));
        }
    }
}

fn display_warnings(result: &WorkflowResult) {
    for warning in &result.warnings {
        display_boundary_warning(warning);
    }
}
