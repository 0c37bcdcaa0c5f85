//! Nightly workflow orchestration
//!
//! Runs one nightly bump against any [Repository]:
//!
//! 1. Loop guard on the newest commit
//! 2. Changelog from recent history
//! 3. PATCH bump of the version file
//! 4. Commit and push
//! 5. Version output file
//!
//! Everything that can fail without touching the repository (guard, history,
//! branch, remote lookup, version file parsing, the check against the last
//! published version) runs before the first write.

use crate::boundary::BoundaryWarning;
use crate::changelog::Changelog;
use crate::cli::{EXIT_SKIPPED, EXIT_SUCCESS};
use crate::config::Config;
use crate::credentials::Credentials;
use crate::domain::VersionTriple;
use crate::error::{NightlyError, Result};
use crate::git::Repository;
use crate::guard::{self, GuardDecision};
use crate::output;
use crate::publish::{self, PublishRequest};
use crate::version_file::VersionFile;

/// Arguments for the nightly workflow
///
/// Mirrors the CLI arguments without depending on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NightlyWorkflowArgs {
    /// Push credentials; required unless `dry_run` is set
    pub credentials: Option<Credentials>,

    /// Remote to push to, overriding the configured one
    pub remote: Option<String>,

    /// Compute everything, write nothing
    pub dry_run: bool,
}

/// What a run did, or would have done in a dry run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub previous: VersionTriple,
    pub version: VersionTriple,
    pub branch: String,
    pub remote: String,
    pub message: String,
    pub changelog: Changelog,
    /// Id of the bump commit; `None` for a dry run
    pub commit: Option<String>,
    pub warnings: Vec<BoundaryWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// The newest commit is a nightly bump; nothing was touched
    Skipped { subject: String },
    DryRun(WorkflowResult),
    Completed(WorkflowResult),
}

impl WorkflowOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            WorkflowOutcome::Skipped { .. } => EXIT_SKIPPED,
            WorkflowOutcome::DryRun(_) | WorkflowOutcome::Completed(_) => EXIT_SUCCESS,
        }
    }
}

/// Main nightly workflow
///
/// # Errors
/// * `NightlyError::EmptyHistory` if the repository has no commits
/// * `NightlyError::MissingCredentials` outside a dry run without credentials
/// * Version file errors if the file does not declare a valid version
/// * `NightlyError::Version` if the bump would not exceed the version a
///   previous run wrote to the version output file
/// * Any git error from the commit, push or remote URL handling
pub fn run_nightly_workflow<R: Repository + ?Sized>(
    args: &NightlyWorkflowArgs,
    config: &Config,
    repo: &R,
) -> Result<WorkflowOutcome> {
    let commits = &config.commits;

    let head = repo.head_subject()?;
    if let GuardDecision::Skip { subject } = guard::check_head(head.as_ref(), &commits.marker)? {
        log::info!("Latest commit is a nightly bump, skipping: {}", subject);
        return Ok(WorkflowOutcome::Skipped { subject });
    }

    if !args.dry_run && args.credentials.is_none() {
        return Err(NightlyError::MissingCredentials);
    }

    let workdir = repo.workdir()?;
    let mut warnings = Vec::new();

    let subjects = repo.recent_subjects(commits.changelog_window)?;
    let changelog = Changelog::from_subjects(&subjects, &commits.marker, commits.min_subject_len);
    log::debug!(
        "{} of {} recent commits go into the changelog",
        changelog.len(),
        subjects.len()
    );
    if changelog.is_empty() {
        warnings.push(BoundaryWarning::EmptyChangelog {
            window: commits.changelog_window,
        });
    }

    let branch = repo.current_branch()?;
    let remote = args
        .remote
        .clone()
        .unwrap_or_else(|| config.remote.name.clone());
    repo.remote_url(&remote)?;

    let version_path = workdir.join(&config.paths.version_file);
    let version_file = VersionFile::load(&version_path, &config.version.prefix)?;
    log::debug!(
        "{} declares version {}",
        config.paths.version_file.display(),
        version_file.version()
    );
    let bumped = version_file.bump_patch()?;
    let output_path = workdir.join(&config.paths.version_output);
    if let Some(published) = output::read_version(&output_path)? {
        bumped.version.ensure_follows(&published)?;
    }
    let message = commits.commit_message(&bumped.version);

    let mut result = WorkflowResult {
        previous: bumped.previous,
        version: bumped.version,
        branch,
        remote,
        message,
        changelog,
        commit: None,
        warnings,
    };

    if args.dry_run {
        log::info!(
            "Dry run: {} would become {}",
            result.previous,
            result.version
        );
        return Ok(WorkflowOutcome::DryRun(result));
    }

    output::write_changelog(&workdir.join(&config.paths.changelog), &result.changelog)?;
    bumped.write_to(&version_path)?;

    let request = PublishRequest {
        remote: &result.remote,
        branch: &result.branch,
        version_file: &config.paths.version_file,
        artifacts: vec![
            config.paths.changelog.as_path(),
            config.paths.version_output.as_path(),
        ],
        message: result.message.clone(),
        credentials: args.credentials.as_ref(),
        author: config.author.as_ref(),
    };
    let report = publish::publish(repo, &request)?;

    output::write_version(&output_path, &result.version)?;

    result.commit = Some(report.commit);
    result.warnings.extend(report.warnings);
    Ok(WorkflowOutcome::Completed(result))
}
