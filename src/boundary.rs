use std::fmt;

/// Non-fatal conditions met during a nightly run.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No commit since the last nightly bump qualified for the changelog
    EmptyChangelog { window: usize },
    /// Files other than the version file were modified before the run
    DirtyWorkingTree { paths: Vec<String> },
    /// Remote URL is not https, so it is pushed without embedded credentials
    CredentialsNotInjected { remote: String, url: String },
    /// Push succeeded but the branch upstream could not be recorded
    UpstreamNotRecorded { branch: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::EmptyChangelog { window } => {
                write!(
                    f,
                    "No changelog entries in the last {} commits; writing an empty list",
                    window
                )
            }
            BoundaryWarning::DirtyWorkingTree { paths } => {
                const SHOWN: usize = 5;
                let mut listed = paths
                    .iter()
                    .take(SHOWN)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if paths.len() > SHOWN {
                    listed.push_str(&format!(" and {} more", paths.len() - SHOWN));
                }
                write!(
                    f,
                    "Working tree has {} unrelated change(s) that will not be committed: {}",
                    paths.len(),
                    listed
                )
            }
            BoundaryWarning::CredentialsNotInjected { remote, url } => {
                write!(
                    f,
                    "Remote '{}' ({}) is not an https URL; pushing without embedded credentials",
                    remote, url
                )
            }
            BoundaryWarning::UpstreamNotRecorded { branch, reason } => {
                write!(f, "Could not set upstream for '{}': {}", branch, reason)
            }
        }
    }
}
