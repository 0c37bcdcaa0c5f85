use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NightlyError, Result};

/// File name looked up in the current directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "nightly-bump.toml";

/// Represents the complete configuration for nightly-bump.
///
/// Every section has defaults matching the IntegrationBus nightly-build
/// convention, so a partial file (or none at all) is valid.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub commits: CommitsConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub author: Option<AuthorConfig>,
}

fn default_version_file() -> PathBuf {
    PathBuf::from("cmake/IntegrationBusVersion.cmake")
}

fn default_changelog() -> PathBuf {
    PathBuf::from("changelog.txt")
}

fn default_version_output() -> PathBuf {
    PathBuf::from("new_version_number.txt")
}

/// Locations of the files read and written during a run.
///
/// All paths are relative to the repository work directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    #[serde(default = "default_changelog")]
    pub changelog: PathBuf,

    #[serde(default = "default_version_output")]
    pub version_output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            version_file: default_version_file(),
            changelog: default_changelog(),
            version_output: default_version_output(),
        }
    }
}

fn default_version_prefix() -> String {
    "IB_VERSION".to_string()
}

/// Naming of the CMake version variables (`<prefix>_MAJOR` and so on).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionConfig {
    #[serde(default = "default_version_prefix")]
    pub prefix: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        VersionConfig {
            prefix: default_version_prefix(),
        }
    }
}

fn default_marker() -> String {
    "-- managed-build".to_string()
}

fn default_commit_prefix() -> String {
    "-- managed-build bump version number to ".to_string()
}

fn default_changelog_window() -> usize {
    20
}

fn default_min_subject_len() -> usize {
    5
}

/// Settings for reading history and writing the bump commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitsConfig {
    /// Substring identifying commits made by this tool.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Message prefix of the bump commit, followed by the version triple.
    #[serde(default = "default_commit_prefix")]
    pub commit_prefix: String,

    /// Number of recent commits scanned for the changelog.
    #[serde(default = "default_changelog_window")]
    pub changelog_window: usize,

    /// Subjects with this many characters or fewer are left out of the changelog.
    #[serde(default = "default_min_subject_len")]
    pub min_subject_len: usize,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        CommitsConfig {
            marker: default_marker(),
            commit_prefix: default_commit_prefix(),
            changelog_window: default_changelog_window(),
            min_subject_len: default_min_subject_len(),
        }
    }
}

impl CommitsConfig {
    /// Full commit message for a bump to `version`.
    pub fn commit_message(&self, version: &impl std::fmt::Display) -> String {
        format!("{}{} (nightly build)", self.commit_prefix, version)
    }
}

fn default_remote_name() -> String {
    "origin".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_name")]
    pub name: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
        }
    }
}

/// Explicit commit identity; when absent the repository signature is used.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AuthorConfig {
    pub name: String,
    pub email: String,
}

impl Config {
    /// Checks values that deserialize fine but cannot drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.commits.marker.is_empty() {
            return Err(NightlyError::config("commits.marker must not be empty"));
        }
        if self.commits.changelog_window == 0 {
            return Err(NightlyError::config(
                "commits.changelog_window must be at least 1",
            ));
        }
        if self.version.prefix.trim().is_empty() {
            return Err(NightlyError::config("version.prefix must not be empty"));
        }
        if self.remote.name.trim().is_empty() {
            return Err(NightlyError::config("remote.name must not be empty"));
        }
        if !self.commits.commit_prefix.contains(&self.commits.marker) {
            log::warn!(
                "commit prefix '{}' lacks marker '{}'; bump commits will not stop later runs",
                self.commits.commit_prefix,
                self.commits.marker
            );
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `nightly-bump.toml` in current directory
/// 3. `nightly-bump.toml` in user config directory
/// 4. Default configuration if no file found
///
/// The result is validated before it is returned.
///
/// # Errors
/// * `NightlyError::Io` if an existing file cannot be read
/// * `NightlyError::Config` if the file cannot be parsed or fails validation
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = match locate_config(config_path) {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            let config_str = fs::read_to_string(&path)?;
            parse_config(&config_str)
                .map_err(|e| NightlyError::config(format!("{}: {}", path.display(), e)))?
        }
        None => {
            log::debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    config.validate()?;
    Ok(config)
}

/// Parses configuration from TOML text without validating it.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| NightlyError::config(e.to_string()))
}

fn locate_config(config_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
