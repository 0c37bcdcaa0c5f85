pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod git;
pub mod guard;
pub mod output;
pub mod publish;
pub mod ui;
pub mod version_file;

pub use error::{NightlyError, Result};
