//! Entry points shared by the binary and integration tests

pub mod orchestration;

/// Exit status for a completed run, including a dry run
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status for any error, including invalid arguments
pub const EXIT_FAILURE: i32 = 1;
/// Exit status when the newest commit was made by the nightly build itself
pub const EXIT_SKIPPED: i32 = 2;
