//! Formatting functions for terminal output.
//!
//! Every line written to the user goes through here; diagnostics go to the
//! `log` facade instead.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::changelog::Changelog;
use crate::domain::VersionTriple;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Line shown when the loop guard stops a run.
pub fn format_skip(subject: &str) -> String {
    format!(
        "Latest commit was made by the nightly build, aborting: {}",
        subject
    )
}

/// One-line description of a version change, e.g. `1.2.7 -> 1.2.8`.
pub fn format_version_change(previous: &VersionTriple, next: &VersionTriple) -> String {
    format!("{} -> {}", previous, next)
}

/// Display the changelog entries that will be written.
///
/// Shows up to 10 entries; longer lists end with a count of the rest.
pub fn display_changelog(changelog: &Changelog) {
    println!(
        "\n{}",
        style(format!("Changelog ({} entries):", changelog.len())).bold()
    );

    for (i, entry) in changelog.entries().iter().take(10).enumerate() {
        println!("  {}. {}", i + 1, truncate(entry, 72));
    }

    if changelog.len() > 10 {
        println!("  ... and {} more", changelog.len() - 10);
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
