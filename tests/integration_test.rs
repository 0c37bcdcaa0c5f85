// tests/integration_test.rs
mod common;

use std::path::Path;

use common::{Workspace, CMAKE, VERSION_FILE};
use nightly_bump::boundary::BoundaryWarning;
use nightly_bump::cli::orchestration::{
    run_nightly_workflow, NightlyWorkflowArgs, WorkflowOutcome,
};
use nightly_bump::config::Config;
use nightly_bump::credentials::Credentials;
use nightly_bump::domain::VersionTriple;
use nightly_bump::git::Git2Repository;
use nightly_bump::NightlyError;

fn args() -> NightlyWorkflowArgs {
    NightlyWorkflowArgs {
        credentials: Some(Credentials::new("user", "p@ss")),
        ..Default::default()
    }
}

fn run(ws: &Workspace, config: &Config) -> nightly_bump::Result<WorkflowOutcome> {
    let repo = Git2Repository::open(ws.path())?;
    run_nightly_workflow(&args(), config, &repo)
}

#[test]
fn test_nightly_bump_end_to_end() {
    let ws = Workspace::new(&[
        "-- managed-build bump version number to 1.2.7 (nightly build)",
        "Fix LIN checksum calculation",
        "wip",
        "Add Ethernet demo",
    ]);
    let origin_url = ws.origin_url();

    let outcome = run(&ws, &Config::default()).unwrap();
    let WorkflowOutcome::Completed(result) = outcome else {
        panic!("expected a completed run, got {:?}", outcome);
    };

    assert_eq!(result.version, VersionTriple::new(1, 2, 8));

    let version_file = ws.read(VERSION_FILE);
    assert_eq!(version_file, CMAKE.replace("PATCH 7)", "PATCH 8)"));
    assert!(version_file.contains("set(IB_VERSION_PATCH 8)"));

    assert_eq!(ws.read("new_version_number.txt"), "1.2.8");
    assert_eq!(
        ws.read("changelog.txt"),
        "<ul><li>Add Ethernet demo\n</li><li>Fix LIN checksum calculation\n</li></ul>"
    );

    assert_eq!(
        ws.head_subject(),
        "-- managed-build bump version number to 1.2.8 (nightly build)"
    );
    assert_eq!(ws.origin_head(&result.branch), Some(ws.local_head()));
    assert_eq!(ws.origin_url(), origin_url);

    let config = ws.repo.config().unwrap().snapshot().unwrap();
    assert_eq!(
        config
            .get_str(&format!("branch.{}.remote", result.branch))
            .unwrap(),
        "origin"
    );

    // local path remotes cannot carry credentials
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, BoundaryWarning::CredentialsNotInjected { .. })));
}

#[test]
fn test_wrapped_subject_is_one_changelog_entry() {
    let ws = Workspace::new(&["wip\non the LIN demo checksum\n\nLonger explanation"]);

    let outcome = run(&ws, &Config::default()).unwrap();
    assert!(matches!(outcome, WorkflowOutcome::Completed(_)));
    assert_eq!(
        ws.read("changelog.txt"),
        "<ul><li>wip on the LIN demo checksum\n</li><li>Import IntegrationBus sources\n</li></ul>"
    );
}

#[test]
fn test_only_version_file_is_committed() {
    let ws = Workspace::new(&["Add CAN demo application"]);
    ws.write("notes.txt", "local scratch notes");

    let outcome = run(&ws, &Config::default()).unwrap();
    let WorkflowOutcome::Completed(result) = outcome else {
        panic!("expected a completed run");
    };

    assert!(result.warnings.contains(&BoundaryWarning::DirtyWorkingTree {
        paths: vec!["notes.txt".to_string()]
    }));

    let head = ws.repo.head().unwrap().peel_to_commit().unwrap();
    let tree = head.tree().unwrap();
    assert!(tree.get_path(Path::new("notes.txt")).is_err());
    assert!(tree.get_path(Path::new("changelog.txt")).is_err());
}

#[test]
fn test_nightly_commit_on_head_skips() {
    let ws = Workspace::new(&[
        "Add RPC demo",
        "-- managed-build bump version number to 1.2.7 (nightly build)",
    ]);
    let head_before = ws.local_head();

    let outcome = run(&ws, &Config::default()).unwrap();
    assert!(matches!(outcome, WorkflowOutcome::Skipped { .. }));
    assert_eq!(outcome.exit_code(), 2);

    assert_eq!(ws.read(VERSION_FILE), CMAKE);
    assert!(!ws.file("changelog.txt").exists());
    assert!(!ws.file("new_version_number.txt").exists());
    assert_eq!(ws.local_head(), head_before);
    assert_eq!(ws.origin_head(&ws.branch()), None);
}

#[test]
fn test_consecutive_runs_without_marker_increment_once_each() {
    let ws = Workspace::new(&["Add FlexRay controller"]);
    let mut config = Config::default();
    config.commits.commit_prefix = "bump version number to ".to_string();

    let first = run(&ws, &config).unwrap();
    let second = run(&ws, &config).unwrap();

    let versions: Vec<VersionTriple> = [first, second]
        .into_iter()
        .map(|outcome| match outcome {
            WorkflowOutcome::Completed(result) => result.version,
            other => panic!("expected a completed run, got {:?}", other),
        })
        .collect();

    assert_eq!(
        versions,
        vec![VersionTriple::new(1, 2, 8), VersionTriple::new(1, 2, 9)]
    );
    assert!(ws.read(VERSION_FILE).contains("set(IB_VERSION_PATCH 9)"));
    assert_eq!(ws.read("new_version_number.txt"), "1.2.9");
}

#[test]
fn test_second_run_with_marker_is_skipped() {
    let ws = Workspace::new(&["Add FlexRay controller"]);

    let first = run(&ws, &Config::default()).unwrap();
    assert!(matches!(first, WorkflowOutcome::Completed(_)));

    let second = run(&ws, &Config::default()).unwrap();
    assert!(matches!(second, WorkflowOutcome::Skipped { .. }));
    assert!(ws.read(VERSION_FILE).contains("set(IB_VERSION_PATCH 8)"));
}

#[test]
fn test_missing_patch_field_fails_without_side_effects() {
    let ws = Workspace::new(&[]);
    ws.write(
        VERSION_FILE,
        "set(IB_VERSION_MAJOR 1)\nset(IB_VERSION_MINOR 2)\n",
    );
    ws.commit_all("Drop the patch level");
    let head_before = ws.local_head();

    let err = run(&ws, &Config::default()).unwrap_err();
    assert!(matches!(err, NightlyError::MissingVersionField(_)));
    assert!(!ws.file("changelog.txt").exists());
    assert_eq!(ws.local_head(), head_before);
}

#[test]
fn test_dry_run_changes_nothing() {
    let ws = Workspace::new(&["Add Ethernet demo"]);
    let head_before = ws.local_head();

    let repo = Git2Repository::open(ws.path()).unwrap();
    let dry = NightlyWorkflowArgs {
        dry_run: true,
        ..Default::default()
    };
    let outcome = run_nightly_workflow(&dry, &Config::default(), &repo).unwrap();

    let WorkflowOutcome::DryRun(result) = outcome else {
        panic!("expected a dry run");
    };
    assert_eq!(result.version, VersionTriple::new(1, 2, 8));
    assert_eq!(ws.read(VERSION_FILE), CMAKE);
    assert!(!ws.file("changelog.txt").exists());
    assert_eq!(ws.local_head(), head_before);
}
