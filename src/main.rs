use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use nightly_bump::cli::orchestration::{run_nightly_workflow, NightlyWorkflowArgs};
use nightly_bump::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use nightly_bump::config;
use nightly_bump::credentials::Credentials;
use nightly_bump::git::Git2Repository;
use nightly_bump::ui;

#[derive(clap::Parser)]
#[command(
    name = "nightly-bump",
    version,
    about = "Bump the nightly patch version, write a changelog and push the result"
)]
struct Args {
    #[arg(help = "User name for the push", required_unless_present = "dry_run")]
    username: Option<String>,

    #[arg(
        help = "Password or token for the push",
        required_unless_present = "dry_run"
    )]
    secret: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short = 'C', long, default_value = ".", help = "Repository to run in")]
    repo: PathBuf,

    #[arg(long, help = "Remote to push to, overriding the configuration")]
    remote: Option<String>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn main() {
    // clap reports usage errors with status 2, which is reserved for skipped runs
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                EXIT_FAILURE
            } else {
                EXIT_SUCCESS
            };
            // stdout or stderr is gone; the exit status still reports the outcome
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(args.verbose);

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn init_logging(verbose: bool) {
    let log_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();
}

fn run(args: Args) -> Result<i32> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let repo = Git2Repository::open(&args.repo)
        .with_context(|| format!("Git repository error in {}", args.repo.display()))?;

    let credentials = match (args.username, args.secret) {
        (Some(username), Some(secret)) => Some(Credentials::new(username, secret)),
        _ => None,
    };

    let workflow_args = NightlyWorkflowArgs {
        credentials,
        remote: args.remote,
        dry_run: args.dry_run,
    };

    if args.dry_run {
        ui::display_status("Dry run, no files or repository state will change");
    }

    let outcome = run_nightly_workflow(&workflow_args, &config, &repo)?;
    ui::display_summary(&outcome);

    Ok(outcome.exit_code())
}
