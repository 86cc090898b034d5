use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::infra::{file_pipeline, log_config_warnings, JsonNotifier};
use crate::server;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use job_match::config::AppConfig;
use job_match::error::AppError;
use job_match::matching::MatchEngine;
use job_match::telemetry;
use job_match::workflows::job_check::{
    run_blocking_since, ConsoleNotifier, JobCheckSchedule, Notifier,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Job Match",
    about = "Score job postings against a resume and report the matches",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a single job check and print the matches
    Check(CheckArgs),
    /// Run job checks on a fixed interval
    Watch(WatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CheckArgs {
    /// Job postings file (.json array or .csv export)
    #[arg(long)]
    pub(crate) jobs: Option<PathBuf>,
    /// Resume JSON file
    #[arg(long)]
    pub(crate) resume: Option<PathBuf>,
    /// Only consider jobs posted after this RFC 3339 timestamp
    #[arg(long, value_parser = parse_since)]
    pub(crate) since: Option<DateTime<Utc>>,
    /// Print matches as JSON instead of the text digest
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct WatchArgs {
    /// Seconds between checks; defaults to JOB_CHECK_INTERVAL_SECS
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) interval_secs: Option<u64>,
    /// Stop after this many checks
    #[arg(long)]
    pub(crate) max_runs: Option<usize>,
}

fn parse_since(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC 3339 timestamp: {err}"))
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args).await,
        Command::Watch(args) => run_watch(args).await,
    }
}

fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    log_config_warnings(&config);
    Ok(config)
}

async fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let mut config = load_config()?;
    if let Some(jobs) = args.jobs {
        config.data.jobs_path = jobs;
    }
    if let Some(resume) = args.resume {
        config.data.resume_path = resume;
    }

    if args.json {
        check_once(&config, Arc::new(JsonNotifier::stdout()), args.since).await
    } else {
        check_once(&config, Arc::new(ConsoleNotifier::stdout()), args.since).await
    }
}

async fn check_once<N>(
    config: &AppConfig,
    notifier: Arc<N>,
    since: Option<DateTime<Utc>>,
) -> Result<(), AppError>
where
    N: Notifier + 'static,
{
    let matcher = Arc::new(MatchEngine::new(config.matching.clone()));
    let pipeline = file_pipeline(&config.data, matcher, notifier);

    let summary = run_blocking_since(pipeline, since).await?;

    info!(
        jobs_checked = summary.jobs_checked,
        matches_found = summary.matches_found,
        duration_ms = summary.duration_ms,
        "job check finished"
    );
    Ok(())
}

async fn run_watch(args: WatchArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let interval = args
        .interval_secs
        .map(Duration::from_secs)
        .unwrap_or(config.schedule.interval);

    let matcher = Arc::new(MatchEngine::new(config.matching.clone()));
    let pipeline = file_pipeline(&config.data, matcher, Arc::new(ConsoleNotifier::stdout()));

    let report = JobCheckSchedule::new(interval)
        .run(pipeline, args.max_runs)
        .await;

    info!(
        runs = report.runs,
        succeeded = report.succeeded,
        "job check schedule stopped"
    );
    Ok(())
}
