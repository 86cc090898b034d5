use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::notifier::Notifier;
use super::pipeline::{finish_pass, JobCheckPipeline, JobCheckSummary, PipelineError};
use super::source::{JobSource, ResumeSource};

/// Exponential back-off applied to failed passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_timeout: Duration,
    pub max_timeout: Duration,
    pub factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_timeout: Duration::from_millis(1_000),
            max_timeout: Duration::from_millis(10_000),
            factor: 2,
        }
    }
}

impl RetryPolicy {
    /// Wait before the next try after `attempt` (1-based) has failed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let multiplier = self.factor.saturating_pow(attempt.saturating_sub(1));
        self.min_timeout
            .saturating_mul(multiplier)
            .min(self.max_timeout)
    }
}

/// Runs `op` until it succeeds or the policy's attempts are spent.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    task = label,
                    attempt,
                    error = %err,
                    retry_in_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                error!(task = label, attempt, error = %err, "giving up");
                return Err(err);
            }
        }
    }
}

/// Runs a pass on the blocking pool so file I/O does not stall the runtime.
pub async fn run_blocking<S, R, N>(
    pipeline: JobCheckPipeline<S, R, N>,
) -> Result<JobCheckSummary, PipelineError>
where
    S: JobSource + 'static,
    R: ResumeSource + 'static,
    N: Notifier + 'static,
{
    run_blocking_since(pipeline, None).await
}

/// [`run_blocking`] restricted to jobs posted after `since`, when given.
pub async fn run_blocking_since<S, R, N>(
    pipeline: JobCheckPipeline<S, R, N>,
    since: Option<DateTime<Utc>>,
) -> Result<JobCheckSummary, PipelineError>
where
    S: JobSource + 'static,
    R: ResumeSource + 'static,
    N: Notifier + 'static,
{
    tokio::task::spawn_blocking(move || match since {
        Some(since) => pipeline.run_since(since),
        None => pipeline.run(),
    })
    .await
    .map_err(|err| PipelineError::Interrupted(err.to_string()))?
}

/// One pass with each boundary step retried on its own. Matching runs once,
/// after both loads have succeeded.
pub async fn run_pass_with_retry<S, R, N>(
    pipeline: &JobCheckPipeline<S, R, N>,
    policy: &RetryPolicy,
    since: Option<DateTime<Utc>>,
) -> Result<JobCheckSummary, PipelineError>
where
    S: JobSource + 'static,
    R: ResumeSource + 'static,
    N: Notifier + 'static,
{
    let started = Instant::now();
    info!("job check started");

    let jobs = retry(policy, "scrape-jobs", || {
        let pipeline = pipeline.clone();
        blocking(move || pipeline.load_jobs(since))
    })
    .await?;

    let resume = retry(policy, "load-resume", || {
        let pipeline = pipeline.clone();
        blocking(move || pipeline.load_resume())
    })
    .await?;

    let matches = Arc::new(pipeline.match_jobs(&jobs, &resume));
    let resume = Arc::new(resume);

    retry(policy, "notify", || {
        let pipeline = pipeline.clone();
        let matches = Arc::clone(&matches);
        let resume = Arc::clone(&resume);
        blocking(move || pipeline.notify(&matches, &resume))
    })
    .await?;

    Ok(finish_pass(
        jobs.len(),
        matches.len(),
        resume.profile.email.clone(),
        started,
    ))
}

async fn blocking<T, E, F>(task: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<PipelineError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| PipelineError::Interrupted(err.to_string()))?
        .map_err(Into::into)
}

/// Shortest cadence a schedule will run at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Fixed-cadence trigger for job checks.
#[derive(Debug, Clone)]
pub struct JobCheckSchedule {
    pub interval: Duration,
    pub retry: RetryPolicy,
}

/// Tally of a schedule that stopped after `max_runs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleReport {
    pub runs: usize,
    pub succeeded: usize,
}

impl JobCheckSchedule {
    /// Intervals below [`MIN_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            warn!(
                requested_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
                "job check interval too short, using minimum"
            );
        }
        Self {
            interval: interval.max(MIN_INTERVAL),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Runs passes until `max_runs` is reached, or forever when `None`.
    /// A pass whose boundary step still fails after its retries is logged and
    /// skipped.
    pub async fn run<S, R, N>(
        &self,
        pipeline: JobCheckPipeline<S, R, N>,
        max_runs: Option<usize>,
    ) -> ScheduleReport
    where
        S: JobSource + 'static,
        R: ResumeSource + 'static,
        N: Notifier + 'static,
    {
        let mut ticker = tokio::time::interval(self.interval.max(MIN_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut report = ScheduleReport::default();

        info!(interval_secs = self.interval.as_secs(), "job check schedule started");

        while max_runs.map_or(true, |max| report.runs < max) {
            ticker.tick().await;
            report.runs += 1;

            match run_pass_with_retry(&pipeline, &self.retry, None).await {
                Ok(summary) => {
                    report.succeeded += 1;
                    info!(
                        run = report.runs,
                        jobs_checked = summary.jobs_checked,
                        matches_found = summary.matches_found,
                        "scheduled job check finished"
                    );
                }
                Err(err) => {
                    error!(run = report.runs, error = %err, "scheduled job check failed");
                }
            }
        }

        report
    }
}
