use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::notifier::{Notifier, NotifyError};
use super::source::{JobSource, LoadError, ResumeSource};
use crate::matching::{Job, JobId, JobMatcher, Match, Resume, UserId};

/// One full pass: load jobs, load the resume, match, notify.
pub struct JobCheckPipeline<S, R, N> {
    jobs: Arc<S>,
    resumes: Arc<R>,
    matcher: Arc<dyn JobMatcher>,
    notifier: Arc<N>,
}

impl<S, R, N> Clone for JobCheckPipeline<S, R, N> {
    fn clone(&self) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
            resumes: Arc::clone(&self.resumes),
            matcher: Arc::clone(&self.matcher),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

/// Outcome of a full pass, suitable for dashboards and API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCheckSummary {
    pub jobs_checked: usize,
    pub matches_found: usize,
    pub user_email: String,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Outcome of matching a single newly arrived job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchJobOutcome {
    pub job_id: JobId,
    pub user_id: UserId,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("job check task did not complete: {0}")]
    Interrupted(String),
}

impl<S, R, N> JobCheckPipeline<S, R, N>
where
    S: JobSource + 'static,
    R: ResumeSource + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        jobs: Arc<S>,
        resumes: Arc<R>,
        matcher: Arc<dyn JobMatcher>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            jobs,
            resumes,
            matcher,
            notifier,
        }
    }

    pub fn run(&self) -> Result<JobCheckSummary, PipelineError> {
        self.execute(None)
    }

    /// Like [`run`](Self::run) but only considers jobs posted after `since`.
    pub fn run_since(&self, since: DateTime<Utc>) -> Result<JobCheckSummary, PipelineError> {
        self.execute(Some(since))
    }

    fn execute(&self, since: Option<DateTime<Utc>>) -> Result<JobCheckSummary, PipelineError> {
        let started = Instant::now();
        info!("job check started");

        let jobs = self.load_jobs(since)?;
        let resume = self.load_resume()?;
        let matches = self.match_jobs(&jobs, &resume);
        self.notify(&matches, &resume)?;

        Ok(finish_pass(jobs.len(), matches.len(), resume.profile.email, started))
    }

    /// Boundary step: every job, or only those posted after `since`.
    pub fn load_jobs(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Job>, LoadError> {
        let jobs = match since {
            Some(since) => self.jobs.scrape_jobs_since(since)?,
            None => self.jobs.scrape_jobs()?,
        };
        info!(jobs = jobs.len(), "fetched job postings");
        Ok(jobs)
    }

    /// Boundary step: the resume matched in this pass.
    pub fn load_resume(&self) -> Result<Resume, LoadError> {
        let resume = self.resumes.load_resume()?;
        info!(
            user_id = %resume.user_id,
            skills = resume.skills.len(),
            years = resume.profile.years_of_experience,
            "loaded resume"
        );
        Ok(resume)
    }

    /// Pure step: never fails and never retried.
    pub fn match_jobs(&self, jobs: &[Job], resume: &Resume) -> Vec<Match> {
        let matches = self.matcher.find_matches(jobs, resume);
        info!(matches = matches.len(), "matched jobs to resume");
        matches
    }

    /// Boundary step: hands the pass's matches to the notifier.
    pub fn notify(&self, matches: &[Match], resume: &Resume) -> Result<(), NotifyError> {
        self.notifier.notify(matches, resume)
    }

    /// Matches one job as it arrives, notifying only when it clears the
    /// threshold.
    pub fn match_job(&self, job: Job) -> Result<MatchJobOutcome, PipelineError> {
        let resume = self.resumes.load_resume()?;
        info!(job_id = %job.id, user_id = %resume.user_id, "matching job against user");

        let job_id = job.id.clone();
        let matches = self.matcher.find_matches(std::slice::from_ref(&job), &resume);

        let Some(found) = matches.first() else {
            return Ok(MatchJobOutcome {
                job_id,
                user_id: resume.user_id,
                matched: false,
                score: None,
            });
        };

        info!(job_id = %job_id, score = found.score.total, "match found");
        if let Err(err) = self.notifier.notify(&matches, &resume) {
            warn!(job_id = %job_id, error = %err, "failed to deliver match notification");
            return Err(err.into());
        }

        Ok(MatchJobOutcome {
            job_id,
            user_id: resume.user_id,
            matched: true,
            score: Some(found.score.total),
        })
    }
}

/// Closes out a pass that loaded, matched and notified successfully.
pub(super) fn finish_pass(
    jobs_checked: usize,
    matches_found: usize,
    user_email: String,
    started: Instant,
) -> JobCheckSummary {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(duration_ms, "job check completed");

    JobCheckSummary {
        jobs_checked,
        matches_found,
        user_email,
        completed_at: Utc::now(),
        duration_ms,
    }
}
