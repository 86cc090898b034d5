use chrono::Utc;

use super::config::MatchingConfig;
use super::domain::{Job, Match, MatchScore, Resume};
use super::reason::match_reason;
use super::scoring::{self, score_with_index, SkillIndex};

/// Seam for swapping the matching algorithm without touching the workflows
/// that feed it or consume its output.
pub trait JobMatcher: Send + Sync {
    fn find_matches(&self, jobs: &[Job], resume: &Resume) -> Vec<Match>;
    fn calculate_score(&self, job: &Job, resume: &Resume) -> MatchScore;
}

/// Matcher applying the weighted rubric under one fixed config.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    config: MatchingConfig,
}

impl MatchEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }
}

impl JobMatcher for MatchEngine {
    fn find_matches(&self, jobs: &[Job], resume: &Resume) -> Vec<Match> {
        find_matches(jobs, resume, &self.config)
    }

    fn calculate_score(&self, job: &Job, resume: &Resume) -> MatchScore {
        scoring::calculate_score(job, resume, &self.config)
    }
}

/// Scores every job, keeps those that pass the experience ceiling and the
/// threshold, and orders them by total, highest first. Equal totals keep
/// their input order.
pub fn find_matches(jobs: &[Job], resume: &Resume, config: &MatchingConfig) -> Vec<Match> {
    let index = SkillIndex::from_resume(resume);

    let mut matches: Vec<Match> = jobs
        .iter()
        .filter(|job| within_experience_ceiling(job, resume))
        .filter_map(|job| evaluate(job, resume, &index, config))
        .collect();

    // `sort_by` is stable, which the tie ordering relies on.
    matches.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));
    matches
}

fn within_experience_ceiling(job: &Job, resume: &Resume) -> bool {
    match resume.preferences.max_years_required {
        Some(max_years) => job.years_experience_required <= max_years,
        None => true,
    }
}

fn evaluate(
    job: &Job,
    resume: &Resume,
    index: &SkillIndex,
    config: &MatchingConfig,
) -> Option<Match> {
    let score = score_with_index(job, resume, index, config);
    if score.total < config.threshold {
        return None;
    }

    let matching_required_skills = index.matching(&job.required_skills);
    let matching_preferred_skills = index.matching(&job.preferred_skills);
    let reason = match_reason(
        job,
        resume,
        &score,
        &matching_required_skills,
        &matching_preferred_skills,
    );

    Some(Match {
        job: job.clone(),
        score,
        matching_required_skills,
        matching_preferred_skills,
        reason,
        matched_at: Utc::now(),
    })
}
