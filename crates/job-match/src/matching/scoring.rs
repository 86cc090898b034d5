use std::collections::HashSet;

use super::config::MatchingConfig;
use super::domain::{Job, MatchScore, Resume};

/// Lower-cased view of a resume's skills, built once and reused for every job
/// in a pass.
#[derive(Debug, Clone, Default)]
pub struct SkillIndex {
    normalized: HashSet<String>,
}

impl SkillIndex {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            normalized: skills
                .into_iter()
                .map(|skill| normalize(skill.as_ref()))
                .collect(),
        }
    }

    pub fn from_resume(resume: &Resume) -> Self {
        Self::new(&resume.skills)
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.normalized.contains(&normalize(skill))
    }

    /// Job skills present in the index, in the job's order and casing.
    pub fn matching(&self, job_skills: &[String]) -> Vec<String> {
        job_skills
            .iter()
            .filter(|skill| self.contains(skill))
            .cloned()
            .collect()
    }

    fn match_count(&self, job_skills: &[String]) -> usize {
        job_skills.iter().filter(|skill| self.contains(skill)).count()
    }
}

fn normalize(skill: &str) -> String {
    skill.to_lowercase()
}

/// Scores one job against one resume.
pub fn calculate_score(job: &Job, resume: &Resume, config: &MatchingConfig) -> MatchScore {
    let index = SkillIndex::from_resume(resume);
    score_with_index(job, resume, &index, config)
}

pub(crate) fn score_with_index(
    job: &Job,
    resume: &Resume,
    index: &SkillIndex,
    config: &MatchingConfig,
) -> MatchScore {
    let required = skill_component(index, &job.required_skills, config.required_skills_weight);
    let preferred = skill_component(
        index,
        &job.preferred_skills,
        config.preferred_skills_weight,
    );
    let experience = experience_component(
        resume.profile.years_of_experience,
        job.years_experience_required,
        config,
    );

    let required_skills_score = round_tenths(required);
    let preferred_skills_score = round_tenths(preferred);
    let experience_score = round_tenths(experience);

    MatchScore {
        total: round_tenths(required_skills_score + preferred_skills_score + experience_score),
        required_skills_score,
        preferred_skills_score,
        experience_score,
    }
}

// No listed skills earns nothing rather than the full weight.
fn skill_component(index: &SkillIndex, job_skills: &[String], weight: f64) -> f64 {
    if job_skills.is_empty() {
        return 0.0;
    }

    let matched = index.match_count(job_skills) as f64;
    matched / job_skills.len() as f64 * weight
}

fn experience_component(user_years: f64, required_years: f64, config: &MatchingConfig) -> f64 {
    let shortfall = required_years - user_years;
    if shortfall <= 0.0 {
        return config.experience_weight;
    }

    let buffer = config.experience_buffer_years;
    if shortfall <= buffer {
        let ratio = 1.0 - shortfall / (buffer + 1.0);
        return ratio * config.experience_weight;
    }

    0.0
}

/// Half-up rounding to one decimal place.
pub(crate) fn round_tenths(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
