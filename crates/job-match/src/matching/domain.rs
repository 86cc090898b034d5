use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single posting as delivered by a job source. Skill strings keep the
/// casing the employer used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub posted_at: DateTime<Utc>,
    pub years_experience_required: f64,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub location: String,
    pub salary: String,
}

/// Contact details and seniority of the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub years_of_experience: f64,
}

/// Search preferences attached to a resume.
///
/// Only `max_years_required` is enforced while matching; the other two fields
/// are carried for callers but do not filter anything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_years_required: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_years_required: Option<f64>,
    #[serde(default)]
    pub min_skill_match: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub user_id: UserId,
    pub profile: UserProfile,
    pub skills: Vec<String>,
    #[serde(default)]
    pub preferences: UserPreferences,
}

/// Weighted breakdown of how well one job fits one resume.
///
/// Each component is rounded to one decimal on its own; `total` is the
/// rounded sum of the rounded components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub total: f64,
    pub required_skills_score: f64,
    pub preferred_skills_score: f64,
    pub experience_score: f64,
}

/// A job that passed the preference filter and cleared the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub job: Job,
    pub score: MatchScore,
    pub matching_required_skills: Vec<String>,
    pub matching_preferred_skills: Vec<String>,
    pub reason: String,
    pub matched_at: DateTime<Utc>,
}
