use std::fmt;

use super::domain::{Job, MatchScore, Resume};

const CLAUSE_SEPARATOR: &str = " • ";

/// Quality band derived from a match total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBand {
    Excellent,
    Strong,
    Good,
}

impl MatchBand {
    pub fn from_total(total: f64) -> Self {
        if total >= 80.0 {
            Self::Excellent
        } else if total >= 65.0 {
            Self::Strong
        } else {
            Self::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchBand::Excellent => "Excellent match",
            MatchBand::Strong => "Strong match",
            MatchBand::Good => "Good match",
        }
    }
}

impl fmt::Display for MatchBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn match_reason(
    job: &Job,
    resume: &Resume,
    score: &MatchScore,
    matching_required: &[String],
    matching_preferred: &[String],
) -> String {
    let mut clauses = vec![MatchBand::from_total(score.total).label().to_string()];

    if matching_required.len() == job.required_skills.len() {
        clauses.push(format!(
            "Perfect match - all {} required skills present",
            matching_required.len()
        ));
    } else {
        clauses.push(format!(
            "Strong skill match ({}/{} required skills)",
            matching_required.len(),
            job.required_skills.len()
        ));
    }

    if !matching_preferred.is_empty() {
        clauses.push(format!("{} preferred skills", matching_preferred.len()));
    }

    if resume.profile.years_of_experience >= job.years_experience_required {
        clauses.push(format!(
            "Experience requirement met ({}+ years)",
            job.years_experience_required
        ));
    } else {
        clauses.push(format!(
            "Close to experience requirement (need {} years)",
            job.years_experience_required
        ));
    }

    clauses.join(CLAUSE_SEPARATOR)
}
