use chrono::{TimeZone, Utc};

use crate::matching::domain::{Job, JobId, Resume, UserId, UserPreferences, UserProfile};
use crate::matching::{MatchEngine, MatchingConfig};

/// Mid-level developer used throughout the matching tests.
pub(super) fn resume() -> Resume {
    Resume {
        user_id: UserId("test-user-123".to_string()),
        profile: UserProfile {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            years_of_experience: 3.0,
        },
        skills: skills(&["React", "TypeScript", "Node.js", "PostgreSQL", "Git"]),
        preferences: UserPreferences {
            min_years_required: Some(0.0),
            max_years_required: Some(5.0),
            min_skill_match: 2,
        },
    }
}

pub(super) fn job(id: &str, required: &[&str], preferred: &[&str], years: f64) -> Job {
    Job {
        id: JobId(id.to_string()),
        title: format!("Role {id}"),
        company: "TechCorp".to_string(),
        posted_at: Utc
            .with_ymd_and_hms(2025, 11, 24, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
        years_experience_required: years,
        required_skills: skills(required),
        preferred_skills: skills(preferred),
        location: "Remote".to_string(),
        salary: "$90k-$110k".to_string(),
    }
}

pub(super) fn skills(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn matching_config() -> MatchingConfig {
    MatchingConfig::default()
}

pub(super) fn engine() -> MatchEngine {
    MatchEngine::new(matching_config())
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Lands on exactly 50.0 with the default weights: 2/4 required (35),
/// 1/2 preferred (10), one year short (5).
pub(super) fn threshold_job() -> Job {
    job(
        "job-threshold",
        &["React", "TypeScript", "AWS", "Kubernetes"],
        &["PostgreSQL", "Docker"],
        4.0,
    )
}
