use serde::{Deserialize, Serialize};

/// Scoring weights and cut-offs shared read-only by every matching pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingConfig {
    pub threshold: f64,
    pub required_skills_weight: f64,
    pub preferred_skills_weight: f64,
    pub experience_weight: f64,
    pub experience_buffer_years: f64,
}

impl MatchingConfig {
    /// Sum of the three component weights; expected to be 100.
    pub fn weight_total(&self) -> f64 {
        self.required_skills_weight + self.preferred_skills_weight + self.experience_weight
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            required_skills_weight: 70.0,
            preferred_skills_weight: 20.0,
            experience_weight: 10.0,
            experience_buffer_years: 1.0,
        }
    }
}
