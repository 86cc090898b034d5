//! Weighted scoring of job postings against a resume.
//!
//! Everything in this module is pure: no I/O, no logging, no shared mutable
//! state. The job-check workflow wraps it with loading and delivery.

mod config;
pub mod domain;
mod engine;
mod reason;
pub mod router;
mod scoring;

#[cfg(test)]
mod tests;

pub use config::MatchingConfig;
pub use domain::{Job, JobId, Match, MatchScore, Resume, UserId, UserPreferences, UserProfile};
pub use engine::{find_matches, JobMatcher, MatchEngine};
pub use reason::MatchBand;
pub use router::match_router;
pub use scoring::{calculate_score, SkillIndex};
