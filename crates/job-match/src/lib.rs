//! Weighted job matching: score postings against a resume, keep the ones that
//! clear the threshold, and hand them to a notifier.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
pub mod workflows;
