use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::domain::{Job, Match, MatchScore, Resume};
use super::engine::JobMatcher;

/// Router builder exposing the matcher over HTTP.
pub fn match_router<M>(matcher: Arc<M>) -> Router
where
    M: JobMatcher + 'static,
{
    Router::new()
        .route("/api/v1/matches", post(matches_handler::<M>))
        .route("/api/v1/score", post(score_handler::<M>))
        .with_state(matcher)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchRequest {
    pub jobs: Vec<Job>,
    pub resume: Resume,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub jobs_checked: usize,
    pub matches_found: usize,
    pub matches: Vec<Match>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub job: Job,
    pub resume: Resume,
}

pub(crate) async fn matches_handler<M>(
    State(matcher): State<Arc<M>>,
    Json(request): Json<MatchRequest>,
) -> Json<MatchResponse>
where
    M: JobMatcher + 'static,
{
    let matches = matcher.find_matches(&request.jobs, &request.resume);
    Json(MatchResponse {
        jobs_checked: request.jobs.len(),
        matches_found: matches.len(),
        matches,
    })
}

pub(crate) async fn score_handler<M>(
    State(matcher): State<Arc<M>>,
    Json(request): Json<ScoreRequest>,
) -> Json<MatchScore>
where
    M: JobMatcher + 'static,
{
    Json(matcher.calculate_score(&request.job, &request.resume))
}
