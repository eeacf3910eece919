use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::criteria::JobId;
use super::pipeline::{PipelineCategory, PipelineError};
use super::profile::CandidateId;
use super::repository::{HiringRepository, PipelineStore};
use super::service::{RankingService, RankingServiceError};

/// Router exposing ranking refresh, review, and pipeline endpoints.
pub fn ranking_router<R, P>(service: Arc<RankingService<R, P>>) -> Router
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs/:job_id/ranking/refresh",
            post(refresh_handler::<R, P>),
        )
        .route("/api/v1/jobs/:job_id/ranking", get(ranking_handler::<R, P>))
        .route("/api/v1/jobs/:job_id/review", get(review_handler::<R, P>))
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id/category",
            put(category_handler::<R, P>),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id/favorite",
            put(favorite_handler::<R, P>),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id/reevaluate",
            post(reevaluate_handler::<R, P>),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id/timeline",
            get(timeline_handler::<R, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRequest {
    category: PipelineCategory,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FavoriteRequest {
    is_favorite: bool,
}

pub(crate) async fn refresh_handler<R, P>(
    State(service): State<Arc<RankingService<R, P>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    let job_id = JobId(job_id);
    let outcome = tokio::task::spawn_blocking(move || service.refresh(&job_id)).await;
    match outcome {
        Ok(Ok(summary)) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Ok(Err(error)) => error_response(error),
        Err(join_error) => internal_error(join_error.to_string()),
    }
}

pub(crate) async fn ranking_handler<R, P>(
    State(service): State<Arc<RankingService<R, P>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    match service.ranking(&JobId(job_id)) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R, P>(
    State(service): State<Arc<RankingService<R, P>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    match service.summary(&JobId(job_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn category_handler<R, P>(
    State(service): State<Arc<RankingService<R, P>>>,
    Path((job_id, candidate_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<CategoryRequest>,
) -> Response
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    match service.set_category(
        &JobId(job_id),
        &CandidateId(candidate_id),
        request.category,
    ) {
        Ok(state) => (StatusCode::OK, axum::Json(state)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn favorite_handler<R, P>(
    State(service): State<Arc<RankingService<R, P>>>,
    Path((job_id, candidate_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<FavoriteRequest>,
) -> Response
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    match service.set_favorite(
        &JobId(job_id),
        &CandidateId(candidate_id),
        request.is_favorite,
    ) {
        Ok(state) => (StatusCode::OK, axum::Json(state)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reevaluate_handler<R, P>(
    State(service): State<Arc<RankingService<R, P>>>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    let job_id = JobId(job_id);
    let candidate_id = CandidateId(candidate_id);
    let outcome =
        tokio::task::spawn_blocking(move || service.reevaluate(&job_id, &candidate_id)).await;
    match outcome {
        Ok(Ok(state)) => (StatusCode::OK, axum::Json(state)).into_response(),
        Ok(Err(error)) => error_response(error),
        Err(join_error) => internal_error(join_error.to_string()),
    }
}

pub(crate) async fn timeline_handler<R, P>(
    State(service): State<Arc<RankingService<R, P>>>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    match service.timeline(&JobId(job_id), &CandidateId(candidate_id)) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: RankingServiceError) -> Response {
    let status = match &error {
        RankingServiceError::UnknownJob(_) | RankingServiceError::NotRanked(_) => {
            StatusCode::NOT_FOUND
        }
        RankingServiceError::Pipeline(PipelineError::UnknownCandidate { .. }) => {
            StatusCode::NOT_FOUND
        }
        RankingServiceError::NoCandidates(_) => StatusCode::BAD_REQUEST,
        RankingServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RankingServiceError::Pipeline(PipelineError::InvalidTransition { .. }) => {
            StatusCode::CONFLICT
        }
        RankingServiceError::Pipeline(PipelineError::Store(_))
        | RankingServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn internal_error(message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
