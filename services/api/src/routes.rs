use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use recruit_ai::error::AppError;
use recruit_ai::workflows::hiring::{
    ranking_router, CandidateProfile, EvaluationEngine, EvaluationResult, HiringRepository,
    JobCriteria, JobId, PipelineStore, RankingService,
};
use recruit_ai::workflows::import::CandidateCsvImporter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    pub(crate) job_id: JobId,
    #[serde(default)]
    pub(crate) criteria: JobCriteria,
    #[serde(default)]
    pub(crate) candidates: Vec<CandidateProfile>,
    #[serde(default)]
    pub(crate) candidates_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateResponse {
    pub(crate) job_id: JobId,
    pub(crate) candidate_source: CandidateSource,
    pub(crate) skipped_lines: Vec<u64>,
    pub(crate) results: Vec<EvaluationResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CandidateSource {
    Inline,
    Csv,
    /// Inline profiles plus a CSV export in the same request.
    Mixed,
}

pub(crate) fn with_ranking_routes<R, P>(service: Arc<RankingService<R, P>>) -> axum::Router
where
    R: HiringRepository + 'static,
    P: PipelineStore + 'static,
{
    ranking_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/evaluate", axum::routing::post(evaluate_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless one-shot evaluation: nothing is persisted and no pipeline state is touched.
/// Parsing and scoring run on the blocking pool.
pub(crate) async fn evaluate_endpoint(
    Extension(engine): Extension<Arc<EvaluationEngine>>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let response = tokio::task::spawn_blocking(move || evaluate_batch(&engine, payload)).await??;
    Ok(Json(response))
}

fn evaluate_batch(
    engine: &EvaluationEngine,
    payload: EvaluateRequest,
) -> Result<EvaluateResponse, AppError> {
    let EvaluateRequest {
        job_id,
        criteria,
        mut candidates,
        candidates_csv,
    } = payload;

    let (candidate_source, skipped_lines) = match candidates_csv {
        Some(csv) => {
            let source = if candidates.is_empty() {
                CandidateSource::Csv
            } else {
                CandidateSource::Mixed
            };
            let import = CandidateCsvImporter::from_reader(Cursor::new(csv.into_bytes()))?;
            candidates.extend(import.profiles);
            (source, import.skipped_lines)
        }
        None => (CandidateSource::Inline, Vec::new()),
    };

    let results = engine.run(&job_id, &criteria, &candidates)?;

    Ok(EvaluateResponse {
        job_id,
        candidate_source,
        skipped_lines,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryHiringRepository;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use recruit_ai::workflows::hiring::{InMemoryPipelineStore, ScoringConfig};
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn engine() -> Arc<EvaluationEngine> {
        Arc::new(EvaluationEngine::new(ScoringConfig::default()).expect("valid config"))
    }

    fn criteria() -> JobCriteria {
        serde_json::from_value(json!({
            "required_skills": [{ "name": "Go", "priority": "Critical" }],
            "experience_min_years": 2,
            "experience_min_years_auto_reject": true
        }))
        .expect("criteria deserializes")
    }

    fn app(ready: bool) -> axum::Router {
        let service = Arc::new(
            RankingService::new(
                Arc::new(InMemoryHiringRepository::default()),
                Arc::new(InMemoryPipelineStore::default()),
                ScoringConfig::default(),
            )
            .expect("default scoring is valid"),
        );
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_ranking_routes(service)
            .layer(Extension(engine()))
            .layer(Extension(state))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    #[tokio::test]
    async fn evaluate_endpoint_ranks_inline_candidates() {
        let request = EvaluateRequest {
            job_id: JobId("job-go".into()),
            criteria: criteria(),
            candidates: serde_json::from_value(json!([
                { "id": "c-1", "name": "Hamid", "experience_years": 1 },
                { "id": "c-2", "name": "Sima", "experience_years": 4, "skills": ["go"] }
            ]))
            .expect("candidates deserialize"),
            candidates_csv: None,
        };

        let Json(body) = evaluate_endpoint(Extension(engine()), Json(request))
            .await
            .expect("evaluation succeeds");

        assert_eq!(body.candidate_source, CandidateSource::Inline);
        assert_eq!(body.results.len(), 2);
        assert_eq!(body.results[0].candidate_name, "Sima");
        assert_eq!(body.results[0].rank(), Some(1));
        assert!(body.results[1].auto_rejected());
    }

    #[tokio::test]
    async fn evaluate_endpoint_accepts_csv_exports() {
        let request = EvaluateRequest {
            job_id: JobId("job-go".into()),
            criteria: criteria(),
            candidates: Vec::new(),
            candidates_csv: Some(
                "id,name,experience_years,skills\nc-7,Farid,3,go;grpc\n,No Id,5,\n".to_string(),
            ),
        };

        let Json(body) = evaluate_endpoint(Extension(engine()), Json(request))
            .await
            .expect("evaluation succeeds");

        assert_eq!(body.candidate_source, CandidateSource::Csv);
        assert_eq!(body.skipped_lines, vec![3]);
        assert_eq!(body.results.len(), 1);
        assert_eq!(body.results[0].rank(), Some(1));
    }

    #[tokio::test]
    async fn evaluate_endpoint_reports_mixed_sources() {
        let request = EvaluateRequest {
            job_id: JobId("job-go".into()),
            criteria: criteria(),
            candidates: serde_json::from_value(json!([
                { "id": "c-2", "name": "Sima", "experience_years": 4, "skills": ["go"] }
            ]))
            .expect("candidates deserialize"),
            candidates_csv: Some("id,name,experience_years,skills\nc-7,Farid,3,go\n".to_string()),
        };

        let Json(body) = evaluate_endpoint(Extension(engine()), Json(request))
            .await
            .expect("evaluation succeeds");

        assert_eq!(body.candidate_source, CandidateSource::Mixed);
        assert_eq!(body.results.len(), 2);
        assert!(body.results.iter().all(|result| result.rank().is_some()));
    }

    #[tokio::test]
    async fn evaluate_route_runs_through_the_router() {
        let payload = json!({
            "job_id": "job-go",
            "criteria": {
                "experience_min_years": 2,
                "experience_min_years_auto_reject": true
            },
            "candidates": [
                { "id": "c-1", "name": "Hamid", "experience_years": 1 },
                { "id": "c-3", "name": "Nima" }
            ]
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/evaluate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds");

        let response = app(true).oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["candidate_source"], "inline");
        assert_eq!(body["results"][0]["candidate_name"], "Nima");
        assert_eq!(body["results"][1]["disposition"]["status"], "auto_rejected");
    }

    #[tokio::test]
    async fn evaluate_endpoint_rejects_duplicate_candidates() {
        let request = EvaluateRequest {
            job_id: JobId("job-go".into()),
            criteria: criteria(),
            candidates: vec![
                CandidateProfile::new("c-1", "Hamid"),
                CandidateProfile::new("c-1", "Hamid"),
            ],
            candidates_csv: None,
        };

        let response = evaluate_endpoint(Extension(engine()), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = app(false)
            .oneshot(get("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(get("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_ranking_routes_share_one_router() {
        let router = app(true);

        let response = router
            .clone()
            .oneshot(get("/health"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(get("/api/v1/jobs/job-unknown/ranking"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
