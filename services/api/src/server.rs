use crate::cli::ServeArgs;
use crate::infra::{load_batches, AppState, InMemoryHiringRepository};
use crate::routes::with_ranking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_ai::config::AppConfig;
use recruit_ai::error::AppError;
use recruit_ai::telemetry;
use recruit_ai::workflows::hiring::{InMemoryPipelineStore, RankingService, RankingServiceError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let batches = match args.seed.take() {
        Some(path) => load_batches(&path)?,
        None => Vec::new(),
    };
    let repository =
        Arc::new(InMemoryHiringRepository::seeded(batches).map_err(RankingServiceError::from)?);
    let seeded_jobs = repository
        .job_count()
        .map_err(RankingServiceError::from)?;
    let pipeline = Arc::new(InMemoryPipelineStore::default());
    let ranking_service = Arc::new(RankingService::new(
        repository,
        pipeline,
        config.scoring.clone(),
    )?);
    let engine = ranking_service.engine();

    let app = with_ranking_routes(ranking_service)
        .layer(Extension(engine))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, seeded_jobs, "candidate ranking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
