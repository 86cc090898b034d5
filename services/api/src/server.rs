use crate::cli::ServeArgs;
use crate::infra::{file_pipeline, log_config_warnings, AppState, LoggingNotifier};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_match::config::AppConfig;
use job_match::error::AppError;
use job_match::matching::MatchEngine;
use job_match::telemetry;
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
    log_config_warnings(&config);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let matcher = Arc::new(MatchEngine::new(config.matching.clone()));
    let pipeline = file_pipeline(&config.data, matcher.clone(), Arc::new(LoggingNotifier));
    let threshold = matcher.config().threshold;

    let app = with_service_routes(matcher, pipeline)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        threshold,
        jobs_path = %config.data.jobs_path.display(),
        "job match service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
