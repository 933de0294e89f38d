use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryMetricSource};
use crate::routes::with_performance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mourne_ops::config::AppConfig;
use mourne_ops::error::AppError;
use mourne_ops::performance::{MetricTable, PerformanceService, PerformanceState};
use mourne_ops::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source =
        InMemoryMetricSource::from_exports(args.seed_shifts.as_deref(), args.seed_audits.as_deref())?;
    info!(
        shifts = source.len(MetricTable::ShiftMetrics),
        audits = source.len(MetricTable::OsaAudits),
        stores = config.scoring.stores.len(),
        "metric store initialised"
    );

    let state = Arc::new(PerformanceState {
        service: PerformanceService::new(Arc::new(source), config.scoring.stores.clone()),
        default_window: config.scoring.default_window,
    });

    let app = with_performance_routes(state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.as_str(),
        %addr,
        window = %config.scoring.default_window,
        "performance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
