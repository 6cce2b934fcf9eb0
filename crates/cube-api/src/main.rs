//! Cube Trade API 서버.
//!
//! 설정을 로드하고 Axum 기반 REST API 서버를 시작합니다.
//! 성과 지표, 대시보드 차트, 헬스 체크, Prometheus 메트릭 엔드포인트를 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use cube_api::metrics::setup_metrics_recorder;
use cube_api::middleware::metrics_layer;
use cube_api::openapi::{openapi_router, OPENAPI_JSON_PATH};
use cube_api::routes::create_api_router;
use cube_api::state::AppState;
use cube_core::config::{AppConfig, CorsConfig};
use cube_core::logging::{init_logging, LogConfig};

/// CORS 레이어 생성.
///
/// 설정된 origin만 허용합니다. 목록이 비어 있거나 유효한 origin이 없으면
/// 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        warn!("No valid CORS origins configured, allowing any origin (development mode)");
        AllowOrigin::any()
    } else {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // preflight 요청 캐시 시간
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    config: &AppConfig,
) -> Router {
    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .merge(openapi_router())
        // 메트릭 미들웨어 (모든 요청에 적용)
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_secs),
        ))
        .layer(cors_layer(&config.cors))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default()?;

    init_logging(LogConfig::from(&config.logging))?;

    info!("Starting Cube Trade API server...");

    // Prometheus 메트릭 레코더 설정
    let metrics_handle = setup_metrics_recorder().map_err(|e| {
        error!(error = %e, "Prometheus 레코더 설치 실패");
        e
    })?;
    info!("Prometheus metrics recorder initialized");

    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. CUBE__SERVER__HOST, CUBE__SERVER__PORT 환경변수를 확인하세요."
        );
        e
    })?;

    let state = Arc::new(AppState::from_config(&config));
    info!(
        version = %state.version,
        equity_points = state.portfolio.equity_curve.len(),
        positions = state.portfolio.positions.len(),
        risk_free_rate = state.metrics_config.risk_free_rate,
        periods_per_year = state.metrics_config.periods_per_year,
        "Application state initialized"
    );

    let app = create_router(state, metrics_handle, &config);

    info!(%addr, "API server listening");
    info!("OpenAPI spec at http://{}{}", addr, OPENAPI_JSON_PATH);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
