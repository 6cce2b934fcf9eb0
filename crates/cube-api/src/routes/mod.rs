//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 서비스 정보
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/portfolio` - 포트폴리오 성과 지표, 자산 곡선, 포지션
//! - `/api/charts` - 대시보드 차트 데이터

pub mod charts;
pub mod health;
pub mod portfolio;
pub mod root;

pub use charts::{charts_router, DashboardResponse, VolatilityQuery};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use portfolio::{
    portfolio_router, EquityCurveResponse, MetricsRequest, MetricsResponse,
    PortfolioMetricsResponse, PositionResponse, PositionsResponse,
};
pub use root::{service_info, ServiceInfo};

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(service_info))
        .nest("/health", health_router())
        .nest("/api/portfolio", portfolio_router())
        .nest("/api/charts", charts_router())
}
