//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3.0 스펙을 생성하고 `/api-docs/openapi.json`에서 제공합니다.
//!
//! 새 엔드포인트를 문서에 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, EquityCurveResponse, HealthResponse, MetricsRequest,
    MetricsResponse, PortfolioMetricsResponse, PositionResponse, PositionsResponse, ServiceInfo,
};

/// OpenAPI JSON 경로
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Cube Trade API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cube Trade API",
        description = "포트폴리오 성과 지표와 대시보드 차트 데이터를 제공하는 REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    tags(
        (name = "service", description = "서비스 정보"),
        (name = "health", description = "헬스 체크"),
        (name = "portfolio", description = "포트폴리오 성과 지표"),
    ),
    paths(
        crate::routes::root::service_info,
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::portfolio::get_portfolio_metrics,
        crate::routes::portfolio::compute_metrics,
        crate::routes::portfolio::get_equity_curve,
        crate::routes::portfolio::get_positions,
    ),
    components(schemas(
        ApiErrorResponse,
        ServiceInfo,
        HealthResponse,
        ComponentHealth,
        ComponentStatus,
        PortfolioMetricsResponse,
        MetricsRequest,
        MetricsResponse,
        EquityCurveResponse,
        PositionResponse,
        PositionsResponse,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// OpenAPI JSON 라우터 생성.
pub fn openapi_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(OPENAPI_JSON_PATH, get(openapi_json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Cube Trade API"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/portfolio/metrics"));
        assert!(json.contains("/api/portfolio/positions"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("PortfolioMetricsResponse"));
        assert!(json.contains("MetricsRequest"));
        assert!(json.contains("ApiErrorResponse"));
    }

    #[test]
    fn test_openapi_router_creates() {
        let _router: Router<()> = openapi_router();
    }
}
