//! 포트폴리오 성과 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /api/portfolio/metrics` - 보유 포트폴리오의 성과 지표
//! - `POST /api/portfolio/metrics` - 요청 본문의 자산 곡선으로 성과 지표 계산
//! - `GET /api/portfolio/equity-curve` - 포트폴리오/벤치마크 자산 곡선
//! - `GET /api/portfolio/positions` - 보유 포지션 목록
//!
//! 응답의 지표 값은 모두 소수점 2자리로 반올림됩니다.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use cube_analytics::{
    equity_comparison, portfolio_metrics_with_config, round_to, EquityComparisonPoint,
    MetricsConfig, PortfolioMetrics, Position,
};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{json_rejection, validation_error, ApiErrorResponse, ApiResult};
use crate::metrics::record_metrics_computation;
use crate::state::AppState;

/// 요청당 허용되는 최대 자산 곡선 길이
pub const MAX_CURVE_POINTS: usize = 100_000;

/// 표시용 반올림 자릿수
const DISPLAY_DECIMALS: u32 = 2;

// ==================== 응답 타입 ====================

/// 보유 포트폴리오 성과 응답.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PortfolioMetricsResponse {
    /// 최신 평가액
    pub net_liquidity: f64,
    /// 전일 대비 손익
    pub daily_pnl: f64,
    /// 전일 대비 손익률 (%)
    pub daily_pnl_percent: f64,
    /// 샤프 비율
    pub sharpe_ratio: f64,
    /// 소르티노 비율
    pub sortino_ratio: f64,
    /// 최대 낙폭 (%)
    pub max_drawdown: f64,
    /// 연율화 변동성 (%)
    pub volatility: f64,
    /// 벤치마크 대비 베타
    pub beta: f64,
    /// 총 수익
    pub total_return: f64,
    /// 총 수익률 (%)
    pub total_return_percent: f64,
}

/// 성과 지표 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetricsResponse {
    /// 샤프 비율
    pub sharpe_ratio: f64,
    /// 소르티노 비율
    pub sortino_ratio: f64,
    /// 최대 낙폭 (%)
    pub max_drawdown: f64,
    /// 연율화 변동성 (%)
    pub volatility: f64,
    /// 벤치마크 대비 베타 (벤치마크가 없으면 1.0)
    pub beta: f64,
    /// 총 수익
    pub total_return: f64,
    /// 총 수익률 (%)
    pub total_return_percent: f64,
}

impl From<PortfolioMetrics> for MetricsResponse {
    fn from(m: PortfolioMetrics) -> Self {
        Self {
            sharpe_ratio: m.sharpe_ratio,
            sortino_ratio: m.sortino_ratio,
            max_drawdown: m.max_drawdown,
            volatility: m.volatility,
            beta: m.beta,
            total_return: m.total_return,
            total_return_percent: m.total_return_percent,
        }
    }
}

/// 자산 곡선 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EquityCurveResponse {
    /// 날짜별 포트폴리오/벤치마크 값
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<EquityComparisonPoint>,
    /// 데이터 포인트 수
    pub count: usize,
}

/// 보유 포지션.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PositionResponse {
    /// 종목 코드
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 보유 수량
    pub shares: f64,
    /// 평균 매입 단가
    pub cost_basis: f64,
    /// 섹터
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl From<&Position> for PositionResponse {
    fn from(p: &Position) -> Self {
        Self {
            symbol: p.symbol.clone(),
            name: p.name.clone(),
            shares: p.shares.to_f64().unwrap_or_default(),
            cost_basis: p.cost_basis.to_f64().unwrap_or_default(),
            sector: p.sector.clone(),
        }
    }
}

/// 포지션 목록 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PositionsResponse {
    /// 포지션 목록
    pub positions: Vec<PositionResponse>,
    /// 포지션 수
    pub count: usize,
}

// ==================== 요청 타입 ====================

/// 성과 지표 계산 요청.
///
/// 점이 1개인 자산 곡선은 유효하며 중립 지표를 반환합니다.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct MetricsRequest {
    /// 시간순 자산 곡선
    #[validate(
        length(min = 1, max = 100000, message = "equity_curve는 1-100000개의 값이어야 합니다"),
        custom(function = "validate_finite_values")
    )]
    pub equity_curve: Vec<f64>,

    /// 벤치마크 곡선 (자산 곡선과 길이가 같을 때만 베타 계산에 사용)
    #[validate(
        length(max = 100000, message = "benchmark_curve는 100000개 이하여야 합니다"),
        custom(function = "validate_finite_values")
    )]
    pub benchmark_curve: Option<Vec<f64>>,

    /// 연간 무위험 이자율 (기본: 서버 설정)
    #[validate(range(min = -1.0, max = 1.0, message = "risk_free_rate는 -1.0 ~ 1.0이어야 합니다"))]
    pub risk_free_rate: Option<f64>,

    /// 연간 기간 수 (기본: 서버 설정)
    #[validate(range(min = 1, max = 366, message = "periods_per_year는 1-366이어야 합니다"))]
    pub periods_per_year: Option<u32>,
}

impl MetricsRequest {
    /// 요청 값으로 서버 기본 설정을 덮어씁니다.
    fn metrics_config(&self, defaults: &MetricsConfig) -> MetricsConfig {
        MetricsConfig {
            risk_free_rate: self.risk_free_rate.unwrap_or(defaults.risk_free_rate),
            periods_per_year: self.periods_per_year.unwrap_or(defaults.periods_per_year),
        }
    }
}

/// 모든 값이 유한한 숫자인지 검증
#[allow(clippy::ptr_arg)]
fn validate_finite_values(values: &Vec<f64>) -> Result<(), ValidationError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ValidationError::new("non_finite_value")
            .with_message("곡선에 유한하지 않은 값이 있습니다".into()))
    }
}

// ==================== 핸들러 ====================

/// 보유 포트폴리오 성과 지표.
///
/// 벤치마크 대비 베타를 포함하며, 값은 소수점 2자리로 반올림됩니다.
#[utoipa::path(
    get,
    path = "/api/portfolio/metrics",
    responses((status = 200, description = "성과 지표", body = PortfolioMetricsResponse)),
    tag = "portfolio"
)]
pub async fn get_portfolio_metrics(
    State(state): State<Arc<AppState>>,
) -> Json<PortfolioMetricsResponse> {
    let portfolio = &state.portfolio;

    let metrics = portfolio_metrics_with_config(
        &portfolio.equity_curve,
        Some(&portfolio.benchmark_curve),
        &state.metrics_config,
    )
    .rounded(DISPLAY_DECIMALS);
    record_metrics_computation("portfolio", portfolio.equity_curve.len());

    let (daily_pnl, daily_pnl_percent) = portfolio.daily_pnl();

    Json(PortfolioMetricsResponse {
        net_liquidity: round_to(portfolio.net_liquidity(), DISPLAY_DECIMALS),
        daily_pnl: round_to(daily_pnl, DISPLAY_DECIMALS),
        daily_pnl_percent: round_to(daily_pnl_percent, DISPLAY_DECIMALS),
        sharpe_ratio: metrics.sharpe_ratio,
        sortino_ratio: metrics.sortino_ratio,
        max_drawdown: metrics.max_drawdown,
        volatility: metrics.volatility,
        beta: metrics.beta,
        total_return: metrics.total_return,
        total_return_percent: metrics.total_return_percent,
    })
}

/// 요청 본문의 자산 곡선으로 성과 지표 계산.
#[utoipa::path(
    post,
    path = "/api/portfolio/metrics",
    request_body = MetricsRequest,
    responses(
        (status = 200, description = "성과 지표", body = MetricsResponse),
        (status = 400, description = "입력 검증 실패", body = ApiErrorResponse)
    ),
    tag = "portfolio"
)]
pub async fn compute_metrics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MetricsRequest>, JsonRejection>,
) -> ApiResult<Json<MetricsResponse>> {
    let Json(request) = payload.map_err(json_rejection)?;
    request.validate().map_err(|e| validation_error(&e))?;

    let config = request.metrics_config(&state.metrics_config);
    debug!(
        points = request.equity_curve.len(),
        has_benchmark = request.benchmark_curve.is_some(),
        risk_free_rate = config.risk_free_rate,
        periods_per_year = config.periods_per_year,
        "Computing metrics for request curve"
    );

    let metrics = portfolio_metrics_with_config(
        &request.equity_curve,
        request.benchmark_curve.as_deref(),
        &config,
    );
    record_metrics_computation("request", request.equity_curve.len());

    Ok(Json(metrics.rounded(DISPLAY_DECIMALS).into()))
}

/// 포트폴리오/벤치마크 자산 곡선.
#[utoipa::path(
    get,
    path = "/api/portfolio/equity-curve",
    responses((status = 200, description = "자산 곡선", body = EquityCurveResponse)),
    tag = "portfolio"
)]
pub async fn get_equity_curve(State(state): State<Arc<AppState>>) -> Json<EquityCurveResponse> {
    let portfolio = &state.portfolio;
    let data = equity_comparison(
        portfolio.start_date,
        &portfolio.equity_curve,
        &portfolio.benchmark_curve,
    );

    Json(EquityCurveResponse {
        count: data.len(),
        data,
    })
}

/// 보유 포지션 목록.
#[utoipa::path(
    get,
    path = "/api/portfolio/positions",
    responses((status = 200, description = "보유 포지션", body = PositionsResponse)),
    tag = "portfolio"
)]
pub async fn get_positions(State(state): State<Arc<AppState>>) -> Json<PositionsResponse> {
    let positions: Vec<PositionResponse> = state
        .portfolio
        .positions
        .iter()
        .map(PositionResponse::from)
        .collect();

    Json(PositionsResponse {
        count: positions.len(),
        positions,
    })
}

/// 포트폴리오 라우터 생성.
pub fn portfolio_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/metrics", get(get_portfolio_metrics).post(compute_metrics))
        .route("/equity-curve", get(get_equity_curve))
        .route("/positions", get(get_positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;

    fn request(curve: Vec<f64>) -> MetricsRequest {
        MetricsRequest {
            equity_curve: curve,
            benchmark_curve: None,
            risk_free_rate: None,
            periods_per_year: None,
        }
    }

    #[test]
    fn test_request_validation() {
        assert!(request(vec![100.0]).validate().is_ok());
        assert!(request(vec![]).validate().is_err());
        assert!(request(vec![100.0, f64::NAN]).validate().is_err());
        assert!(request(vec![100.0, f64::INFINITY]).validate().is_err());
        assert!(request(vec![1.0; MAX_CURVE_POINTS + 1]).validate().is_err());

        let mut bad_ppy = request(vec![100.0, 101.0]);
        bad_ppy.periods_per_year = Some(0);
        assert!(bad_ppy.validate().is_err());

        let mut bad_rf = request(vec![100.0, 101.0]);
        bad_rf.risk_free_rate = Some(1.5);
        assert!(bad_rf.validate().is_err());

        let mut bad_benchmark = request(vec![100.0, 101.0]);
        bad_benchmark.benchmark_curve = Some(vec![1.0, f64::NEG_INFINITY]);
        assert!(bad_benchmark.validate().is_err());
    }

    #[test]
    fn test_request_config_overrides() {
        let defaults = MetricsConfig::default();

        let mut req = request(vec![100.0]);
        assert_eq!(req.metrics_config(&defaults), defaults);

        req.risk_free_rate = Some(0.0);
        req.periods_per_year = Some(365);
        assert_eq!(req.metrics_config(&defaults), MetricsConfig::new(0.0, 365));
    }

    #[tokio::test]
    async fn test_get_portfolio_metrics_rounded() {
        let state = Arc::new(create_test_state());
        let Json(response) = get_portfolio_metrics(State(state.clone())).await;

        assert_eq!(response.net_liquidity, *state.portfolio.equity_curve.last().unwrap());
        assert_eq!(response.total_return, 53_872.0);
        assert_eq!(response.sharpe_ratio, round_to(response.sharpe_ratio, 2));
        assert_eq!(response.beta, round_to(response.beta, 2));
        assert_ne!(response.beta, 1.0);
    }

    #[tokio::test]
    async fn test_get_positions() {
        let state = Arc::new(create_test_state());
        let Json(response) = get_positions(State(state)).await;

        assert_eq!(response.count, 6);
        assert_eq!(response.positions[1].symbol, "MSFT");
        assert_eq!(response.positions[1].cost_basis, 310.25);
        assert_eq!(response.positions[1].shares, 80.0);
    }
}
