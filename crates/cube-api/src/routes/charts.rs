//! 대시보드 차트 데이터 endpoint.
//!
//! 프론트엔드 차트 라이브러리가 그대로 그릴 수 있는 데이터 시리즈를 반환합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/charts/equity-curve` - 포트폴리오 vs 벤치마크
//! - `GET /api/charts/drawdown` - 낙폭 차트
//! - `GET /api/charts/returns-distribution` - 일간 수익률 히스토그램
//! - `GET /api/charts/sector-allocation` - 섹터 비중
//! - `GET /api/charts/volatility?window=20` - 롤링 변동성
//! - `GET /api/charts/correlation` - 종목 상관행렬
//! - `GET /api/charts/dashboard` - 메인 대시보드용 묶음

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use cube_analytics::{
    correlation_matrix, dated_series, drawdown_series, equity_comparison, max_drawdown, round_to,
    returns_histogram, rolling_volatility, sector_allocation, ChartPoint, CorrelationMatrix,
    EquityComparisonPoint, ReturnsHistogram, DEFAULT_HISTOGRAM_BINS, DEFAULT_VOLATILITY_WINDOW,
};
use cube_core::{CubeError, CubeResult};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{cube_error, ApiResult};
use crate::state::{AppState, PortfolioData};

/// 롤링 변동성 윈도우 허용 범위 (거래일)
const MIN_WINDOW: usize = 2;
const MAX_WINDOW: usize = 252;

// ==================== 응답 타입 ====================

/// 자산 곡선 비교 차트.
#[derive(Debug, Serialize, Deserialize)]
pub struct EquityChartResponse {
    pub title: String,
    pub points: Vec<EquityComparisonPoint>,
}

/// 낙폭 차트.
#[derive(Debug, Serialize, Deserialize)]
pub struct DrawdownChartResponse {
    pub title: String,
    /// 날짜별 낙폭 (%)
    pub points: Vec<ChartPoint>,
    /// 최대 낙폭 (%)
    pub max_drawdown: f64,
}

/// 수익률 분포 차트.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnsDistributionResponse {
    pub title: String,
    /// 수익률이 2개 미만이면 null
    pub histogram: Option<ReturnsHistogram>,
}

/// 섹터 비중 한 조각.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectorSliceResponse {
    pub sector: String,
    /// 합계 매입 금액
    pub value: f64,
    /// 비중 (%)
    pub weight_pct: f64,
}

/// 섹터 비중 차트.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectorAllocationResponse {
    pub title: String,
    pub slices: Vec<SectorSliceResponse>,
}

/// 롤링 변동성 차트.
#[derive(Debug, Serialize, Deserialize)]
pub struct VolatilityChartResponse {
    pub title: String,
    pub window: usize,
    /// 첫 값의 날짜 (수익률 시계열 시작일)
    pub start_date: NaiveDate,
    /// 연율화 변동성 (%). 윈도우가 채워지기 전 구간은 null
    pub values: Vec<Option<f64>>,
}

/// 상관행렬 히트맵.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorrelationChartResponse {
    pub title: String,
    /// 종목이 2개 미만이면 null
    pub correlation: Option<CorrelationMatrix>,
}

/// 대시보드 차트 묶음.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub equity_curve: EquityChartResponse,
    pub drawdown: DrawdownChartResponse,
    pub sector_allocation: SectorAllocationResponse,
    pub returns_distribution: ReturnsDistributionResponse,
}

/// 롤링 변동성 쿼리.
#[derive(Debug, Deserialize)]
pub struct VolatilityQuery {
    /// 롤링 윈도우 (기본 20)
    pub window: Option<usize>,
}

// ==================== 차트 빌더 ====================

fn equity_chart(portfolio: &PortfolioData) -> EquityChartResponse {
    EquityChartResponse {
        title: "Portfolio vs Benchmark Performance".to_string(),
        points: equity_comparison(
            portfolio.start_date,
            &portfolio.equity_curve,
            &portfolio.benchmark_curve,
        ),
    }
}

fn drawdown_chart(portfolio: &PortfolioData) -> DrawdownChartResponse {
    let drawdown: Vec<f64> = drawdown_series(&portfolio.equity_curve)
        .into_iter()
        .map(|d| round_to(d, 4))
        .collect();

    DrawdownChartResponse {
        title: "Portfolio Drawdown Analysis".to_string(),
        points: dated_series(portfolio.start_date, &drawdown),
        max_drawdown: round_to(max_drawdown(&portfolio.equity_curve), 2),
    }
}

fn returns_distribution_chart(portfolio: &PortfolioData) -> ReturnsDistributionResponse {
    ReturnsDistributionResponse {
        title: "Daily Returns Distribution".to_string(),
        histogram: returns_histogram(&portfolio.daily_returns, DEFAULT_HISTOGRAM_BINS),
    }
}

fn sector_chart(portfolio: &PortfolioData) -> SectorAllocationResponse {
    let slices = sector_allocation(&portfolio.positions)
        .into_iter()
        .map(|s| SectorSliceResponse {
            sector: s.sector,
            value: s.value.to_f64().unwrap_or_default(),
            weight_pct: s.weight_pct.to_f64().unwrap_or_default(),
        })
        .collect();

    SectorAllocationResponse {
        title: "Portfolio Sector Allocation".to_string(),
        slices,
    }
}

/// 윈도우 파라미터 검증 (기본값 적용).
fn resolve_window(window: Option<usize>) -> CubeResult<usize> {
    let window = window.unwrap_or(DEFAULT_VOLATILITY_WINDOW);
    if !(MIN_WINDOW..=MAX_WINDOW).contains(&window) {
        return Err(CubeError::InvalidInput(format!(
            "window는 {}-{} 사이여야 합니다 (요청: {})",
            MIN_WINDOW, MAX_WINDOW, window
        )));
    }
    Ok(window)
}

// ==================== 핸들러 ====================

/// GET /api/charts/equity-curve
pub async fn get_equity_chart(State(state): State<Arc<AppState>>) -> Json<EquityChartResponse> {
    Json(equity_chart(&state.portfolio))
}

/// GET /api/charts/drawdown
pub async fn get_drawdown_chart(
    State(state): State<Arc<AppState>>,
) -> Json<DrawdownChartResponse> {
    Json(drawdown_chart(&state.portfolio))
}

/// GET /api/charts/returns-distribution
pub async fn get_returns_distribution(
    State(state): State<Arc<AppState>>,
) -> Json<ReturnsDistributionResponse> {
    Json(returns_distribution_chart(&state.portfolio))
}

/// GET /api/charts/sector-allocation
pub async fn get_sector_allocation(
    State(state): State<Arc<AppState>>,
) -> Json<SectorAllocationResponse> {
    Json(sector_chart(&state.portfolio))
}

/// GET /api/charts/volatility
pub async fn get_volatility_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VolatilityQuery>,
) -> ApiResult<Json<VolatilityChartResponse>> {
    let window = resolve_window(query.window).map_err(cube_error)?;
    let portfolio = &state.portfolio;

    let values = rolling_volatility(
        &portfolio.daily_returns,
        window,
        state.metrics_config.periods_per_year,
    )
    .into_iter()
    .map(|v| v.map(|v| round_to(v, 4)))
    .collect();

    Ok(Json(VolatilityChartResponse {
        title: format!("{}-Day Rolling Volatility", window),
        window,
        start_date: portfolio.start_date,
        values,
    }))
}

/// GET /api/charts/correlation
pub async fn get_correlation_chart(
    State(state): State<Arc<AppState>>,
) -> Json<CorrelationChartResponse> {
    Json(CorrelationChartResponse {
        title: "Asset Correlation Matrix".to_string(),
        correlation: correlation_matrix(&state.portfolio.asset_returns),
    })
}

/// GET /api/charts/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardResponse> {
    let portfolio = &state.portfolio;
    Json(DashboardResponse {
        equity_curve: equity_chart(portfolio),
        drawdown: drawdown_chart(portfolio),
        sector_allocation: sector_chart(portfolio),
        returns_distribution: returns_distribution_chart(portfolio),
    })
}

/// 차트 라우터 생성.
pub fn charts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/equity-curve", get(get_equity_chart))
        .route("/drawdown", get(get_drawdown_chart))
        .route("/returns-distribution", get(get_returns_distribution))
        .route("/sector-allocation", get(get_sector_allocation))
        .route("/volatility", get(get_volatility_chart))
        .route("/correlation", get(get_correlation_chart))
        .route("/dashboard", get(get_dashboard))
}
