//! 포트폴리오 성과 분석.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 성과 지표 계산 (샤프, 소르티노, 최대 낙폭, 변동성, 베타)
//! - 차트용 데이터 시리즈 (자산 곡선, 낙폭, 수익률 분포, 롤링 변동성, 섹터 비중)
//! - 수익률 상관행렬
//! - 데모 포트폴리오 데이터
//!
//! 모든 계산 함수는 순수 함수입니다. 입력을 변경하지 않으며 내부 상태가 없으므로
//! 여러 스레드에서 자유롭게 호출할 수 있습니다.
//!
//! # Re-exports
//!
//! - [`performance`]: 성과 지표 (PortfolioMetrics, sharpe_ratio 등)
//! - [`portfolio`]: 포지션, 차트 시리즈, 데모 데이터
//! - [`correlation`]: 상관계수/상관행렬

pub mod correlation;
pub mod performance;
pub mod portfolio;

// Performance 모듈 re-exports
pub use performance::metrics::{
    beta, max_drawdown, portfolio_metrics, portfolio_metrics_with_config, round_to,
    sharpe_ratio, simple_returns, sortino_ratio, volatility, MetricsConfig, PortfolioMetrics,
    DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR,
};

// Portfolio 모듈 re-exports
pub use portfolio::charts::{
    dated_series, drawdown_series, equity_comparison, returns_histogram, rolling_volatility,
    sector_allocation, ChartPoint, EquityComparisonPoint, HistogramBin, ReturnsHistogram,
    SectorSlice, DEFAULT_HISTOGRAM_BINS, DEFAULT_VOLATILITY_WINDOW,
};
pub use portfolio::position::Position;

// Correlation re-export
pub use correlation::{calculate_correlation, correlation_matrix, CorrelationMatrix};
